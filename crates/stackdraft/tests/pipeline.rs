//! End-to-end pipeline tests: catalog → composition → assembly → layout →
//! render spec.

use stackdraft::{AppConfig, Category, Composer, IntegrationPattern, Layer, Pipeline};
use stackdraft_catalog::{Catalog, loader};

const CATALOG_SOURCE: &str = r#"{
    "power_platform": {
        "analytics": [
            {
                "id": "power_bi",
                "name": "Power BI",
                "category": "power_platform",
                "subcategory": "analytics",
                "description": "Business analytics service",
                "layer": "presentation",
                "dependencies": ["dataverse"],
                "integration_patterns": ["odata", "dataverse_connector"],
                "is_core": true
            }
        ],
        "data": [
            {
                "id": "dataverse",
                "name": "Dataverse",
                "category": "power_platform",
                "subcategory": "data",
                "description": "Data platform",
                "layer": "data",
                "integration_patterns": ["dataverse_connector", "odata"],
                "is_core": true
            }
        ]
    },
    "security_ops": {
        "identity": [
            {
                "id": "azure_ad",
                "name": "Azure Active Directory",
                "category": "security_ops",
                "subcategory": "identity",
                "description": "Identity and access management",
                "layer": "security",
                "integration_patterns": ["rest_api"]
            }
        ]
    }
}"#;

fn catalog() -> Catalog {
    loader::parse(CATALOG_SOURCE).expect("catalog source is valid")
}

#[test]
fn generate_produces_a_complete_render_spec() {
    let catalog = catalog();
    let pipeline = Pipeline::new(AppConfig::default());

    let spec = pipeline
        .generate(&catalog, "Analytics", "BI rollout", &["power_bi", "dataverse"])
        .unwrap();

    assert_eq!(spec.name, "Analytics");
    assert_eq!(spec.nodes.len(), 2);
    assert_eq!(spec.bands.len(), 2);
    assert_eq!(spec.bands[0].layer, Layer::Presentation);
    assert_eq!(spec.bands[1].layer, Layer::Data);

    // The dependency pair yields exactly one inferred flow with the
    // lowest-ordinal common pattern.
    assert_eq!(spec.edges.len(), 1);
    let edge = &spec.edges[0];
    assert_eq!(edge.source_node_id, "node_dataverse");
    assert_eq!(edge.target_node_id, "node_power_bi");
    assert_eq!(edge.style.pattern, IntegrationPattern::DataverseConnector);
    assert_eq!(edge.label, "Dataverse Connector");
}

#[test]
fn generate_rejects_unknown_components() {
    let catalog = catalog();
    let pipeline = Pipeline::new(AppConfig::default());

    let err = pipeline
        .generate(&catalog, "Broken", "", &["power_bi", "not_a_component"])
        .unwrap_err();
    assert_eq!(err.to_string(), "component not found: not_a_component");
}

#[test]
fn assembled_architecture_reports_complexity_and_suggestions() {
    let catalog = catalog();
    let pipeline = Pipeline::new(AppConfig::default());

    let composer = pipeline
        .compose(&catalog, "Analytics", "", &["power_bi", "dataverse"])
        .unwrap();
    let architecture = pipeline.assemble(composer);

    assert_eq!(architecture.layer_order(), vec![Layer::Presentation, Layer::Data]);
    // 2 components, 1 inferred flow, 2 layers: 0 + 0 + 2 = 2.
    assert_eq!(architecture.complexity_score(), 2);
    assert!(architecture.validate().is_empty());

    // No security layer selected, so the identity suggestion fires.
    let suggestions = architecture.enhancement_suggestions();
    assert!(
        suggestions
            .iter()
            .any(|s| s.contains("Azure Active Directory"))
    );
}

#[test]
fn manifest_round_trip_through_the_catalog() {
    let catalog = catalog();

    let mut composer = Composer::new(&catalog, "Analytics", "BI rollout");
    composer.add_component("power_bi").unwrap();
    composer.add_component("dataverse").unwrap();
    composer.apply_suggested_integrations();

    let manifest = composer.manifest();
    let json = serde_json::to_string(&manifest).unwrap();
    let restored: stackdraft::StackManifest = serde_json::from_str(&json).unwrap();

    let mut rebuilt = Composer::new(&catalog, &restored.name, &restored.description);
    for id in &restored.component_ids {
        rebuilt.add_component(id).unwrap();
    }
    for flow in restored.flows.clone() {
        rebuilt.add_flow(flow).unwrap();
    }

    assert_eq!(rebuilt.stack(), composer.stack());
}

#[test]
fn suggestions_cover_missing_dependency_and_identity() {
    let catalog = catalog();
    let composer = Composer::new(&catalog, "partial", "");

    let suggestions = composer.suggest_additional_components(&["power_bi"]);
    let ids: Vec<_> = suggestions.iter().map(|s| s.id()).collect();
    assert_eq!(ids, ["dataverse", "azure_ad"]);
}

#[test]
fn catalog_statistics_match_source() {
    let stats = catalog().statistics();
    assert_eq!(stats.total, 3);
    assert_eq!(stats.core, 2);
    assert_eq!(stats.by_category[&Category::PowerPlatform], 2);
    assert_eq!(stats.by_layer[&Layer::Security], 1);
}

#[test]
fn architecture_without_data_layer_still_lays_out() {
    let catalog = catalog();
    let pipeline = Pipeline::new(AppConfig::default());

    let composer = pipeline.compose(&catalog, "identity-only", "", &["azure_ad"]).unwrap();
    let architecture = pipeline.assemble(composer);
    assert_eq!(
        architecture.validate(),
        ["Architecture should include at least one data layer component"]
    );

    let spec = pipeline.render_spec(&architecture);
    assert_eq!(spec.nodes.len(), 1);
    assert!(spec.edges.is_empty());
}

#[test]
fn removing_a_component_cascades_into_the_next_render() {
    let catalog = catalog();
    let pipeline = Pipeline::new(AppConfig::default());

    let composer = pipeline
        .compose(&catalog, "Analytics", "", &["power_bi", "dataverse"])
        .unwrap();
    let mut architecture = pipeline.assemble(composer);
    assert_eq!(pipeline.render_spec(&architecture).edges.len(), 1);

    architecture.remove_component("dataverse");
    let spec = pipeline.render_spec(&architecture);
    assert_eq!(spec.nodes.len(), 1);
    assert!(spec.edges.is_empty());
    assert_eq!(architecture.layer_order(), vec![Layer::Presentation]);
}
