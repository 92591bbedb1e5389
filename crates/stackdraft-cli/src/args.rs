//! Command-line argument definitions for the stackdraft CLI.
//!
//! This module defines the [`Args`] structure parsed from the command line
//! using [`clap`]. Global arguments select the catalog, configuration file
//! and logging verbosity; subcommands cover catalog queries and diagram
//! generation.

use clap::{Parser, Subcommand};

use stackdraft::{Category, Layer};

/// Command-line arguments for the stackdraft tool
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to the technology catalog JSON file
    #[arg(short = 'C', long)]
    pub catalog: String,

    /// Path to configuration file (TOML)
    #[arg(short, long)]
    pub config: Option<String>,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List catalog components, optionally filtered
    List {
        /// Only components in this category
        #[arg(long, value_parser = parse_category)]
        category: Option<Category>,

        /// Only components in this architectural layer
        #[arg(long, value_parser = parse_layer)]
        layer: Option<Layer>,

        /// Only core/foundational components
        #[arg(long)]
        core: bool,
    },

    /// Search components by id, name or description
    Search {
        /// Case-insensitive search query
        query: String,
    },

    /// Show aggregate catalog statistics
    Stats,

    /// Validate a component selection
    Validate {
        /// Comma-separated component ids
        #[arg(long, value_delimiter = ',')]
        components: Vec<String>,
    },

    /// Generate a render spec for a component selection
    Generate {
        /// Comma-separated component ids
        #[arg(long, value_delimiter = ',')]
        components: Vec<String>,

        /// Name of the generated stack
        #[arg(long, default_value = "Architecture")]
        name: String,

        /// Description of the generated stack
        #[arg(long, default_value = "")]
        description: String,

        /// Path for the render spec JSON
        #[arg(short, long, default_value = "out.json")]
        output: String,

        /// Add missing dependencies instead of failing validation
        #[arg(long)]
        auto_resolve: bool,
    },
}

fn parse_category(value: &str) -> Result<Category, String> {
    Category::ALL
        .iter()
        .copied()
        .find(|category| category.as_str() == value)
        .ok_or_else(|| {
            let known: Vec<_> = Category::ALL.iter().map(|c| c.as_str()).collect();
            format!("unknown category '{value}' (expected one of: {})", known.join(", "))
        })
}

fn parse_layer(value: &str) -> Result<Layer, String> {
    Layer::CANONICAL_ORDER
        .iter()
        .copied()
        .find(|layer| layer.as_str() == value)
        .ok_or_else(|| {
            let known: Vec<_> = Layer::CANONICAL_ORDER.iter().map(|l| l.as_str()).collect();
            format!("unknown layer '{value}' (expected one of: {})", known.join(", "))
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_and_layer_parse_from_catalog_tokens() {
        assert_eq!(parse_category("power_platform"), Ok(Category::PowerPlatform));
        assert_eq!(parse_layer("presentation"), Ok(Layer::Presentation));
        assert!(parse_category("gaming").is_err());
        assert!(parse_layer("cloud").is_err());
    }

    #[test]
    fn generate_splits_comma_separated_components() {
        let args = Args::parse_from([
            "stackdraft",
            "--catalog",
            "catalog.json",
            "generate",
            "--components",
            "power_bi,dataverse",
            "--name",
            "Analytics",
        ]);

        match args.command {
            Command::Generate { components, name, .. } => {
                assert_eq!(components, ["power_bi", "dataverse"]);
                assert_eq!(name, "Analytics");
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }
}
