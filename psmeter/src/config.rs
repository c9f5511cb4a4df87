//! Application configuration management.
//!
//! This module handles loading and merging configuration from multiple sources
//! with a clear precedence order. Configuration can come from default values,
//! a TOML file, and environment variables; the command line overrides all three.

use psm_solver::{Category, DEFAULT_STEP};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// The main application configuration that composes all section configs
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct AppConfig {
    /// Parameters of the price point computation
    #[serde(default)]
    pub analysis: AnalysisConfig,

    /// How results are presented
    #[serde(default)]
    pub output: OutputConfig,

    /// Which CSV column headers name which survey question
    #[serde(default)]
    pub headers: HeaderConfig,
}

/// Parameters of the price point computation
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AnalysisConfig {
    /// Spacing of the price grid, in currency units
    pub step: u64,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self { step: DEFAULT_STEP }
    }
}

/// How results are presented
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct OutputConfig {
    /// The currency unit printed after each price
    pub currency: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            currency: "yen".to_owned(),
        }
    }
}

/// Header aliases for each survey question.
///
/// Headers are compared after trimming whitespace, ignoring ASCII case.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct HeaderConfig {
    pub too_expensive: Vec<String>,
    pub expensive: Vec<String>,
    pub cheap: Vec<String>,
    pub too_cheap: Vec<String>,
}

impl Default for HeaderConfig {
    fn default() -> Self {
        let aliases = |names: &[&str]| -> Vec<String> {
            names.iter().map(|&name| name.to_owned()).collect()
        };
        Self {
            too_expensive: aliases(&["too expensive", "too_expensive", "高すぎる"]),
            expensive: aliases(&["expensive", "高い"]),
            cheap: aliases(&["cheap", "安い"]),
            too_cheap: aliases(&["too cheap", "too_cheap", "安すぎる"]),
        }
    }
}

impl HeaderConfig {
    /// The aliases configured for a category
    pub fn aliases(&self, category: Category) -> &[String] {
        match category {
            Category::TooExpensive => &self.too_expensive,
            Category::Expensive => &self.expensive,
            Category::Cheap => &self.cheap,
            Category::TooCheap => &self.too_cheap,
        }
    }

    /// The category a column header names, if any
    pub fn category(&self, header: &str) -> Option<Category> {
        // spreadsheet exports often lead with a byte order mark
        let header = header.trim_start_matches('\u{feff}').trim();
        Category::ALL.into_iter().find(|&category| {
            self.aliases(category)
                .iter()
                .any(|alias| alias.trim().eq_ignore_ascii_case(header))
        })
    }
}

impl AppConfig {
    /// Load configuration from multiple sources with precedence:
    /// 1. Environment variables (highest priority)
    /// 2. Config file given on the command line
    /// 3. Default values (lowest priority)
    ///
    /// Environment variables are mapped using the pattern:
    /// `PSM_<SECTION>__<KEY>` maps to `<section>.<key>`
    ///
    /// # Examples
    ///
    /// ```bash
    /// # Use a finer price grid
    /// export PSM_ANALYSIS__STEP=10
    ///
    /// # Print prices in euros
    /// export PSM_OUTPUT__CURRENCY="EUR"
    /// ```
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        Self::load_with(path, Self::environment())
    }

    /// The environment source used by [`AppConfig::load`].
    ///
    /// This maps `PSM_ANALYSIS__STEP` to `analysis.step`.
    pub fn environment() -> config::Environment {
        config::Environment::with_prefix("PSM")
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true)
    }

    /// Like [`AppConfig::load`], but with the environment layer supplied by the caller
    pub fn load_with(
        path: Option<&Path>,
        environment: config::Environment,
    ) -> anyhow::Result<Self> {
        let mut config = config::Config::builder();

        // Start with default values
        config = config.add_source(config::Config::try_from(&Self::default())?);

        // Layer on config file if it is specified and exists
        if let Some(path) = path {
            if path.exists() {
                config = config.add_source(config::File::from(path))
            } else {
                return Err(anyhow::anyhow!(
                    "Config file {} does not exist",
                    path.display()
                ));
            }
        }

        // Override with environment variables
        config = config.add_source(environment);

        let built_config = config.build()?;
        built_config.try_deserialize().map_err(Into::into)
    }
}
