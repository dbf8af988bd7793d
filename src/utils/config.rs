//! Configuration and constants for the analyzer.

use super::error::ConfigError;
use log::debug;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Current output report schema version
pub const SCHEMA_VERSION: &str = "1.0.0";

/// Extension of trace files produced by the runtime instrumentation
pub const TRACE_FILE_EXTENSION: &str = "xml";

/// Attribute carrying a node's reported instruction count
pub const INSTRUCTIONS_ATTR: &str = "ins";

/// Attribute marking a call that returned before doing any work
pub const RETURN_ATTR: &str = "return";

/// Attribute marking an operation whose cost is metered separately
pub const MULTIPLIER_ATTR: &str = "multiplier";

/// Tag of the scope node whose children count as direct children
/// for separately metered subtraction
pub const EXECUTE_SCOPE_TAG: &str = "execute";

// Instruction counts above this value come from a calibration underflow
// in the instrumentation, never from a real measurement.
pub const OVERFLOW_THRESHOLD: u64 = 0xFF00_0000_0000_0000;

/// Maximum number of intervening nodes crossed when searching for nested
/// same-kind operations
pub const NESTED_SEARCH_DEPTH: usize = 5;

/// Default integer multiplier for the cost-coefficient table
pub const DEFAULT_MULTIPLIER: u32 = 16;

/// Signature prefix of native function invocations
pub const NATIVE_INVOKE_PREFIX: &str = "kernel_invoke::native::";

/// Separator between signature segments
pub const SEGMENT_SEPARATOR: &str = "::";

/// Operations whose cost is dominated by one-time warm-up work
pub const DEFAULT_CACHE_SENSITIVE: &[&str] = &[
    "instantiate_wasm_code",
    "validate_wasm_code",
    "kernel_create_wasm_instance",
];

/// File names written by the analyze command into its output directory
pub const DETAILED_TABLE_FILE: &str = "detailed_costs.txt";
pub const SUMMARY_TABLE_FILE: &str = "cost_summary.txt";
pub const SUMMARY_CSV_FILE: &str = "cost_summary.csv";
pub const NATIVE_COSTS_FILE: &str = "native_function_base_costs.csv";
pub const MODELS_FILE: &str = "size_cost_models.txt";

/// Tunable analysis settings, optionally loaded from TOML
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Integer multiplier applied when normalizing costs to coefficients
    pub multiplier: u32,

    /// Base operations reported by their max instead of their median
    pub cache_sensitive: Vec<String>,

    /// Fit size models on every raw sample instead of one
    /// representative cost per size
    pub regression_on_raw_samples: bool,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            multiplier: DEFAULT_MULTIPLIER,
            cache_sensitive: DEFAULT_CACHE_SENSITIVE
                .iter()
                .map(|s| s.to_string())
                .collect(),
            regression_on_raw_samples: false,
        }
    }
}

impl AnalysisConfig {
    /// Whether a signature's base operation is reported by its max
    pub fn is_cache_sensitive(&self, tag: &str) -> bool {
        self.cache_sensitive.iter().any(|t| t == tag)
    }
}

/// Load analysis settings from a TOML file
///
/// Missing keys keep their defaults.
///
/// # Errors
/// * `ConfigError::Io` - If file cannot be read
/// * `ConfigError::Toml` - If TOML is invalid
/// * `ConfigError::Invalid` - If the multiplier is zero
pub fn load_config(path: impl AsRef<Path>) -> Result<AnalysisConfig, ConfigError> {
    let path = path.as_ref();
    debug!("Loading analysis config from: {}", path.display());

    let contents = fs::read_to_string(path)?;
    let config: AnalysisConfig = toml::from_str(&contents)?;

    if config.multiplier == 0 {
        return Err(ConfigError::Invalid(
            "multiplier must be greater than 0".to_string(),
        ));
    }

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_config() {
        let config = AnalysisConfig::default();
        assert_eq!(config.multiplier, 16);
        assert!(config.is_cache_sensitive("instantiate_wasm_code"));
        assert!(!config.is_cache_sensitive("kernel_invoke"));
    }

    #[test]
    fn test_load_partial_config() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "multiplier = 32").unwrap();

        let config = load_config(file.path()).unwrap();
        assert_eq!(config.multiplier, 32);
        assert_eq!(config.cache_sensitive.len(), DEFAULT_CACHE_SENSITIVE.len());
        assert!(!config.regression_on_raw_samples);
    }

    #[test]
    fn test_load_config_rejects_zero_multiplier() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "multiplier = 0").unwrap();

        assert!(matches!(
            load_config(file.path()),
            Err(ConfigError::Invalid(_))
        ));
    }

    #[test]
    fn test_load_config_invalid_toml() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "multiplier = [").unwrap();

        assert!(matches!(load_config(file.path()), Err(ConfigError::Toml(_))));
    }
}
