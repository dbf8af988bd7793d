use std::path::PathBuf;

/// Arguments for the analyze command
///
/// **Public** - used by main.rs to construct from CLI args
#[derive(Debug, Clone)]
pub struct AnalyzeArgs {
    /// Directory of trace files (or a single trace file)
    pub input: PathBuf,

    /// Optional analysis config file (TOML)
    pub config: Option<PathBuf>,

    /// Multiplier override for the coefficient table
    pub multiplier: Option<u32>,

    /// Directory receiving the table and CSV files; stdout when absent
    pub output_dir: Option<PathBuf>,

    /// Also render the detailed statistics table
    pub detailed: bool,

    /// Print the summary as CSV instead of a plain table
    pub csv: bool,

    /// Path to write the JSON report
    pub json: Option<PathBuf>,

    /// Worker threads for parsing (rayon default when absent)
    pub jobs: Option<usize>,
}

impl Default for AnalyzeArgs {
    fn default() -> Self {
        Self {
            input: PathBuf::from("traces"),
            config: None,
            multiplier: None,
            output_dir: None,
            detailed: false,
            csv: false,
            json: None,
            jobs: None,
        }
    }
}
