//! Common CLI types shared across commands

/// Output format options
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Pretty format - the response body, indented
    #[default]
    Pretty,
    /// JSON format - response wrapped with metadata for scripts
    Json,
}
