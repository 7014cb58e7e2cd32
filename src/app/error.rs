use std::path::PathBuf;
use thiserror::Error;

pub type Result<T, E = PrepareError> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum PrepareError {
    #[error("Configuration file '{path}' not found")]
    ConfigNotFound { path: PathBuf },

    #[error("Failed to read configuration '{path}': {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Error parsing YAML file '{path}': {source}")]
    YamlParse {
        path: PathBuf,
        #[source]
        source: serde_yml::Error,
    },

    #[error("Error parsing TOML file '{path}': {source}")]
    TomlParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Invalid configuration format: {0}")]
    InvalidConfig(String),

    #[error("Invalid glob pattern '{pattern}': {source}")]
    Pattern {
        pattern: String,
        #[source]
        source: globset::Error,
    },

    #[error("Error reading file '{path}': {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Error creating output directory '{path}': {source}")]
    DirCreation {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Error writing to output file '{path}': {source}")]
    FileWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl PrepareError {
    /// Errors raised while producing an output document rather than reading input.
    pub fn is_output_stage(&self) -> bool {
        matches!(
            self,
            PrepareError::DirCreation { .. } | PrepareError::FileWrite { .. }
        )
    }
}
