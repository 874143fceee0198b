use thiserror::Error;

/// Malformed component or message input, raised at construction time.
#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("Map component requires at least one entry")]
    EmptyMap,

    #[error("Table component requires at least one row")]
    EmptyTable,

    #[error("Table row {0} has no fields")]
    EmptyRow(usize),

    #[error("Table header must name at least one column")]
    EmptyHeader,

    #[error("Table header repeats column '{0}'")]
    DuplicateColumn(String),

    #[error("File component requires a file name")]
    EmptyFileName,

    #[error("Failed to read attachment {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write table as CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("LineBreak count must be at least 1")]
    ZeroLineBreak,

    #[error("Alert message requires at least one component")]
    EmptyMessage,
}

/// Missing or malformed configuration values.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Missing required setting: {0}")]
    Missing(String),

    #[error("Invalid value for {key}: {value}")]
    Invalid { key: String, value: String },

    #[error("Unknown alert method '{0}'. Valid choices: slack, email")]
    UnknownMethod(String),
}
