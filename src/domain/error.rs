//! Domain error types.

/// Top-level error type for superstore-dash.
#[derive(Debug, thiserror::Error)]
pub enum DashboardError {
    #[error("missing required column '{column}'")]
    MissingColumn { column: String },

    #[error("line {line}: invalid {column} value '{value}': {reason}")]
    InvalidField {
        line: u64,
        column: String,
        value: String,
        reason: String,
    },

    #[error("CSV parse error: {reason}")]
    Csv { reason: String },

    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("missing config key [{section}] {key}")]
    ConfigMissing { section: String, key: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error("invalid query: {reason}")]
    InvalidQuery { reason: String },

    #[error("render error: {reason}")]
    Render { reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl DashboardError {
    /// True for errors caused by the input table not matching the
    /// transaction schema (missing column, unparseable value).
    pub fn is_schema_error(&self) -> bool {
        matches!(
            self,
            DashboardError::MissingColumn { .. } | DashboardError::InvalidField { .. }
        )
    }
}

impl From<&DashboardError> for std::process::ExitCode {
    fn from(err: &DashboardError) -> Self {
        let code: u8 = match err {
            DashboardError::Io(_) => 1,
            DashboardError::ConfigParse { .. }
            | DashboardError::ConfigMissing { .. }
            | DashboardError::ConfigInvalid { .. } => 2,
            DashboardError::MissingColumn { .. }
            | DashboardError::InvalidField { .. }
            | DashboardError::Csv { .. } => 3,
            DashboardError::InvalidQuery { .. } => 4,
            DashboardError::Render { .. } => 5,
        };
        std::process::ExitCode::from(code)
    }
}
