use thiserror::Error;

/// Errors raised while building a `ReportTypeRegistry` from override documents.
#[derive(Error, Debug, Clone)]
pub enum RegistryError {
    #[error("Failed to parse registry overrides: {0}")]
    JsonParseError(String),

    #[error("Override names an unknown report type: '{0}'")]
    UnknownReportType(String),

    #[error("Report type '{report_type}' references an unregistered post-processor: '{processor}'")]
    UnknownPostProcessor {
        report_type: String,
        processor: String,
    },
}

/// Errors raised while loading an `EngineConfig`.
#[derive(Error, Debug, Clone)]
pub enum ConfigError {
    #[error("Failed to read engine configuration '{path}': {message}")]
    Io { path: String, message: String },

    #[error("Failed to parse engine configuration: {0}")]
    JsonParseError(String),
}

/// Errors that can surface from a derivation.
///
/// With the default (lenient) engine configuration, post-processor failures are logged and
/// the stage is reverted, so only `InvalidShape` and input parse errors reach the caller.
#[derive(Error, Debug, Clone)]
pub enum DerivationError {
    #[error("Post-processor '{processor}' failed: {reason}")]
    ProcessorFailed { processor: String, reason: String },

    #[error("Post-processor '{processor}' broke its contract: {detail}")]
    ContractViolation { processor: String, detail: String },

    #[error("Filter '{key}' has an invalid shape: {detail}")]
    InvalidShape { key: String, detail: String },

    #[error("Failed to parse drilldown input '{input}': {message}")]
    InputParseError { input: String, message: String },
}
