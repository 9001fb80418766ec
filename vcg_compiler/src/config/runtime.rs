//! Runtime preference structures for the VCG compiler
//!
//! Security boundaries live in `config::constants` and cannot be changed at
//! runtime; the structures here only tune behavior within those boundaries.

use serde::{Deserialize, Serialize};

/// Runtime log level preference (maps onto `logging::events::LogLevel`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LogLevel {
    Error,
    Warning,
    Info,
    Debug,
}

impl LogLevel {
    pub fn to_events_log_level(self) -> crate::logging::LogLevel {
        match self {
            LogLevel::Error => crate::logging::LogLevel::Error,
            LogLevel::Warning => crate::logging::LogLevel::Warning,
            LogLevel::Info => crate::logging::LogLevel::Info,
            LogLevel::Debug => crate::logging::LogLevel::Debug,
        }
    }
}

impl Default for LogLevel {
    fn default() -> Self {
        LogLevel::Info
    }
}

/// File processor runtime preferences
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileProcessorPreferences {
    /// Whether to require the .vcg extension
    pub require_vcg_extension: bool,
    /// Whether to log per-file timing information
    pub enable_performance_logging: bool,
    /// Whether to look for a same-stem companion script file
    pub detect_companion_file: bool,
}

impl Default for FileProcessorPreferences {
    fn default() -> Self {
        Self {
            require_vcg_extension: false,
            enable_performance_logging: true,
            detect_companion_file: true,
        }
    }
}

/// Lexical analysis runtime preferences
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LexicalPreferences {
    /// Whether to collect per-kind token counts
    pub collect_detailed_metrics: bool,
    /// Whether error messages include line/column context
    pub include_position_in_errors: bool,
}

impl Default for LexicalPreferences {
    fn default() -> Self {
        Self {
            collect_detailed_metrics: true,
            include_position_in_errors: true,
        }
    }
}

/// Logging runtime preferences
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingPreferences {
    /// Minimum log level to emit
    pub min_log_level: LogLevel,
    /// Emit JSON lines instead of human-readable text
    pub use_structured_logging: bool,
    /// Attach the current file path to every event
    pub include_file_context: bool,
}

impl Default for LoggingPreferences {
    fn default() -> Self {
        Self {
            min_log_level: LogLevel::Info,
            use_structured_logging: false,
            include_file_context: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_level_conversion() {
        assert_eq!(
            LogLevel::Debug.to_events_log_level(),
            crate::logging::LogLevel::Debug
        );
        assert_eq!(
            LogLevel::Error.to_events_log_level(),
            crate::logging::LogLevel::Error
        );
    }

    #[test]
    fn test_defaults() {
        let prefs = FileProcessorPreferences::default();
        assert!(!prefs.require_vcg_extension);
        assert!(prefs.detect_companion_file);

        let logging = LoggingPreferences::default();
        assert_eq!(logging.min_log_level, LogLevel::Info);
        assert!(logging.include_file_context);
    }
}
