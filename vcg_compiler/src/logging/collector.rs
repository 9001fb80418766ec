//! Per-file error collection for multi-file compiler runs
//!
//! Collects error and warning events keyed by source file so the driver can
//! print a grouped summary after all files have been processed.

use super::events::LogEvent;
use crate::config::compile_time::logging::{MAX_ERROR_COLLECTION, MAX_LOG_EVENTS_PER_FILE};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Context describing the file currently being processed
#[derive(Debug, Clone)]
pub struct FileProcessingContext {
    pub file_path: PathBuf,
    pub file_id: usize,
}

impl FileProcessingContext {
    pub fn new(file_path: PathBuf, file_id: usize) -> Self {
        Self { file_path, file_id }
    }
}

/// Aggregate statistics over all processed files
#[derive(Debug, Clone, Default)]
pub struct ProcessingSummary {
    pub total_files: usize,
    pub total_errors: usize,
    pub total_warnings: usize,
}

impl ProcessingSummary {
    pub fn is_clean(&self) -> bool {
        self.total_errors == 0 && self.total_warnings == 0
    }
}

/// Thread-safe collector of error/warning events, grouped per file
pub struct ErrorCollector {
    files: Mutex<HashMap<PathBuf, Vec<LogEvent>>>,
    total_events: Mutex<usize>,
}

impl ErrorCollector {
    pub fn new() -> Self {
        Self {
            files: Mutex::new(HashMap::new()),
            total_events: Mutex::new(0),
        }
    }

    /// Register a file so it appears in the summary even when clean
    pub fn record_file_context(&self, context: FileProcessingContext) {
        self.files
            .lock()
            .unwrap()
            .entry(context.file_path)
            .or_default();
    }

    /// Record an error/warning event against a file.
    /// Info and debug events are not collected.
    pub fn record_event(&self, file_path: &Path, event: LogEvent) {
        if !event.is_error() && !event.is_warning() {
            return;
        }

        let mut total = self.total_events.lock().unwrap();
        if *total >= MAX_ERROR_COLLECTION {
            return;
        }

        let mut files = self.files.lock().unwrap();
        let events = files.entry(file_path.to_path_buf()).or_default();
        if events.len() >= MAX_LOG_EVENTS_PER_FILE {
            return;
        }

        events.push(event);
        *total += 1;
    }

    /// Get all collected errors for a specific file
    pub fn get_file_errors(&self, file_path: &Path) -> Vec<LogEvent> {
        self.files
            .lock()
            .unwrap()
            .get(file_path)
            .map(|events| events.iter().filter(|e| e.is_error()).cloned().collect())
            .unwrap_or_default()
    }

    /// Aggregate summary over all files
    pub fn get_summary(&self) -> ProcessingSummary {
        let files = self.files.lock().unwrap();
        let mut summary = ProcessingSummary {
            total_files: files.len(),
            ..Default::default()
        };

        for events in files.values() {
            summary.total_errors += events.iter().filter(|e| e.is_error()).count();
            summary.total_warnings += events.iter().filter(|e| e.is_warning()).count();
        }

        summary
    }

    /// Current collection capacity usage: (current, max, fraction)
    pub fn get_capacity_info(&self) -> (usize, usize, f64) {
        let current = *self.total_events.lock().unwrap();
        (
            current,
            MAX_ERROR_COLLECTION,
            current as f64 / MAX_ERROR_COLLECTION as f64,
        )
    }

    pub fn clear(&self) {
        self.files.lock().unwrap().clear();
        *self.total_events.lock().unwrap() = 0;
    }
}

impl Default for ErrorCollector {
    fn default() -> Self {
        Self::new()
    }
}

/// Format collected events as a grouped, per-file report
pub fn format_grouped_errors(collector: &ErrorCollector) -> String {
    let files = collector.files.lock().unwrap();
    let mut output = String::new();

    let mut paths: Vec<&PathBuf> = files.keys().collect();
    paths.sort();

    for path in paths {
        let events = &files[path];
        if events.is_empty() {
            continue;
        }

        output.push_str(&format!("{}:\n", path.display()));
        for event in events {
            let location = event
                .span
                .map(|s| format!("{}:{}: ", s.start().line, s.start().column))
                .unwrap_or_default();
            output.push_str(&format!(
                "  {}: {}{} [{}]\n",
                event.level.as_str().to_lowercase(),
                location,
                event.message,
                event.code
            ));
        }
    }

    let mut summary = ProcessingSummary {
        total_files: files.len(),
        ..Default::default()
    };
    for events in files.values() {
        summary.total_errors += events.iter().filter(|e| e.is_error()).count();
        summary.total_warnings += events.iter().filter(|e| e.is_warning()).count();
    }

    if summary.is_clean() {
        output.push_str("no errors or warnings\n");
    } else {
        output.push_str(&format!(
            "{} error(s), {} warning(s) across {} file(s)\n",
            summary.total_errors, summary.total_warnings, summary.total_files
        ));
    }

    output
}
