use crate::file_processor::FileMetadata;
use crate::grammar::VcgModule;
use crate::lexical::LexicalMetrics;
use crate::logging::codes;
use std::time::Duration;

/// Output of a successful pipeline run for one file
#[derive(Debug, Clone)]
pub struct PipelineResult {
    pub module: VcgModule,
    pub file_metadata: FileMetadata,
    pub lexical_metrics: LexicalMetrics,
    pub token_count: usize,
    pub total_duration: Duration,
}

impl PipelineResult {
    pub fn new(
        module: VcgModule,
        file_metadata: FileMetadata,
        lexical_metrics: LexicalMetrics,
        token_count: usize,
        total_duration: Duration,
    ) -> Self {
        Self {
            module,
            file_metadata,
            lexical_metrics,
            token_count,
            total_duration,
        }
    }

    /// One-line human-readable summary
    pub fn summary(&self) -> String {
        format!(
            "{}: {} token(s), {} import(s), {} rule(s) in {:.2}ms",
            self.module.file_name,
            self.token_count,
            self.module.import_count(),
            self.module.rule_count(),
            self.total_duration.as_secs_f64() * 1000.0
        )
    }

    pub fn log_success(&self) {
        crate::log_success!(codes::success::OPERATION_COMPLETED,
            "Pipeline completed",
            "file" => self.module.file_name.as_str(),
            "tokens" => self.token_count,
            "imports" => self.module.import_count(),
            "rules" => self.module.rule_count(),
            "duration_ms" => self.total_duration.as_secs_f64() * 1000.0
        );
    }
}
