//! High-level pipeline API for compiling VCG files
//!
//! Stages: file processing -> lexical analysis -> two-pass compilation.
//! Everything runs synchronously on the caller's thread; one failing stage
//! unwinds the current file and leaves previously compiled modules intact.

mod error;
mod result;
mod validation;

pub use error::PipelineError;
pub use result::PipelineResult;
pub use validation::validate_pipeline;

use crate::logging;
use std::path::PathBuf;
use std::time::Instant;

/// Compile a single file with an empty package path
pub fn process_file(file_path: &str) -> Result<PipelineResult, PipelineError> {
    process_file_in_package(file_path, "")
}

/// Compile a single file, attributing it to the given package path.
/// The directory walker collaborator supplies the package path.
pub fn process_file_in_package(
    file_path: &str,
    package_path: &str,
) -> Result<PipelineResult, PipelineError> {
    let start_time = Instant::now();

    logging::with_file_context(PathBuf::from(file_path), 0, || {
        crate::log_info!("Starting VCG compilation pipeline", "file" => file_path);

        // Stage 1: read the file into memory
        let file_result = crate::file_processor::process_file(file_path)?;
        if file_result.is_effectively_empty() {
            crate::log_warning!("Source contains no grammar content", "file" => file_path);
        }

        // Stage 2: lexical analysis
        let mut analyzer = crate::lexical::create_analyzer();
        let cursor = analyzer.tokenize_file_result(&file_result)?;
        let lexical_metrics = analyzer.metrics().clone();
        let token_count = cursor.len();

        // Stage 3: two-pass compilation
        let file_name = file_result
            .metadata
            .path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| file_path.to_string());
        let mut module = crate::syntax::parse_cursor(cursor, package_path, &file_name)?;
        module.companion_path = file_result.companion_path.clone();

        let result = PipelineResult::new(
            module,
            file_result.metadata,
            lexical_metrics,
            token_count,
            start_time.elapsed(),
        );

        result.log_success();
        Ok(result)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn write_vcg(dir: &tempfile::TempDir, name: &str, content: &str) -> String {
        let path = dir.path().join(name);
        fs::write(&path, content).unwrap();
        path.to_string_lossy().into_owned()
    }

    #[test]
    fn test_end_to_end_compilation() {
        let dir = tempdir().unwrap();
        let path = write_vcg(
            &dir,
            "commands.vcg",
            "import my.package.here;\n\
             $test = hello [my friendly] computer 12;\n\
             $other @cb = (a | b)+;\n",
        );

        let result = process_file_in_package(&path, "voice.commands").unwrap();
        let module = &result.module;

        assert_eq!(module.package_path, "voice.commands");
        assert_eq!(module.file_name, "commands.vcg");
        assert_eq!(module.import_count(), 1);
        assert_eq!(module.rule_count(), 2);
        assert_eq!(
            module.rules["test"].to_string(),
            "hello [my friendly] computer 12"
        );
        assert_eq!(module.callback_for("other"), Some("cb"));
        assert!(result.token_count > 0);
        assert!(result.summary().contains("commands.vcg"));
    }

    #[test]
    fn test_companion_path_recorded() {
        let dir = tempdir().unwrap();
        let path = write_vcg(&dir, "mod.vcg", "$r = a;\n");
        fs::write(dir.path().join("mod.vcs"), "callback stub\n").unwrap();

        let result = process_file(&path).unwrap();
        assert!(result.module.companion_path.is_some());
    }

    #[test]
    fn test_lex_error_propagates() {
        let dir = tempdir().unwrap();
        let path = write_vcg(&dir, "bad.vcg", "$r = hel1o;\n");

        let error = process_file(&path).unwrap_err();
        assert!(matches!(error, PipelineError::LexicalAnalysis(_)));
        assert_eq!(error.stage(), "lexical analysis");
    }

    #[test]
    fn test_compile_error_propagates() {
        let dir = tempdir().unwrap();
        let path = write_vcg(&dir, "bad.vcg", "$r = a{3,1};\n");

        let error = process_file(&path).unwrap_err();
        assert!(matches!(error, PipelineError::Compilation(_)));
        assert!(error
            .to_string()
            .contains("Max value is less than the paired minimum value"));
    }

    #[test]
    fn test_missing_file_propagates() {
        let error = process_file("/definitely/not/here.vcg").unwrap_err();
        assert!(matches!(error, PipelineError::FileProcessing(_)));
    }
}
