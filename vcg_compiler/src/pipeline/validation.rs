/// Validate the pipeline stages' logging and configuration wiring.
/// Run once at startup before processing any file.
pub fn validate_pipeline() -> Result<(), String> {
    crate::logging::config::validate_config()?;
    crate::file_processor::init_file_processor_logging()?;
    crate::lexical::init_lexical_analysis_logging()?;
    crate::syntax::init_syntax_logging()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_pipeline() {
        assert!(validate_pipeline().is_ok());
    }
}
