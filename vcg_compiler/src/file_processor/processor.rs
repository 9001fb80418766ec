//! File processor implementation
//!
//! Reads a whole source file into memory in one narrow scope, validating
//! path, size and encoding; the file handle is released before any lexing
//! starts and no further I/O happens during compilation.

use crate::config::constants::compile_time::file_processing::{
    LARGE_FILE_THRESHOLD, MAX_FILE_SIZE, MAX_LINE_COUNT,
};
use crate::config::runtime::FileProcessorPreferences;
use crate::logging::codes;
use crate::{log_debug, log_success};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Extension of VCG grammar sources
pub const VCG_EXTENSION: &str = "vcg";

/// Extension of the optional same-stem companion script
pub const COMPANION_EXTENSION: &str = "vcs";

/// File processor specific errors
#[derive(Debug, Clone, thiserror::Error)]
pub enum FileProcessorError {
    #[error("File not found: {path}")]
    FileNotFound { path: String },

    #[error("Invalid file extension: expected .{VCG_EXTENSION}, found {extension:?}")]
    InvalidExtension { extension: Option<String> },

    #[error("File too large: {size} bytes (max: {max_size})")]
    FileTooLarge { size: u64, max_size: u64 },

    #[error("File is empty")]
    EmptyFile,

    #[error("Permission denied: {path}")]
    PermissionDenied { path: String },

    #[error("Invalid UTF-8 encoding in file: {path}")]
    InvalidEncoding { path: String },

    #[error("I/O error reading file: {message}")]
    IoError { message: String },

    #[error("Invalid file path: {path}")]
    InvalidPath { path: String },

    #[error("File exceeds maximum line count: {lines} (max: {max_lines})")]
    TooManyLines { lines: usize, max_lines: usize },
}

impl FileProcessorError {
    pub fn error_code(&self) -> crate::logging::Code {
        match self {
            Self::FileNotFound { .. } => codes::file_processing::FILE_NOT_FOUND,
            Self::InvalidExtension { .. } => codes::file_processing::INVALID_EXTENSION,
            Self::FileTooLarge { .. } => codes::file_processing::FILE_TOO_LARGE,
            Self::EmptyFile => codes::file_processing::EMPTY_FILE,
            Self::PermissionDenied { .. } => codes::file_processing::PERMISSION_DENIED,
            Self::InvalidEncoding { .. } => codes::file_processing::INVALID_ENCODING,
            Self::IoError { .. } => codes::file_processing::IO_ERROR,
            Self::InvalidPath { .. } => codes::file_processing::INVALID_PATH,
            Self::TooManyLines { .. } => codes::file_processing::FILE_TOO_LARGE,
        }
    }

    pub fn requires_halt(&self) -> bool {
        crate::logging::codes::requires_halt(self.error_code().as_str())
    }
}

/// File metadata collected during processing
#[derive(Debug, Clone)]
pub struct FileMetadata {
    pub path: PathBuf,
    pub size: u64,
    pub extension: Option<String>,
    pub line_count: usize,
    pub is_vcg_file: bool,
}

impl FileMetadata {
    /// Whether the file crosses the verbose-logging threshold
    pub fn is_large_file(&self) -> bool {
        self.size > LARGE_FILE_THRESHOLD
    }

    /// File stem, used for module naming
    pub fn stem(&self) -> String {
        self.path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}

/// File processing result containing source and metadata
#[derive(Debug, Clone)]
pub struct FileProcessingResult {
    /// File contents as a UTF-8 string
    pub source: String,
    pub metadata: FileMetadata,
    /// Same-stem companion script found beside the source, if any
    pub companion_path: Option<PathBuf>,
    pub processing_duration: std::time::Duration,
}

impl FileProcessingResult {
    pub fn char_count(&self) -> usize {
        self.source.chars().count()
    }

    pub fn is_effectively_empty(&self) -> bool {
        self.source.trim().is_empty()
    }
}

/// File processor with compile-time limits and runtime preferences
pub struct FileProcessor {
    pub require_vcg_extension: bool,
    pub enable_performance_logging: bool,
    pub detect_companion_file: bool,
}

impl FileProcessor {
    pub fn new() -> Self {
        Self::from_preferences(&FileProcessorPreferences::default())
    }

    pub fn from_preferences(prefs: &FileProcessorPreferences) -> Self {
        Self {
            require_vcg_extension: prefs.require_vcg_extension,
            enable_performance_logging: prefs.enable_performance_logging,
            detect_companion_file: prefs.detect_companion_file,
        }
    }

    /// The compile-time maximum file size
    pub fn max_file_size() -> u64 {
        MAX_FILE_SIZE
    }

    /// Process a file and return contents with metadata
    pub fn process_file(&self, file_path: &str) -> Result<FileProcessingResult, FileProcessorError> {
        let start_time = std::time::Instant::now();

        log_debug!("Starting file processing", "file" => file_path);

        let path = self.validate_path(file_path)?;
        let metadata = self.collect_metadata(&path)?;
        self.validate_file(&metadata)?;

        if metadata.is_large_file() {
            log_debug!("Large grammar file",
                "file" => file_path,
                "size_bytes" => metadata.size
            );
        }

        let source = self.read_file(&path)?;

        let line_count = source.lines().count();
        if line_count > MAX_LINE_COUNT {
            return Err(FileProcessorError::TooManyLines {
                lines: line_count,
                max_lines: MAX_LINE_COUNT,
            });
        }

        let metadata = FileMetadata {
            line_count,
            ..metadata
        };

        let companion_path = if self.detect_companion_file {
            self.find_companion(&path)
        } else {
            None
        };

        let result = FileProcessingResult {
            source,
            metadata,
            companion_path,
            processing_duration: start_time.elapsed(),
        };

        if self.enable_performance_logging {
            log_success!(codes::success::FILE_PROCESSING_SUCCESS,
                "File read into memory",
                "file" => file_path,
                "size_bytes" => result.metadata.size,
                "lines" => result.metadata.line_count,
                "chars" => result.char_count(),
                "duration_ms" => result.processing_duration.as_secs_f64() * 1000.0,
                "companion" => result.companion_path.is_some()
            );
        }

        Ok(result)
    }

    fn validate_path(&self, file_path: &str) -> Result<PathBuf, FileProcessorError> {
        if file_path.is_empty() {
            return Err(FileProcessorError::InvalidPath {
                path: file_path.to_string(),
            });
        }

        let path = PathBuf::from(file_path);
        if !path.exists() {
            return Err(FileProcessorError::FileNotFound {
                path: file_path.to_string(),
            });
        }
        if !path.is_file() {
            return Err(FileProcessorError::InvalidPath {
                path: file_path.to_string(),
            });
        }
        Ok(path)
    }

    fn collect_metadata(&self, path: &Path) -> Result<FileMetadata, FileProcessorError> {
        let fs_metadata = fs::metadata(path).map_err(|e| FileProcessorError::IoError {
            message: e.to_string(),
        })?;

        let extension = path
            .extension()
            .map(|e| e.to_string_lossy().into_owned());
        let is_vcg_file = extension.as_deref() == Some(VCG_EXTENSION);

        Ok(FileMetadata {
            path: path.to_path_buf(),
            size: fs_metadata.len(),
            extension,
            line_count: 0,
            is_vcg_file,
        })
    }

    fn validate_file(&self, metadata: &FileMetadata) -> Result<(), FileProcessorError> {
        if self.require_vcg_extension && !metadata.is_vcg_file {
            return Err(FileProcessorError::InvalidExtension {
                extension: metadata.extension.clone(),
            });
        }

        if metadata.size > MAX_FILE_SIZE {
            return Err(FileProcessorError::FileTooLarge {
                size: metadata.size,
                max_size: MAX_FILE_SIZE,
            });
        }

        if metadata.size == 0 {
            return Err(FileProcessorError::EmptyFile);
        }

        Ok(())
    }

    fn read_file(&self, path: &Path) -> Result<String, FileProcessorError> {
        match fs::read(path) {
            Ok(bytes) => String::from_utf8(bytes).map_err(|_| {
                FileProcessorError::InvalidEncoding {
                    path: path.display().to_string(),
                }
            }),
            Err(e) if e.kind() == ErrorKind::PermissionDenied => {
                Err(FileProcessorError::PermissionDenied {
                    path: path.display().to_string(),
                })
            }
            Err(e) => Err(FileProcessorError::IoError {
                message: e.to_string(),
            }),
        }
    }

    fn find_companion(&self, path: &Path) -> Option<PathBuf> {
        let companion = path.with_extension(COMPANION_EXTENSION);
        if companion.is_file() {
            Some(companion)
        } else {
            None
        }
    }
}

impl Default for FileProcessor {
    fn default() -> Self {
        Self::new()
    }
}

/// Process a file with default settings
pub fn process_file(file_path: &str) -> Result<FileProcessingResult, FileProcessorError> {
    FileProcessor::new().process_file(file_path)
}
