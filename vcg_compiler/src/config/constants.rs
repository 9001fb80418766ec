pub mod compile_time {
    pub mod file_processing {
        /// Maximum file size allowed for processing (4MB)
        /// SECURITY: Prevents DoS via oversized grammar files
        pub const MAX_FILE_SIZE: u64 = 4 * 1024 * 1024;

        /// Threshold for considering a file "large" (256KB)
        /// PERFORMANCE: Affects logging verbosity only
        pub const LARGE_FILE_THRESHOLD: u64 = 256 * 1024;

        /// Maximum line count tracked for metadata
        /// SECURITY: Prevents algorithmic complexity attacks
        pub const MAX_LINE_COUNT: usize = 100_000;
    }

    pub mod lexical {
        /// Maximum number of tokens allowed in a single file
        /// SECURITY: Prevents DoS via token explosion
        pub const MAX_TOKEN_COUNT: usize = 500_000;

        /// Maximum identifier length ($name / @name, prefix excluded)
        /// SECURITY: Prevents parser complexity attacks
        pub const MAX_IDENTIFIER_LENGTH: usize = 255;

        /// Maximum quoted-phrase content length
        /// SECURITY: Limits resource consumption per literal
        pub const MAX_QUOTED_STRING_LENGTH: usize = 4_096;

        /// Maximum comment length to prevent memory exhaustion
        /// SECURITY: Limits resource consumption per comment
        pub const MAX_COMMENT_LENGTH: usize = 10_000;
    }

    pub mod syntax {
        /// Maximum expression nesting depth to prevent stack overflow
        /// SECURITY: Prevents DoS via deeply nested groups
        pub const MAX_PARSE_DEPTH: usize = 100;

        /// Maximum error history buffer size
        /// RESOURCE: Controls memory usage for error tracking
        pub const MAX_ERROR_HISTORY: usize = 50;
    }

    pub mod logging {
        /// Maximum errors collected per run before truncation
        /// RESOURCE: Prevents unbounded error accumulation
        pub const MAX_ERROR_COLLECTION: usize = 1_000;

        /// Log buffer size for batch operations
        /// RESOURCE: Controls memory usage for logging
        pub const LOG_BUFFER_SIZE: usize = 10_000;

        /// Maximum log events retained per file
        /// SECURITY: Prevents DoS via log event explosion
        pub const MAX_LOG_EVENTS_PER_FILE: usize = 1_000;

        /// Maximum log message length
        /// RESOURCE: Prevents memory attacks via huge messages
        pub const MAX_LOG_MESSAGE_LENGTH: usize = 10_000;
    }
}
