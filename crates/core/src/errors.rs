use std::path::PathBuf;

/// Result type alias for lesspress operations
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for lesspress operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The LESS compiler rejected the source or could not read an import
    #[error("failed to compile '{entry}': {message}")]
    Compile { entry: PathBuf, message: String },

    /// Command execution errors
    #[error("{}", format_command_error(.command, .args, .message, .exit_code))]
    CommandExecution {
        command: String,
        args: Vec<String>,
        message: String,
        exit_code: Option<i32>,
    },

    /// Configuration errors
    #[error("configuration error: {message}")]
    Configuration { message: String },

    /// File system operations
    #[error("file system {operation} operation failed for '{path}': {source}")]
    FileSystem {
        path: PathBuf,
        operation: String,
        #[source]
        source: std::io::Error,
    },

    /// JSON serialization/deserialization errors
    #[error("JSON error: {message}")]
    Json {
        message: String,
        #[source]
        source: serde_json::Error,
    },
}

fn format_command_error(
    command: &str,
    args: &[String],
    message: &str,
    exit_code: &Option<i32>,
) -> String {
    let args_str = args.join(" ");
    let invocation = if args_str.is_empty() {
        command.to_string()
    } else {
        format!("{command} {args_str}")
    };
    match exit_code {
        Some(code) => format!("command '{invocation}' failed with exit code {code}: {message}"),
        None => format!("command '{invocation}' failed: {message}"),
    }
}

// Conversion implementations
impl From<std::io::Error> for Error {
    fn from(error: std::io::Error) -> Self {
        Error::FileSystem {
            path: PathBuf::new(),
            operation: "unknown".to_string(),
            source: error,
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(error: serde_json::Error) -> Self {
        Error::Json {
            message: error.to_string(),
            source: error,
        }
    }
}

// Helper methods for creating errors with context
impl Error {
    /// Create a compile error for the given entry file
    #[must_use]
    pub fn compile(entry: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Error::Compile {
            entry: entry.into(),
            message: message.into(),
        }
    }

    /// Create a command execution error
    #[must_use]
    pub fn command_execution(
        command: impl Into<String>,
        args: Vec<String>,
        message: impl Into<String>,
        exit_code: Option<i32>,
    ) -> Self {
        Error::CommandExecution {
            command: command.into(),
            args,
            message: message.into(),
            exit_code,
        }
    }

    /// Create a configuration error
    #[must_use]
    pub fn configuration(message: impl Into<String>) -> Self {
        Error::Configuration {
            message: message.into(),
        }
    }

    /// Create a file system error with context
    #[must_use]
    pub fn file_system(
        path: impl Into<PathBuf>,
        operation: impl Into<String>,
        source: std::io::Error,
    ) -> Self {
        Error::FileSystem {
            path: path.into(),
            operation: operation.into(),
            source,
        }
    }

    /// Whether the error came from the compiler rather than from I/O
    #[must_use]
    pub fn is_compile_error(&self) -> bool {
        matches!(self, Error::Compile { .. } | Error::CommandExecution { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_error_display() {
        let err = Error::command_execution(
            "lessc",
            vec!["--compress".to_string()],
            "boom",
            Some(1),
        );
        assert_eq!(
            err.to_string(),
            "command 'lessc --compress' failed with exit code 1: boom"
        );

        let err = Error::command_execution("lessc", vec![], "not found", None);
        assert_eq!(err.to_string(), "command 'lessc' failed: not found");
    }

    #[test]
    fn test_compile_error_display() {
        let err = Error::compile("/site/less/template.less", "ParseError: missing '}'");
        assert!(err.is_compile_error());
        assert_eq!(
            err.to_string(),
            "failed to compile '/site/less/template.less': ParseError: missing '}'"
        );
    }
}
