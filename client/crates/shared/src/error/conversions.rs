//! Conversions from the standard errors the client runs into while reading
//! local files (forms, session storage) into [`AppError`].

use super::app_error::AppError;
use super::kind::ErrorKind;

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        use std::io::ErrorKind as Io;

        let app = match err.kind() {
            Io::NotFound => AppError::new(ErrorKind::NotFound, "File not found"),
            Io::PermissionDenied => AppError::new(ErrorKind::Forbidden, "Permission denied"),
            Io::InvalidData | Io::UnexpectedEof => AppError::invalid_input("File is not readable text"),
            Io::TimedOut => AppError::new(ErrorKind::RequestTimeout, "Timed out reading file"),
            _ => AppError::unexpected("Could not access local file"),
        };
        app.with_detail(err)
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        use serde_json::error::Category;

        let app = match err.classify() {
            Category::Syntax => AppError::invalid_input(format!(
                "Invalid JSON at line {}, column {}",
                err.line(),
                err.column()
            )),
            Category::Eof => AppError::invalid_input("JSON ends unexpectedly"),
            Category::Data => AppError::invalid_input(format!("Unexpected JSON content: {err}")),
            Category::Io => AppError::unexpected("Could not read JSON"),
        };
        app.with_detail(err)
    }
}
