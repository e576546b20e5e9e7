//! Error display formatting for the CLI.

use crate::error::Error;

/// Prints an error message, either as JSON or user-friendly format.
pub fn print_error_with_json(error: &Error, json_format: bool) {
    if !json_format {
        print_error(error);
        return;
    }
    let json_error = error.to_json();
    let Ok(json_output) = serde_json::to_string_pretty(&json_error) else {
        print_error(error);
        return;
    };
    eprintln!("{json_output}");
}

/// Prints a user-friendly error message with a hint when one is known.
pub fn print_error(error: &Error) {
    let title = match error {
        Error::Io(io_err) => match io_err.kind() {
            std::io::ErrorKind::NotFound => "File Not Found",
            std::io::ErrorKind::PermissionDenied => "Permission Denied",
            _ => "File System Error",
        },
        Error::Network(req_err) if req_err.is_connect() => "Connection Error",
        Error::Network(req_err) if req_err.is_timeout() => "Timeout Error",
        Error::Network(_) => "Network Error",
        Error::Yaml(_) => "YAML Parsing Error",
        Error::Json(_) => "JSON Parsing Error",
        Error::Toml(_) => "TOML Parsing Error",
        Error::SpecFormat { .. } | Error::SpecSchema { .. } => "Invalid Specification",
        Error::InvalidRequest { .. } => "Invalid Request",
        Error::NotFound { .. } => "Not Found",
        Error::Config(_) => "Configuration Error",
    };

    let json_error = error.to_json();
    match json_error.context {
        Some(hint) => eprintln!("{title}\n{}\n\nHint: {hint}", json_error.message),
        None => eprintln!("{title}\n{}", json_error.message),
    }
}
