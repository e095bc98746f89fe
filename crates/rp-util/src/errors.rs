use miette::Diagnostic;
use thiserror::Error;

/// Unified error type for all rp operations above the resolver.
#[derive(Debug, Error, Diagnostic)]
pub enum RpError {
    /// I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid or unreadable configuration (e.g. `~/.rp/config.toml`).
    #[error("Configuration error: {message}")]
    #[diagnostic(help("Check ~/.rp/config.toml for syntax errors"))]
    Config { message: String },

    /// The package catalog could not be loaded or is malformed.
    #[error("Catalog error: {message}")]
    #[diagnostic(help("Refresh the catalog or point --catalog at a valid catalog file"))]
    Catalog { message: String },

    /// Dependency resolution failed (version conflicts, missing packages, etc.).
    /// `help` carries the resolver's own hint, if it had one.
    #[error("Dependency resolution failed: {message}")]
    Resolution {
        message: String,
        #[help]
        help: Option<String>,
    },

    /// Catch-all for miscellaneous errors.
    #[error("{message}")]
    Generic { message: String },
}
