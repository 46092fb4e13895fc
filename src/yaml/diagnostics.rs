//! YAML error types rendered as miette diagnostics

use miette::{Diagnostic, NamedSource, SourceSpan};
use thiserror::Error;

/// Errors from reading or parsing a YAML document
#[derive(Debug, Error, Diagnostic)]
pub enum YamlError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Syntax(#[from] YamlSyntaxError),

    #[error("Failed to read file: {0}")]
    #[diagnostic(code(larder::yaml::io))]
    Io(#[from] std::io::Error),
}

/// A syntax or shape error with the offending location highlighted
#[derive(Debug, Error, Diagnostic)]
#[error("Invalid YAML in {filename}: {message}")]
#[diagnostic(code(larder::yaml::syntax))]
pub struct YamlSyntaxError {
    pub filename: String,
    pub message: String,

    #[source_code]
    pub src: NamedSource<String>,

    #[label("here")]
    pub span: Option<SourceSpan>,

    #[help]
    pub help: Option<String>,
}

impl YamlSyntaxError {
    pub fn from_serde_error(error: &serde_yml::Error, content: &str, filename: &str) -> Self {
        let span = error.location().map(|location| {
            let offset = location.index().min(content.len());
            SourceSpan::from((offset, 0))
        });
        let message = error.to_string();
        let help = if message.contains("invalid type") {
            Some("Ingredient quantities are plain numbers, e.g. `quantity: 0.5`".to_string())
        } else {
            None
        };

        Self {
            filename: filename.to_string(),
            message,
            src: NamedSource::new(filename, content.to_string()),
            span,
            help,
        }
    }
}
