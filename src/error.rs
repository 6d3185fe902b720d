use std::path::PathBuf;

use thiserror::Error;

/// Fatal conversion failures. Per-element trouble never shows up here;
/// builders degrade to diagnostic paragraphs and the conversion finishes.
#[derive(Debug, Error)]
pub enum ConvertError {
    #[error("failed to read {path}: {source}")]
    ReadInput {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid style overrides in {path}: {source}")]
    StyleConfig {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("i/o failure while writing the document: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to assemble the docx package: {0}")]
    Package(#[from] zip::result::ZipError),
}
