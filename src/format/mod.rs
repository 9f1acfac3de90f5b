//! On-disk formats for a package index.
//!
//! The canonical form is the JavaScript assignment emitted by documentation
//! generators, a single line consumed by the site's search widget:
//!
//! ```text
//! Index.PACKAGES = {"mbench.gnuplot" : [{"object" : "mbench\/gnuplot\/Gnuplot$.html", "name" : "mbench.gnuplot.Gnuplot"}, ...]};
//! ```
//!
//! A bare JSON object of the same shape is accepted as input and offered as
//! an alternative output encoding for tooling that wants plain JSON.

pub mod reader;
pub mod writer;

pub use reader::{parse_index, read_index};
pub use writer::{Encoding, to_js_string, to_json_string, write_index};

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FormatError {
    #[error("Failed to read index file {path}: {cause}")]
    FileRead {
        path: PathBuf,
        #[source]
        cause: std::io::Error,
    },

    #[error("Failed to write index file {path}: {cause}")]
    FileWrite {
        path: PathBuf,
        #[source]
        cause: std::io::Error,
    },

    #[error("Input is empty, expected a package index")]
    Empty,

    #[error("Expected an `Index.PACKAGES = ...` assignment or a JSON object, found `{found}`")]
    UnexpectedInput { found: String },

    #[error("Missing `=` after `Index.PACKAGES`")]
    MissingEquals,

    #[error("Invalid index data: {0}")]
    Json(#[from] serde_json::Error),
}

impl FormatError {
    /// Recovery suggestion surfaced by the CLI next to the error.
    pub fn suggestion(&self) -> Option<&'static str> {
        match self {
            Self::FileRead { .. } => {
                Some("Check that the path exists, or set index_file in .docdex/settings.toml")
            }
            Self::Empty | Self::UnexpectedInput { .. } | Self::MissingEquals => Some(
                "The file should contain `Index.PACKAGES = {...};` or a bare JSON object of the same shape",
            ),
            Self::Json(_) => {
                Some("Run with a JSON validator to locate the syntax problem, then re-generate the index")
            }
            Self::FileWrite { .. } => None,
        }
    }
}

pub type FormatResult<T> = Result<T, FormatError>;
