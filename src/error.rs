//! Error type for the md2pdf library.
//!
//! Every failure is terminal. The binary maps each variant onto a process
//! exit status through [`Md2PdfError::exit_code`]:
//!
//! | status | meaning                                  |
//! |--------|------------------------------------------|
//! | 2      | input file missing                       |
//! | 3      | rendering dependency (engine/font) unusable |
//! | 4      | rendering or output failure              |

use std::path::PathBuf;
use thiserror::Error;

/// Exit status for a missing input file.
pub const EXIT_INPUT_NOT_FOUND: u8 = 2;
/// Exit status when the renderer or the requested font cannot be used.
pub const EXIT_DEPENDENCY_UNAVAILABLE: u8 = 3;
/// Exit status for any failure while producing the PDF.
pub const EXIT_RENDER_FAILED: u8 = 4;

/// All errors returned by the md2pdf library.
#[derive(Debug, Error)]
pub enum Md2PdfError {
    // ── Input errors ──────────────────────────────────────────────────────
    /// Input file was not found at the given path.
    #[error("file not found: '{path}'")]
    InputNotFound { path: PathBuf },

    /// Input exists but could not be read as UTF-8 text.
    #[error("failed to read '{path}': {source}")]
    InputReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Dependency errors ─────────────────────────────────────────────────
    /// The rendering engine or an explicitly requested font is unusable.
    #[error("rendering dependency unavailable: {detail}")]
    DependencyUnavailable { detail: String },

    // ── Rendering errors ──────────────────────────────────────────────────
    /// The layout or PDF serialisation step failed.
    #[error("failed to create PDF: {0}")]
    Render(String),

    /// Could not create or write the output file.
    #[error("failed to write '{path}': {source}")]
    OutputWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl Md2PdfError {
    /// Process exit status the CLI reports for this error.
    pub fn exit_code(&self) -> u8 {
        match self {
            Md2PdfError::InputNotFound { .. } => EXIT_INPUT_NOT_FOUND,
            Md2PdfError::DependencyUnavailable { .. } => EXIT_DEPENDENCY_UNAVAILABLE,
            Md2PdfError::InputReadFailed { .. }
            | Md2PdfError::Render(_)
            | Md2PdfError::OutputWriteFailed { .. } => EXIT_RENDER_FAILED,
        }
    }
}

pub type Result<T> = std::result::Result<T, Md2PdfError>;
