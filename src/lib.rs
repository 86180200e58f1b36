//! # md2pdf – Markdown → PDF by stripping markup and re-flowing paragraphs
//!
//! The pipeline stages are:
//!
//! 1. **Strip** – regex passes remove Markdown syntax ([`markdown`])
//! 2. **Markup** – split into paragraphs, escape, add line breaks ([`markup`])
//! 3. **Layout** – wrap lines and stack blocks with Taffy ([`layout`])
//! 4. **Paginate** – split into A4 pages ([`pagination`])
//! 5. **Render** – emit PDF bytes via printpdf ([`render`])

pub mod error;
pub mod fonts;
pub mod layout;
pub mod layout_config;
pub mod markdown;
pub mod markup;
pub mod pagination;
pub mod pipeline;
pub mod render;
pub mod style;

// Re-exports for convenience
pub use error::Md2PdfError;
pub use pipeline::{convert, convert_file, convert_markdown, PageOrientation, PipelineConfig};
