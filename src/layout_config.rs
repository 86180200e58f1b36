//! Layout config – the intermediate representation between layout computation
//! and PDF rendering. This is the "frozen" structure that encodes exactly what
//! goes on each page.

use serde::{Deserialize, Serialize};

use crate::error::{Md2PdfError, Result};

/// A complete document layout ready for rendering.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayoutConfig {
    /// Document title embedded in the PDF metadata.
    #[serde(default = "LayoutConfig::default_title")]
    pub title: String,
    /// Width of each page in PDF points (1 pt = 1/72 inch).
    pub page_width_pt: f32,
    /// Height of each page in PDF points.
    pub page_height_pt: f32,
    /// Font family the lines were measured with.
    pub font_family: String,
    /// Ordered list of pages.
    pub pages: Vec<PageLayout>,
}

/// One page of content.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageLayout {
    pub page_index: usize,
    pub boxes: Vec<LayoutBox>,
}

/// A positioned paragraph fragment. A paragraph split across a page break
/// yields one box per page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayoutBox {
    /// Index of the source paragraph block.
    pub block_index: usize,
    /// Position relative to page top-left, in points.
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub text: TextContent,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextContent {
    /// Pre-wrapped lines of text.
    pub lines: Vec<TextLine>,
    pub font_size: f32,
    pub line_height: f32,
    pub color: [f32; 3],
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextLine {
    pub text: String,
    /// Y offset from the top of the box
    pub y_offset: f32,
}

impl LayoutConfig {
    /// Create an empty A4 portrait layout.
    pub fn a4() -> Self {
        Self {
            title: Self::default_title(),
            // A4: 210mm × 297mm = 595.28 × 841.89 points
            page_width_pt: 595.28,
            page_height_pt: 841.89,
            font_family: crate::fonts::BUILTIN_FAMILY.to_string(),
            pages: Vec::new(),
        }
    }

    fn default_title() -> String {
        "md2pdf output".to_string()
    }

    /// Number of distinct paragraph blocks placed on any page.
    pub fn block_count(&self) -> usize {
        let mut indices: Vec<usize> = self
            .pages
            .iter()
            .flat_map(|p| p.boxes.iter().map(|b| b.block_index))
            .collect();
        indices.dedup();
        indices.len()
    }

    /// All rendered lines in reading order.
    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.pages
            .iter()
            .flat_map(|p| p.boxes.iter())
            .flat_map(|b| b.text.lines.iter().map(|l| l.text.as_str()))
    }

    /// Serialise to JSON.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| Md2PdfError::Render(e.to_string()))
    }

    /// Deserialise from JSON.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| Md2PdfError::Render(e.to_string()))
    }
}
