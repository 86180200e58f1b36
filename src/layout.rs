//! Layout engine – reads paragraph markup, word-wraps it, and stacks the
//! resulting blocks in a Taffy flex column to get document coordinates.

use taffy::prelude::*;

use crate::error::{Md2PdfError, Result};
use crate::fonts::{wrap_text, FontManager};
use crate::markup::parse_markup;
use crate::style::ParagraphStyle;

/// A wrapped paragraph block in document coordinates (before page splitting).
#[derive(Debug, Clone)]
pub struct PositionedBlock {
    pub block_index: usize,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    /// Trailing space below the block.
    pub space_after: f32,
    pub lines: Vec<String>,
}

/// Read one paragraph's markup and wrap each hard line to `max_width`.
pub fn wrap_paragraph(
    markup: &str,
    style: &ParagraphStyle,
    max_width: f32,
    fonts: &FontManager,
) -> Vec<String> {
    parse_markup(markup)
        .iter()
        .flat_map(|hard_line| wrap_text(hard_line, style.font_size, max_width, fonts))
        .collect()
}

fn layout_err(e: taffy::TaffyError) -> Md2PdfError {
    Md2PdfError::Render(format!("layout failed: {e}"))
}

/// Compute layout for a list of paragraph markups, returning one positioned
/// block per paragraph in document coordinates. `y` is measured from the top
/// of the content area; `x` already includes the left margin.
pub fn compute_layout(
    paragraphs: &[String],
    style: &ParagraphStyle,
    page_width: f32,
    page_margin: f32,
    fonts: &FontManager,
) -> Result<Vec<PositionedBlock>> {
    let content_width = page_width - 2.0 * page_margin;
    if content_width <= 0.0 {
        return Err(Md2PdfError::Render(format!(
            "page margin {page_margin}pt leaves no room on a {page_width}pt page"
        )));
    }

    let positive = |v: f32| v.is_finite() && v > 0.0;
    if !positive(style.font_size) || !positive(style.leading) {
        return Err(Md2PdfError::Render(format!(
            "font size {}pt and leading {}pt must be positive",
            style.font_size, style.leading
        )));
    }

    let mut taffy: TaffyTree<()> = TaffyTree::new();
    // Fractional leading must not drift down the page.
    taffy.disable_rounding();
    let mut wrapped = Vec::with_capacity(paragraphs.len());
    let mut child_ids = Vec::with_capacity(paragraphs.len());

    for markup in paragraphs {
        let lines = wrap_paragraph(markup, style, content_width, fonts);
        let leaf_style = Style {
            size: Size {
                width: Dimension::Length(content_width),
                height: Dimension::Length(style.block_height(lines.len())),
            },
            margin: Rect {
                top: LengthPercentageAuto::Length(0.0),
                right: LengthPercentageAuto::Length(0.0),
                bottom: LengthPercentageAuto::Length(style.space_after),
                left: LengthPercentageAuto::Length(0.0),
            },
            flex_shrink: 0.0,
            ..Default::default()
        };
        child_ids.push(taffy.new_leaf(leaf_style).map_err(layout_err)?);
        wrapped.push(lines);
    }

    let root_style = Style {
        display: taffy::Display::Flex,
        flex_direction: taffy::FlexDirection::Column,
        size: Size {
            width: Dimension::Length(content_width),
            height: Dimension::Auto,
        },
        ..Default::default()
    };
    let root = taffy
        .new_with_children(root_style, &child_ids)
        .map_err(layout_err)?;

    taffy
        .compute_layout(
            root,
            Size {
                width: AvailableSpace::Definite(content_width),
                height: AvailableSpace::MaxContent,
            },
        )
        .map_err(layout_err)?;

    let mut blocks = Vec::with_capacity(child_ids.len());
    for (block_index, (node, lines)) in child_ids.iter().zip(wrapped).enumerate() {
        let layout = taffy.layout(*node).map_err(layout_err)?;
        blocks.push(PositionedBlock {
            block_index,
            x: page_margin + layout.location.x,
            y: layout.location.y,
            width: layout.size.width,
            height: layout.size.height,
            space_after: style.space_after,
            lines,
        });
    }
    log::debug!("Laid out {} paragraph blocks", blocks.len());
    Ok(blocks)
}
