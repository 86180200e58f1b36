//! Pagination – splits the stacked paragraph blocks into pages.
//!
//! Blocks that do not fit are split between lines, so a long paragraph
//! continues at the top of the next page. Trailing space is dropped at a
//! page break rather than pushed onto the next page.

use crate::layout::PositionedBlock;
use crate::layout_config::*;
use crate::style::ParagraphStyle;

/// Default page margin: 20 mm in points.
pub const PAGE_MARGIN_PT: f32 = 20.0 * 72.0 / 25.4;

/// Convert positioned blocks into a paginated LayoutConfig.
pub fn paginate(
    blocks: &[PositionedBlock],
    style: &ParagraphStyle,
    page_width: f32,
    page_height: f32,
    page_margin: f32,
) -> LayoutConfig {
    let mut config = LayoutConfig {
        page_width_pt: page_width,
        page_height_pt: page_height,
        ..LayoutConfig::a4()
    };

    let content_height = page_height - 2.0 * page_margin;
    let mut current_page = PageLayout {
        page_index: 0,
        boxes: Vec::new(),
    };
    // Document-space y at which the current page begins. Block y values come
    // from the layout pass, so `y - page_start_doc_y` is the y-on-page.
    let mut page_start_doc_y = 0.0f32;

    for block in blocks {
        let mut first = 0usize;
        while first < block.lines.len() {
            let line_doc_y = block.y + first as f32 * style.leading;
            let y_on_page = (line_doc_y - page_start_doc_y).max(0.0);
            let room = ((content_height - y_on_page) / style.leading).floor().max(0.0) as usize;
            // A fresh page always takes at least one line, even if it overflows.
            let room = if current_page.boxes.is_empty() {
                room.max(1)
            } else {
                room
            };
            let take = room.min(block.lines.len() - first);

            if take == 0 {
                start_new_page(&mut config, &mut current_page);
                page_start_doc_y = line_doc_y;
                continue;
            }

            let lines = &block.lines[first..first + take];
            current_page
                .boxes
                .push(fragment_box(block, lines, style, page_margin + y_on_page));
            first += take;

            if first < block.lines.len() {
                start_new_page(&mut config, &mut current_page);
                page_start_doc_y = block.y + first as f32 * style.leading;
            }
        }
    }

    if !current_page.boxes.is_empty() || config.pages.is_empty() {
        config.pages.push(current_page);
    }
    log::debug!("Paginated into {} page(s)", config.pages.len());
    config
}

fn start_new_page(config: &mut LayoutConfig, current_page: &mut PageLayout) {
    let next = PageLayout {
        page_index: config.pages.len() + 1,
        boxes: Vec::new(),
    };
    config.pages.push(std::mem::replace(current_page, next));
}

fn fragment_box(
    block: &PositionedBlock,
    lines: &[String],
    style: &ParagraphStyle,
    y: f32,
) -> LayoutBox {
    let text_lines = lines
        .iter()
        .enumerate()
        .map(|(i, line)| TextLine {
            text: line.clone(),
            y_offset: i as f32 * style.leading,
        })
        .collect();

    LayoutBox {
        block_index: block.block_index,
        x: block.x,
        y,
        width: block.width,
        height: style.block_height(lines.len()),
        text: TextContent {
            lines: text_lines,
            font_size: style.font_size,
            line_height: style.leading,
            color: style.color,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fonts::FontManager;
    use crate::layout::compute_layout;

    const A4_W: f32 = 595.28;
    const A4_H: f32 = 841.89;

    fn paginate_paragraphs(paras: &[String]) -> LayoutConfig {
        let style = ParagraphStyle::default();
        let fonts = FontManager::builtin();
        let blocks = compute_layout(paras, &style, A4_W, PAGE_MARGIN_PT, &fonts).unwrap();
        paginate(&blocks, &style, A4_W, A4_H, PAGE_MARGIN_PT)
    }

    #[test]
    fn margin_is_twenty_millimetres() {
        assert!((PAGE_MARGIN_PT - 56.69).abs() < 0.01);
    }

    #[test]
    fn single_page() {
        let config = paginate_paragraphs(&["Short text".to_string()]);
        assert_eq!(config.pages.len(), 1);
        let first = &config.pages[0].boxes[0];
        assert!((first.y - PAGE_MARGIN_PT).abs() < 0.01);
    }

    #[test]
    fn empty_document_has_one_blank_page() {
        let config = paginate_paragraphs(&[]);
        assert_eq!(config.pages.len(), 1);
        assert!(config.pages[0].boxes.is_empty());
        assert_eq!(config.block_count(), 0);
    }

    #[test]
    fn multiple_pages() {
        let paras: Vec<String> = (0..120).map(|i| format!("Paragraph {i}")).collect();
        let config = paginate_paragraphs(&paras);
        assert!(
            config.pages.len() > 1,
            "Expected multiple pages, got {}",
            config.pages.len()
        );
        assert_eq!(config.block_count(), 120);
        for (i, page) in config.pages.iter().enumerate() {
            assert_eq!(page.page_index, i);
            for b in &page.boxes {
                assert!(b.y + b.height <= A4_H - PAGE_MARGIN_PT + 0.01);
            }
        }
    }

    #[test]
    fn long_paragraph_splits_between_lines() {
        let lines: Vec<String> = (0..100).map(|i| format!("line {i}")).collect();
        let para = lines.join("<br/>");
        let config = paginate_paragraphs(&[para]);
        assert_eq!(config.pages.len(), 2);
        // (841.89 - 2 × 56.69) / 14 = 52 lines on the first page
        assert_eq!(config.pages[0].boxes[0].text.lines.len(), 52);
        assert_eq!(config.pages[1].boxes[0].text.lines.len(), 48);
        assert_eq!(config.block_count(), 1);
        let rendered: Vec<&str> = config.lines().collect();
        assert_eq!(rendered.len(), 100);
        assert_eq!(rendered[52], "line 52");
    }
}
