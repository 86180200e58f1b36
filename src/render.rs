//! PDF renderer – takes a [`LayoutConfig`] and produces PDF bytes using
//! `printpdf` (v0.8 ops-based API).

use printpdf::*;

use crate::error::{Md2PdfError, Result};
use crate::fonts::FontManager;
use crate::layout_config::*;

/// Points to millimetres.
const PT_TO_MM: f32 = 0.352778;

/// The font every text op is written with.
#[derive(Clone)]
enum PdfFont {
    Builtin(BuiltinFont),
    Embedded(FontId),
}

/// Register the body font with the document. TrueType bytes printpdf cannot
/// parse come back as `Err` with the reason.
fn register_font(
    doc: &mut PdfDocument,
    fonts: &FontManager,
) -> std::result::Result<PdfFont, String> {
    let Some(bytes) = fonts.font_bytes() else {
        return Ok(PdfFont::Builtin(BuiltinFont::Helvetica));
    };
    let mut warnings = Vec::new();
    match ParsedFont::from_bytes(bytes, 0, &mut warnings) {
        Some(parsed) => Ok(PdfFont::Embedded(doc.add_font(&parsed))),
        None => Err(format!(
            "printpdf could not parse font '{}' ({} warning(s))",
            fonts.family(),
            warnings.len()
        )),
    }
}

/// Render a LayoutConfig into PDF bytes.
///
/// If the TrueType font cannot be embedded the text is written with the
/// built-in Helvetica instead (a `log::warn` is emitted).
pub fn render_pdf(config: &LayoutConfig, fonts: &FontManager) -> Result<Vec<u8>> {
    let page_w = Mm(config.page_width_pt * PT_TO_MM);
    let page_h = Mm(config.page_height_pt * PT_TO_MM);

    let mut doc = PdfDocument::new(&config.title);

    let font = match register_font(&mut doc, fonts) {
        Ok(font) => font,
        Err(e) => {
            log::warn!("Falling back to built-in Helvetica: {e}");
            PdfFont::Builtin(BuiltinFont::Helvetica)
        }
    };
    // Baseline offset must match the metrics the text is drawn with.
    let fallback_metrics = FontManager::builtin();
    let metrics = match &font {
        PdfFont::Embedded(_) => fonts,
        PdfFont::Builtin(_) => &fallback_metrics,
    };

    let mut pages = Vec::with_capacity(config.pages.len().max(1));
    for page_layout in &config.pages {
        let mut ops = Vec::new();
        for lbox in &page_layout.boxes {
            render_box(&mut ops, lbox, config.page_height_pt, &font, metrics);
        }
        pages.push(PdfPage::new(page_w, page_h, ops));
    }

    // Ensure at least one page.
    if pages.is_empty() {
        pages.push(PdfPage::new(page_w, page_h, Vec::new()));
    }

    doc.with_pages(pages);
    let mut warnings = Vec::new();
    let bytes = doc.save(&PdfSaveOptions::default(), &mut warnings);
    if !warnings.is_empty() {
        log::debug!("printpdf reported {} warning(s) while saving", warnings.len());
    }

    if !bytes.starts_with(b"%PDF-") {
        return Err(Md2PdfError::Render(
            "renderer produced no PDF header".to_string(),
        ));
    }
    Ok(bytes)
}

/// Check that the rendering engine works with the given font by rendering an
/// empty document.
pub fn ensure_renderer(fonts: &FontManager) -> Result<()> {
    let mut doc = PdfDocument::new("renderer check");
    register_font(&mut doc, fonts)
        .map_err(|detail| Md2PdfError::DependencyUnavailable { detail })?;

    let blank = LayoutConfig::a4();
    render_pdf(&blank, &FontManager::builtin()).map_err(|e| {
        Md2PdfError::DependencyUnavailable {
            detail: e.to_string(),
        }
    })?;
    Ok(())
}

/// Text for the built-in Helvetica, which only covers ASCII reliably:
/// typographic punctuation is spelled out and anything else becomes `?`.
fn to_builtin_text(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '\u{2022}' => out.push('-'),
            '\u{2018}' | '\u{2019}' => out.push('\''),
            '\u{201C}' | '\u{201D}' => out.push('"'),
            '\u{2013}' => out.push('-'),
            '\u{2014}' => out.push_str("--"),
            '\u{2026}' => out.push_str("..."),
            '\u{20AC}' => out.push_str("EUR"),
            '\u{00A0}' | '\t' => out.push(' '),
            c if c.is_ascii() && !c.is_ascii_control() => out.push(c),
            _ => out.push('?'),
        }
    }
    out
}

/// Render one paragraph fragment into PDF ops.
fn render_box(
    ops: &mut Vec<Op>,
    lbox: &LayoutBox,
    page_height: f32,
    font: &PdfFont,
    metrics: &FontManager,
) {
    let text = &lbox.text;
    // PDF coordinate system: origin at bottom-left.
    let top = page_height - lbox.y;
    let ascender = metrics.ascender_pt(text.font_size);

    for tline in &text.lines {
        if tline.text.is_empty() {
            continue;
        }
        let baseline = top - tline.y_offset - ascender;

        ops.push(Op::StartTextSection);
        ops.push(Op::SetTextCursor {
            pos: Point {
                x: Pt(lbox.x),
                y: Pt(baseline),
            },
        });
        ops.push(Op::SetLineHeight {
            lh: Pt(text.line_height),
        });
        ops.push(Op::SetFillColor {
            col: Color::Rgb(Rgb {
                r: text.color[0],
                g: text.color[1],
                b: text.color[2],
                icc_profile: None,
            }),
        });
        match font {
            PdfFont::Builtin(builtin) => {
                ops.push(Op::SetFontSizeBuiltinFont {
                    size: Pt(text.font_size),
                    font: *builtin,
                });
                ops.push(Op::WriteTextBuiltinFont {
                    items: vec![TextItem::Text(to_builtin_text(&tline.text))],
                    font: *builtin,
                });
            }
            PdfFont::Embedded(id) => {
                ops.push(Op::SetFontSize {
                    size: Pt(text.font_size),
                    font: id.clone(),
                });
                ops.push(Op::WriteText {
                    items: vec![TextItem::Text(tline.text.clone())],
                    font: id.clone(),
                });
            }
        }
        ops.push(Op::EndTextSection);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text_box(lines: &[&str]) -> LayoutBox {
        LayoutBox {
            block_index: 0,
            x: 56.0,
            y: 56.0,
            width: 480.0,
            height: 14.0 * lines.len() as f32,
            text: TextContent {
                lines: lines
                    .iter()
                    .enumerate()
                    .map(|(i, l)| TextLine {
                        text: l.to_string(),
                        y_offset: i as f32 * 14.0,
                    })
                    .collect(),
                font_size: 11.0,
                line_height: 14.0,
                color: [0.0, 0.0, 0.0],
            },
        }
    }

    #[test]
    fn render_empty_page() {
        let config = LayoutConfig::a4();
        let bytes = render_pdf(&config, &FontManager::builtin()).unwrap();
        assert!(bytes.len() > 100, "PDF should have content");
        // PDF magic number
        assert_eq!(&bytes[0..5], b"%PDF-");
    }

    #[test]
    fn render_text_page() {
        let mut config = LayoutConfig::a4();
        config.pages.push(PageLayout {
            page_index: 0,
            boxes: vec![text_box(&["Hello <world> & friends.", "", "\u{2022} item"])],
        });
        let bytes = render_pdf(&config, &FontManager::builtin()).unwrap();
        assert_eq!(&bytes[0..5], b"%PDF-");
    }

    #[test]
    fn render_box_skips_empty_lines() {
        let mut ops = Vec::new();
        let font = PdfFont::Builtin(BuiltinFont::Helvetica);
        render_box(
            &mut ops,
            &text_box(&["a", "", "b"]),
            841.89,
            &font,
            &FontManager::builtin(),
        );
        let sections = ops
            .iter()
            .filter(|op| matches!(op, Op::StartTextSection))
            .count();
        assert_eq!(sections, 2);
    }

    #[test]
    fn builtin_text_is_plain_ascii() {
        let s = to_builtin_text("\u{2022} \u{201C}x\u{201D} \u{2014} \u{2026}\u{4E2D}\u{e9}");
        assert_eq!(s, "- \"x\" -- ...??");
        assert!(s.is_ascii());
        assert_eq!(to_builtin_text("a<b & c>d"), "a<b & c>d");
    }

    fn system_font() -> Option<FontManager> {
        let path = FontManager::system_font_paths().into_iter().next()?;
        Some(FontManager::from_file(&path).unwrap())
    }

    fn sample_page() -> LayoutConfig {
        let mut config = LayoutConfig::a4();
        config.pages.push(PageLayout {
            page_index: 0,
            boxes: vec![text_box(&["Caf\u{e9} \u{201C}quoted\u{201D}", "\u{2022} item"])],
        });
        config
    }

    #[test]
    fn render_with_embedded_font() {
        let Some(fonts) = system_font() else {
            eprintln!("no system TrueType font; skipping");
            return;
        };
        let config = sample_page();
        let embedded = render_pdf(&config, &fonts).unwrap();
        let builtin = render_pdf(&config, &FontManager::builtin()).unwrap();
        assert_eq!(&embedded[0..5], b"%PDF-");
        assert!(
            embedded.len() > builtin.len(),
            "embedded {} vs builtin {} bytes",
            embedded.len(),
            builtin.len()
        );
    }

    #[test]
    fn embedded_font_writes_unicode_text() {
        let Some(fonts) = system_font() else {
            eprintln!("no system TrueType font; skipping");
            return;
        };
        let mut doc = PdfDocument::new("test");
        let font = register_font(&mut doc, &fonts).unwrap();
        assert!(matches!(font, PdfFont::Embedded(_)));

        let mut ops = Vec::new();
        render_box(&mut ops, &text_box(&["\u{2022} caf\u{e9}"]), 841.89, &font, &fonts);
        let written: Vec<&str> = ops
            .iter()
            .filter_map(|op| match op {
                Op::WriteText { items, .. } => items.iter().find_map(|i| match i {
                    TextItem::Text(t) => Some(t.as_str()),
                    _ => None,
                }),
                _ => None,
            })
            .collect();
        assert_eq!(written, vec!["\u{2022} caf\u{e9}"]);
    }

    #[test]
    fn embedded_font_passes_renderer_check() {
        if let Some(fonts) = system_font() {
            assert!(ensure_renderer(&fonts).is_ok());
        }
    }

    #[test]
    fn builtin_renderer_is_available() {
        assert!(ensure_renderer(&FontManager::builtin()).is_ok());
    }
}
