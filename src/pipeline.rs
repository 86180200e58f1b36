//! Pipeline – ties together stripping, paragraph markup, layout, pagination,
//! and rendering into a single function call.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Md2PdfError, Result};
use crate::fonts::{FontChoice, FontManager};
use crate::layout::compute_layout;
use crate::layout_config::LayoutConfig;
use crate::markdown::strip_markdown;
use crate::markup::build_paragraphs;
use crate::pagination::{paginate, PAGE_MARGIN_PT};
use crate::render::{ensure_renderer, render_pdf};
use crate::style::ParagraphStyle;

/// Input file used when none is given on the command line.
pub const DEFAULT_INPUT: &str = "document.md";

/// Page orientation for the generated PDF.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum PageOrientation {
    /// Portrait mode: height > width (default).
    #[default]
    Portrait,
    /// Landscape mode: width > height.
    Landscape,
}

/// Configuration for the PDF generation pipeline.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Document title embedded in the PDF metadata (default: "md2pdf output").
    pub title: String,
    /// Page width in points (default: A4 = 595.28).
    pub page_width: f32,
    /// Page height in points (default: A4 = 841.89).
    pub page_height: f32,
    /// Page margin in points (default: 20 mm).
    pub page_margin: f32,
    /// Page orientation; swaps effective width/height when `Landscape`.
    pub orientation: PageOrientation,
    pub style: ParagraphStyle,
    pub font: FontChoice,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            title: "md2pdf output".to_string(),
            page_width: 595.28,
            page_height: 841.89,
            page_margin: PAGE_MARGIN_PT,
            orientation: PageOrientation::Portrait,
            style: ParagraphStyle::default(),
            font: FontChoice::Discover,
        }
    }
}

impl PipelineConfig {
    /// Effective page width after applying orientation.
    pub fn effective_width(&self) -> f32 {
        match self.orientation {
            PageOrientation::Portrait => self.page_width,
            PageOrientation::Landscape => self.page_height,
        }
    }

    /// Effective page height after applying orientation.
    pub fn effective_height(&self) -> f32 {
        match self.orientation {
            PageOrientation::Portrait => self.page_height,
            PageOrientation::Landscape => self.page_width,
        }
    }

    /// Create an A4 landscape config.
    pub fn a4_landscape() -> Self {
        Self {
            orientation: PageOrientation::Landscape,
            ..Self::default()
        }
    }
}

/// Default output path: the input path with its extension replaced by `pdf`.
pub fn default_output_path(input: &Path) -> PathBuf {
    let mut out = input.to_path_buf();
    out.set_extension("pdf");
    out
}

/// Resolve the configured font and make sure the renderer can use it.
///
/// A discovered font the renderer rejects is replaced by the built-in font;
/// an explicitly requested one is a [`Md2PdfError::DependencyUnavailable`].
pub fn prepare_fonts(config: &PipelineConfig) -> Result<FontManager> {
    let fonts = FontManager::resolve(&config.font)?;
    usable_fonts(config, fonts, ensure_renderer)
}

fn usable_fonts(
    config: &PipelineConfig,
    fonts: FontManager,
    check: impl Fn(&FontManager) -> Result<()>,
) -> Result<FontManager> {
    match check(&fonts) {
        Ok(()) => Ok(fonts),
        Err(e) if config.font == FontChoice::Discover && fonts.has_real_font() => {
            log::warn!("Discovered font '{}' unusable, using built-in font: {e}", fonts.family());
            let builtin = FontManager::builtin();
            ensure_renderer(&builtin)?;
            Ok(builtin)
        }
        Err(e) => Err(e),
    }
}

/// Markdown → paginated layout (no PDF rendering) – useful for testing.
pub fn compute_layout_config(
    markdown: &str,
    config: &PipelineConfig,
    fonts: &FontManager,
) -> Result<LayoutConfig> {
    let text = strip_markdown(markdown);
    let paragraphs = build_paragraphs(&text);
    log::debug!("Stripped markdown into {} paragraph(s)", paragraphs.len());

    let eff_w = config.effective_width();
    let eff_h = config.effective_height();
    let blocks = compute_layout(&paragraphs, &config.style, eff_w, config.page_margin, fonts)?;

    let mut layout = paginate(&blocks, &config.style, eff_w, eff_h, config.page_margin);
    layout.title = config.title.clone();
    layout.font_family = fonts.family().to_string();
    Ok(layout)
}

/// Full pipeline: Markdown string → PDF bytes.
///
/// Returns `(pdf_bytes, layout_config)`.
pub fn convert(
    markdown: &str,
    config: &PipelineConfig,
    fonts: &FontManager,
) -> Result<(Vec<u8>, LayoutConfig)> {
    let layout = compute_layout_config(markdown, config, fonts)?;
    let bytes = render_pdf(&layout, fonts)?;
    Ok((bytes, layout))
}

/// Convenience: convert with the default A4 config and built-in font.
pub fn convert_markdown(markdown: &str) -> Result<Vec<u8>> {
    let (bytes, _) = convert(markdown, &PipelineConfig::default(), &FontManager::builtin())?;
    Ok(bytes)
}

/// Read the input file.
pub fn read_input(input: &Path) -> Result<String> {
    if !input.is_file() {
        return Err(Md2PdfError::InputNotFound {
            path: input.to_path_buf(),
        });
    }
    fs::read_to_string(input).map_err(|source| Md2PdfError::InputReadFailed {
        path: input.to_path_buf(),
        source,
    })
}

/// Write bytes to `path`, creating its parent directory if needed.
pub fn write_output(path: &Path, bytes: &[u8]) -> Result<()> {
    let write_err = |source| Md2PdfError::OutputWriteFailed {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(write_err)?;
        }
    }
    fs::write(path, bytes).map_err(write_err)
}

/// Convert the file at `input` and write the PDF to `output`.
pub fn convert_file(
    input: &Path,
    output: &Path,
    config: &PipelineConfig,
    fonts: &FontManager,
) -> Result<LayoutConfig> {
    let markdown = read_input(input)?;
    let (bytes, layout) = convert(&markdown, config, fonts)?;
    write_output(output, &bytes)?;
    log::info!(
        "Wrote '{}' ({} bytes, {} page(s))",
        output.display(),
        bytes.len(),
        layout.pages.len()
    );
    Ok(layout)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn builtin_config() -> PipelineConfig {
        PipelineConfig {
            font: FontChoice::Builtin,
            ..PipelineConfig::default()
        }
    }

    #[test]
    fn pipeline_basic() {
        let config = builtin_config();
        let fonts = prepare_fonts(&config).unwrap();
        let (bytes, layout) =
            convert("# Title\n\nHello <world> & friends.\n", &config, &fonts).unwrap();
        assert_eq!(&bytes[0..5], b"%PDF-");
        assert_eq!(layout.block_count(), 2);
        let lines: Vec<&str> = layout.lines().collect();
        assert_eq!(lines, vec!["Title", "Hello <world> & friends."]);
    }

    #[test]
    fn code_blocks_never_reach_the_layout() {
        let md = "Intro\n\n```sh\nrm -rf /tmp/x\n```\n\nOutro";
        let layout =
            compute_layout_config(md, &builtin_config(), &FontManager::builtin()).unwrap();
        assert!(layout.lines().all(|l| !l.contains("rm -rf")));
        assert_eq!(layout.block_count(), 2);
    }

    #[test]
    fn whitespace_only_document_renders() {
        let (bytes, layout) = convert(" \n\n\t\n", &builtin_config(), &FontManager::builtin())
            .unwrap();
        assert_eq!(&bytes[0..5], b"%PDF-");
        assert_eq!(layout.block_count(), 0);
        assert_eq!(layout.pages.len(), 1);
    }

    #[test]
    fn landscape_swaps_dimensions() {
        let config = PipelineConfig::a4_landscape();
        assert_eq!(config.effective_width(), 841.89);
        assert_eq!(config.effective_height(), 595.28);
    }

    #[test]
    fn default_output_replaces_extension() {
        assert_eq!(
            default_output_path(Path::new("notes/report.md")),
            PathBuf::from("notes/report.pdf")
        );
        assert_eq!(
            default_output_path(Path::new("README")),
            PathBuf::from("README.pdf")
        );
    }

    #[test]
    fn missing_input_is_not_found() {
        let err = read_input(Path::new("does/not/exist.md")).unwrap_err();
        assert!(matches!(err, Md2PdfError::InputNotFound { .. }));
        assert_eq!(err.exit_code(), 2);
    }

    fn reject(_: &FontManager) -> Result<()> {
        Err(Md2PdfError::DependencyUnavailable {
            detail: "renderer rejected font".to_string(),
        })
    }

    fn system_font() -> Option<FontManager> {
        let path = FontManager::system_font_paths().into_iter().next()?;
        Some(FontManager::from_file(&path).unwrap())
    }

    #[test]
    fn rejected_discovered_font_falls_back_to_builtin() {
        let Some(fonts) = system_font() else {
            eprintln!("no system TrueType font; skipping");
            return;
        };
        let config = PipelineConfig::default();
        let chosen = usable_fonts(&config, fonts, reject).unwrap();
        assert!(!chosen.has_real_font());
        assert_eq!(chosen.family(), crate::fonts::BUILTIN_FAMILY);
    }

    #[test]
    fn rejected_explicit_font_is_fatal() {
        let config = PipelineConfig {
            font: FontChoice::File(PathBuf::from("custom.ttf")),
            ..PipelineConfig::default()
        };
        let fonts = system_font().unwrap_or_else(FontManager::builtin);
        let err = usable_fonts(&config, fonts, reject).unwrap_err();
        assert_eq!(err.exit_code(), 3);
    }

    #[test]
    fn rejected_builtin_font_is_fatal() {
        let err = usable_fonts(&PipelineConfig::default(), FontManager::builtin(), reject)
            .unwrap_err();
        assert!(matches!(err, Md2PdfError::DependencyUnavailable { .. }));
    }

    #[test]
    fn accepted_font_is_kept() {
        let fonts = system_font().unwrap_or_else(FontManager::builtin);
        let family = fonts.family().to_string();
        let chosen = usable_fonts(&PipelineConfig::default(), fonts, |_| Ok(())).unwrap();
        assert_eq!(chosen.family(), family);
    }

    #[test]
    fn discovered_font_converts_end_to_end() {
        let config = PipelineConfig::default();
        let fonts = prepare_fonts(&config).unwrap();
        let (bytes, layout) = convert(
            "# Caf\u{e9}\n\n\u{201c}Quoted\u{201d} \u{2014} text.\n\n- item\n",
            &config,
            &fonts,
        )
        .unwrap();
        assert_eq!(&bytes[0..5], b"%PDF-");
        assert_eq!(layout.font_family, fonts.family());
        assert_eq!(layout.block_count(), 3);
    }

    #[test]
    fn convert_markdown_uses_defaults() {
        let bytes = convert_markdown("- a\n- b").unwrap();
        assert_eq!(&bytes[0..5], b"%PDF-");
    }
}
