//! Font resolution and text measurement using `ttf-parser`.
//!
//! A TrueType font is used when one is requested explicitly or found at a
//! well-known platform path. Otherwise the built-in Helvetica is used with
//! heuristic metrics, which needs no font bytes at all.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Md2PdfError, Result};

/// Family name of the PDF base-14 fallback font.
pub const BUILTIN_FAMILY: &str = "Helvetica";

/// How the font for a run should be chosen.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum FontChoice {
    /// Probe the platform font paths, falling back to Helvetica.
    #[default]
    Discover,
    /// Always use the built-in Helvetica.
    Builtin,
    /// Use this TrueType file; failing to load it is fatal.
    File(PathBuf),
}

/// A loaded font face with metrics. Empty `bytes` means the built-in font.
#[derive(Clone)]
pub struct FontData {
    pub family: String,
    /// Raw font bytes (kept alive for ttf-parser's zero-copy API).
    pub bytes: Vec<u8>,
    pub units_per_em: f32,
    pub ascender: f32,
}

impl std::fmt::Debug for FontData {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FontData")
            .field("family", &self.family)
            .field("bytes", &self.bytes.len())
            .field("units_per_em", &self.units_per_em)
            .finish()
    }
}

/// Holds the single body font used for measuring and rendering.
#[derive(Debug, Clone)]
pub struct FontManager {
    font: FontData,
}

/// TrueType files tried by [`FontManager::discover`], in order.
#[cfg(target_os = "windows")]
fn candidate_paths() -> &'static [&'static str] {
    &[r"C:\Windows\Fonts\arial.ttf", r"C:\Windows\Fonts\times.ttf"]
}

#[cfg(target_os = "macos")]
fn candidate_paths() -> &'static [&'static str] {
    &[
        "/System/Library/Fonts/Supplemental/Arial.ttf",
        "/Library/Fonts/Arial.ttf",
        "/System/Library/Fonts/Supplemental/Times New Roman.ttf",
    ]
}

#[cfg(not(any(target_os = "windows", target_os = "macos")))]
fn candidate_paths() -> &'static [&'static str] {
    &[
        "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
        "/usr/share/fonts/dejavu/DejaVuSans.ttf",
        "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
        "/usr/share/fonts/liberation/LiberationSans-Regular.ttf",
    ]
}

impl FontManager {
    /// Built-in Helvetica with synthetic metrics.
    pub fn builtin() -> Self {
        Self {
            font: FontData {
                family: BUILTIN_FAMILY.to_string(),
                bytes: Vec::new(),
                units_per_em: 1000.0,
                ascender: 750.0,
            },
        }
    }

    /// Load a TTF/OTF font from bytes.
    pub fn from_bytes(family: &str, bytes: Vec<u8>) -> std::result::Result<Self, String> {
        let face = ttf_parser::Face::parse(&bytes, 0)
            .map_err(|e| format!("failed to parse font: {e}"))?;

        let font = FontData {
            family: family.to_string(),
            units_per_em: face.units_per_em() as f32,
            ascender: face.ascender() as f32,
            bytes,
        };
        Ok(Self { font })
    }

    /// Load a font file. Any failure is reported as an unavailable
    /// rendering dependency.
    pub fn from_file(path: &Path) -> Result<Self> {
        let bytes = fs::read(path).map_err(|e| Md2PdfError::DependencyUnavailable {
            detail: format!("cannot read font '{}': {e}", path.display()),
        })?;
        let family = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("Custom")
            .to_string();
        Self::from_bytes(&family, bytes).map_err(|e| Md2PdfError::DependencyUnavailable {
            detail: format!("font '{}': {e}", path.display()),
        })
    }

    /// Platform font files that exist on this machine, in the order they are tried.
    pub fn system_font_paths() -> Vec<PathBuf> {
        candidate_paths()
            .iter()
            .map(PathBuf::from)
            .filter(|p| p.is_file())
            .collect()
    }

    /// First loadable platform font, or Helvetica.
    pub fn discover() -> Self {
        for path in Self::system_font_paths() {
            match Self::from_file(&path) {
                Ok(mgr) => {
                    log::info!("Using font {}", path.display());
                    return mgr;
                }
                Err(e) => log::warn!("Skipping font: {e}"),
            }
        }
        log::info!("No TrueType font found; using built-in {BUILTIN_FAMILY}");
        Self::builtin()
    }

    pub fn resolve(choice: &FontChoice) -> Result<Self> {
        match choice {
            FontChoice::Discover => Ok(Self::discover()),
            FontChoice::Builtin => Ok(Self::builtin()),
            FontChoice::File(path) => Self::from_file(path),
        }
    }

    pub fn family(&self) -> &str {
        &self.font.family
    }

    /// Check if real font bytes are loaded.
    pub fn has_real_font(&self) -> bool {
        !self.font.bytes.is_empty()
    }

    /// Get font bytes for embedding in PDF.
    pub fn font_bytes(&self) -> Option<&[u8]> {
        if self.font.bytes.is_empty() {
            None
        } else {
            Some(self.font.bytes.as_slice())
        }
    }

    /// Measure the width of a string at a given font size (in pt).
    /// If we have actual font bytes, we parse glyph advances. Otherwise we
    /// use an average character width heuristic (0.5 × font_size per char).
    pub fn measure_text_width(&self, text: &str, font_size: f32) -> f32 {
        if self.font.bytes.is_empty() {
            return text.chars().count() as f32 * font_size * 0.5;
        }

        if let Ok(face) = ttf_parser::Face::parse(&self.font.bytes, 0) {
            let scale = font_size / self.font.units_per_em;
            let mut width = 0.0f32;
            for ch in text.chars() {
                if let Some(gid) = face.glyph_index(ch) {
                    let advance = face.glyph_hor_advance(gid).unwrap_or(0);
                    width += advance as f32 * scale;
                } else {
                    // Fallback for missing glyph
                    width += font_size * 0.5;
                }
            }
            width
        } else {
            text.chars().count() as f32 * font_size * 0.5
        }
    }

    /// Get the ascender in pt.
    pub fn ascender_pt(&self, font_size: f32) -> f32 {
        self.font.ascender * font_size / self.font.units_per_em
    }
}

impl Default for FontManager {
    fn default() -> Self {
        Self::builtin()
    }
}

/// Word-wrap one hard line to fit within `max_width` points.
///
/// Whitespace runs collapse to single spaces. A word wider than the line is
/// broken between characters.
pub fn wrap_text(text: &str, font_size: f32, max_width: f32, fonts: &FontManager) -> Vec<String> {
    let words: Vec<&str> = text.split_whitespace().collect();
    if words.is_empty() {
        return vec![String::new()];
    }
    if max_width <= 0.0 {
        return vec![words.join(" ")];
    }

    let mut lines: Vec<String> = Vec::new();
    let mut current_line = String::new();
    for word in words {
        let candidate = if current_line.is_empty() {
            word.to_string()
        } else {
            format!("{current_line} {word}")
        };
        if fonts.measure_text_width(&candidate, font_size) <= max_width {
            current_line = candidate;
            continue;
        }
        if !current_line.is_empty() {
            lines.push(std::mem::take(&mut current_line));
        }
        if fonts.measure_text_width(word, font_size) <= max_width {
            current_line = word.to_string();
        } else {
            let mut pieces = break_word(word, font_size, max_width, fonts);
            current_line = pieces.pop().unwrap_or_default();
            lines.extend(pieces);
        }
    }
    if !current_line.is_empty() {
        lines.push(current_line);
    }
    lines
}

fn break_word(word: &str, font_size: f32, max_width: f32, fonts: &FontManager) -> Vec<String> {
    let mut pieces = Vec::new();
    let mut piece = String::new();
    for ch in word.chars() {
        piece.push(ch);
        if piece.chars().count() > 1 && fonts.measure_text_width(&piece, font_size) > max_width {
            piece.pop();
            pieces.push(std::mem::take(&mut piece));
            piece.push(ch);
        }
    }
    pieces.push(piece);
    pieces
}
