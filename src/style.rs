//! Paragraph styling.
//!
//! Every block in the document shares a single [`ParagraphStyle`]; there is
//! no per-element cascade because the stripped text carries no structure.

/// Default body font size in points.
pub const DEFAULT_FONT_SIZE: f32 = 11.0;
/// Default baseline-to-baseline distance in points.
pub const DEFAULT_LEADING: f32 = 14.0;
/// Vertical spacing inserted after each paragraph block, in points.
pub const DEFAULT_SPACE_AFTER: f32 = 6.0;

/// Typography applied to every paragraph block.
#[derive(Debug, Clone, PartialEq)]
pub struct ParagraphStyle {
    pub font_size: f32,
    /// Line height in points.
    pub leading: f32,
    pub space_after: f32,
    /// RGB fill colour, 0.0–1.0 per channel.
    pub color: [f32; 3],
}

impl Default for ParagraphStyle {
    fn default() -> Self {
        Self {
            font_size: DEFAULT_FONT_SIZE,
            leading: DEFAULT_LEADING,
            space_after: DEFAULT_SPACE_AFTER,
            color: [0.0, 0.0, 0.0],
        }
    }
}

impl ParagraphStyle {
    /// Style with a different font size, keeping the default leading ratio
    /// unless `leading` is given.
    pub fn with_size(font_size: f32, leading: Option<f32>) -> Self {
        let ratio = DEFAULT_LEADING / DEFAULT_FONT_SIZE;
        Self {
            font_size,
            leading: leading.unwrap_or(font_size * ratio),
            ..Self::default()
        }
    }

    /// Height in points of a block holding `line_count` lines, excluding
    /// the trailing space.
    pub fn block_height(&self, line_count: usize) -> f32 {
        line_count as f32 * self.leading
    }
}

/// Parse a point size from the command line; only finite, positive
/// values are accepted.
pub fn parse_points(s: &str) -> Result<f32, String> {
    let value: f32 = s.trim().parse().map_err(|e| format!("'{s}' is not a number: {e}"))?;
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(format!("'{s}' must be a positive number of points"))
    }
}
