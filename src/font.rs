//! Font description and the metrics used to derive row and header heights.

/// Padding added around the glyph box of every row and header line.
pub const CELL_PADDING: u32 = 4;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Font {
    pub family: String,
    pub size: u32,
    pub bold: bool,
}

impl Default for Font {
    fn default() -> Self {
        Font {
            family: "monospace".to_string(),
            size: 12,
            bold: false,
        }
    }
}

impl Font {
    pub fn new(family: impl Into<String>, size: u32) -> Self {
        Font {
            family: family.into(),
            size,
            bold: false,
        }
    }

    /// The same font with bold weight, used for the header.
    pub fn to_bold(&self) -> Font {
        Font {
            bold: true,
            ..self.clone()
        }
    }

    /// Ascent in pixels, 4/5 of the point size rounded up.
    pub fn ascent(&self) -> u32 {
        (self.size * 4).div_ceil(5)
    }

    /// Descent in pixels, 1/5 of the point size rounded up.
    pub fn descent(&self) -> u32 {
        self.size.div_ceil(5)
    }

    /// Height of one text line including the cell padding.
    pub fn line_height(&self) -> u32 {
        self.ascent() + self.descent() + CELL_PADDING
    }
}
