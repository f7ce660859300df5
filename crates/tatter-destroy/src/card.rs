//! Card content rendering
//!
//! The controller snapshots the card once per session through a
//! [`CardRenderer`]; engines only ever read the resulting texture.

use glam::Vec2;
use tatter_core::{Color, Rect, Result, TatterError};
use tatter_raster::{Canvas, RasterImage, Surface};

/// What the card shows at the moment it is destroyed
#[derive(Debug, Clone, PartialEq)]
pub struct CardFace {
    /// Back side showing
    pub flipped: bool,
    /// The analysis section is unfolded
    pub analysis_expanded: bool,
    pub title: String,
    pub accent: Color,
}

impl Default for CardFace {
    fn default() -> Self {
        Self {
            flipped: false,
            analysis_expanded: false,
            title: String::new(),
            accent: Color::from_hex(0xE76F51),
        }
    }
}

/// Produces the card texture a session destroys
pub trait CardRenderer {
    fn render(&self, face: &CardFace, width: u32, height: u32) -> Result<RasterImage>;
}

/// Paper-style card: header band, ruled body, darker back side
#[derive(Debug, Clone)]
pub struct PaperCard {
    pub paper: Color,
    pub rule: Color,
    pub back: Color,
    pub line_spacing: f32,
}

impl Default for PaperCard {
    fn default() -> Self {
        Self {
            paper: Color::from_hex(0xFDF8EE),
            rule: Color::from_hex(0xA8C5DA),
            back: Color::from_hex(0x2B2D42),
            line_spacing: 24.0,
        }
    }
}

const MARGIN: f32 = 12.0;
const GLYPH_WIDTH: f32 = 7.0;

impl PaperCard {
    fn draw_front(&self, canvas: &mut Canvas, face: &CardFace, w: f32, h: f32) {
        canvas.fill_rect(Rect::from_size(w, h), self.paper);

        let header = Rect::from_size(w, (h * 0.18).max(1.0));
        canvas.fill_rect(header, face.accent);

        // Title words as solid blocks, one glyph width per character
        let mut x = MARGIN;
        for word in face.title.split_whitespace() {
            let width = word.chars().count() as f32 * GLYPH_WIDTH;
            if x + width > w - MARGIN {
                break;
            }
            let block = Rect::new(x, header.height * 0.35, width, header.height * 0.3);
            canvas.fill_rect(block, Color::WHITE.with_alpha(0.9));
            x += width + GLYPH_WIDTH;
        }

        let body_end = if face.analysis_expanded {
            h - MARGIN
        } else {
            h * 0.65
        };
        let spacing = self.line_spacing.max(2.0);
        let mut y = header.height + spacing;
        while y < body_end {
            canvas.stroke_polyline(
                &[Vec2::new(MARGIN, y), Vec2::new(w - MARGIN, y)],
                1.0,
                self.rule,
            );
            y += spacing;
        }

        if !face.analysis_expanded {
            let fold = Rect::new(0.0, h * 0.85, w, h * 0.15);
            canvas.fill_rect(fold, face.accent.with_alpha(0.25));
        }
    }

    fn draw_back(&self, canvas: &mut Canvas, face: &CardFace, w: f32, h: f32) {
        canvas.fill_rect(Rect::from_size(w, h), self.back);
        let inset = Rect::new(MARGIN, MARGIN, w - 2.0 * MARGIN, h - 2.0 * MARGIN);
        let mut border = inset.corners().to_vec();
        border.push(border[0]);
        canvas.stroke_polyline(&border, 3.0, face.accent);
        canvas.fill_circle(
            Vec2::new(w, h) * 0.5,
            w.min(h) * 0.18,
            face.accent.with_alpha(0.8),
        );
    }
}

impl CardRenderer for PaperCard {
    fn render(&self, face: &CardFace, width: u32, height: u32) -> Result<RasterImage> {
        if width == 0 || height == 0 {
            return Err(TatterError::InvalidRect(format!(
                "card texture {width}x{height}"
            )));
        }
        let mut canvas = Canvas::new(width, height);
        let (w, h) = (width as f32, height as f32);
        if face.flipped {
            self.draw_back(&mut canvas, face, w, h);
        } else {
            self.draw_front(&mut canvas, face, w, h);
        }
        Ok(canvas.to_image())
    }
}
