// 🔠 Typeset - Word Sprite Rasterization
// Measures and rasterizes phrases into grayscale coverage sprites

use ab_glyph::{Font, FontVec, GlyphId, PxScale, ScaleFont};
use anyhow::{bail, Context, Result};
use std::path::{Path, PathBuf};

// ============================================================================
// CORE TYPES
// ============================================================================

/// WordSprite - Tight grayscale bitmap of one rendered phrase
///
/// `coverage` is row-major, one byte per pixel: 0 = untouched background,
/// 255 = fully inked. Anti-aliased edges fall in between.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WordSprite {
    pub width: u32,
    pub height: u32,
    pub coverage: Vec<u8>,
}

impl WordSprite {
    pub fn coverage_at(&self, x: u32, y: u32) -> u8 {
        self.coverage[(y * self.width + x) as usize]
    }

    /// Rotate 90° counterclockwise, so a horizontal phrase reads bottom-to-top
    pub fn rotated(&self) -> WordSprite {
        let mut coverage = vec![0u8; self.coverage.len()];
        for y in 0..self.height {
            for x in 0..self.width {
                let out_x = y;
                let out_y = self.width - 1 - x;
                coverage[(out_y * self.height + out_x) as usize] = self.coverage_at(x, y);
            }
        }
        WordSprite {
            width: self.height,
            height: self.width,
            coverage,
        }
    }
}

/// Typeface - The measuring/rasterizing seam of the layout engine.
///
/// The layout loop only ever asks two questions: "how big would this phrase
/// be at this size?" and "give me its pixels". Both return None when the
/// phrase would leave no ink (empty or whitespace-only text).
pub trait Typeface {
    fn measure(&self, text: &str, px: f32) -> Option<(u32, u32)>;
    fn render(&self, text: &str, px: f32) -> Option<WordSprite>;
}

// ============================================================================
// TRUETYPE FACE
// ============================================================================

/// Well-known sans-serif font locations, probed in order when no font is
/// given explicitly
const FONT_SEARCH_PATHS: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
    "/usr/share/fonts/truetype/liberation2/LiberationSans-Regular.ttf",
    "/usr/share/fonts/truetype/noto/NotoSans-Regular.ttf",
    "/usr/share/fonts/truetype/freefont/FreeSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/System/Library/Fonts/Supplemental/Arial.ttf",
    "/Library/Fonts/Arial.ttf",
];

/// FontTypeface - Kerned TrueType/OpenType rasterization
pub struct FontTypeface {
    font: FontVec,
    source: PathBuf,
}

impl FontTypeface {
    pub fn from_file(path: &Path) -> Result<Self> {
        let bytes = std::fs::read(path)
            .with_context(|| format!("Failed to read font file: {}", path.display()))?;
        let font = FontVec::try_from_vec(bytes)
            .with_context(|| format!("Not a parseable TTF/OTF font: {}", path.display()))?;
        Ok(FontTypeface {
            font,
            source: path.to_path_buf(),
        })
    }

    /// Path the font was loaded from
    pub fn source(&self) -> &Path {
        &self.source
    }

    /// Position each glyph on a horizontal baseline, with kerning
    fn line_of_glyphs(&self, text: &str, px: f32) -> Vec<ab_glyph::Glyph> {
        let scaled = self.font.as_scaled(PxScale::from(px));
        let mut glyphs = Vec::new();
        let mut caret = 0.0f32;
        let mut previous: Option<GlyphId> = None;

        for ch in text.chars() {
            if ch.is_control() {
                continue;
            }
            let id = scaled.glyph_id(ch);
            if let Some(prev) = previous {
                caret += scaled.kern(prev, id);
            }
            let mut glyph = scaled.scaled_glyph(ch);
            glyph.position = ab_glyph::point(caret, scaled.ascent());
            caret += scaled.h_advance(id);
            previous = Some(id);
            glyphs.push(glyph);
        }
        glyphs
    }

    /// Outline the line and compute its tight pixel bounding box.
    /// None when nothing would be inked.
    fn outline_line(
        &self,
        text: &str,
        px: f32,
    ) -> Option<(Vec<ab_glyph::OutlinedGlyph>, f32, f32, u32, u32)> {
        if text.is_empty() || px < 1.0 {
            return None;
        }

        let mut outlined = Vec::new();
        let mut min_x = f32::MAX;
        let mut min_y = f32::MAX;
        let mut max_x = f32::MIN;
        let mut max_y = f32::MIN;

        for glyph in self.line_of_glyphs(text, px) {
            if let Some(outline) = self.font.outline_glyph(glyph) {
                let bounds = outline.px_bounds();
                min_x = min_x.min(bounds.min.x);
                min_y = min_y.min(bounds.min.y);
                max_x = max_x.max(bounds.max.x);
                max_y = max_y.max(bounds.max.y);
                outlined.push(outline);
            }
        }

        if outlined.is_empty() {
            return None;
        }
        let width = (max_x - min_x).round().max(1.0) as u32;
        let height = (max_y - min_y).round().max(1.0) as u32;
        Some((outlined, min_x, min_y, width, height))
    }
}

impl Typeface for FontTypeface {
    fn measure(&self, text: &str, px: f32) -> Option<(u32, u32)> {
        self.outline_line(text, px)
            .map(|(_, _, _, width, height)| (width, height))
    }

    fn render(&self, text: &str, px: f32) -> Option<WordSprite> {
        let (outlined, min_x, min_y, width, height) = self.outline_line(text, px)?;
        let mut coverage = vec![0u8; (width * height) as usize];

        for outline in &outlined {
            let bounds = outline.px_bounds();
            let offset_x = (bounds.min.x - min_x).round() as i64;
            let offset_y = (bounds.min.y - min_y).round() as i64;
            outline.draw(|x, y, c| {
                let px_x = offset_x + x as i64;
                let px_y = offset_y + y as i64;
                if px_x < 0 || px_y < 0 || px_x >= width as i64 || px_y >= height as i64 {
                    return;
                }
                let idx = (px_y * width as i64 + px_x) as usize;
                let shade = (c.clamp(0.0, 1.0) * 255.0).round() as u8;
                // Glyph boxes can overlap with kerning; keep the darker shade
                coverage[idx] = coverage[idx].max(shade);
            });
        }

        Some(WordSprite {
            width,
            height,
            coverage,
        })
    }
}

/// Load a typeface: the explicit path if given, otherwise the first system
/// font found on the probe list.
pub fn load_font(explicit: Option<&Path>) -> Result<FontTypeface> {
    if let Some(path) = explicit {
        return FontTypeface::from_file(path);
    }

    for candidate in FONT_SEARCH_PATHS {
        let path = Path::new(candidate);
        if path.exists() {
            if let Ok(face) = FontTypeface::from_file(path) {
                return Ok(face);
            }
        }
    }

    bail!(
        "No usable sans-serif font found on this system; pass one with --font /path/to/font.ttf"
    )
}

// ============================================================================
// BLOCK FACE (fixed metrics, no font files)
// ============================================================================

/// BlockTypeface - Deterministic face that renders every character as a
/// solid block. Metrics depend only on character count and size, so layout
/// results are reproducible on machines with no fonts installed.
pub struct BlockTypeface {
    /// Block width as a fraction of the font size (default: 0.55)
    pub char_width: f32,
}

impl BlockTypeface {
    pub fn new() -> Self {
        BlockTypeface { char_width: 0.55 }
    }

    fn dimensions(&self, text: &str, px: f32) -> Option<(u32, u32)> {
        if px < 1.0 {
            return None;
        }
        let chars = text.chars().filter(|c| !c.is_control()).count();
        if chars == 0 {
            return None;
        }
        let width = (chars as f32 * px * self.char_width).ceil().max(1.0) as u32;
        let height = px.ceil().max(1.0) as u32;
        Some((width, height))
    }
}

impl Default for BlockTypeface {
    fn default() -> Self {
        BlockTypeface::new()
    }
}

impl Typeface for BlockTypeface {
    fn measure(&self, text: &str, px: f32) -> Option<(u32, u32)> {
        self.dimensions(text, px)
    }

    fn render(&self, text: &str, px: f32) -> Option<WordSprite> {
        let (width, height) = self.dimensions(text, px)?;
        Some(WordSprite {
            width,
            height,
            coverage: vec![255; (width * height) as usize],
        })
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_block_face_measure_scales_with_text() {
        let face = BlockTypeface::new();

        let (w1, h1) = face.measure("Tea", 20.0).unwrap();
        let (w2, h2) = face.measure("Tea Trade", 20.0).unwrap();
        assert_eq!(h1, h2);
        assert!(w2 > w1, "longer phrase must be wider");

        let (w3, _) = face.measure("Tea", 40.0).unwrap();
        assert!(w3 > w1, "larger size must be wider");
    }

    #[test]
    fn test_block_face_render_matches_measure() {
        let face = BlockTypeface::new();
        let (w, h) = face.measure("Fisheries", 16.0).unwrap();
        let sprite = face.render("Fisheries", 16.0).unwrap();

        assert_eq!((sprite.width, sprite.height), (w, h));
        assert!(sprite.coverage.iter().all(|&c| c == 255));
    }

    #[test]
    fn test_block_face_rejects_unusable_input() {
        let face = BlockTypeface::new();
        assert_eq!(face.measure("", 16.0), None);
        assert_eq!(face.measure("Tea", 0.5), None);
        assert!(face.render("", 16.0).is_none());
    }

    #[test]
    fn test_sprite_rotation_is_counterclockwise() {
        // 2x3 sprite:        rotated (3x2):
        //   a b                 b d f
        //   c d                 a c e
        //   e f
        let sprite = WordSprite {
            width: 2,
            height: 3,
            coverage: vec![10, 20, 30, 40, 50, 60],
        };
        let rotated = sprite.rotated();

        assert_eq!((rotated.width, rotated.height), (3, 2));
        assert_eq!(rotated.coverage, vec![20, 40, 60, 10, 30, 50]);
    }

    #[test]
    fn test_rotation_round_trip_dimensions() {
        let sprite = WordSprite {
            width: 5,
            height: 2,
            coverage: vec![7; 10],
        };
        let back = sprite.rotated().rotated().rotated().rotated();
        assert_eq!(back, sprite);
    }

    #[test]
    fn test_font_face_when_system_font_available() {
        // Skipped on machines with no fonts installed
        let face = match load_font(None) {
            Ok(face) => face,
            Err(_) => return,
        };

        let (w, h) = face.measure("Tea Trade", 32.0).unwrap();
        assert!(w > 0 && h > 0);

        let sprite = face.render("Tea Trade", 32.0).unwrap();
        assert_eq!((sprite.width, sprite.height), (w, h));
        assert!(
            sprite.coverage.iter().any(|&c| c > 0),
            "rendered phrase must leave ink"
        );

        // Whitespace leaves no ink at all
        assert!(face.measure("   ", 32.0).is_none());
    }

    #[test]
    fn test_missing_font_file_is_error() {
        let result = FontTypeface::from_file(Path::new("/no/such/font.ttf"));
        assert!(result.is_err());
    }
}
