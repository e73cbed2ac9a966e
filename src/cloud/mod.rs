// ☁️ Cloud Engine - Phrase Layout & Rendering
// Packs sized phrases onto a canvas and rasterizes the result

pub mod occupancy;
pub mod typeset;

use anyhow::{bail, Context, Result};
use image::{Rgb, RgbImage};
use std::path::Path;

use crate::cloud::occupancy::OccupancyMap;
use crate::cloud::typeset::{Typeface, WordSprite};
use crate::normalize::FrequencyTable;
use crate::palette::VIVID;

// ============================================================================
// CONFIGURATION
// ============================================================================

/// CloudConfig - Tuning knobs for one layout run
#[derive(Debug, Clone)]
pub struct CloudConfig {
    /// Canvas width in pixels (default: 1500)
    pub width: u32,
    /// Canvas height in pixels (default: 1000)
    pub height: u32,
    /// Most frequent N phrases to keep (default: 200)
    pub max_words: usize,
    /// 0.0 sizes by rank only, 1.0 proportional to frequency (default: 0.75)
    pub relative_scaling: f64,
    /// Chance a phrase is laid out horizontally (default: 0.9)
    pub prefer_horizontal: f64,
    /// Layout stops once a phrase would drop below this size (default: 10)
    pub min_font_size: u32,
    /// Pixels to shrink by per failed fit (default: 1)
    pub font_step: u32,
    /// Starting size; None estimates one from the two largest phrases
    pub max_font_size: Option<u32>,
    /// Empty ring kept around each phrase, split across sides (default: 2)
    pub margin: u32,
    /// Fold "Cats" into "Cat" when both occur (default: false)
    pub normalize_plurals: bool,
    /// Canvas fill color (default: white)
    pub background: Rgb<u8>,
    /// Colors cycled through phrases in layout order (default: Vivid)
    pub palette: Vec<Rgb<u8>>,
    /// Fixed RNG seed for reproducible layouts (default: None)
    pub seed: Option<u64>,
}

impl Default for CloudConfig {
    fn default() -> Self {
        CloudConfig {
            width: 1500,
            height: 1000,
            max_words: 200,
            relative_scaling: 0.75,
            prefer_horizontal: 0.9,
            min_font_size: 10,
            font_step: 1,
            max_font_size: None,
            margin: 2,
            normalize_plurals: false,
            background: Rgb([0xFF, 0xFF, 0xFF]),
            palette: VIVID.to_vec(),
            seed: None,
        }
    }
}

impl CloudConfig {
    /// Reject configurations the layout loop cannot work with
    pub fn validate(&self) -> Result<()> {
        if self.width == 0 || self.height == 0 {
            bail!(
                "Canvas dimensions must be nonzero (got {}x{})",
                self.width,
                self.height
            );
        }
        if self.max_words == 0 {
            bail!("max_words must be at least 1");
        }
        if !(0.0..=1.0).contains(&self.relative_scaling) {
            bail!(
                "relative_scaling must be within [0, 1], got {}",
                self.relative_scaling
            );
        }
        if !(0.0..=1.0).contains(&self.prefer_horizontal) {
            bail!(
                "prefer_horizontal must be within [0, 1], got {}",
                self.prefer_horizontal
            );
        }
        if self.min_font_size == 0 {
            bail!("min_font_size must be at least 1");
        }
        if self.font_step == 0 {
            bail!("font_step must be at least 1");
        }
        if self.palette.is_empty() {
            bail!("Palette must contain at least one color");
        }
        Ok(())
    }
}

// ============================================================================
// CLOUD
// ============================================================================

/// PlacedWord - One phrase after layout
#[derive(Debug, Clone)]
pub struct PlacedWord {
    pub text: String,
    /// Final font size in pixels
    pub px: u32,
    /// Top-left corner of the sprite on the canvas
    pub x: u32,
    pub y: u32,
    pub vertical: bool,
    pub sprite: WordSprite,
}

/// Cloud - A finished layout, ready to rasterize
#[derive(Debug, Clone)]
pub struct Cloud {
    pub width: u32,
    pub height: u32,
    pub background: Rgb<u8>,
    /// Non-empty; colors cycle over words in layout order
    pub palette: Vec<Rgb<u8>>,
    pub words: Vec<PlacedWord>,
}

impl Cloud {
    /// Lay out a frequency table as a phrase cloud.
    ///
    /// Phrases are placed largest-first. Each one starts at a size derived
    /// from the previous phrase's final size and the frequency ratio, then
    /// shrinks in `font_step` decrements until a free spot exists. Once a
    /// phrase would drop below `min_font_size`, layout ends for all
    /// remaining phrases.
    pub fn generate(
        table: &FrequencyTable,
        face: &dyn Typeface,
        config: &CloudConfig,
    ) -> Result<Cloud> {
        config.validate()?;

        let mut entries: Vec<(String, u64)> =
            table.iter().map(|(h, c)| (h.to_string(), c)).collect();
        if config.normalize_plurals {
            merge_plurals(&mut entries);
        }
        entries.retain(|(_, count)| *count > 0);
        if entries.is_empty() {
            bail!("Need at least one phrase with a nonzero count to lay out a cloud");
        }

        // Largest first; ties keep their table order
        entries.sort_by(|a, b| b.1.cmp(&a.1));
        entries.truncate(config.max_words);

        let max_count = entries[0].1 as f64;
        let weighted: Vec<(String, f64)> = entries
            .into_iter()
            .map(|(heading, count)| (heading, count as f64 / max_count))
            .collect();

        let mut rng = match config.seed {
            Some(seed) => fastrand::Rng::with_seed(seed),
            None => fastrand::Rng::new(),
        };

        let start_px = match config.max_font_size {
            Some(px) => px,
            None => estimate_start_px(&weighted, face, config, &mut rng)?,
        };

        let words = place_words(&weighted, start_px, face, config, &mut rng);

        Ok(Cloud {
            width: config.width,
            height: config.height,
            background: config.background,
            palette: config.palette.clone(),
            words,
        })
    }

    /// Rasterize onto a fresh canvas
    pub fn render(&self) -> RgbImage {
        let mut image = RgbImage::from_pixel(self.width, self.height, self.background);

        for (index, word) in self.words.iter().enumerate() {
            let color = self.palette[index % self.palette.len()];
            blend_sprite(&mut image, &word.sprite, word.x, word.y, color);
        }
        image
    }

    /// Render and write the canvas, overwriting any existing file
    pub fn to_file(&self, path: &Path) -> Result<()> {
        self.render()
            .save(path)
            .with_context(|| format!("Failed to write cloud image to {}", path.display()))?;
        Ok(())
    }
}

// ============================================================================
// LAYOUT INTERNALS
// ============================================================================

/// Fold plural headings into their singular form: a heading ending in 's'
/// (but not 'ss') whose singular also occurs adds its count to the singular
/// and is dropped. The singular keeps its position.
fn merge_plurals(entries: &mut Vec<(String, u64)>) {
    use std::collections::HashMap;

    let index: HashMap<&str, usize> = entries
        .iter()
        .enumerate()
        .map(|(i, (heading, _))| (heading.as_str(), i))
        .collect();

    let mut folded: Vec<(usize, u64)> = Vec::new();
    let mut dropped = vec![false; entries.len()];

    for (i, (heading, count)) in entries.iter().enumerate() {
        if heading.ends_with("ss") || !heading.ends_with('s') {
            continue;
        }
        let singular = &heading[..heading.len() - 1];
        if singular.is_empty() {
            continue;
        }
        if let Some(&target) = index.get(singular) {
            if target != i {
                folded.push((target, *count));
                dropped[i] = true;
            }
        }
    }

    for (target, count) in folded {
        entries[target].1 += count;
    }
    let mut i = 0;
    entries.retain(|_| {
        let keep = !dropped[i];
        i += 1;
        keep
    });
}

/// Dry-run the two largest phrases at canvas height, then take the harmonic
/// mean of their final sizes as the real starting size.
fn estimate_start_px(
    weighted: &[(String, f64)],
    face: &dyn Typeface,
    config: &CloudConfig,
    rng: &mut fastrand::Rng,
) -> Result<u32> {
    if weighted.len() == 1 {
        // One phrase: make it big
        return Ok(config.height);
    }

    let placed = place_words(&weighted[..2], config.height, face, config, rng);
    match placed.len() {
        0 => bail!(
            "Couldn't fit the largest phrase on a {}x{} canvas; enlarge the canvas or lower min_font_size",
            config.width,
            config.height
        ),
        1 => Ok(placed[0].px),
        _ => {
            let (first, second) = (placed[0].px as f64, placed[1].px as f64);
            Ok((2.0 * first * second / (first + second)) as u32)
        }
    }
}

/// The placement loop shared by the estimation dry-run and the real pass
fn place_words(
    weighted: &[(String, f64)],
    start_px: u32,
    face: &dyn Typeface,
    config: &CloudConfig,
    rng: &mut fastrand::Rng,
) -> Vec<PlacedWord> {
    let mut occupancy = OccupancyMap::new(config.width, config.height);
    let mut placed = Vec::new();

    let rs = config.relative_scaling;
    let mut px: i64 = start_px as i64;
    let mut prev_rel = 1.0f64;

    'words: for (text, rel) in weighted {
        // Target size: interpolate between pure rank decay (rs = 0) and
        // exact proportionality to the frequency ratio (rs = 1)
        if rs != 0.0 {
            px = ((rs * (*rel / prev_rel) + (1.0 - rs)) * px as f64).round() as i64;
        }

        let mut vertical = rng.f64() >= config.prefer_horizontal;
        let mut tried_other_orientation = false;

        let ((sample_x, sample_y), vertical) = loop {
            if px < config.min_font_size as i64 {
                // Canvas is out of room; drop this and every smaller phrase
                break 'words;
            }
            let Some((w, h)) = face.measure(text, px as f32) else {
                // Nothing to ink (whitespace-only heading)
                continue 'words;
            };
            let (box_w, box_h) = if vertical { (h, w) } else { (w, h) };

            match occupancy.sample_position(box_w + config.margin, box_h + config.margin, rng) {
                Some(position) => break (position, vertical),
                None => {
                    if !tried_other_orientation && config.prefer_horizontal < 1.0 {
                        vertical = !vertical;
                        tried_other_orientation = true;
                    } else {
                        px -= config.font_step as i64;
                        vertical = false;
                    }
                }
            }
        };

        let Some(sprite) = face.render(text, px as f32) else {
            continue;
        };
        let sprite = if vertical { sprite.rotated() } else { sprite };

        // Center the sprite inside its sampled box, leaving the margin ring
        let x = sample_x + config.margin / 2;
        let y = sample_y + config.margin / 2;
        occupancy.stamp(&sprite, x, y);

        placed.push(PlacedWord {
            text: text.clone(),
            px: px as u32,
            x,
            y,
            vertical,
            sprite,
        });
        prev_rel = *rel;
    }

    placed
}

/// Alpha-blend a sprite onto the canvas in one color
fn blend_sprite(image: &mut RgbImage, sprite: &WordSprite, x: u32, y: u32, color: Rgb<u8>) {
    let x_end = (x + sprite.width).min(image.width());
    let y_end = (y + sprite.height).min(image.height());

    for cy in y..y_end {
        for cx in x..x_end {
            let coverage = sprite.coverage_at(cx - x, cy - y) as u16;
            if coverage == 0 {
                continue;
            }
            let pixel = image.get_pixel_mut(cx, cy);
            for channel in 0..3 {
                let ink = color.0[channel] as u16;
                let base = pixel.0[channel] as u16;
                pixel.0[channel] = ((ink * coverage + base * (255 - coverage)) / 255) as u8;
            }
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================
