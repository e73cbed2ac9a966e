// 🗺️ Occupancy Map - Integral-Image Position Sampling
// Tracks inked canvas cells and samples free boxes uniformly at random

use crate::cloud::typeset::WordSprite;

// ============================================================================
// OCCUPANCY MAP
// ============================================================================

/// OccupancyMap - Which canvas cells are already inked.
///
/// Keeps a summed-area table over the cell grid so "is this WxH box free?"
/// is four lookups instead of a scan. `sample_position` enumerates every
/// position where the box fits without touching ink and picks one uniformly
/// at random; `stamp` marks a placed sprite's cells and refreshes the table.
pub struct OccupancyMap {
    width: u32,
    height: u32,
    grid: Vec<u8>,
    // (width + 1) x (height + 1), row 0 and column 0 are zero
    integral: Vec<u32>,
}

impl OccupancyMap {
    pub fn new(width: u32, height: u32) -> Self {
        let cells = width as usize * height as usize;
        let integral_cells = (width as usize + 1) * (height as usize + 1);
        OccupancyMap {
            width,
            height,
            grid: vec![0; cells],
            integral: vec![0; integral_cells],
        }
    }

    /// Number of inked cells so far
    pub fn occupied_cells(&self) -> usize {
        self.grid.iter().filter(|&&cell| cell != 0).count()
    }

    /// Sum of inked cells inside the box with top-left (x, y)
    fn region_sum(&self, x: u32, y: u32, box_w: u32, box_h: u32) -> u32 {
        let iw = self.width as usize + 1;
        let (x, y) = (x as usize, y as usize);
        let (bw, bh) = (box_w as usize, box_h as usize);

        self.integral[(y + bh) * iw + (x + bw)] + self.integral[y * iw + x]
            - self.integral[y * iw + (x + bw)]
            - self.integral[(y + bh) * iw + x]
    }

    /// Pick a free top-left position for a box_w x box_h box, uniformly at
    /// random over all free positions. Returns None when nothing fits.
    pub fn sample_position(
        &self,
        box_w: u32,
        box_h: u32,
        rng: &mut fastrand::Rng,
    ) -> Option<(u32, u32)> {
        if box_w == 0 || box_h == 0 || box_w > self.width || box_h > self.height {
            return None;
        }
        let max_x = self.width - box_w;
        let max_y = self.height - box_h;

        // First pass: count candidate positions
        let mut free = 0usize;
        for y in 0..=max_y {
            for x in 0..=max_x {
                if self.region_sum(x, y, box_w, box_h) == 0 {
                    free += 1;
                }
            }
        }
        if free == 0 {
            return None;
        }

        // Second pass: walk to the sampled index
        let goal = rng.usize(0..free);
        let mut seen = 0usize;
        for y in 0..=max_y {
            for x in 0..=max_x {
                if self.region_sum(x, y, box_w, box_h) == 0 {
                    if seen == goal {
                        return Some((x, y));
                    }
                    seen += 1;
                }
            }
        }
        None
    }

    /// Mark a sprite's inked cells at top-left (x, y) and refresh the
    /// integral table. Only cells with coverage are marked, so later words
    /// may still nest into the gaps between letters.
    pub fn stamp(&mut self, sprite: &WordSprite, x: u32, y: u32) {
        let x_end = (x + sprite.width).min(self.width);
        let y_end = (y + sprite.height).min(self.height);

        for gy in y..y_end {
            for gx in x..x_end {
                let coverage = sprite.coverage_at(gx - x, gy - y);
                if coverage > 0 {
                    self.grid[gy as usize * self.width as usize + gx as usize] = 1;
                }
            }
        }

        self.refresh_integral(x, y);
    }

    /// Recompute the integral table at and below/right of (from_x, from_y)
    fn refresh_integral(&mut self, from_x: u32, from_y: u32) {
        let w = self.width as usize;
        let h = self.height as usize;
        let iw = w + 1;

        for y in (from_y as usize + 1)..=h {
            for x in (from_x as usize + 1)..=w {
                self.integral[y * iw + x] = self.grid[(y - 1) * w + (x - 1)] as u32
                    + self.integral[(y - 1) * iw + x]
                    + self.integral[y * iw + (x - 1)]
                    - self.integral[(y - 1) * iw + (x - 1)];
            }
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn solid_sprite(width: u32, height: u32) -> WordSprite {
        WordSprite {
            width,
            height,
            coverage: vec![255; (width * height) as usize],
        }
    }

    #[test]
    fn test_fresh_map_is_all_free() {
        let map = OccupancyMap::new(20, 10);
        let mut rng = fastrand::Rng::with_seed(1);

        assert_eq!(map.occupied_cells(), 0);
        assert!(map.sample_position(5, 5, &mut rng).is_some());
    }

    #[test]
    fn test_oversized_box_has_no_position() {
        let map = OccupancyMap::new(20, 10);
        let mut rng = fastrand::Rng::with_seed(1);

        assert_eq!(map.sample_position(21, 1, &mut rng), None);
        assert_eq!(map.sample_position(1, 11, &mut rng), None);
        assert_eq!(map.sample_position(0, 5, &mut rng), None);
    }

    #[test]
    fn test_exact_fit_has_one_position() {
        let map = OccupancyMap::new(20, 10);
        let mut rng = fastrand::Rng::with_seed(7);

        // Only (0, 0) fits a canvas-sized box
        assert_eq!(map.sample_position(20, 10, &mut rng), Some((0, 0)));
    }

    #[test]
    fn test_stamp_marks_cells() {
        let mut map = OccupancyMap::new(20, 10);
        map.stamp(&solid_sprite(4, 3), 2, 1);

        assert_eq!(map.occupied_cells(), 12);
        assert_eq!(map.region_sum(2, 1, 4, 3), 12);
        assert_eq!(map.region_sum(10, 5, 4, 3), 0);
    }

    #[test]
    fn test_stamped_region_is_avoided() {
        let mut map = OccupancyMap::new(8, 8);
        // Fill everything except the bottom-right 3x3 corner
        map.stamp(&solid_sprite(8, 5), 0, 0);
        map.stamp(&solid_sprite(5, 3), 0, 5);

        let mut rng = fastrand::Rng::with_seed(3);
        for _ in 0..20 {
            let (x, y) = map.sample_position(3, 3, &mut rng).unwrap();
            assert_eq!((x, y), (5, 5), "only the free corner fits");
        }
    }

    #[test]
    fn test_full_map_rejects_placement() {
        let mut map = OccupancyMap::new(6, 6);
        map.stamp(&solid_sprite(6, 6), 0, 0);

        let mut rng = fastrand::Rng::with_seed(11);
        assert_eq!(map.sample_position(1, 1, &mut rng), None);
    }

    #[test]
    fn test_stamp_clips_at_canvas_edge() {
        let mut map = OccupancyMap::new(10, 10);
        // Sprite extends past the right/bottom edge; out-of-canvas cells drop
        map.stamp(&solid_sprite(5, 5), 8, 8);

        assert_eq!(map.occupied_cells(), 4);
    }

    #[test]
    fn test_sparse_sprite_leaves_gaps_free() {
        let mut map = OccupancyMap::new(10, 10);
        // Two inked columns with a free column between them
        let mut sprite = solid_sprite(3, 4);
        for row in 0..4 {
            sprite.coverage[(row * 3 + 1) as usize] = 0;
        }
        map.stamp(&sprite, 0, 0);

        assert_eq!(map.occupied_cells(), 8);
        // The un-inked middle column stays free for later words
        assert_eq!(map.region_sum(1, 0, 1, 4), 0);
        assert_eq!(map.region_sum(0, 0, 1, 4), 4);
        assert_eq!(map.region_sum(2, 0, 1, 4), 4);
    }
}
