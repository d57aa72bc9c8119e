//! Broad-phase candidate generation
//!
//! A [`BroadPhase`] takes one flat array of world-space boxes and returns
//! every index pair `(i, j)`, `i < j`, whose boxes intersect. Strategies
//! differ only in how many pairs they test, never in the pairs they return.

use super::aabb::AABB;
use crate::config::{BroadPhaseConfig, BroadPhaseKind};
use std::collections::{HashMap, HashSet};

/// Strategy for finding intersecting box pairs
pub trait BroadPhase: Send + Sync {
    /// All intersecting index pairs, `i < j`, sorted
    fn intersecting_pairs(&self, boxes: &[AABB]) -> Vec<(usize, usize)>;

    /// Short name for logging
    fn name(&self) -> &'static str;
}

/// Build the strategy named by the configuration
pub fn from_config(config: &BroadPhaseConfig) -> Box<dyn BroadPhase> {
    match config.kind {
        BroadPhaseKind::BruteForce => Box::new(BruteForce),
        BroadPhaseKind::UniformGrid => Box::new(UniformGrid::new(config.cell_size)),
    }
}

/// Tests every pair; O(n²) but allocation-free per pair
#[derive(Debug, Default, Clone, Copy)]
pub struct BruteForce;

impl BroadPhase for BruteForce {
    fn intersecting_pairs(&self, boxes: &[AABB]) -> Vec<(usize, usize)> {
        let mut pairs = Vec::new();
        for (i, a) in boxes.iter().enumerate() {
            for (offset, b) in boxes[i + 1..].iter().enumerate() {
                if a.intersects(b) {
                    pairs.push((i, i + 1 + offset));
                }
            }
        }
        pairs
    }

    fn name(&self) -> &'static str {
        "brute-force"
    }
}

/// Uniform grid: boxes are bucketed into square cells and only boxes that
/// share a cell are tested
///
/// Boxes covering more than [`UniformGrid::MAX_CELLS_PER_BOX`] cells are
/// kept out of the grid and tested against everything instead.
#[derive(Debug, Clone, Copy)]
pub struct UniformGrid {
    cell_size: f32,
}

impl UniformGrid {
    /// Cell budget above which a box bypasses the grid
    pub const MAX_CELLS_PER_BOX: i64 = 64;

    /// Create a grid with the given cell edge length
    pub fn new(cell_size: f32) -> Self {
        Self {
            cell_size: cell_size.max(1e-5),
        }
    }

    /// Cell edge length
    pub fn cell_size(&self) -> f32 {
        self.cell_size
    }

    #[allow(clippy::cast_possible_truncation)]
    fn cell_range(&self, aabb: &AABB) -> (i32, i32, i32, i32) {
        let cs = self.cell_size;
        (
            (aabb.min.x / cs).floor() as i32,
            (aabb.min.y / cs).floor() as i32,
            (aabb.max.x / cs).floor() as i32,
            (aabb.max.y / cs).floor() as i32,
        )
    }
}

impl Default for UniformGrid {
    fn default() -> Self {
        Self::new(BroadPhaseConfig::default().cell_size)
    }
}

impl BroadPhase for UniformGrid {
    fn intersecting_pairs(&self, boxes: &[AABB]) -> Vec<(usize, usize)> {
        let mut grid: HashMap<(i32, i32), Vec<usize>> = HashMap::new();
        let mut oversized = Vec::new();

        for (idx, aabb) in boxes.iter().enumerate() {
            let (ix0, iy0, ix1, iy1) = self.cell_range(aabb);
            let span_x = i64::from(ix1) - i64::from(ix0) + 1;
            let span_y = i64::from(iy1) - i64::from(iy0) + 1;
            let cells = span_x.checked_mul(span_y).unwrap_or(i64::MAX);
            if cells > Self::MAX_CELLS_PER_BOX {
                oversized.push(idx);
                continue;
            }
            for iy in iy0..=iy1 {
                for ix in ix0..=ix1 {
                    grid.entry((ix, iy)).or_default().push(idx);
                }
            }
        }

        let mut seen: HashSet<(usize, usize)> = HashSet::new();
        let mut test = |a: usize, b: usize| {
            let key = if a < b { (a, b) } else { (b, a) };
            if key.0 != key.1 && boxes[a].intersects(&boxes[b]) {
                seen.insert(key);
            }
        };

        for indices in grid.values() {
            for (n, &a) in indices.iter().enumerate() {
                for &b in &indices[n + 1..] {
                    test(a, b);
                }
            }
        }
        for &big in &oversized {
            for other in 0..boxes.len() {
                test(big, other);
            }
        }

        let mut pairs: Vec<_> = seen.into_iter().collect();
        pairs.sort_unstable();
        pairs
    }

    fn name(&self) -> &'static str {
        "uniform-grid"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_boxes() -> Vec<AABB> {
        vec![
            AABB::from_bounds(0.0, 0.0, 10.0, 10.0),
            AABB::from_bounds(5.0, 5.0, 15.0, 15.0),
            AABB::from_bounds(100.0, 100.0, 110.0, 110.0),
            AABB::from_bounds(-500.0, -1.0, 500.0, 1.0),
            AABB::from_bounds(63.0, 63.0, 65.0, 65.0),
            AABB::from_bounds(64.0, 64.0, 70.0, 70.0),
            AABB::from_bounds(10.0, -20.0, 12.0, 0.0),
        ]
    }

    #[test]
    fn brute_force_finds_expected_pairs() {
        let pairs = BruteForce.intersecting_pairs(&sample_boxes());
        assert_eq!(pairs, vec![(0, 1), (0, 3), (0, 6), (3, 6), (4, 5)]);
    }

    #[test]
    fn grid_matches_brute_force() {
        let boxes = sample_boxes();
        for cell_size in [1.0, 8.0, 64.0, 1000.0] {
            let grid = UniformGrid::new(cell_size);
            assert_eq!(
                grid.intersecting_pairs(&boxes),
                BruteForce.intersecting_pairs(&boxes),
                "cell size {cell_size}"
            );
        }
    }

    #[test]
    fn huge_boxes_bypass_the_grid() {
        let boxes = vec![
            AABB::from_bounds(-1e12, -1e12, 1e12, 1e12),
            AABB::from_bounds(0.0, 0.0, 1.0, 1.0),
            AABB::from_bounds(5e11, -3.0, 6e11, 3.0),
        ];
        let expected = BruteForce.intersecting_pairs(&boxes);
        assert_eq!(expected, vec![(0, 1), (0, 2)]);
        for cell_size in [1.0, 64.0] {
            assert_eq!(UniformGrid::new(cell_size).intersecting_pairs(&boxes), expected);
        }
    }

    #[test]
    fn shared_cells_do_not_duplicate_pairs() {
        let boxes = vec![
            AABB::from_bounds(0.0, 0.0, 30.0, 30.0),
            AABB::from_bounds(1.0, 1.0, 29.0, 29.0),
        ];
        let pairs = UniformGrid::new(4.0).intersecting_pairs(&boxes);
        assert_eq!(pairs, vec![(0, 1)]);
    }

    #[test]
    fn empty_input_yields_nothing() {
        assert!(UniformGrid::default().intersecting_pairs(&[]).is_empty());
        assert!(BruteForce.intersecting_pairs(&[]).is_empty());
    }

    #[test]
    fn config_selects_strategy() {
        let config = BroadPhaseConfig {
            kind: BroadPhaseKind::BruteForce,
            cell_size: 10.0,
        };
        assert_eq!(from_config(&config).name(), "brute-force");
    }
}
