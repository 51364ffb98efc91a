//! Pixel connectivity for component-based operations

use serde::{Deserialize, Serialize};

/// 4-connected offsets (N, W, E, S)
const ROOK: [(isize, isize); 4] = [(-1, 0), (0, -1), (0, 1), (1, 0)];

/// 8-connected offsets in raster order
const QUEEN: [(isize, isize); 8] = [
    (-1, -1), (-1, 0), (-1, 1),
    (0, -1),           (0, 1),
    (1, -1),  (1, 0),  (1, 1),
];

/// Which pixels count as adjacent when growing connected components
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Connectivity {
    /// Edge neighbors only
    Four,
    /// Edge and corner neighbors
    #[default]
    Eight,
}

impl Connectivity {
    /// Relative (row, col) offsets of the neighbors, center excluded
    pub fn offsets(&self) -> &'static [(isize, isize)] {
        match self {
            Connectivity::Four => &ROOK,
            Connectivity::Eight => &QUEEN,
        }
    }

    /// Build from a neighbor count (4 or 8)
    pub fn from_neighbors(n: usize) -> Option<Self> {
        match n {
            4 => Some(Connectivity::Four),
            8 => Some(Connectivity::Eight),
            _ => None,
        }
    }

    /// Call `f` with the raster index of every in-bounds neighbor of `index`
    /// in an image with `rows` x `cols` pixels.
    #[inline]
    pub fn for_each_neighbor<F>(&self, index: usize, rows: usize, cols: usize, mut f: F)
    where
        F: FnMut(usize),
    {
        let row = (index / cols) as isize;
        let col = (index % cols) as isize;
        for &(dr, dc) in self.offsets() {
            let nr = row + dr;
            let nc = col + dc;
            if nr < 0 || nc < 0 || nr >= rows as isize || nc >= cols as isize {
                continue;
            }
            f(nr as usize * cols + nc as usize);
        }
    }
}
