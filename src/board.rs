use crate::error::{Result, SolverError};
use crate::rotation::Rotation;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Position {
    pub x: usize,
    pub y: usize,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PairSummary {
    pub matched: usize,
    pub unmatched: usize,
}

/// Full pair-detection result. The mask marks, per cell, whether the cell
/// belongs to a pair whose two occurrences are not orthogonally adjacent.
#[derive(Debug, Clone, Default)]
pub struct PairMetrics {
    pub summary: PairSummary,
    pub total_unmatched_distance: usize,
    pub max_unmatched_distance: usize,
    pub unmatched_mask: Vec<u8>,
}

/// Square grid of integer labels, row-major. Cloning is cheap (at most
/// 24×24 cells), so search nodes each own their copy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    size: usize,
    cells: Vec<i32>,
}

fn splitmix64(mut x: u64) -> u64 {
    x = x.wrapping_add(0x9e37_79b9_7f4a_7c15);
    x = (x ^ (x >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
    x = (x ^ (x >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
    x ^ (x >> 31)
}

impl Board {
    pub fn new(size: usize, cells: Vec<i32>) -> Result<Self> {
        if size == 0 {
            return Err(SolverError::invalid_board("size must be positive"));
        }
        if cells.len() != size * size {
            return Err(SolverError::invalid_board(format!(
                "expected {} cells for size {size}, got {}",
                size * size,
                cells.len()
            )));
        }
        Ok(Self { size, cells })
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    pub fn in_bounds(&self, x: usize, y: usize) -> bool {
        x < self.size && y < self.size
    }

    pub fn at(&self, x: usize, y: usize) -> Result<i32> {
        if !self.in_bounds(x, y) {
            return Err(SolverError::OutOfBounds {
                x,
                y,
                size: self.size,
            });
        }
        Ok(self.cells[y * self.size + x])
    }

    pub fn set(&mut self, x: usize, y: usize, value: i32) -> Result<()> {
        if !self.in_bounds(x, y) {
            return Err(SolverError::OutOfBounds {
                x,
                y,
                size: self.size,
            });
        }
        self.cells[y * self.size + x] = value;
        Ok(())
    }

    pub fn is_valid_rotation(&self, rotation: Rotation) -> bool {
        rotation.is_valid(self.size)
    }

    /// Rotates the sub-square clockwise. Reads go through a scratch copy of
    /// the footprint, so the write pass never observes its own output.
    pub fn apply(&mut self, rotation: Rotation) -> Result<()> {
        if !self.is_valid_rotation(rotation) {
            return Err(SolverError::InvalidOperation {
                x: rotation.x,
                y: rotation.y,
                n: rotation.size,
                board_size: self.size,
            });
        }
        let k = rotation.size;
        let mut scratch = vec![0_i32; k * k];
        for dy in 0..k {
            for dx in 0..k {
                scratch[dy * k + dx] = self.cells[(rotation.y + dy) * self.size + rotation.x + dx];
            }
        }
        for dy in 0..k {
            for dx in 0..k {
                let value = scratch[(k - 1 - dx) * k + dy];
                self.cells[(rotation.y + dy) * self.size + rotation.x + dx] = value;
            }
        }
        Ok(())
    }

    pub fn applied(&self, rotation: Rotation) -> Result<Self> {
        let mut next = self.clone();
        next.apply(rotation)?;
        Ok(next)
    }

    pub fn positions_of(&self, value: i32) -> Vec<Position> {
        let mut positions = Vec::with_capacity(2);
        for (index, &cell) in self.cells.iter().enumerate() {
            if cell == value {
                positions.push(Position {
                    x: index % self.size,
                    y: index / self.size,
                });
            }
        }
        positions
    }

    pub fn evaluate_pairs(&self) -> PairSummary {
        self.evaluate_pair_metrics().summary
    }

    /// Single row-major pass: remembers the first occurrence of every label
    /// and classifies the pair on the second sighting. Labels outside
    /// `[0, cell_count/2)` are skipped.
    pub fn evaluate_pair_metrics(&self) -> PairMetrics {
        let mut metrics = PairMetrics {
            unmatched_mask: vec![0_u8; self.cells.len()],
            ..PairMetrics::default()
        };
        let pair_count = self.cells.len() / 2;
        let mut first_seen = vec![usize::MAX; pair_count];

        for (index, &value) in self.cells.iter().enumerate() {
            if value < 0 || value as usize >= pair_count {
                continue;
            }
            let label = value as usize;
            if first_seen[label] == usize::MAX {
                first_seen[label] = index;
                continue;
            }

            let first = first_seen[label];
            let distance = (first % self.size).abs_diff(index % self.size)
                + (first / self.size).abs_diff(index / self.size);
            if distance == 1 {
                metrics.summary.matched += 1;
            } else {
                metrics.summary.unmatched += 1;
                metrics.total_unmatched_distance += distance;
                metrics.max_unmatched_distance = metrics.max_unmatched_distance.max(distance);
                metrics.unmatched_mask[first] = 1;
                metrics.unmatched_mask[index] = 1;
            }
        }

        metrics
    }

    pub fn is_goal(&self) -> bool {
        let summary = self.evaluate_pairs();
        summary.unmatched == 0 && summary.matched * 2 == self.cells.len()
    }

    /// Order-sensitive 64-bit digest of the cell contents.
    pub fn hash(&self) -> u64 {
        let mut hash = 0_u64;
        for (index, &value) in self.cells.iter().enumerate() {
            let mixed = splitmix64((value as u64).wrapping_mul(1_000_003).wrapping_add(index as u64));
            hash ^= mixed
                .wrapping_add(0x9e37_79b9_7f4a_7c15)
                .wrapping_add(hash << 6)
                .wrapping_add(hash >> 2);
        }
        hash
    }

    pub fn render(&self) -> String {
        let mut out = String::new();
        for y in 0..self.size {
            if y > 0 {
                out.push('\n');
            }
            for x in 0..self.size {
                if x > 0 {
                    out.push(' ');
                }
                out.push_str(&self.cells[y * self.size + x].to_string());
            }
        }
        out
    }
}
