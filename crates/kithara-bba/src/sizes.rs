use std::str::FromStr;

use crate::error::{BbaError, BbaResult};

/// Expected segment sizes in bytes, one row per representation.
///
/// Row `r` belongs to the representation with the `r`-th lowest bitrate and
/// column `s` to segment `s` in playback order. Immutable once built.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SizeCatalogue {
    rows: Vec<Vec<u64>>,
    segments: usize,
    min_size: u64,
    max_size: u64,
}

impl SizeCatalogue {
    /// Builds a catalogue from per-representation rows.
    ///
    /// Fails with `DataUnavailable` when there are no rows or no segments,
    /// and with `RaggedRows` when rows differ in length.
    pub fn new(rows: Vec<Vec<u64>>) -> BbaResult<Self> {
        let Some(first) = rows.first() else {
            return Err(BbaError::unavailable("size catalogue has no rows"));
        };
        let segments = first.len();
        if segments == 0 {
            return Err(BbaError::unavailable("size catalogue has no segments"));
        }
        if let Some((row, bad)) = rows.iter().enumerate().find(|(_, r)| r.len() != segments) {
            return Err(BbaError::RaggedRows {
                row,
                expected: segments,
                actual: bad.len(),
            });
        }

        let (mut min_size, mut max_size) = (u64::MAX, u64::MIN);
        for &size in rows.iter().flatten() {
            min_size = min_size.min(size);
            max_size = max_size.max(size);
        }

        Ok(Self {
            rows,
            segments,
            min_size,
            max_size,
        })
    }

    pub fn representation_count(&self) -> usize {
        self.rows.len()
    }

    pub fn segment_count(&self) -> usize {
        self.segments
    }

    /// Smallest size across the whole table.
    pub fn min_size(&self) -> u64 {
        self.min_size
    }

    /// Largest size across the whole table.
    pub fn max_size(&self) -> u64 {
        self.max_size
    }

    /// Sizes of every segment at the given representation rank.
    pub fn row(&self, rank: usize) -> Option<&[u64]> {
        self.rows.get(rank).map(Vec::as_slice)
    }

    pub fn size_at(&self, rank: usize, segment: usize) -> BbaResult<u64> {
        self.rows
            .get(rank)
            .and_then(|row| row.get(segment))
            .copied()
            .ok_or(BbaError::OutOfRange {
                rank,
                segment,
                representations: self.rows.len(),
                segments: self.segments,
            })
    }

    /// Rank of the row holding the cell closest to `target`.
    ///
    /// Cells are visited rank by rank, segment by segment, and only a
    /// strictly smaller distance replaces the current best, so the lowest
    /// rank wins a tie.
    pub fn nearest_rank_for_size(&self, target: f64) -> usize {
        let mut best_rank = 0;
        let mut best_diff = f64::INFINITY;
        for (rank, row) in self.rows.iter().enumerate() {
            for &size in row {
                #[expect(clippy::cast_precision_loss)] // segment sizes are far below 2^52 bytes
                let diff = (size as f64 - target).abs();
                if diff < best_diff {
                    best_diff = diff;
                    best_rank = rank;
                }
            }
        }
        best_rank
    }
}

/// Parses the plain-text size table: one integer per line, representations
/// separated by any line that is not an integer (headers, blank lines).
/// A run of digits too large for `u64` is an error, not a separator.
impl FromStr for SizeCatalogue {
    type Err = BbaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut rows = Vec::new();
        let mut current: Vec<u64> = Vec::new();

        for (idx, line) in s.lines().enumerate() {
            let line = line.trim();
            match line.parse::<u64>() {
                Ok(size) => current.push(size),
                Err(_) if line.bytes().all(|b| b.is_ascii_digit()) && !line.is_empty() => {
                    return Err(BbaError::Parse {
                        line: idx + 1,
                        content: line.to_string(),
                    });
                }
                Err(_) => {
                    if !current.is_empty() {
                        rows.push(std::mem::take(&mut current));
                    }
                }
            }
        }
        if !current.is_empty() {
            rows.push(current);
        }

        Self::new(rows)
    }
}
