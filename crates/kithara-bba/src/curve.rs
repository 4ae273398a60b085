/// Piecewise-linear map from buffer level to target segment size.
///
/// Flat at `min_size` up to the reservoir, flat at `max_size` past
/// `reservoir + cushion`, linear in between.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RateMappingCurve {
    min_size: f64,
    max_size: f64,
    reservoir: f64,
    cushion: f64,
}

impl RateMappingCurve {
    #[expect(clippy::cast_precision_loss)] // segment sizes are far below 2^52 bytes
    pub fn new(min_size: u64, max_size: u64, reservoir: f64, cushion: f64) -> Self {
        Self {
            min_size: min_size as f64,
            max_size: max_size as f64,
            reservoir,
            cushion,
        }
    }

    /// Bytes gained per second of buffer inside the cushion.
    pub fn slope(&self) -> f64 {
        if self.cushion > 0.0 {
            (self.max_size - self.min_size) / self.cushion
        } else {
            0.0
        }
    }

    pub fn target_size(&self, buffer_level_secs: f64) -> f64 {
        if buffer_level_secs < self.reservoir {
            self.min_size
        } else if buffer_level_secs > self.reservoir + self.cushion {
            self.max_size
        } else {
            // Capped so a zero-width cushion cannot leave the size range.
            (self.min_size + self.slope() * (buffer_level_secs - self.reservoir)).min(self.max_size)
        }
    }
}
