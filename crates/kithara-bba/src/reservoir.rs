use crate::types::{BbaOptions, ReservoirFloor};

/// Recomputes the low-buffer safety margin before every decision.
///
/// The reservoir grows when the next window of segments at the lowest rate
/// is heavier than a constant-bitrate reference, and shrinks when lighter.
#[derive(Clone, Debug)]
pub struct ReservoirController {
    base_secs: f64,
    gain: f64,
    window_secs: f64,
    window_segments: usize,
    tail_guard: usize,
    reference_min_rate_bps: u64,
    floor: ReservoirFloor,
}

impl ReservoirController {
    pub fn new(opts: &BbaOptions) -> Self {
        Self {
            base_secs: opts.base_reservoir_secs,
            gain: opts.reservoir_gain,
            window_secs: opts.window_secs,
            window_segments: opts.window_segments(),
            tail_guard: opts.tail_guard_segments,
            reference_min_rate_bps: opts.reference_min_rate_bps.max(1),
            floor: opts.reservoir_floor,
        }
    }

    pub fn base_secs(&self) -> f64 {
        self.base_secs
    }

    pub fn window_segments(&self) -> usize {
        self.window_segments
    }

    /// Reservoir in seconds for the current decision.
    ///
    /// `min_rate_row` holds the sizes of every segment at the lowest
    /// representation. Falls back to the base reservoir when the buffer is
    /// already under it, when fewer than a full window of segments remains,
    /// or when the window's bit count does not fit in a `u64`.
    pub fn refresh(
        &self,
        buffer_level_secs: f64,
        min_rate_row: &[u64],
        current_segment: usize,
    ) -> f64 {
        let remaining = min_rate_row
            .len()
            .saturating_sub(current_segment)
            .saturating_sub(self.tail_guard);

        if buffer_level_secs < self.base_secs || remaining < self.window_segments {
            tracing::trace!(
                buffer_level_secs,
                remaining,
                window = self.window_segments,
                "reservoir: base"
            );
            return self.base_secs;
        }

        let window = &min_rate_row[current_segment..current_segment + self.window_segments];
        let window_bits = window
            .iter()
            .try_fold(0_u64, |acc, &size| acc.checked_add(size))
            .and_then(|bytes| bytes.checked_mul(8));
        let Some(window_bits) = window_bits else {
            tracing::warn!(
                current_segment,
                window = self.window_segments,
                "reservoir: window size overflows, using base"
            );
            return self.base_secs;
        };
        let reservoir = self.adjusted(window_bits);

        tracing::trace!(
            buffer_level_secs,
            current_segment,
            window_bits,
            reservoir,
            "reservoir: adjusted"
        );
        reservoir
    }

    #[expect(clippy::cast_precision_loss)] // sub-bit precision is irrelevant at window scale
    fn adjusted(&self, window_bits: u64) -> f64 {
        let actual_bits = window_bits as f64;
        let reference_rate = self.reference_min_rate_bps as f64;
        let reference_bits = self.window_secs * reference_rate;
        let offset = ((actual_bits - reference_bits) / reference_rate * self.gain).ceil();
        let reservoir = self.base_secs + offset;

        match self.floor {
            ReservoirFloor::Zero => reservoir.max(0.0),
            ReservoirFloor::Unclamped => reservoir,
        }
    }
}
