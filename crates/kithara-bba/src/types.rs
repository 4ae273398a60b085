/// Kind of media track an engine adapts.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TrackKind {
    Video,
    /// Audio keeps whatever selection the host already made.
    Audio,
}

impl TrackKind {
    pub fn is_audio(self) -> bool {
        matches!(self, Self::Audio)
    }
}

/// One encoded quality variant of the media.
///
/// `id` is opaque to the engine; the host uses it to select a concrete
/// quality once a bitrate has been chosen.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Representation {
    pub bitrate_bps: u64,
    pub id: String,
}

impl Representation {
    pub fn new<S: Into<String>>(bitrate_bps: u64, id: S) -> Self {
        Self {
            bitrate_bps,
            id: id.into(),
        }
    }
}

/// Lower bound applied to the recomputed reservoir.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ReservoirFloor {
    /// Never let the reservoir drop below zero seconds.
    #[default]
    Zero,
    /// Keep whatever the adjustment produces, negative values included.
    Unclamped,
}

/// BBA configuration.
#[derive(Clone, Debug, PartialEq)]
pub struct BbaOptions {
    /// Reservoir used when there is no reason to adjust it (seconds).
    pub base_reservoir_secs: f64,
    /// Buffer range above the reservoir over which the target size scales (seconds).
    pub cushion_secs: f64,
    /// Seconds of upcoming media inspected when adjusting the reservoir.
    pub window_secs: f64,
    /// Nominal segment duration (seconds).
    pub segment_duration_secs: f64,
    /// Bitrate the reservoir window is compared against (bits per second).
    pub reference_min_rate_bps: u64,
    /// Fraction of the window surplus that is added to the reservoir.
    pub reservoir_gain: f64,
    /// Extra segments that must remain past the window before the reservoir is adjusted.
    pub tail_guard_segments: usize,
    /// Lower bound for the recomputed reservoir.
    pub reservoir_floor: ReservoirFloor,
}

impl Default for BbaOptions {
    fn default() -> Self {
        Self {
            base_reservoir_secs: 10.0,
            cushion_secs: 30.0,
            window_secs: 120.0,
            segment_duration_secs: 4.0,
            reference_min_rate_bps: 700_000,
            reservoir_gain: 0.3,
            tail_guard_segments: 0,
            reservoir_floor: ReservoirFloor::Zero,
        }
    }
}

impl BbaOptions {
    /// Number of segments in the reservoir look-ahead window.
    #[expect(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        reason = "window length is a small positive segment count"
    )]
    pub fn window_segments(&self) -> usize {
        (self.window_secs / self.segment_duration()).ceil().max(1.0) as usize
    }

    /// Segment duration, falling back to the default for non-positive values.
    pub fn segment_duration(&self) -> f64 {
        if self.segment_duration_secs > 0.0 {
            self.segment_duration_secs
        } else {
            Self::default().segment_duration_secs
        }
    }

    #[must_use]
    pub fn with_base_reservoir(mut self, secs: f64) -> Self {
        self.base_reservoir_secs = secs;
        self
    }

    #[must_use]
    pub fn with_cushion(mut self, secs: f64) -> Self {
        self.cushion_secs = secs;
        self
    }

    #[must_use]
    pub fn with_window(mut self, secs: f64) -> Self {
        self.window_secs = secs;
        self
    }

    #[must_use]
    pub fn with_segment_duration(mut self, secs: f64) -> Self {
        self.segment_duration_secs = secs;
        self
    }

    #[must_use]
    pub fn with_reference_min_rate(mut self, bps: u64) -> Self {
        self.reference_min_rate_bps = bps;
        self
    }

    #[must_use]
    pub fn with_tail_guard(mut self, segments: usize) -> Self {
        self.tail_guard_segments = segments;
        self
    }

    #[must_use]
    pub fn with_reservoir_floor(mut self, floor: ReservoirFloor) -> Self {
        self.reservoir_floor = floor;
        self
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum BbaReason {
    /// Audio tracks are never adapted.
    AudioBypass,
    /// Catalogues were never loaded (or failed to load).
    NotLoaded,
    BelowReservoir,
    AboveCushion,
    /// Target size reaches the next higher rate's upcoming segment.
    StepDown,
    /// Target size falls under the next lower rate's upcoming segment.
    StepUp,
    /// No upcoming segment to look ahead at.
    LookAheadExhausted,
    Hold,
}

/// Outcome of one segment decision.
///
/// `target_bitrate` is `None` when the host should keep its current
/// selection untouched.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct BbaDecision {
    pub target_bitrate: Option<u64>,
    pub reason: BbaReason,
    pub changed: bool,
}

impl BbaDecision {
    pub(crate) fn unchanged(reason: BbaReason) -> Self {
        Self {
            target_bitrate: None,
            reason,
            changed: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case::default_duration(120.0, 4.0, 30)]
    #[case::rounds_up(120.0, 7.0, 18)]
    #[case::short_window(2.0, 4.0, 1)]
    #[case::non_positive_duration(120.0, 0.0, 30)]
    fn window_segments_from_duration(
        #[case] window_secs: f64,
        #[case] segment_duration_secs: f64,
        #[case] expected: usize,
    ) {
        let opts = BbaOptions::default()
            .with_window(window_secs)
            .with_segment_duration(segment_duration_secs);
        assert_eq!(opts.window_segments(), expected);
    }

    #[test]
    fn defaults_match_bba1_constants() {
        let opts = BbaOptions::default();
        assert_eq!(opts.base_reservoir_secs, 10.0);
        assert_eq!(opts.cushion_secs, 30.0);
        assert_eq!(opts.reference_min_rate_bps, 700_000);
        assert_eq!(opts.reservoir_floor, ReservoirFloor::Zero);
    }
}
