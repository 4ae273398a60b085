use crate::{
    curve::RateMappingCurve,
    error::BbaResult,
    provider::{
        BufferLevelProvider, LastRequestProvider, RateCatalogueProvider, SizeCatalogueProvider,
        check_alignment, load_catalogues,
    },
    rates::RateCatalogue,
    reservoir::ReservoirController,
    sizes::SizeCatalogue,
    types::{BbaDecision, BbaOptions, BbaReason, TrackKind},
};

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum EnginePhase {
    /// No decision made since construction or the last reset.
    Uninitialized,
    Ready,
}

/// Mutable per-track session state.
#[derive(Clone, Debug, PartialEq)]
pub struct AdaptationState {
    previous_rate: u64,
    decision_count: usize,
    current_segment: usize,
    reservoir_secs: f64,
}

impl AdaptationState {
    fn new(min_rate: u64, base_reservoir_secs: f64) -> Self {
        Self {
            previous_rate: min_rate,
            decision_count: 0,
            current_segment: 0,
            reservoir_secs: base_reservoir_secs,
        }
    }

    /// Last chosen bitrate; always a member of the rate catalogue.
    pub fn previous_rate(&self) -> u64 {
        self.previous_rate
    }

    /// Decisions made since entering `Ready`.
    pub fn decision_count(&self) -> usize {
        self.decision_count
    }

    /// Segment index of the last completed download (0 until one is seen).
    pub fn current_segment(&self) -> usize {
        self.current_segment
    }

    pub fn reservoir_secs(&self) -> f64 {
        self.reservoir_secs
    }
}

#[derive(Clone, Debug)]
struct Catalogues {
    sizes: SizeCatalogue,
    rates: RateCatalogue,
}

/// Buffer-based bitrate adaptation for one media track.
///
/// Each engine exclusively owns its track's state. Hosts must not issue
/// decisions for the same track concurrently; nothing here locks, and
/// `decide` takes `&mut self` so the borrow checker enforces a single writer.
/// Audio and video tracks need separate engines.
#[derive(Clone, Debug)]
pub struct AdaptationEngine {
    track: TrackKind,
    opts: BbaOptions,
    reservoir: ReservoirController,
    catalogues: Option<Catalogues>,
    state: Option<AdaptationState>,
}

impl AdaptationEngine {
    /// Engine without catalogues; every decision is "unchanged" until
    /// [`load`](Self::load) succeeds.
    pub fn new(track: TrackKind, opts: BbaOptions) -> Self {
        let reservoir = ReservoirController::new(&opts);
        Self {
            track,
            opts,
            reservoir,
            catalogues: None,
            state: None,
        }
    }

    /// Engine over catalogues the host already holds.
    pub fn with_catalogues(
        track: TrackKind,
        opts: BbaOptions,
        sizes: SizeCatalogue,
        rates: RateCatalogue,
    ) -> BbaResult<Self> {
        check_alignment(&sizes, &rates)?;
        let mut engine = Self::new(track, opts);
        engine.catalogues = Some(Catalogues { sizes, rates });
        Ok(engine)
    }

    /// Load phase: fetch both catalogues before decisions are made.
    ///
    /// On failure the engine keeps whatever it had (nothing, on first load)
    /// and decisions keep degrading to "unchanged".
    pub async fn load<S, R>(&mut self, sizes: &S, rates: &R) -> BbaResult<()>
    where
        S: SizeCatalogueProvider + ?Sized,
        R: RateCatalogueProvider + ?Sized,
    {
        match load_catalogues(self.track, sizes, rates).await {
            Ok((sizes, rates)) => {
                tracing::debug!(
                    track = ?self.track,
                    representations = rates.len(),
                    segments = sizes.segment_count(),
                    min_size = sizes.min_size(),
                    max_size = sizes.max_size(),
                    "BBA catalogues loaded"
                );
                self.catalogues = Some(Catalogues { sizes, rates });
                Ok(())
            }
            Err(e) => {
                tracing::warn!(track = ?self.track, error = %e, "BBA catalogues unavailable");
                Err(e)
            }
        }
    }

    pub fn track(&self) -> TrackKind {
        self.track
    }

    pub fn options(&self) -> &BbaOptions {
        &self.opts
    }

    pub fn is_loaded(&self) -> bool {
        self.catalogues.is_some()
    }

    pub fn phase(&self) -> EnginePhase {
        if self.state.is_some() {
            EnginePhase::Ready
        } else {
            EnginePhase::Uninitialized
        }
    }

    pub fn state(&self) -> Option<&AdaptationState> {
        self.state.as_ref()
    }

    pub fn sizes(&self) -> Option<&SizeCatalogue> {
        self.catalogues.as_ref().map(|c| &c.sizes)
    }

    pub fn rates(&self) -> Option<&RateCatalogue> {
        self.catalogues.as_ref().map(|c| &c.rates)
    }

    /// Drop session state; catalogues stay loaded.
    pub fn reset(&mut self) {
        if self.state.take().is_some() {
            tracing::info!(track = ?self.track, "BBA state reset");
        }
    }

    /// Reads the buffer level and last completed segment from the host and decides.
    pub fn poll<B, L>(&mut self, buffer: &B, last_request: &L) -> BbaDecision
    where
        B: BufferLevelProvider + ?Sized,
        L: LastRequestProvider + ?Sized,
    {
        if self.track.is_audio() {
            return BbaDecision::unchanged(BbaReason::AudioBypass);
        }
        let buffer_level_secs = buffer.current_level(self.track);
        let last_segment = last_request.last_completed_segment_index(self.track);
        self.decide(buffer_level_secs, last_segment)
    }

    /// Chooses the bitrate for the next segment.
    pub fn decide(&mut self, buffer_level_secs: f64, last_segment: Option<usize>) -> BbaDecision {
        if self.track.is_audio() {
            return BbaDecision::unchanged(BbaReason::AudioBypass);
        }
        let Some(catalogues) = &self.catalogues else {
            tracing::debug!(track = ?self.track, "BBA decide: catalogues not loaded");
            return BbaDecision::unchanged(BbaReason::NotLoaded);
        };

        let base_reservoir = self.reservoir.base_secs();
        let state = self.state.get_or_insert_with(|| {
            tracing::info!(
                track = ?self.track,
                min_rate = catalogues.rates.min(),
                "BBA engine ready"
            );
            AdaptationState::new(catalogues.rates.min(), base_reservoir)
        });

        if let Some(idx) = last_segment {
            state.current_segment = idx;
        }

        let min_rate_row = catalogues.sizes.row(0).unwrap_or_default();
        state.reservoir_secs =
            self.reservoir
                .refresh(buffer_level_secs, min_rate_row, state.current_segment);

        let (rate, reason) = choose(catalogues, &self.opts, state, buffer_level_secs);
        let previous = state.previous_rate;

        tracing::debug!(
            track = ?self.track,
            buffer_level_secs,
            reservoir_secs = state.reservoir_secs,
            decision = state.decision_count,
            segment = state.current_segment,
            previous,
            rate,
            ?reason,
            "BBA decide"
        );

        state.previous_rate = rate;
        state.decision_count += 1;

        BbaDecision {
            target_bitrate: Some(rate),
            reason,
            changed: rate != previous,
        }
    }
}

fn choose(
    catalogues: &Catalogues,
    opts: &BbaOptions,
    state: &AdaptationState,
    buffer_level_secs: f64,
) -> (u64, BbaReason) {
    let Catalogues { sizes, rates } = catalogues;
    let reservoir = state.reservoir_secs;
    let cushion = opts.cushion_secs;

    if buffer_level_secs <= reservoir {
        return (rates.min(), BbaReason::BelowReservoir);
    }
    if buffer_level_secs >= reservoir + cushion {
        return (rates.max(), BbaReason::AboveCushion);
    }

    let previous = state.previous_rate;
    let rank = |rate: u64| {
        rates
            .rank_of(rate)
            .expect("neighbours of the previous rate come from the rate catalogue")
    };
    let next_segment = state.decision_count + 1;
    let upper = sizes.size_at(rank(rates.next_higher(previous)), next_segment);
    let lower = sizes.size_at(rank(rates.next_lower(previous)), next_segment);
    let (Ok(upper), Ok(lower)) = (upper, lower) else {
        return (previous, BbaReason::LookAheadExhausted);
    };

    let curve = RateMappingCurve::new(sizes.min_size(), sizes.max_size(), reservoir, cushion);
    let target = curve.target_size(buffer_level_secs);
    let nearest = || {
        rates
            .bitrate_at(sizes.nearest_rank_for_size(target))
            .expect("size rows align with the rate catalogue")
    };

    #[expect(clippy::cast_precision_loss)] // segment sizes are far below 2^52 bytes
    let (upper, lower) = (upper as f64, lower as f64);
    if target >= upper {
        (rates.next_lower(nearest()), BbaReason::StepDown)
    } else if target <= lower {
        (rates.next_higher(nearest()), BbaReason::StepUp)
    } else {
        (previous, BbaReason::Hold)
    }
}
