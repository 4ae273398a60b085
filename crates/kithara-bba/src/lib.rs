//! Buffer-based bitrate adaptation (BBA-1) for segmented streaming.
//!
//! The engine picks the next segment's bitrate from the playback buffer
//! level alone, using a table of expected segment sizes per representation:
//!
//! - below the **reservoir** it always requests the lowest bitrate;
//! - past **reservoir + cushion** it requests the highest;
//! - in between, a linear size curve plus a one-segment look-ahead decides
//!   whether to step down, step up, or hold.
//!
//! The reservoir itself is re-derived before each decision from the sizes
//! of the next window of segments at the lowest bitrate.
//!
//! ## Example
//!
//! ```rust
//! use kithara_bba::{
//!     AdaptationEngine, BbaOptions, BbaReason, RateCatalogue, Representation, SizeCatalogue,
//!     TrackKind,
//! };
//!
//! let sizes = SizeCatalogue::new(vec![
//!     vec![100_000, 105_000, 105_000],
//!     vec![200_000, 250_000, 250_000],
//!     vec![400_000, 350_000, 350_000],
//! ])?;
//! let rates = RateCatalogue::new(vec![
//!     Representation::new(500_000, "low"),
//!     Representation::new(1_000_000, "mid"),
//!     Representation::new(2_000_000, "high"),
//! ])?;
//!
//! let mut engine =
//!     AdaptationEngine::with_catalogues(TrackKind::Video, BbaOptions::default(), sizes, rates)?;
//!
//! // Buffer well past reservoir + cushion: top bitrate.
//! let decision = engine.decide(45.0, Some(0));
//! assert_eq!(decision.target_bitrate, Some(2_000_000));
//! assert_eq!(decision.reason, BbaReason::AboveCushion);
//! # Ok::<(), kithara_bba::BbaError>(())
//! ```

#![forbid(unsafe_code)]

mod curve;
mod engine;
mod error;
mod provider;
mod rates;
mod reservoir;
mod sizes;
mod types;

pub use curve::RateMappingCurve;
pub use engine::{AdaptationEngine, AdaptationState, EnginePhase};
pub use error::{BbaError, BbaResult};
pub use provider::{
    BufferLevelProvider, LastRequestProvider, QualitySelector, RateCatalogueProvider,
    SizeCatalogueProvider, StaticRateProvider, StaticSizeProvider, TextSizeProvider,
    segment_index_from_url,
};
pub use rates::RateCatalogue;
pub use reservoir::ReservoirController;
pub use sizes::SizeCatalogue;
pub use types::{BbaDecision, BbaOptions, BbaReason, Representation, ReservoirFloor, TrackKind};
