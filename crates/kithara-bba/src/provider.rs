//! Collaborator interfaces the engine reads from.
//!
//! Catalogue providers are consulted once, during the load phase. Buffer and
//! last-request providers are read on every [`AdaptationEngine::poll`].
//!
//! [`AdaptationEngine::poll`]: crate::AdaptationEngine::poll

use async_trait::async_trait;
use url::Url;

use crate::{
    error::{BbaError, BbaResult},
    rates::RateCatalogue,
    sizes::SizeCatalogue,
    types::{Representation, TrackKind},
};

/// Supplies the per-representation, per-segment size table.
///
/// Typically backed by a network fetch; the engine awaits it once before
/// the first decision.
#[async_trait]
pub trait SizeCatalogueProvider: Send + Sync {
    async fn load(&self) -> BbaResult<SizeCatalogue>;
}

/// Supplies the representations available for a track.
#[cfg_attr(test, unimock::unimock(api = RateCatalogueProviderMock))]
pub trait RateCatalogueProvider {
    fn representations_for(&self, track: TrackKind) -> Vec<Representation>;
}

/// Current playback buffer level, in seconds.
#[cfg_attr(test, unimock::unimock(api = BufferLevelProviderMock))]
pub trait BufferLevelProvider {
    fn current_level(&self, track: TrackKind) -> f64;
}

/// Segment index of the most recently completed download, if any.
#[cfg_attr(test, unimock::unimock(api = LastRequestProviderMock))]
pub trait LastRequestProvider {
    fn last_completed_segment_index(&self, track: TrackKind) -> Option<usize>;
}

/// Maps a chosen bitrate back to the representation the host should request.
pub trait QualitySelector {
    fn identifier_for(&self, track: TrackKind, bitrate_bps: u64) -> Option<&str>;
}

impl QualitySelector for RateCatalogue {
    fn identifier_for(&self, _track: TrackKind, bitrate_bps: u64) -> Option<&str> {
        Some(self.representation_for(bitrate_bps).id.as_str())
    }
}

/// Size table already held in memory.
#[derive(Clone, Debug, Default)]
pub struct StaticSizeProvider {
    rows: Vec<Vec<u64>>,
}

impl StaticSizeProvider {
    pub fn new(rows: Vec<Vec<u64>>) -> Self {
        Self { rows }
    }
}

#[async_trait]
impl SizeCatalogueProvider for StaticSizeProvider {
    async fn load(&self) -> BbaResult<SizeCatalogue> {
        SizeCatalogue::new(self.rows.clone())
    }
}

/// Size table in its plain-text form (see [`SizeCatalogue`]'s `FromStr`).
#[derive(Clone, Debug, Default)]
pub struct TextSizeProvider {
    text: String,
}

impl TextSizeProvider {
    pub fn new<S: Into<String>>(text: S) -> Self {
        Self { text: text.into() }
    }
}

#[async_trait]
impl SizeCatalogueProvider for TextSizeProvider {
    async fn load(&self) -> BbaResult<SizeCatalogue> {
        self.text.parse()
    }
}

/// The same representation list for every track.
#[derive(Clone, Debug, Default)]
pub struct StaticRateProvider {
    representations: Vec<Representation>,
}

impl StaticRateProvider {
    pub fn new(representations: Vec<Representation>) -> Self {
        Self { representations }
    }

    /// Representations named by their bitrate.
    pub fn from_bitrates(bitrates: &[u64]) -> Self {
        Self::new(
            bitrates
                .iter()
                .map(|&bps| Representation::new(bps, bps.to_string()))
                .collect(),
        )
    }
}

impl RateCatalogueProvider for StaticRateProvider {
    fn representations_for(&self, _track: TrackKind) -> Vec<Representation> {
        self.representations.clone()
    }
}

/// Segment index encoded in a segment URL's file stem (`.../42.m4s` -> 42).
///
/// Returns `None` when the last path segment has no numeric stem.
pub fn segment_index_from_url(url: &Url) -> Option<usize> {
    let file = url.path_segments()?.next_back()?;
    let stem = file.rsplit_once('.').map_or(file, |(stem, _)| stem);
    stem.parse().ok()
}

/// Builds both catalogues from their providers.
pub(crate) async fn load_catalogues<S, R>(
    track: TrackKind,
    sizes: &S,
    rates: &R,
) -> BbaResult<(SizeCatalogue, RateCatalogue)>
where
    S: SizeCatalogueProvider + ?Sized,
    R: RateCatalogueProvider + ?Sized,
{
    let sizes = sizes.load().await?;
    let rates = RateCatalogue::new(rates.representations_for(track))?;
    check_alignment(&sizes, &rates)?;
    Ok((sizes, rates))
}

pub(crate) fn check_alignment(sizes: &SizeCatalogue, rates: &RateCatalogue) -> BbaResult<()> {
    if sizes.representation_count() == rates.len() {
        Ok(())
    } else {
        Err(BbaError::CatalogueMismatch {
            size_rows: sizes.representation_count(),
            representations: rates.len(),
        })
    }
}
