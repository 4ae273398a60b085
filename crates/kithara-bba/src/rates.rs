use crate::{
    error::{BbaError, BbaResult},
    types::Representation,
};

/// Available representations sorted ascending by bitrate.
///
/// Sorted once on construction; ranks are stable for the catalogue's lifetime
/// and line up with the rows of the matching `SizeCatalogue`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RateCatalogue {
    entries: Vec<Representation>,
}

impl RateCatalogue {
    /// Builds the catalogue. Representations sharing a bitrate collapse into
    /// the first one supplied.
    pub fn new(mut representations: Vec<Representation>) -> BbaResult<Self> {
        if representations.is_empty() {
            return Err(BbaError::unavailable("no representations available"));
        }
        representations.sort_by_key(|r| r.bitrate_bps);
        representations.dedup_by_key(|r| r.bitrate_bps);
        Ok(Self {
            entries: representations,
        })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn representations(&self) -> &[Representation] {
        &self.entries
    }

    pub fn min(&self) -> u64 {
        self.entries[0].bitrate_bps
    }

    pub fn max(&self) -> u64 {
        self.entries[self.entries.len() - 1].bitrate_bps
    }

    pub fn bitrate_at(&self, rank: usize) -> Option<u64> {
        self.entries.get(rank).map(|r| r.bitrate_bps)
    }

    pub fn rank_of(&self, bitrate: u64) -> BbaResult<usize> {
        self.entries
            .binary_search_by_key(&bitrate, |r| r.bitrate_bps)
            .map_err(|_| BbaError::NotFound { bitrate })
    }

    /// Smallest bitrate strictly above `bitrate`, clamped to `max()`.
    pub fn next_higher(&self, bitrate: u64) -> u64 {
        self.entries
            .iter()
            .map(|r| r.bitrate_bps)
            .find(|&b| b > bitrate)
            .unwrap_or_else(|| self.max())
    }

    /// Largest bitrate strictly below `bitrate`, clamped to `min()`.
    pub fn next_lower(&self, bitrate: u64) -> u64 {
        self.entries
            .iter()
            .rev()
            .map(|r| r.bitrate_bps)
            .find(|&b| b < bitrate)
            .unwrap_or_else(|| self.min())
    }

    /// Representation to request for `bitrate`: the exact match, else the
    /// highest one below it, else the lowest.
    pub fn representation_for(&self, bitrate: u64) -> &Representation {
        let idx = self.entries.partition_point(|r| r.bitrate_bps <= bitrate);
        &self.entries[idx.saturating_sub(1)]
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    fn catalogue() -> RateCatalogue {
        RateCatalogue::new(vec![
            Representation::new(2_000_000, "hi"),
            Representation::new(500_000, "lo"),
            Representation::new(1_000_000, "mid"),
        ])
        .unwrap()
    }

    #[test]
    fn sorted_ascending_on_construction() {
        let c = catalogue();
        let bitrates: Vec<u64> = c.representations().iter().map(|r| r.bitrate_bps).collect();
        assert_eq!(bitrates, vec![500_000, 1_000_000, 2_000_000]);
        assert_eq!(c.min(), 500_000);
        assert_eq!(c.max(), 2_000_000);
    }

    #[test]
    fn duplicate_bitrates_collapse() {
        let c = RateCatalogue::new(vec![
            Representation::new(500_000, "a"),
            Representation::new(500_000, "b"),
        ])
        .unwrap();
        assert_eq!(c.len(), 1);
        assert_eq!(c.representations()[0].id, "a");
    }

    #[test]
    fn empty_catalogue_is_unavailable() {
        assert!(RateCatalogue::new(vec![]).unwrap_err().is_data_unavailable());
    }

    #[rstest]
    #[case::from_min(500_000, 1_000_000, 500_000)]
    #[case::from_mid(1_000_000, 2_000_000, 500_000)]
    #[case::from_max(2_000_000, 2_000_000, 1_000_000)]
    #[case::between_entries(700_000, 1_000_000, 500_000)]
    fn neighbours(#[case] rate: u64, #[case] higher: u64, #[case] lower: u64) {
        let c = catalogue();
        assert_eq!(c.next_higher(rate), higher);
        assert_eq!(c.next_lower(rate), lower);
    }

    #[rstest]
    #[case::present(1_000_000, Ok(1))]
    #[case::absent(1_500_000, Err(BbaError::NotFound { bitrate: 1_500_000 }))]
    fn rank_lookup(#[case] rate: u64, #[case] expected: BbaResult<usize>) {
        assert_eq!(catalogue().rank_of(rate), expected);
    }

    #[rstest]
    #[case::exact(1_000_000, "mid")]
    #[case::between(1_500_000, "mid")]
    #[case::above_max(9_000_000, "hi")]
    #[case::below_min(100_000, "lo")]
    fn representation_for_bitrate(#[case] rate: u64, #[case] id: &str) {
        assert_eq!(catalogue().representation_for(rate).id, id);
    }
}
