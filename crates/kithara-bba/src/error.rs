use thiserror::Error;

/// Errors produced while building catalogues or looking up their entries.
///
/// Only catalogue loading surfaces these to the host. Inside a decision,
/// `OutOfRange` degrades to holding the previous rate.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BbaError {
    #[error("catalogue data unavailable: {0}")]
    DataUnavailable(String),
    #[error(
        "size lookup out of range: rank {rank}, segment {segment} \
         (catalogue has {representations} representations x {segments} segments)"
    )]
    OutOfRange {
        rank: usize,
        segment: usize,
        representations: usize,
        segments: usize,
    },
    #[error("bitrate {bitrate} is not in the rate catalogue")]
    NotFound { bitrate: u64 },
    #[error("size row {row} has {actual} segments, expected {expected}")]
    RaggedRows {
        row: usize,
        expected: usize,
        actual: usize,
    },
    #[error("size catalogue has {size_rows} rows but {representations} representations are available")]
    CatalogueMismatch {
        size_rows: usize,
        representations: usize,
    },
    #[error("unparsable size entry at line {line}: {content:?}")]
    Parse { line: usize, content: String },
}

impl BbaError {
    /// Creates a `DataUnavailable` error from any message.
    pub fn unavailable<S: Into<String>>(msg: S) -> Self {
        Self::DataUnavailable(msg.into())
    }

    /// Checks if the error means "nothing to adapt with yet".
    pub fn is_data_unavailable(&self) -> bool {
        matches!(self, Self::DataUnavailable(_))
    }

    /// Checks if the error comes from a lookup past the catalogue extent.
    pub fn is_out_of_range(&self) -> bool {
        matches!(self, Self::OutOfRange { .. })
    }
}

pub type BbaResult<T> = Result<T, BbaError>;

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case::unavailable(BbaError::unavailable("empty"), true, false)]
    #[case::out_of_range(
        BbaError::OutOfRange { rank: 4, segment: 0, representations: 3, segments: 10 },
        false,
        true
    )]
    #[case::not_found(BbaError::NotFound { bitrate: 42 }, false, false)]
    fn classifies_errors(
        #[case] error: BbaError,
        #[case] unavailable: bool,
        #[case] out_of_range: bool,
    ) {
        assert_eq!(error.is_data_unavailable(), unavailable);
        assert_eq!(error.is_out_of_range(), out_of_range);
    }

    #[test]
    fn out_of_range_message_names_extent() {
        let error = BbaError::OutOfRange {
            rank: 1,
            segment: 12,
            representations: 3,
            segments: 10,
        };
        assert_eq!(
            error.to_string(),
            "size lookup out of range: rank 1, segment 12 \
             (catalogue has 3 representations x 10 segments)"
        );
    }
}
