use core::num::NonZeroUsize;

use crate::position::{DEFAULT_TAB_COLUMN_COUNT, LineBreakConvention, PositionTracker};

/// Default number of characters pulled from the source per refill.
pub const DEFAULT_BATCH_SIZE: NonZeroUsize = match NonZeroUsize::new(10_240) {
    Some(n) => n,
    None => unreachable!(),
};

/// Configuration options for a [`BufferedScanner`](crate::BufferedScanner).
///
/// # Examples
///
/// ```rust
/// use core::num::NonZeroUsize;
/// use textscan::{BufferedScanner, LineBreakConvention, ScannerOptions, StrSource};
///
/// let options = ScannerOptions {
///     tab_column_count: NonZeroUsize::new(8).unwrap(),
///     line_break_convention: LineBreakConvention::LineFeedOnly,
///     ..Default::default()
/// };
/// let scanner = BufferedScanner::with_options(StrSource::new("\tx"), options);
/// # let _ = scanner;
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ScannerOptions {
    /// The number of columns between tab stops.
    ///
    /// A tab advances the column to the next multiple of this value (plus
    /// one, since columns are one-based).
    ///
    /// # Default
    ///
    /// `4`
    pub tab_column_count: NonZeroUsize,

    /// Which characters count as line breaks, and whether a CRLF pair is
    /// one break or two.
    ///
    /// The same convention decides where line-scoped query entries stop.
    ///
    /// # Default
    ///
    /// [`LineBreakConvention::BothJoinCrlf`]
    pub line_break_convention: LineBreakConvention,

    /// How many characters to request from the source whenever the buffer
    /// runs dry.
    ///
    /// Larger batches mean fewer source calls; the buffer never shrinks
    /// below what live savepoints require, whatever the batch size.
    ///
    /// # Default
    ///
    /// `10240`
    pub batch_size: NonZeroUsize,
}

impl Default for ScannerOptions {
    fn default() -> Self {
        Self {
            tab_column_count: DEFAULT_TAB_COLUMN_COUNT,
            line_break_convention: LineBreakConvention::default(),
            batch_size: DEFAULT_BATCH_SIZE,
        }
    }
}

impl ScannerOptions {
    /// Builds a tracker at the start of the text using these options.
    pub fn tracker(&self) -> PositionTracker {
        PositionTracker::new(self.tab_column_count, self.line_break_convention)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_tracker_starts_at_the_origin() {
        let tracker = ScannerOptions::default().tracker();
        assert_eq!(tracker.position(), crate::Position::default());
        assert_eq!(tracker.tab_column_count().get(), 4);
        assert_eq!(tracker.convention(), LineBreakConvention::BothJoinCrlf);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let options: ScannerOptions =
            serde_json::from_str(r#"{"line_break_convention":"line-feed-only"}"#).unwrap();
        assert_eq!(options, ScannerOptions {
            line_break_convention: LineBreakConvention::LineFeedOnly,
            ..ScannerOptions::default()
        });
    }
}
