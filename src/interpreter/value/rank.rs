use std::fmt;

/// Distinguishes per-process variants of the same logical variable.
///
/// Benchmarks running on many parallel processes record one value per rank,
/// or a summary over all of them. Non-negative integers are process ranks;
/// the summaries use fixed negative sentinels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub enum Rank {
    /// The value recorded by a single process.
    Process(i64),
    /// The value covers all ranks.
    AllRanks,
    /// The value may come from any rank.
    AnyRank,
    /// The average over all ranks.
    Average,
    /// The maximum over all ranks.
    Maximum,
    /// The minimum over all ranks.
    Minimum,
    /// No rank information, e.g. for constants.
    #[default]
    Unknown,
}

impl Rank {
    /// Returns the integer stored for this rank.
    ///
    /// ## Example
    /// ```
    /// use derived_metrics::interpreter::value::Rank;
    ///
    /// assert_eq!(Rank::Process(3).as_integer(), 3);
    /// assert_eq!(Rank::AllRanks.as_integer(), -1);
    /// ```
    #[must_use]
    pub const fn as_integer(self) -> i64 {
        match self {
            Self::Process(rank) => rank,
            Self::AllRanks => -1,
            Self::AnyRank => -2,
            Self::Average => -3,
            Self::Maximum => -4,
            Self::Minimum => -5,
            Self::Unknown => -6,
        }
    }

    /// Returns the rank stored as `value`.
    ///
    /// Negative integers other than the known sentinels map to
    /// [`Rank::Unknown`].
    #[must_use]
    pub const fn from_integer(value: i64) -> Self {
        match value {
            -1 => Self::AllRanks,
            -2 => Self::AnyRank,
            -3 => Self::Average,
            -4 => Self::Maximum,
            -5 => Self::Minimum,
            rank if rank >= 0 => Self::Process(rank),
            _ => Self::Unknown,
        }
    }
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Process(rank) => write!(f, "{rank}"),
            Self::AllRanks => f.write_str("All Ranks"),
            Self::AnyRank => f.write_str("Any Rank"),
            Self::Average => f.write_str("Rank Average"),
            Self::Maximum => f.write_str("Rank Maximum"),
            Self::Minimum => f.write_str("Rank Minimum"),
            Self::Unknown => f.write_str("Unknown"),
        }
    }
}

/// How the uncertainty attached to a value was measured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Standard error as reported by SKaMPI.
    SkampiStandard,
    /// Standard error as reported by PMTM.
    PmtmStandard,
    /// The value carries no error estimate.
    None,
}
