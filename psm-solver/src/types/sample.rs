use super::round_half_up;

/// Which side of a price a respondent's answer must fall on to be counted.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "snake_case")
)]
pub enum Direction {
    /// Count answers at or below the price (cumulative from below).
    ///
    /// A respondent who called 100 "expensive" also finds 150 expensive.
    Expensive,
    /// Count answers at or above the price (cumulative from above).
    ///
    /// A respondent who called 100 "cheap" also finds 50 cheap.
    Cheap,
}

/// The answers of all respondents to a single survey question.
///
/// The set is never empty, so percentages over it are always defined.
/// Only the multiset of values matters; order is preserved but irrelevant.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "Vec<u64>", into = "Vec<u64>")
)]
pub struct SampleSet(Vec<u64>);

impl SampleSet {
    /// Creates a sample set, rejecting an empty collection of answers
    pub fn new(values: Vec<u64>) -> Result<Self, SampleSetError> {
        Self::try_from(values)
    }

    /// The raw answers
    pub fn values(&self) -> &[u64] {
        &self.0
    }

    /// The number of answers
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always false; provided for API symmetry with `len`
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The smallest answer
    pub fn min(&self) -> u64 {
        // non-empty by construction
        self.0.iter().copied().min().unwrap_or_default()
    }

    /// The largest answer
    pub fn max(&self) -> u64 {
        self.0.iter().copied().max().unwrap_or_default()
    }

    /// The percentage of respondents whose answer counts at `price` in the given direction.
    ///
    /// The result lies in `[0, 100]` and is rounded half-up to one decimal place.
    /// It is non-decreasing in `price` for [`Direction::Expensive`] and
    /// non-increasing for [`Direction::Cheap`].
    pub fn percentage(&self, price: u64, direction: Direction) -> f64 {
        let count = match direction {
            Direction::Expensive => self.0.iter().filter(|&&value| value <= price).count(),
            Direction::Cheap => self.0.iter().filter(|&&value| value >= price).count(),
        };

        let percentage = (count as f64 / self.0.len() as f64) * 100.0;
        round_half_up(percentage * 10.0) / 10.0
    }
}

impl TryFrom<Vec<u64>> for SampleSet {
    type Error = SampleSetError;

    fn try_from(value: Vec<u64>) -> Result<Self, Self::Error> {
        if value.is_empty() {
            Err(SampleSetError::Empty)
        } else {
            Ok(Self(value))
        }
    }
}

impl From<SampleSet> for Vec<u64> {
    fn from(value: SampleSet) -> Self {
        value.0
    }
}

/// Errors that can occur when constructing a sample set
#[derive(Debug, PartialEq, thiserror::Error)]
pub enum SampleSetError {
    /// Error when no answers are provided
    #[error("No answers provided")]
    Empty,
}
