use super::{Direction, IntersectionError, Point, SampleSet, Segment, round_half_up};
use tracing::{debug, trace};

/// The default spacing between neighbouring grid prices
pub const DEFAULT_STEP: u64 = 50;

/// A uniform discretization of the price axis.
///
/// The grid consists of the prices `min, min + step, ..., max`, so it always has
/// at least two points and both ends lie on the grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "PriceGridDto", into = "PriceGridDto")
)]
pub struct PriceGrid {
    min: u64,
    max: u64,
    step: u64,
}

impl PriceGrid {
    /// Creates a grid over `[min, max]`, validating its shape
    pub fn new(min: u64, max: u64, step: u64) -> Result<Self, GridError> {
        Self::try_from(PriceGridDto { min, max, step })
    }

    /// Creates the smallest grid that covers every value, following the bounds rule of the analysis.
    ///
    /// The lower bound is the largest multiple of `step` not exceeding the smallest value.
    /// The upper bound always lies strictly above the largest value `m`: it is
    /// `(m / step + 1) * step` when `m` is itself a multiple of `step` and
    /// `(m / step + 2) * step` otherwise, so the second branch skips one boundary
    /// that would already exceed `m`.
    pub fn covering(values: impl IntoIterator<Item = u64>, step: u64) -> Result<Self, GridError> {
        if step == 0 {
            return Err(GridError::ZeroStep);
        }

        let (lo, hi) = values
            .into_iter()
            .fold(None, |acc: Option<(u64, u64)>, value| match acc {
                None => Some((value, value)),
                Some((lo, hi)) => Some((lo.min(value), hi.max(value))),
            })
            .ok_or(GridError::Empty)?;

        let min = (lo / step) * step;
        let extra = if hi % step == 0 { 1 } else { 2 };
        let max = (hi / step)
            .checked_add(extra)
            .and_then(|n| n.checked_mul(step))
            .ok_or(GridError::Overflow)?;

        debug!(lo, hi, min, max, step, "price grid bounds");
        Self::new(min, max, step)
    }

    /// The lowest grid price
    pub fn min(&self) -> u64 {
        self.min
    }

    /// The highest grid price
    pub fn max(&self) -> u64 {
        self.max
    }

    /// The spacing between neighbouring grid prices
    pub fn step(&self) -> u64 {
        self.step
    }

    /// The number of grid prices, both ends included
    pub fn len(&self) -> u64 {
        (self.max - self.min) / self.step + 1
    }

    /// Always false, as a valid grid has at least two points
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Narrows the grid to the single step in which the `expensive` and `cheap` curves cross.
    ///
    /// Returns `(low, high)` with `high - low == step`, both within the grid.
    ///
    /// This is a binary search over the sign of `expensive% - cheap%`, which changes
    /// at most once across the grid because the two curves are monotone in opposite
    /// directions. The midpoint is the point at index `len / 2` of the current
    /// sub-grid, which lies right of centre when the point count is even.
    pub fn bracket(&self, expensive: &SampleSet, cheap: &SampleSet) -> (u64, u64) {
        let mut low = self.min;
        let mut high = self.max;

        loop {
            let count = (high - low) / self.step + 1;
            if count <= 2 {
                return (low, high);
            }

            let mid = low + (count / 2) * self.step;
            let expensive_pct = expensive.percentage(mid, Direction::Expensive);
            let cheap_pct = cheap.percentage(mid, Direction::Cheap);

            if expensive_pct > cheap_pct {
                high = mid;
            } else {
                low = mid;
            }

            trace!(mid, expensive_pct, cheap_pct, low, high, "bisection step");
        }
    }

    /// Computes the price at which the `expensive` and `cheap` curves cross.
    ///
    /// The curves are linearly interpolated across the bracketing step found by
    /// [`PriceGrid::bracket`] and the crossing is rounded half-up to an integer price.
    pub fn intersection_price(
        &self,
        expensive: &SampleSet,
        cheap: &SampleSet,
    ) -> Result<i64, IntersectionError> {
        let (low, high) = self.bracket(expensive, cheap);

        let expensive_line = interpolate(low, high, expensive, Direction::Expensive);
        let cheap_line = interpolate(low, high, cheap, Direction::Cheap);

        let x = expensive_line.intersect(&cheap_line)?;
        Ok(round_half_up(x) as i64)
    }
}

fn interpolate(low: u64, high: u64, samples: &SampleSet, direction: Direction) -> Segment {
    let at = |price: u64| Point {
        price: price as f64,
        percentage: samples.percentage(price, direction),
    };
    Segment::new(at(low), at(high))
}

/// DTO to ensure that we always validate when we deserialize from an untrusted source
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Copy, Debug)]
pub struct PriceGridDto {
    /// The lowest grid price
    pub min: u64,
    /// The highest grid price
    pub max: u64,
    /// The spacing between neighbouring grid prices
    pub step: u64,
}

impl From<PriceGrid> for PriceGridDto {
    fn from(value: PriceGrid) -> Self {
        Self {
            min: value.min,
            max: value.max,
            step: value.step,
        }
    }
}

impl TryFrom<PriceGridDto> for PriceGrid {
    type Error = GridError;

    /// Validates that the step is positive, the grid spans at least one step,
    /// and that `max` lies on the grid started at `min`.
    fn try_from(value: PriceGridDto) -> Result<Self, Self::Error> {
        let PriceGridDto { min, max, step } = value;
        if step == 0 {
            Err(GridError::ZeroStep)
        } else if max <= min {
            Err(GridError::Inverted { min, max })
        } else if (max - min) % step != 0 {
            Err(GridError::Misaligned { min, max, step })
        } else {
            Ok(Self { min, max, step })
        }
    }
}

/// Errors that can occur when constructing a price grid
#[derive(Debug, PartialEq, thiserror::Error)]
pub enum GridError {
    /// Error when the step is zero
    #[error("grid step must be positive")]
    ZeroStep,
    /// Error when there are no values to cover
    #[error("no prices to cover")]
    Empty,
    /// Error when the grid does not span at least one step
    #[error("grid maximum {max} must exceed minimum {min}")]
    Inverted {
        /// The requested lower bound
        min: u64,
        /// The requested upper bound
        max: u64,
    },
    /// Error when the upper bound is not a whole number of steps above the lower bound
    #[error("grid [{min}, {max}] is not a whole number of {step}-steps")]
    Misaligned {
        /// The requested lower bound
        min: u64,
        /// The requested upper bound
        max: u64,
        /// The requested step
        step: u64,
    },
    /// Error when the upper bound does not fit in the price type
    #[error("grid upper bound overflows")]
    Overflow,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn samples(values: &[u64]) -> SampleSet {
        SampleSet::new(values.to_vec()).unwrap()
    }

    #[test]
    fn test_grid_validation() {
        assert_eq!(PriceGrid::new(0, 100, 0), Err(GridError::ZeroStep));
        assert_eq!(
            PriceGrid::new(100, 100, 50),
            Err(GridError::Inverted { min: 100, max: 100 })
        );
        assert_eq!(
            PriceGrid::new(0, 120, 50),
            Err(GridError::Misaligned {
                min: 0,
                max: 120,
                step: 50
            })
        );
        let grid = PriceGrid::new(0, 250, 50).unwrap();
        assert_eq!(grid.len(), 6);
    }

    #[test]
    fn test_covering_lower_bound() {
        let grid = PriceGrid::covering([20, 200], 50).unwrap();
        assert_eq!(grid.min(), 0);
        let grid = PriceGrid::covering([120, 200], 50).unwrap();
        assert_eq!(grid.min(), 100);
        let grid = PriceGrid::covering([150, 200], 50).unwrap();
        assert_eq!(grid.min(), 150);
    }

    #[test]
    fn test_covering_upper_bound_on_boundary() {
        // a maximum on the grid gets one extra step
        let grid = PriceGrid::covering([20, 200], 50).unwrap();
        assert_eq!(grid.max(), 250);
    }

    #[test]
    fn test_covering_upper_bound_off_boundary() {
        // a maximum between grid prices gets two steps past its floor, i.e. 300 rather than 250
        let grid = PriceGrid::covering([20, 210], 50).unwrap();
        assert_eq!(grid.max(), 300);
        let grid = PriceGrid::covering([20, 249], 50).unwrap();
        assert_eq!(grid.max(), 300);
    }

    #[test]
    fn test_covering_errors() {
        assert_eq!(
            PriceGrid::covering(std::iter::empty(), 50),
            Err(GridError::Empty)
        );
        assert_eq!(PriceGrid::covering([10], 0), Err(GridError::ZeroStep));
        assert_eq!(
            PriceGrid::covering([u64::MAX], 50),
            Err(GridError::Overflow)
        );
    }

    #[test]
    fn test_covering_single_value() {
        let grid = PriceGrid::covering([100], 50).unwrap();
        assert_eq!((grid.min(), grid.max()), (100, 150));
    }

    #[test]
    fn test_bracket_two_point_grid() {
        let grid = PriceGrid::new(100, 150, 50).unwrap();
        assert_eq!(grid.bracket(&samples(&[1]), &samples(&[1])), (100, 150));
    }

    #[test]
    fn test_bracket_midpoint_is_right_of_centre() {
        // four points 0, 50, 100, 150: the midpoint is index 2, i.e. 100.
        // At 100 both curves read 100%, which is not strictly greater, so the
        // search continues to the right of the midpoint.
        let grid = PriceGrid::new(0, 150, 50).unwrap();
        let set = samples(&[100, 100]);
        assert_eq!(grid.bracket(&set, &set), (100, 150));
    }

    #[test]
    fn test_bracket_scenario() {
        let grid = PriceGrid::new(0, 250, 50).unwrap();
        let too_expensive = samples(&[100, 150, 200]);
        let cheap = samples(&[40, 60, 80]);
        assert_eq!(grid.bracket(&too_expensive, &cheap), (50, 100));
    }

    #[test]
    fn test_intersection_price() {
        let grid = PriceGrid::new(0, 250, 50).unwrap();
        let expensive = samples(&[80, 100, 120]);
        let cheap = samples(&[40, 60, 80]);
        // expensive: (50, 0) -> (100, 66.7), cheap: (50, 66.7) -> (100, 0)
        assert_eq!(grid.intersection_price(&expensive, &cheap), Ok(75));
    }

    #[test]
    fn test_intersection_price_rounds_to_nearest() {
        let grid = PriceGrid::new(0, 250, 50).unwrap();
        let too_expensive = samples(&[100, 150, 200]);
        let cheap = samples(&[40, 60, 80]);
        // the crossing lies at 83.35
        assert_eq!(grid.intersection_price(&too_expensive, &cheap), Ok(83));
    }

    #[test]
    fn test_intersection_price_rounds_ties_up() {
        // expensive: (50, 0) -> (100, 100), cheap: flat at 25%, crossing at exactly 62.5
        let grid = PriceGrid::new(50, 100, 50).unwrap();
        let expensive = samples(&[100]);
        let cheap = samples(&[0, 0, 0, 100]);
        assert_eq!(grid.intersection_price(&expensive, &cheap), Ok(63));
    }

    #[test]
    fn test_flat_bracket_is_reported() {
        // a single-step grid below all answers: expensive reads 0% and cheap reads
        // 100% at both ends, so the interpolated lines never meet
        let grid = PriceGrid::new(0, 50, 50).unwrap();
        let set = samples(&[100, 100]);
        assert_eq!(
            grid.intersection_price(&set, &set),
            Err(IntersectionError::Parallel { slope: 0.0 })
        );
    }
}
