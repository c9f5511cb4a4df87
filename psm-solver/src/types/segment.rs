/// Slope differences at or below this magnitude are treated as parallel lines.
///
/// Percentages carry one decimal over integer prices, so genuine slope differences
/// are many orders of magnitude larger than this.
pub const SLOPE_TOLERANCE: f64 = 1e-9;

/// A point on a percentage curve
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Point {
    /// The price (abscissa)
    pub price: f64,
    /// The percentage of respondents at this price (ordinate)
    pub percentage: f64,
}

/// The straight line through two points of a percentage curve
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Segment {
    /// The left end of the segment
    pub start: Point,
    /// The right end of the segment
    pub end: Point,
}

impl Segment {
    /// Construct a segment from two points
    pub fn new(start: Point, end: Point) -> Self {
        Self { start, end }
    }

    /// Compute the slope and y-intercept of the line through the segment.
    ///
    /// Returns `None` if both ends share the same price, as the line is then vertical.
    pub fn slope_intercept(&self) -> Option<(f64, f64)> {
        let dx = self.end.price - self.start.price;
        if dx == 0.0 {
            return None;
        }
        let m = (self.end.percentage - self.start.percentage) / dx;
        let b = self.start.percentage - m * self.start.price;
        Some((m, b))
    }

    /// Compute the price at which the lines through `self` and `other` cross.
    ///
    /// The lines are extended beyond the segment ends, so the result may lie
    /// outside of either segment.
    pub fn intersect(&self, other: &Segment) -> Result<f64, IntersectionError> {
        let (m1, b1) = self.slope_intercept().ok_or(IntersectionError::Vertical)?;
        let (m2, b2) = other
            .slope_intercept()
            .ok_or(IntersectionError::Vertical)?;

        // This also catches coincident lines, which have no unique crossing
        if (m1 - m2).abs() <= SLOPE_TOLERANCE {
            return Err(IntersectionError::Parallel { slope: m1 });
        }

        let x = (b2 - b1) / (m1 - m2);
        if x.is_finite() {
            Ok(x)
        } else {
            Err(IntersectionError::NonFinite)
        }
    }
}

/// Reasons two percentage lines do not have a usable crossing
#[derive(Debug, PartialEq, thiserror::Error)]
pub enum IntersectionError {
    /// The lines share (nearly) the same slope
    #[error("lines are parallel (slope {slope}), no unique intersection")]
    Parallel {
        /// The slope of the first line
        slope: f64,
    },
    /// A segment has zero width
    #[error("segment has zero width")]
    Vertical,
    /// The computed crossing is infinite or NaN
    #[error("intersection is not a finite number")]
    NonFinite,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seg(x0: f64, y0: f64, x1: f64, y1: f64) -> Segment {
        Segment::new(
            Point {
                price: x0,
                percentage: y0,
            },
            Point {
                price: x1,
                percentage: y1,
            },
        )
    }

    #[test]
    fn finite_slope() {
        let (m, b) = seg(50.0, 0.0, 100.0, 66.7).slope_intercept().unwrap();
        assert!((m - 1.334).abs() < 1e-12);
        assert!((b + 66.7).abs() < 1e-9);
    }

    #[test]
    fn vertical_segment() {
        assert!(seg(50.0, 0.0, 50.0, 10.0).slope_intercept().is_none());
        assert_eq!(
            seg(50.0, 0.0, 50.0, 10.0).intersect(&seg(0.0, 0.0, 1.0, 1.0)),
            Err(IntersectionError::Vertical)
        );
    }

    #[test]
    fn crossing_lines() {
        let rising = seg(0.0, 0.0, 100.0, 100.0);
        let falling = seg(0.0, 100.0, 100.0, 0.0);
        assert_eq!(rising.intersect(&falling), Ok(50.0));
        assert_eq!(falling.intersect(&rising), Ok(50.0));
    }

    #[test]
    fn crossing_outside_the_segments() {
        let rising = seg(0.0, 0.0, 10.0, 10.0);
        let flat = seg(0.0, 50.0, 10.0, 50.0);
        assert_eq!(rising.intersect(&flat), Ok(50.0));
    }

    #[test]
    fn flat_lines_are_parallel() {
        let low = seg(0.0, 0.0, 50.0, 0.0);
        let high = seg(0.0, 100.0, 50.0, 100.0);
        assert_eq!(
            low.intersect(&high),
            Err(IntersectionError::Parallel { slope: 0.0 })
        );
    }

    #[test]
    fn coincident_lines_are_parallel() {
        let line = seg(0.0, 0.0, 50.0, 25.0);
        assert!(matches!(
            line.intersect(&line),
            Err(IntersectionError::Parallel { .. })
        ));
    }
}
