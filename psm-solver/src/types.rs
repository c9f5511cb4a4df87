mod sample;
pub use sample::*;

mod segment;
pub use segment::*;

mod grid;
pub use grid::*;

mod survey;
pub use survey::*;

mod outcome;
pub use outcome::*;

/// Round half-up to the nearest integer, i.e. `floor(x + 0.5)`.
///
/// This differs from [`f64::round`] for negative ties, which round towards zero here.
pub(crate) fn round_half_up(x: f64) -> f64 {
    (x + 0.5).floor()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_half_up() {
        assert_eq!(round_half_up(62.5), 63.0);
        assert_eq!(round_half_up(62.49), 62.0);
        assert_eq!(round_half_up(-2.5), -2.0);
        assert_eq!(round_half_up(-2.51), -3.0);
    }
}
