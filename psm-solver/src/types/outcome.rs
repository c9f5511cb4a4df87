use super::{Category, IntersectionError, PriceGrid};
use crate::Map;
use std::fmt;

/// The characteristic price points of a price sensitivity survey
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "snake_case")
)]
pub enum PricePoint {
    /// Point of marginal expensiveness: "too expensive" meets "cheap"
    MarginalExpensiveness,
    /// Indifference price point: "expensive" meets "cheap"
    Indifference,
    /// Optimal price point: "too expensive" meets "too cheap"
    Optimal,
    /// Point of marginal cheapness: "expensive" meets "too cheap"
    MarginalCheapness,
}

impl PricePoint {
    /// Every price point, in reporting order
    pub const ALL: [PricePoint; 4] = [
        PricePoint::MarginalExpensiveness,
        PricePoint::Indifference,
        PricePoint::Optimal,
        PricePoint::MarginalCheapness,
    ];

    /// The categories whose curves cross at this point, as `(expensive side, cheap side)`
    pub fn pairing(&self) -> (Category, Category) {
        match self {
            PricePoint::MarginalExpensiveness => (Category::TooExpensive, Category::Cheap),
            PricePoint::Indifference => (Category::Expensive, Category::Cheap),
            PricePoint::Optimal => (Category::TooExpensive, Category::TooCheap),
            PricePoint::MarginalCheapness => (Category::Expensive, Category::TooCheap),
        }
    }

    /// The label used when reporting this point
    pub fn label(&self) -> &'static str {
        match self {
            PricePoint::MarginalExpensiveness => "highest acceptable price",
            PricePoint::Indifference => "compromise price",
            PricePoint::Optimal => "ideal price",
            PricePoint::MarginalCheapness => "minimum quality price",
        }
    }
}

impl fmt::Display for PricePoint {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A price point that could not be located
#[derive(Debug, PartialEq, thiserror::Error)]
#[error("could not locate the {point} (\"{expensive}\" against \"{cheap}\"): {source}")]
pub struct PricePointError {
    /// The point being computed
    pub point: PricePoint,
    /// The category on the expensive side
    pub expensive: Category,
    /// The category on the cheap side
    pub cheap: Category,
    /// The underlying failure
    pub source: IntersectionError,
}

/// The result of analyzing a survey: the grid searched and every price point.
#[derive(Debug, PartialEq)]
pub struct Analysis {
    grid: PriceGrid,
    points: Map<PricePoint, Result<i64, PricePointError>>,
}

impl Analysis {
    pub(crate) fn new(
        grid: PriceGrid,
        points: Map<PricePoint, Result<i64, PricePointError>>,
    ) -> Self {
        Self { grid, points }
    }

    /// The grid the analysis searched
    pub fn grid(&self) -> PriceGrid {
        self.grid
    }

    /// The outcome for a single point
    pub fn get(&self, point: PricePoint) -> Option<&Result<i64, PricePointError>> {
        self.points.get(&point)
    }

    /// Every outcome, in reporting order
    pub fn iter(&self) -> impl Iterator<Item = (PricePoint, &Result<i64, PricePointError>)> {
        self.points.iter().map(|(point, result)| (*point, result))
    }

    /// The points that could not be located
    pub fn failures(&self) -> impl Iterator<Item = &PricePointError> {
        self.points.values().filter_map(|result| result.as_ref().err())
    }

    /// Whether every point was located
    pub fn is_complete(&self) -> bool {
        self.failures().next().is_none()
    }

    /// Convert into plain prices, failing with the first point that could not be located
    pub fn into_prices(self) -> Result<Map<PricePoint, i64>, PricePointError> {
        self.points
            .into_iter()
            .map(|(point, result)| result.map(|price| (point, price)))
            .collect()
    }
}
