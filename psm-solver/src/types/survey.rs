use super::{Analysis, GridError, PriceGrid, PricePoint, PricePointError, SampleSet, SampleSetError};
use crate::Map;
use std::fmt;
use tracing::{debug, warn};

/// The four questions of a price sensitivity survey
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "snake_case")
)]
pub enum Category {
    /// "At what price would you consider the product so expensive that you would not buy it?"
    TooExpensive,
    /// "At what price would you consider the product expensive, but still worth buying?"
    Expensive,
    /// "At what price would you consider the product a bargain?"
    Cheap,
    /// "At what price would you consider the product so cheap that you would doubt its quality?"
    TooCheap,
}

impl Category {
    /// Every category, in questionnaire order
    pub const ALL: [Category; 4] = [
        Category::TooExpensive,
        Category::Expensive,
        Category::Cheap,
        Category::TooCheap,
    ];

    /// A human-readable name
    pub fn label(&self) -> &'static str {
        match self {
            Category::TooExpensive => "too expensive",
            Category::Expensive => "expensive",
            Category::Cheap => "cheap",
            Category::TooCheap => "too cheap",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// The answers to all four survey questions
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Survey {
    too_expensive: SampleSet,
    expensive: SampleSet,
    cheap: SampleSet,
    too_cheap: SampleSet,
}

impl Survey {
    /// Assemble a survey from its four answer sets
    pub fn new(
        too_expensive: SampleSet,
        expensive: SampleSet,
        cheap: SampleSet,
        too_cheap: SampleSet,
    ) -> Self {
        Self {
            too_expensive,
            expensive,
            cheap,
            too_cheap,
        }
    }

    /// Assemble a survey from labelled columns of raw answers.
    ///
    /// Every category must appear exactly once and hold at least one answer.
    pub fn from_columns(
        columns: impl IntoIterator<Item = (Category, Vec<u64>)>,
    ) -> Result<Self, SurveyError> {
        let mut found = Map::<Category, Vec<u64>>::default();
        for (category, values) in columns {
            if found.insert(category, values).is_some() {
                return Err(SurveyError::Duplicate(category));
            }
        }

        let mut take = |category: Category| -> Result<SampleSet, SurveyError> {
            let values = found
                .swap_remove(&category)
                .ok_or(SurveyError::Missing(category))?;
            SampleSet::new(values).map_err(|source| SurveyError::Empty { category, source })
        };

        Ok(Self::new(
            take(Category::TooExpensive)?,
            take(Category::Expensive)?,
            take(Category::Cheap)?,
            take(Category::TooCheap)?,
        ))
    }

    /// The answers to one question
    pub fn get(&self, category: Category) -> &SampleSet {
        match category {
            Category::TooExpensive => &self.too_expensive,
            Category::Expensive => &self.expensive,
            Category::Cheap => &self.cheap,
            Category::TooCheap => &self.too_cheap,
        }
    }

    /// Every answer to every question
    pub fn values(&self) -> impl Iterator<Item = u64> + '_ {
        Category::ALL
            .into_iter()
            .flat_map(|category| self.get(category).values().iter().copied())
    }

    /// Compute all four price points on the smallest grid with the given step that covers every answer.
    pub fn analyze(&self, step: u64) -> Result<Analysis, GridError> {
        let grid = PriceGrid::covering(self.values(), step)?;
        Ok(self.analyze_on(grid))
    }

    /// Compute all four price points on the provided grid.
    ///
    /// The points are independent: a failure to locate one of them is recorded
    /// in its slot and does not prevent the others from being computed.
    pub fn analyze_on(&self, grid: PriceGrid) -> Analysis {
        let points = PricePoint::ALL
            .into_iter()
            .map(|point| {
                let (expensive, cheap) = point.pairing();
                let result = grid
                    .intersection_price(self.get(expensive), self.get(cheap))
                    .map_err(|source| PricePointError {
                        point,
                        expensive,
                        cheap,
                        source,
                    });

                match &result {
                    Ok(price) => debug!(%point, price, "located price point"),
                    Err(error) => warn!(%point, %error, "could not locate price point"),
                }

                (point, result)
            })
            .collect();

        Analysis::new(grid, points)
    }
}

/// Errors that can occur when assembling a survey
#[derive(Debug, PartialEq, thiserror::Error)]
pub enum SurveyError {
    /// Error when a category has no column
    #[error("no answers supplied for category \"{0}\"")]
    Missing(Category),
    /// Error when a category has more than one column
    #[error("answers supplied more than once for category \"{0}\"")]
    Duplicate(Category),
    /// Error when a category's column holds no answers
    #[error("invalid answers for category \"{category}\": {source}")]
    Empty {
        /// The offending category
        category: Category,
        /// The underlying error
        source: SampleSetError,
    },
}
