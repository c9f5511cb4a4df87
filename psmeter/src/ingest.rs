//! Reading survey answers from CSV.
//!
//! The first record names each column; every later record holds one
//! respondent's answers. Columns are bound to survey questions by header,
//! so their order does not matter and unrecognized columns (such as a
//! respondent id) are skipped.

use crate::config::HeaderConfig;
use psm_solver::{Category, Survey, SurveyError};
use std::{collections::BTreeMap, io::Read};
use tracing::{debug, info};

/// Read a survey from CSV, binding columns to questions through `headers`.
///
/// The reader must treat its first record as headers; see [`crate::survey_reader`].
/// Blank cells are skipped, so questions may have different numbers of answers.
/// Any other cell must be a non-negative integer.
pub fn read_survey<R: Read>(
    mut reader: csv::Reader<R>,
    headers: &HeaderConfig,
) -> Result<Survey, IngestError> {
    let mut columns = BTreeMap::<Category, (usize, Vec<u64>)>::new();
    for (index, header) in reader.headers()?.iter().enumerate() {
        match headers.category(header) {
            Some(category) => {
                if let Some((first, _)) = columns.insert(category, (index, Vec::new())) {
                    return Err(IngestError::DuplicateCategory {
                        category,
                        first: first + 1,
                        second: index + 1,
                    });
                }
            }
            None => debug!(column = index + 1, header, "ignoring unrecognized column"),
        }
    }

    if let Some(category) = Category::ALL
        .into_iter()
        .find(|category| !columns.contains_key(category))
    {
        return Err(IngestError::MissingCategory(category));
    }

    for record in reader.records() {
        let record = record?;
        let line = record.position().map_or(0, |position| position.line());

        for (&category, (index, values)) in columns.iter_mut() {
            let Some(cell) = record.get(*index).filter(|cell| !cell.is_empty()) else {
                continue;
            };
            let value = cell.parse::<u64>().map_err(|_| IngestError::InvalidCell {
                line,
                column: *index + 1,
                category,
                value: cell.to_owned(),
            })?;
            values.push(value);
        }
    }

    for (category, (_, values)) in &columns {
        info!(%category, answers = values.len(), "read survey column");
    }

    let survey = Survey::from_columns(
        columns
            .into_iter()
            .map(|(category, (_, values))| (category, values)),
    )?;
    Ok(survey)
}

/// Errors that can occur while reading a survey
#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    /// The input could not be read or is not valid CSV
    #[error("Unable to read CSV: {0}")]
    Csv(#[from] csv::Error),
    /// No column header names this question
    #[error("No column found for \"{0}\"")]
    MissingCategory(Category),
    /// Two column headers name the same question
    #[error("Columns {first} and {second} both hold \"{category}\" answers")]
    DuplicateCategory {
        category: Category,
        first: usize,
        second: usize,
    },
    /// A cell is neither blank nor a non-negative integer
    #[error("Line {line}, column {column} (\"{category}\"): {value:?} is not a non-negative integer price")]
    InvalidCell {
        line: u64,
        column: usize,
        category: Category,
        value: String,
    },
    /// The columns do not make up a valid survey
    #[error(transparent)]
    Survey(#[from] SurveyError),
}
