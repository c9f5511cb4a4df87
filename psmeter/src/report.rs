use clap::ValueEnum;
use psm_solver::{Analysis, PriceGrid, PricePoint};
use serde::Serialize;
use std::{io::Write, str::FromStr};

/// The analysis as presented to the user
#[derive(Debug, Serialize)]
pub struct Report<'a> {
    /// The grid that was searched
    pub grid: PriceGrid,
    /// The currency unit of every price
    pub currency: &'a str,
    /// Every price point, in reporting order
    pub prices: Vec<Entry>,
}

/// A single reported price point
#[derive(Debug, Serialize)]
pub struct Entry {
    pub point: PricePoint,
    pub label: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<'a> Report<'a> {
    pub fn new(analysis: &Analysis, currency: &'a str) -> Self {
        let prices = analysis
            .iter()
            .map(|(point, result)| Entry {
                point,
                label: point.label(),
                price: result.as_ref().ok().copied(),
                error: result.as_ref().err().map(ToString::to_string),
            })
            .collect();

        Self {
            grid: analysis.grid(),
            currency,
            prices,
        }
    }
}

// clap parses the format from the flag; FromStr infers it from the output file's extension
#[derive(Clone, Copy, Debug, PartialEq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    pub fn render<W: Write>(&self, report: &Report, buffer: &mut W) -> anyhow::Result<()> {
        match self {
            Self::Text => {
                for entry in &report.prices {
                    match (&entry.price, &entry.error) {
                        (Some(price), _) => {
                            writeln!(buffer, "{}: {} {}", entry.label, price, report.currency)?
                        }
                        (None, Some(error)) => writeln!(buffer, "{}: error: {}", entry.label, error)?,
                        (None, None) => writeln!(buffer, "{}: error: no result", entry.label)?,
                    }
                }
            }
            Self::Json => {
                serde_json::to_writer_pretty(&mut *buffer, report)?;
                writeln!(buffer)?;
            }
        };
        Ok(())
    }
}

impl FromStr for OutputFormat {
    type Err = OutputFormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "txt" | "TXT" | "text" => Ok(Self::Text),
            "json" | "JSON" => Ok(Self::Json),
            _ => Err(Self::Err::OutputExtension(s.to_owned())),
        }
    }
}

#[derive(thiserror::Error, Debug)]
pub enum OutputFormatError {
    #[error("Unknown output format: {0}")]
    OutputExtension(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use psm_solver::{SampleSet, Survey};

    fn analysis() -> Analysis {
        let set = |values: &[u64]| SampleSet::new(values.to_vec()).unwrap();
        Survey::new(
            set(&[100, 150, 200]),
            set(&[80, 100, 120]),
            set(&[40, 60, 80]),
            set(&[20, 30, 40]),
        )
        .analyze(50)
        .unwrap()
    }

    fn degenerate() -> Analysis {
        let set = |values: &[u64]| SampleSet::new(values.to_vec()).unwrap();
        Survey::new(set(&[100]), set(&[10]), set(&[100]), set(&[100]))
            .analyze_on(PriceGrid::new(0, 50, 50).unwrap())
    }

    fn render(format: OutputFormat, analysis: &Analysis) -> String {
        let report = Report::new(analysis, "yen");
        let mut buffer = Vec::new();
        format.render(&report, &mut buffer).unwrap();
        String::from_utf8(buffer).unwrap()
    }

    #[test]
    fn test_text_lines_in_order() {
        assert_eq!(
            render(OutputFormat::Text, &analysis()),
            "highest acceptable price: 83 yen\n\
             compromise price: 75 yen\n\
             ideal price: 50 yen\n\
             minimum quality price: 50 yen\n"
        );
    }

    #[test]
    fn test_text_reports_failures_inline() {
        let text = render(OutputFormat::Text, &degenerate());
        let lines = text.lines().collect::<Vec<_>>();
        assert_eq!(lines.len(), 4);
        assert!(lines[0].starts_with("highest acceptable price: error: could not locate"));
        assert_eq!(lines[1], "compromise price: 50 yen");
    }

    #[test]
    fn test_json_shape() {
        let json = render(OutputFormat::Json, &degenerate());
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["currency"], "yen");
        assert_eq!(value["grid"]["max"], 50);
        assert_eq!(value["prices"][0]["point"], "marginal_expensiveness");
        assert!(value["prices"][0].get("price").is_none());
        assert!(value["prices"][0]["error"].is_string());
        assert_eq!(value["prices"][1]["price"], 50);
        assert!(value["prices"][1].get("error").is_none());
    }

    #[test]
    fn test_format_from_extension() {
        assert_eq!("json".parse::<OutputFormat>().unwrap(), OutputFormat::Json);
        assert_eq!("txt".parse::<OutputFormat>().unwrap(), OutputFormat::Text);
        assert!("csv".parse::<OutputFormat>().is_err());
    }
}
