//! Where the survey is read from and where the report is written to.

use crate::{OutputFormat, OutputFormatError};
use anyhow::Context as _;
use clap::Args;
use std::{
    fs::File,
    io::{BufReader, BufWriter, Read, Write, stdin, stdout},
    path::PathBuf,
};

/// The survey CSV and the report destination; `-` selects stdin or stdout
#[derive(Args, Debug)]
pub struct IOArgs {
    /// The survey CSV file ("-" reads stdin)
    #[arg(value_parser = Endpoint::parse)]
    input: Endpoint,

    /// The report file ("-" writes stdout)
    #[arg(short, long, default_value = "-", value_parser = Endpoint::parse)]
    output: Endpoint,
}

impl IOArgs {
    /// Open the survey as CSV, ready for [`crate::ingest::read_survey`]
    pub fn read(&self) -> anyhow::Result<csv::Reader<Box<dyn Read>>> {
        let source: Box<dyn Read> = match &self.input {
            Endpoint::File(path) => {
                let file = File::open(path)
                    .with_context(|| format!("Unable to open survey {}", path.display()))?;
                Box::new(BufReader::new(file))
            }
            Endpoint::Stdio => Box::new(stdin().lock()),
        };
        Ok(survey_reader(source))
    }

    /// Create the report destination.
    ///
    /// Call this only once the report is ready, so a failed analysis leaves no file behind.
    pub fn write(&self) -> anyhow::Result<Box<dyn Write>> {
        match &self.output {
            Endpoint::File(path) => {
                let file = File::create(path)
                    .with_context(|| format!("Unable to create report {}", path.display()))?;
                Ok(Box::new(BufWriter::new(file)))
            }
            Endpoint::Stdio => Ok(Box::new(stdout().lock())),
        }
    }

    /// The report format: `requested` if given, else inferred from the output
    /// file's extension, else plain text
    pub fn format(
        &self,
        requested: Option<OutputFormat>,
    ) -> Result<OutputFormat, OutputFormatError> {
        if let Some(format) = requested {
            return Ok(format);
        }
        match &self.output {
            Endpoint::File(path) => match path.extension().and_then(|ext| ext.to_str()) {
                Some(ext) => ext.parse(),
                None => Ok(OutputFormat::Text),
            },
            Endpoint::Stdio => Ok(OutputFormat::Text),
        }
    }
}

/// Wrap raw survey bytes in a CSV reader.
///
/// The first record holds the column headers. Records may be ragged, since
/// questions can have different numbers of answers, and every cell is trimmed.
pub fn survey_reader<R: Read>(source: R) -> csv::Reader<R> {
    csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(source)
}

#[derive(Clone, Debug, PartialEq)]
enum Endpoint {
    File(PathBuf),
    Stdio,
}

impl Endpoint {
    fn parse(arg: &str) -> Result<Self, String> {
        match arg {
            "-" => Ok(Self::Stdio),
            "" => Err("expected a path or \"-\"".to_owned()),
            path => Ok(Self::File(PathBuf::from(path))),
        }
    }
}
