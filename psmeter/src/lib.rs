use clap::Parser;
use psm_solver::Analysis;
use std::{io::Write as _, path::PathBuf};
use tracing::info;

mod io;
pub use io::*;

pub mod config;
pub use crate::config::AppConfig;

pub mod ingest;

mod report;
pub use report::*;

/// Compute the Van Westendorp price points of a survey CSV
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct BaseArgs {
    #[command(flatten)]
    pub io: IOArgs,

    /// Path to a TOML configuration file
    #[arg(short, long, env = "PSM_CONFIG")]
    pub config: Option<PathBuf>,

    /// Spacing of the price grid (overrides the configuration)
    #[arg(short, long)]
    pub step: Option<u64>,

    /// The output format (if omitted, will infer based on filename, falling back to text)
    #[arg(short, long)]
    pub format: Option<OutputFormat>,
}

impl BaseArgs {
    pub fn evaluate(self) -> anyhow::Result<()> {
        self.evaluate_with(AppConfig::environment())
    }

    /// Run with `environment` in place of the process's `PSM_*` variables.
    ///
    /// `PSM_CONFIG` is still read by clap when the arguments are parsed.
    pub fn evaluate_with(self, environment: ::config::Environment) -> anyhow::Result<()> {
        let AppConfig {
            analysis,
            output,
            headers,
        } = AppConfig::load_with(self.config.as_deref(), environment)?;
        let step = self.step.unwrap_or(analysis.step);
        let format = self.io.format(self.format)?;

        let input = self.io.read()?;
        let survey = ingest::read_survey(input, &headers)?;
        let analysis = survey.analyze(step)?;

        let grid = analysis.grid();
        info!(min = grid.min(), max = grid.max(), step, "analyzed survey");

        let report = Report::new(&analysis, &output.currency);
        let mut buffer = self.io.write()?;
        format.render(&report, &mut buffer)?;
        buffer.flush()?;

        ensure_complete(&analysis)?;
        Ok(())
    }
}

/// Fail if any price point could not be located.
///
/// On a grid built by [`psm_solver::Survey::analyze`] every pairing changes sign within its
/// bracket, so this only trips on grids supplied through [`psm_solver::Survey::analyze_on`].
pub fn ensure_complete(analysis: &Analysis) -> Result<(), CliError> {
    match analysis.failures().count() {
        0 => Ok(()),
        failed => Err(CliError::Incomplete(failed)),
    }
}

#[derive(thiserror::Error, Debug)]
pub enum CliError {
    #[error("{0} of 4 price points could not be located")]
    Incomplete(usize),
}
