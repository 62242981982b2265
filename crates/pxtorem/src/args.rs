use anyhow::{Result, bail};
use clap::Parser;
use std::path::PathBuf;

/// Convert `px` lengths in stylesheets to `rem`.
#[derive(Debug, Parser, PartialEq, Eq)]
#[command(name = "pxtorem", version, about, long_about = None)]
pub struct Args {
    /// JSON options file (legacy option names accepted); defaults apply when absent.
    #[arg(long, value_name = "OPTIONS_JSON")]
    pub config: Option<PathBuf>,

    /// Write the result to this file instead of stdout. Takes a single input.
    #[arg(long, value_name = "FILE")]
    pub out: Option<PathBuf>,

    /// Stylesheets to convert.
    #[arg(required = true, num_args = 1.., value_name = "INPUT_CSS")]
    pub inputs: Vec<PathBuf>,
}

impl Args {
    /// Reject combinations clap cannot express on its own.
    ///
    /// # Errors
    /// Returns an error when `--out` is combined with several inputs.
    pub fn validate(self) -> Result<Self> {
        if self.out.is_some() && self.inputs.len() > 1 {
            bail!("--out takes a single input file, got {}", self.inputs.len());
        }
        Ok(self)
    }
}
