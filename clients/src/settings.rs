//! TOML settings file.
//!
//! ```toml
//! source = "random"
//! format = "json"
//! records = true
//! seed = 7
//!
//! [evaluator]
//! method = "rekey"
//! equality = { mode = "tolerance", epsilon = 1e-12 }
//! ```
//!
//! Every field is optional. Command-line flags override file values.

use std::fs;
use std::path::Path;

use anyhow::{bail, Context, Result};
use separability::{Equality, EvaluatorConfig};
use serde::Deserialize;

use crate::cli::{CheckArgs, Format, SourcePolicy};

/// Settings shared by file and flags.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    /// Equality rule and basis change construction.
    pub evaluator: EvaluatorConfig,
    /// Source key policy.
    pub source: SourcePolicy,
    /// Report format.
    pub format: Format,
    /// Print every record.
    pub records: bool,
    /// Seed for random draws.
    pub seed: Option<u64>,
}

impl Settings {
    /// Reads and parses a settings file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not valid TOML for
    /// these settings.
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("reading settings file {}", path.display()))?;
        Self::parse(&text).with_context(|| format!("parsing settings file {}", path.display()))
    }

    /// Parses settings from TOML text.
    ///
    /// # Errors
    ///
    /// Returns an error on malformed TOML, unknown fields, or a negative or
    /// NaN tolerance.
    pub fn parse(text: &str) -> Result<Self> {
        let settings: Self = toml::from_str(text)?;
        settings.validate().context("checking [evaluator] settings")?;
        Ok(settings)
    }

    /// Loads `path` if given, else the defaults.
    ///
    /// # Errors
    ///
    /// See [`Settings::load`].
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        path.map_or_else(|| Ok(Self::default()), Self::load)
    }

    /// Applies `check` flags on top of these settings.
    ///
    /// # Errors
    ///
    /// Returns an error if `--tolerance` is negative or NaN.
    pub fn merge(mut self, args: &CheckArgs) -> Result<Self> {
        if let Some(epsilon) = args.tolerance {
            check_epsilon(epsilon).context("checking --tolerance")?;
            self.evaluator.equality = Equality::Tolerance { epsilon };
        }
        if let Some(method) = args.method {
            self.evaluator.method = method.into();
        }
        if let Some(source) = &args.source {
            self.source = source.clone();
        }
        if let Some(format) = args.format {
            self.format = format;
        }
        if args.seed.is_some() {
            self.seed = args.seed;
        }
        self.records |= args.records;
        Ok(self)
    }

    fn validate(&self) -> Result<()> {
        match self.evaluator.equality {
            Equality::Tolerance { epsilon } => check_epsilon(epsilon),
            Equality::Exact => Ok(()),
        }
    }
}

/// A tolerance compares with `<=`, so a negative or NaN one rejects every
/// pair, even equal ones.
fn check_epsilon(epsilon: f64) -> Result<()> {
    if epsilon.is_nan() || epsilon < 0.0 {
        bail!("tolerance must be a non-negative number, got {epsilon}");
    }
    Ok(())
}
