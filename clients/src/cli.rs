//! Command-line arguments.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use clap::{Args, Parser, Subcommand, ValueEnum};
use separability::{Ket, TransformMethod};

/// Decide whether an n-qubit state is entangled.
#[derive(Debug, Parser)]
#[command(
    name = "separability",
    version,
    about = "Product-consistency entanglement check for n-qubit amplitude vectors"
)]
pub struct Cli {
    /// Raise log verbosity (`-v` debug, `-vv` trace). `RUST_LOG` wins.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// TOML settings file; flags override its values.
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Evaluate one state.
    Check(CheckArgs),
    /// Print the constituents of every composite key, or of one key.
    Decompose(DecomposeArgs),
    /// Apply the XOR basis change and print the relabeled vector.
    Transform(TransformArgs),
}

/// Arguments of `check`.
#[derive(Debug, Args)]
pub struct CheckArgs {
    /// Number of qubits.
    #[arg(short, long)]
    pub qubits: u32,

    /// Where the amplitudes come from.
    #[command(flatten)]
    pub input: InputArgs,

    /// Seed for `--random` and random source choices.
    #[arg(long)]
    pub seed: Option<u64>,

    /// Source key policy when the reference amplitude is zero:
    /// a bit string, `first`, `random` or `prompt`.
    #[arg(long, value_name = "POLICY")]
    pub source: Option<SourcePolicy>,

    /// Compare within this distance instead of exactly.
    #[arg(long, value_name = "EPS")]
    pub tolerance: Option<f64>,

    /// Basis change construction.
    #[arg(long, value_enum)]
    pub method: Option<MethodArg>,

    /// Report format.
    #[arg(long, value_enum)]
    pub format: Option<Format>,

    /// Print every composite key's record, not just the verdict.
    #[arg(long)]
    pub records: bool,
}

/// Mutually exclusive amplitude sources.
#[derive(Debug, Args)]
#[group(required = true, multiple = false)]
pub struct InputArgs {
    /// Comma-separated amplitudes in key order, e.g. `"4,3,2,1+1i"`.
    #[arg(long, value_name = "LIST")]
    pub amplitudes: Option<String>,

    /// Read amplitudes from a file, separated by commas or newlines; `#`
    /// starts a comment line.
    #[arg(long, value_name = "PATH")]
    pub file: Option<PathBuf>,

    /// Prompt for each amplitude on stdin.
    #[arg(long)]
    pub interactive: bool,

    /// Draw a random unit-norm state.
    #[arg(long)]
    pub random: bool,

    /// Use the all-ones base state.
    #[arg(long)]
    pub ones: bool,
}

/// Arguments of `decompose`.
#[derive(Debug, Args)]
pub struct DecomposeArgs {
    /// Number of qubits.
    #[arg(short, long)]
    pub qubits: u32,

    /// A single composite key as a bit string.
    pub key: Option<String>,
}

/// Arguments of `transform`.
#[derive(Debug, Args)]
pub struct TransformArgs {
    /// Number of qubits.
    #[arg(short, long)]
    pub qubits: u32,

    /// Key mapped onto the reference key, as a bit string.
    #[arg(long, value_name = "BITS")]
    pub source: String,

    /// Comma-separated amplitudes in key order.
    #[arg(long, value_name = "LIST")]
    pub amplitudes: String,

    /// Basis change construction.
    #[arg(long, value_enum, default_value_t = MethodArg::Relabel)]
    pub method: MethodArg,
}

/// Report format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Format {
    /// Human-readable lines.
    #[default]
    Text,
    /// One JSON document.
    Json,
}

/// CLI spelling of [`TransformMethod`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum MethodArg {
    /// Write each amplitude at its XOR-ed key.
    Rekey,
    /// Build the relabel table, then gather.
    Relabel,
}

impl From<MethodArg> for TransformMethod {
    fn from(arg: MethodArg) -> Self {
        match arg {
            MethodArg::Rekey => Self::Rekey,
            MethodArg::Relabel => Self::Relabel,
        }
    }
}

/// How the source key of a basis change is picked.
#[derive(Debug, Clone, PartialEq, Eq, Default, serde::Deserialize)]
#[serde(try_from = "String")]
pub enum SourcePolicy {
    /// Ask on stdin; empty input picks at random.
    #[default]
    Prompt,
    /// Lowest eligible key.
    First,
    /// Uniform over the eligible keys.
    Random,
    /// A fixed key, as a bit string; parsed once the qubit count is known.
    Fixed(String),
}

impl SourcePolicy {
    /// Resolves a fixed policy's bit string against `qubits`.
    ///
    /// # Errors
    ///
    /// Returns an error if the bit string is not a key of the space.
    pub fn fixed_ket(&self, qubits: u32) -> separability::Result<Option<Ket>> {
        match self {
            Self::Fixed(bits) => Ket::parse_bits(bits, qubits).map(Some),
            _ => Ok(None),
        }
    }
}

impl FromStr for SourcePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "prompt" => Ok(Self::Prompt),
            "first" => Ok(Self::First),
            "random" => Ok(Self::Random),
            bits if !bits.is_empty() && bits.chars().all(|c| c == '0' || c == '1') => {
                Ok(Self::Fixed(bits.to_owned()))
            }
            other => Err(format!(
                "expected a bit string, `first`, `random` or `prompt`, got {other:?}"
            )),
        }
    }
}

impl TryFrom<String> for SourcePolicy {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl fmt::Display for SourcePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Prompt => f.write_str("prompt"),
            Self::First => f.write_str("first"),
            Self::Random => f.write_str("random"),
            Self::Fixed(bits) => f.write_str(bits),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_check_parses() {
        let cli = Cli::try_parse_from([
            "separability",
            "-v",
            "check",
            "--qubits",
            "2",
            "--amplitudes",
            "1,1,1,1",
            "--source",
            "01",
            "--method",
            "rekey",
            "--format",
            "json",
        ])
        .unwrap();
        assert_eq!(cli.verbose, 1);
        assert!(matches!(
            cli.command,
            Command::Check(CheckArgs {
                qubits: 2,
                method: Some(MethodArg::Rekey),
                format: Some(Format::Json),
                source: Some(SourcePolicy::Fixed(ref bits)),
                ..
            }) if bits == "01"
        ));
    }

    #[test]
    fn test_inputs_are_exclusive() {
        let err = Cli::try_parse_from([
            "separability",
            "check",
            "-q",
            "2",
            "--ones",
            "--random",
        ]);
        assert!(err.is_err());
        assert!(Cli::try_parse_from(["separability", "check", "-q", "2"]).is_err());
        assert!(Cli::try_parse_from([
            "separability",
            "check",
            "-q",
            "2",
            "--file",
            "psi.txt",
            "--amplitudes",
            "1,1,1,1",
        ])
        .is_err());
    }

    #[test]
    fn test_source_policy_from_str() {
        assert_eq!("first".parse(), Ok(SourcePolicy::First));
        assert_eq!("random".parse(), Ok(SourcePolicy::Random));
        assert_eq!("prompt".parse(), Ok(SourcePolicy::Prompt));
        assert!("10x".parse::<SourcePolicy>().is_err());
        assert_eq!(
            SourcePolicy::Fixed("0110".into()).fixed_ket(4),
            Ok(Some(Ket::new(0b0110)))
        );
        assert_eq!(SourcePolicy::First.fixed_ket(4), Ok(None));
    }
}
