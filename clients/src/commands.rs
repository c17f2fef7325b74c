//! Subcommand drivers.
//!
//! Each driver takes its reader and writers explicitly; the binary passes
//! stdin, stderr (prompts) and stdout (reports).

use std::fs;
use std::io::{BufRead, Write};

use anyhow::{Context, Result};
use separability::transform::transform_with;
use separability::{
    DecompositionTable, Evaluator, FirstEligible, FixedSource, IndexSpace, Ket, RandomSource,
    SeparabilityError, SourceChooser, StateVector,
};

use crate::cli::{CheckArgs, Cli, Command, DecomposeArgs, SourcePolicy, TransformArgs};
use crate::prompt::{PromptChooser, Prompter};
use crate::settings::Settings;
use crate::{parse_amplitude_file, parse_amplitudes, report, sampler};

/// How a run ended, when it did not fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    /// A report was written.
    Done,
    /// Every amplitude was zero; no determination is possible.
    Unsatisfiable,
}

/// Dispatches a parsed command line.
///
/// # Errors
///
/// Returns an error for unreadable settings, malformed input, or I/O
/// failure.
pub fn run<R, P, W>(cli: &Cli, prompter: Prompter<R, P>, out: &mut W) -> Result<Status>
where
    R: BufRead,
    P: Write,
    W: Write,
{
    match &cli.command {
        Command::Check(args) => {
            let settings = Settings::load_or_default(cli.config.as_deref())?.merge(args)?;
            check(args, &settings, prompter, out)
        }
        Command::Decompose(args) => decompose(args, out).map(|()| Status::Done),
        Command::Transform(args) => transform(args, out).map(|()| Status::Done),
    }
}

/// Reads the state from the selected input.
fn read_state<R: BufRead, P: Write>(
    args: &CheckArgs,
    prompter: &mut Prompter<R, P>,
    rng: &mut rand::rngs::StdRng,
) -> Result<StateVector> {
    let qubits = args.qubits;
    let input = &args.input;
    if let Some(list) = &input.amplitudes {
        state_from_list(qubits, list)
    } else if let Some(path) = &input.file {
        let text = fs::read_to_string(path)
            .with_context(|| format!("reading amplitude file {}", path.display()))?;
        let amplitudes = parse_amplitude_file(&text)
            .with_context(|| format!("parsing amplitude file {}", path.display()))?;
        StateVector::from_amplitudes(qubits, amplitudes)
            .with_context(|| format!("building a {qubits}-qubit state"))
    } else if input.interactive {
        prompter.state(qubits)
    } else if input.random {
        Ok(sampler::random_state(qubits, rng)?)
    } else {
        Ok(StateVector::ones(qubits)?)
    }
}

fn state_from_list(qubits: u32, list: &str) -> Result<StateVector> {
    let amplitudes = parse_amplitudes(list).context("parsing --amplitudes")?;
    StateVector::from_amplitudes(qubits, amplitudes)
        .with_context(|| format!("building a {qubits}-qubit state"))
}

/// `check`: evaluate one state and report.
///
/// # Errors
///
/// Returns an error for malformed input, an unusable fixed source key, or
/// I/O failure.
pub fn check<R, P, W>(
    args: &CheckArgs,
    settings: &Settings,
    mut prompter: Prompter<R, P>,
    out: &mut W,
) -> Result<Status>
where
    R: BufRead,
    P: Write,
    W: Write,
{
    let mut rng = sampler::rng(settings.seed);
    let state = read_state(args, &mut prompter, &mut rng)?;
    let evaluator = Evaluator::new(args.qubits)?.with_config(settings.evaluator);

    let mut chooser: Box<dyn SourceChooser + '_> = match &settings.source {
        SourcePolicy::Prompt => Box::new(PromptChooser::new(prompter, rng)),
        SourcePolicy::First => Box::new(FirstEligible),
        SourcePolicy::Random => Box::new(RandomSource::new(rng)),
        fixed @ SourcePolicy::Fixed(_) => {
            let ket = fixed
                .fixed_ket(args.qubits)?
                .context("fixed source policy without a key")?;
            Box::new(FixedSource(ket))
        }
    };
    tracing::debug!(policy = %settings.source, "source policy");

    match evaluator.evaluate(&state, chooser.as_mut()) {
        Ok(outcome) => {
            report::evaluation(out, &outcome, settings.format, settings.records)?;
            Ok(Status::Done)
        }
        Err(SeparabilityError::NoEligibleSource) => Ok(Status::Unsatisfiable),
        Err(err) => Err(err).context("evaluating state"),
    }
}

/// `decompose`: print the table, or one key's constituents.
///
/// # Errors
///
/// Returns an error for an invalid qubit count, a malformed or
/// non-composite key, or I/O failure.
pub fn decompose<W: Write>(args: &DecomposeArgs, out: &mut W) -> Result<()> {
    match &args.key {
        Some(bits) => {
            let space = IndexSpace::new(args.qubits)?;
            let ket = Ket::parse_bits(bits, args.qubits)?;
            let constituents = space
                .decompose(ket)
                .with_context(|| format!("decomposing {bits}"))?;
            report::decomposition_line(out, ket, &constituents, args.qubits)
        }
        None => report::decomposition(out, &DecompositionTable::build(args.qubits)?),
    }
}

/// `transform`: relabel a state so the source lands on the reference key.
///
/// # Errors
///
/// Returns an error for malformed amplitudes or source key, or I/O failure.
pub fn transform<W: Write>(args: &TransformArgs, out: &mut W) -> Result<()> {
    let state = state_from_list(args.qubits, &args.amplitudes)?;
    let source = Ket::parse_bits(&args.source, args.qubits).context("parsing --source")?;
    let relabeled = transform_with(&state, source, args.method.into())?;
    report::state(out, &relabeled)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    const ENTERED: &str = "4,3,2,1,6,3,2,7,10,5,3,7,1,3,9,8";

    fn run_with(argv: &[&str], input: &str) -> (Result<Status>, String, String) {
        let cli = Cli::try_parse_from(argv).unwrap();
        let mut prompts = Vec::new();
        let mut out = Vec::new();
        let status = run(&cli, Prompter::new(input.as_bytes(), &mut prompts), &mut out);
        (
            status,
            String::from_utf8(prompts).unwrap(),
            String::from_utf8(out).unwrap(),
        )
    }

    #[test]
    fn test_check_entered_state() {
        let (status, _, out) = run_with(
            &["separability", "check", "-q", "4", "--amplitudes", ENTERED, "--records"],
            "",
        );
        assert_eq!(status.unwrap(), Status::Done);
        assert!(out.contains("Psi['0011'] == Psi['0010']*Psi['0001'] is False"));
        assert!(out.ends_with("|Psi> is Entangled\n"));
    }

    #[test]
    fn test_check_ones() {
        let (status, _, out) = run_with(&["separability", "check", "-q", "3", "--ones"], "");
        assert_eq!(status.unwrap(), Status::Done);
        assert_eq!(out, "|Psi> is not Entangled\n");
    }

    #[test]
    fn test_check_interactive_with_prompted_source() {
        // |01> + |10>; the source prompt picks 10.
        let (status, prompts, out) = run_with(
            &["separability", "check", "-q", "2", "--interactive"],
            "0\n1\n1\n0\n10\n",
        );
        assert_eq!(status.unwrap(), Status::Done);
        assert!(prompts.contains("Enter an amplitude for 11: "));
        assert!(prompts.contains("Please choose a ket to map to the zero ket:"));
        assert!(out.starts_with("Basis change: '10' -> '00'"));
        assert!(out.ends_with("|Psi> is Entangled\n"));
    }

    #[test]
    fn test_check_all_zero_is_unsatisfiable() {
        let (status, _, out) = run_with(
            &["separability", "check", "-q", "2", "--amplitudes", "0,0,0,0", "--source", "first"],
            "",
        );
        assert_eq!(status.unwrap(), Status::Unsatisfiable);
        assert!(out.is_empty());
    }

    #[test]
    fn test_check_ineligible_fixed_source_fails() {
        let (status, _, _) = run_with(
            &["separability", "check", "-q", "2", "--amplitudes", "0,1,1,0", "--source", "11"],
            "",
        );
        let err = status.unwrap_err();
        assert!(format!("{err:#}").contains("evaluating state"));
    }

    #[test]
    fn test_check_random_is_seeded() {
        let argv = [
            "separability", "check", "-q", "3", "--random", "--seed", "5", "--format", "json",
            "--records",
        ];
        let (a, _, first) = run_with(&argv, "");
        let (b, _, second) = run_with(&argv, "");
        assert_eq!(a.unwrap(), Status::Done);
        assert_eq!(b.unwrap(), Status::Done);
        assert_eq!(first, second);
    }

    #[test]
    fn test_check_wrong_length() {
        let (status, _, _) =
            run_with(&["separability", "check", "-q", "2", "--amplitudes", "1,2,3"], "");
        assert!(format!("{:#}", status.unwrap_err()).contains("building a 2-qubit state"));
    }

    #[test]
    fn test_check_amplitude_file() {
        let name = format!("separability-{}-psi.txt", std::process::id());
        let path = std::env::temp_dir().join(name);
        fs::write(&path, "# entered state\n4,3,2,1\n6,3,2,7\n10,5,3,7\n1,3,9,8\n").unwrap();
        let file = path.to_str().unwrap();
        let (status, _, out) =
            run_with(&["separability", "check", "-q", "4", "--file", file, "--records"], "");
        fs::remove_file(&path).unwrap();
        assert_eq!(status.unwrap(), Status::Done);
        assert!(out.contains("Psi['0011'] == Psi['0010']*Psi['0001'] is False"));
        assert!(out.ends_with("|Psi> is Entangled\n"));
    }

    #[test]
    fn test_check_missing_amplitude_file() {
        let (status, _, _) = run_with(
            &["separability", "check", "-q", "2", "--file", "/nonexistent/psi.txt"],
            "",
        );
        assert!(format!("{:#}", status.unwrap_err()).contains("reading amplitude file"));
    }

    #[test]
    fn test_check_negative_tolerance_fails() {
        let (status, _, out) =
            run_with(&["separability", "check", "-q", "2", "--ones", "--tolerance=-1"], "");
        assert!(format!("{:#}", status.unwrap_err()).contains("checking --tolerance"));
        assert!(out.is_empty());
    }

    #[test]
    fn test_decompose_one_key() {
        let (status, _, out) = run_with(&["separability", "decompose", "-q", "4", "1101"], "");
        assert_eq!(status.unwrap(), Status::Done);
        assert_eq!(out, "1101: 1000 0100 0001\n");
    }

    #[test]
    fn test_decompose_basis_key_fails() {
        let (status, _, _) = run_with(&["separability", "decompose", "-q", "4", "0100"], "");
        assert!(status.is_err());
    }

    #[test]
    fn test_transform_two_qubits() {
        let (status, _, out) = run_with(
            &["separability", "transform", "-q", "2", "--source", "01", "--amplitudes", "0,1,2i,0"],
            "",
        );
        assert_eq!(status.unwrap(), Status::Done);
        assert_eq!(
            out,
            "Psi['00'] = 1+0i\nPsi['01'] = 0+0i\nPsi['10'] = 0+0i\nPsi['11'] = 0+2i\n"
        );
    }
}
