//! Rendering of evaluations, decomposition tables and relabeled vectors.

use std::io::Write;

use anyhow::Result;
use num_complex::Complex64;
use separability::{DecompositionTable, Evaluation, Ket, KetRecord, Stage, StateVector};
use serde::Serialize;

use crate::cli::Format;

/// JSON shape of one record; keys are bit strings.
#[derive(Debug, Serialize)]
struct RecordJson {
    ket: String,
    constituents: Vec<String>,
    amplitude: Complex64,
    target_amplitude: Complex64,
    equal: bool,
}

/// JSON shape of an evaluation.
#[derive(Debug, Serialize)]
struct EvaluationJson<'a> {
    qubits: u32,
    entangled: bool,
    source: Option<String>,
    rescaled: bool,
    trail: &'a [Stage],
    failures: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    records: Option<Vec<RecordJson>>,
}

impl RecordJson {
    fn new(record: &KetRecord, qubits: u32) -> Self {
        Self {
            ket: record.ket.bits(qubits).to_string(),
            constituents: record
                .constituents
                .iter()
                .map(|c| c.bits(qubits).to_string())
                .collect(),
            amplitude: record.amplitude,
            target_amplitude: record.target_amplitude,
            equal: record.equal,
        }
    }
}

/// Writes an evaluation in `format`.
///
/// # Errors
///
/// Returns an error if writing or JSON encoding fails.
pub fn evaluation<W: Write>(
    out: &mut W,
    outcome: &Evaluation,
    format: Format,
    records: bool,
) -> Result<()> {
    match format {
        Format::Text => evaluation_text(out, outcome, records),
        Format::Json => evaluation_json(out, outcome, records),
    }
}

fn evaluation_text<W: Write>(out: &mut W, outcome: &Evaluation, records: bool) -> Result<()> {
    let qubits = outcome.verdict.qubits();
    if let Some(source) = outcome.source {
        writeln!(
            out,
            "Basis change: '{}' -> '{}'",
            source.bits(qubits),
            Ket::REFERENCE.bits(qubits)
        )?;
    }
    if records {
        for r in outcome.verdict.records() {
            writeln!(out, "{}", r.equation(qubits))?;
            if !r.equal {
                writeln!(out, "{} = {}", r.product_expression(qubits), r.target_amplitude)?;
            }
        }
    }
    let word = if outcome.is_entangled() {
        "Entangled"
    } else {
        "not Entangled"
    };
    writeln!(out, "|Psi> is {word}")?;
    Ok(())
}

fn evaluation_json<W: Write>(out: &mut W, outcome: &Evaluation, records: bool) -> Result<()> {
    let qubits = outcome.verdict.qubits();
    let doc = EvaluationJson {
        qubits,
        entangled: outcome.is_entangled(),
        source: outcome.source.map(|s| s.bits(qubits).to_string()),
        rescaled: outcome.rescaled,
        trail: &outcome.trail,
        failures: outcome.verdict.failures().count(),
        records: records.then(|| {
            outcome
                .verdict
                .records()
                .iter()
                .map(|r| RecordJson::new(r, qubits))
                .collect()
        }),
    };
    serde_json::to_writer_pretty(&mut *out, &doc)?;
    writeln!(out)?;
    Ok(())
}

/// Writes `constituent constituent ...` per composite key.
///
/// # Errors
///
/// Returns an error if writing fails.
pub fn decomposition<W: Write>(out: &mut W, table: &DecompositionTable) -> Result<()> {
    let qubits = table.qubits();
    for entry in table {
        decomposition_line(out, entry.ket(), entry.constituents(), qubits)?;
    }
    Ok(())
}

/// Writes one `key: constituents` line.
///
/// # Errors
///
/// Returns an error if writing fails.
pub fn decomposition_line<W: Write>(
    out: &mut W,
    ket: Ket,
    constituents: &[Ket],
    qubits: u32,
) -> Result<()> {
    let parts = constituents
        .iter()
        .map(|c| c.bits(qubits).to_string())
        .collect::<Vec<_>>()
        .join(" ");
    writeln!(out, "{}: {parts}", ket.bits(qubits))?;
    Ok(())
}

/// Writes `Psi['bits'] = value` for every key.
///
/// # Errors
///
/// Returns an error if writing fails.
pub fn state<W: Write>(out: &mut W, state: &StateVector) -> Result<()> {
    let qubits = state.qubits();
    for (ket, amplitude) in state.iter() {
        writeln!(out, "Psi['{}'] = {amplitude}", ket.bits(qubits))?;
    }
    Ok(())
}
