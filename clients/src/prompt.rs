//! Interactive prompts.
//!
//! Both prompts loop until they get usable input. Blank amplitude input is
//! 0; a blank source answer picks an eligible key at random.

use std::io::{self, BufRead, Write};

use anyhow::{bail, Context, Result};
use num_complex::Complex64;
use rand::seq::SliceRandom;
use rand::Rng;
use separability::{Ket, SeparabilityError, SourceChooser, StateVector};

use crate::parse_amplitude;

/// Line-oriented prompt over any reader and writer.
#[derive(Debug)]
pub struct Prompter<R, W> {
    input: R,
    output: W,
    line: String,
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    /// Wraps a reader and a writer.
    pub fn new(input: R, output: W) -> Self {
        Self {
            input,
            output,
            line: String::new(),
        }
    }

    /// Consumes the prompter, returning the writer.
    pub fn into_output(self) -> W {
        self.output
    }

    /// Reads one line; `None` at end of input.
    fn read_line(&mut self) -> io::Result<Option<&str>> {
        self.line.clear();
        if self.input.read_line(&mut self.line)? == 0 {
            return Ok(None);
        }
        Ok(Some(self.line.trim()))
    }

    /// Asks for the amplitude of `ket` until the answer parses.
    ///
    /// # Errors
    ///
    /// Returns an error on I/O failure or if input ends first.
    pub fn amplitude(&mut self, ket: Ket, qubits: u32) -> Result<Complex64> {
        let bits = ket.bits(qubits);
        loop {
            write!(self.output, "Enter an amplitude for {bits}: ")?;
            self.output.flush()?;
            let Some(answer) = self.read_line()? else {
                bail!("input ended before the amplitude for {bits}");
            };
            if let Some(value) = parse_amplitude(answer) {
                return Ok(value);
            }
            writeln!(self.output, "Error: amplitude for {bits} must be a number.")?;
        }
    }

    /// Asks for every amplitude in key order.
    ///
    /// # Errors
    ///
    /// Returns an error on I/O failure, early end of input, or an invalid
    /// qubit count.
    pub fn state(&mut self, qubits: u32) -> Result<StateVector> {
        let mut state = StateVector::zeros(qubits)?;
        let kets: Vec<Ket> = state.iter().map(|(ket, _)| ket).collect();
        for ket in kets {
            let value = self.amplitude(ket, qubits)?;
            state.set(ket, value)?;
        }
        Ok(state)
    }

    /// Asks for a source key among `eligible`.
    ///
    /// A blank answer, or end of input, picks one uniformly with `rng`.
    ///
    /// # Errors
    ///
    /// Returns an error on I/O failure or when `eligible` is empty.
    pub fn source<G: Rng + ?Sized>(
        &mut self,
        eligible: &[Ket],
        qubits: u32,
        rng: &mut G,
    ) -> Result<Ket> {
        if eligible.is_empty() {
            bail!(SeparabilityError::NoEligibleSource);
        }
        let listing = eligible
            .iter()
            .map(|k| k.bits(qubits).to_string())
            .collect::<Vec<_>>()
            .join(", ");

        writeln!(self.output, "({listing})")?;
        writeln!(self.output, "Please choose a ket to map to the zero ket:")?;
        loop {
            write!(self.output, "(or press Enter to choose a random ket) ")?;
            self.output.flush()?;
            let answer = self.read_line()?.map(str::to_owned);
            match answer.as_deref() {
                None | Some("") => {
                    let ket = *eligible
                        .choose(rng)
                        .context("no eligible keys to choose from")?;
                    writeln!(self.output, "Random Choice: {}", ket.bits(qubits))?;
                    return Ok(ket);
                }
                Some(text) => match Ket::parse_bits(text, qubits) {
                    Ok(ket) if eligible.binary_search(&ket).is_ok() => return Ok(ket),
                    _ => {
                        writeln!(
                            self.output,
                            "Error, please choose a ket from the following list:"
                        )?;
                        writeln!(self.output, "({listing})")?;
                    }
                },
            }
        }
    }
}

/// [`SourceChooser`] that asks on a [`Prompter`].
///
/// Prompt I/O failures cannot travel through the core error type, so they
/// are logged and replaced by a random choice.
#[derive(Debug)]
pub struct PromptChooser<R, W, G> {
    prompter: Prompter<R, W>,
    rng: G,
}

impl<R: BufRead, W: Write, G: Rng> PromptChooser<R, W, G> {
    /// Wraps a prompter and the generator used for blank answers.
    pub fn new(prompter: Prompter<R, W>, rng: G) -> Self {
        Self { prompter, rng }
    }

    /// Consumes the chooser, returning the prompter.
    pub fn into_prompter(self) -> Prompter<R, W> {
        self.prompter
    }
}

impl<R: BufRead, W: Write, G: Rng> SourceChooser for PromptChooser<R, W, G> {
    fn choose(&mut self, state: &StateVector, eligible: &[Ket]) -> separability::Result<Ket> {
        match self.prompter.source(eligible, state.qubits(), &mut self.rng) {
            Ok(ket) => Ok(ket),
            Err(err) => {
                tracing::warn!("source prompt failed ({err:#}); choosing at random");
                eligible
                    .choose(&mut self.rng)
                    .copied()
                    .ok_or(SeparabilityError::NoEligibleSource)
            }
        }
    }
}
