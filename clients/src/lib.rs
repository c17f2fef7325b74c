//! Collaborators of the `separability` command-line client.
//!
//! The core crate never performs I/O. Everything that talks to a terminal,
//! a file or a random source lives here:
//!
//! | Module | Role |
//! |--------|------|
//! | [`cli`] | `clap` argument definitions |
//! | [`settings`] | TOML settings file, merged under CLI flags |
//! | [`prompt`] | interactive amplitude and source-key prompts |
//! | [`sampler`] | random unit-norm amplitude vectors |
//! | [`report`] | text and JSON rendering of an evaluation |
//! | [`logging`] | `tracing` subscriber installation |
//! | [`commands`] | subcommand drivers |

#![deny(missing_docs)]

pub mod cli;
pub mod commands;
pub mod logging;
pub mod prompt;
pub mod report;
pub mod sampler;
pub mod settings;

/// Parses a comma-separated list of complex amplitudes.
///
/// Each item accepts the forms `3`, `-0.5`, `2i`, `1+2i` or `1-2j`.
/// An empty item is 0.
///
/// # Errors
///
/// Returns an error naming the first item that is not a number.
///
/// # Example
///
/// ```
/// use num_complex::Complex64;
/// use separability_clients::parse_amplitudes;
///
/// let amps = parse_amplitudes("1, 0.5, ,1+2i").unwrap();
/// assert_eq!(amps[2], Complex64::new(0.0, 0.0));
/// assert_eq!(amps[3], Complex64::new(1.0, 2.0));
/// ```
pub fn parse_amplitudes(text: &str) -> anyhow::Result<Vec<num_complex::Complex64>> {
    text.split(',')
        .enumerate()
        .map(|(i, item)| {
            parse_amplitude(item)
                .ok_or_else(|| anyhow::anyhow!("amplitude #{i} ({:?}) is not a number", item.trim()))
        })
        .collect()
}

/// Parses the contents of an amplitude file.
///
/// Amplitudes are separated by commas, newlines or both. Lines whose first
/// non-blank character is `#` are comments; blank lines and trailing commas
/// are skipped, so unlike [`parse_amplitudes`] a file cannot spell 0 as an
/// empty item.
///
/// # Errors
///
/// Returns an error naming the line of the first item that is not a number.
pub fn parse_amplitude_file(text: &str) -> anyhow::Result<Vec<num_complex::Complex64>> {
    let mut amplitudes = Vec::new();
    for (line_no, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.starts_with('#') {
            continue;
        }
        for item in line.split(',').map(str::trim).filter(|item| !item.is_empty()) {
            let amplitude = parse_amplitude(item).ok_or_else(|| {
                anyhow::anyhow!("line {}: {item:?} is not a number", line_no + 1)
            })?;
            amplitudes.push(amplitude);
        }
    }
    Ok(amplitudes)
}

/// Parses one amplitude; blank input is 0.
#[must_use]
pub fn parse_amplitude(text: &str) -> Option<num_complex::Complex64> {
    let text = text.trim();
    if text.is_empty() {
        return Some(num_complex::Complex64::new(0.0, 0.0));
    }
    text.replace('j', "i").parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use num_complex::Complex64;

    #[test]
    fn test_parse_amplitude_forms() {
        assert_eq!(parse_amplitude("3"), Some(Complex64::new(3.0, 0.0)));
        assert_eq!(parse_amplitude(" -0.5 "), Some(Complex64::new(-0.5, 0.0)));
        assert_eq!(parse_amplitude("2i"), Some(Complex64::new(0.0, 2.0)));
        assert_eq!(parse_amplitude("1-2j"), Some(Complex64::new(1.0, -2.0)));
        assert_eq!(parse_amplitude(""), Some(Complex64::new(0.0, 0.0)));
        assert_eq!(parse_amplitude("abc"), None);
    }

    #[test]
    fn test_parse_amplitudes_reports_position() {
        let err = parse_amplitudes("1,2,x,4").unwrap_err();
        assert!(err.to_string().contains("#2"));
        assert_eq!(parse_amplitudes("1,2,3,4").unwrap().len(), 4);
    }

    #[test]
    fn test_parse_amplitude_file() {
        let text = "# |01> + |10>\n0, 1,\n\n  1\n0\n";
        assert_eq!(
            parse_amplitude_file(text).unwrap(),
            vec![
                Complex64::new(0.0, 0.0),
                Complex64::new(1.0, 0.0),
                Complex64::new(1.0, 0.0),
                Complex64::new(0.0, 0.0),
            ]
        );
        let err = parse_amplitude_file("1\n2\n# note\n3x\n").unwrap_err();
        assert!(err.to_string().starts_with("line 4:"), "{err}");
    }
}
