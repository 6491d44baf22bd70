//! Interactive questions asked before a `generate` run.
//!
//! Generic over reader/writer so the answers can be scripted in tests.

use std::io::{BufRead, Write};

use color_eyre::eyre::Result;
use mdgen_shared::Delimiter;

/// Ask for the CSV delimiter. An empty answer (or EOF) keeps `default`.
pub(crate) fn ask_delimiter<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    default: Delimiter,
) -> Result<Delimiter> {
    loop {
        write!(output, "CSV delimiter (defaults to {default}): ")?;
        output.flush()?;

        let Some(answer) = read_answer(input)? else {
            return Ok(default);
        };
        if answer.is_empty() {
            return Ok(default);
        }

        match answer.parse::<Delimiter>() {
            Ok(delimiter) => return Ok(delimiter),
            Err(e) => writeln!(output, "{e}")?,
        }
    }
}

/// Ask a yes/no question. An empty answer (or EOF) keeps `default`.
///
/// Any answer starting with `y` or `Y` is yes, anything else is no.
pub(crate) fn ask_confirmation<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    question: &str,
    default: bool,
) -> Result<bool> {
    write!(output, "{question} (y/n): ")?;
    output.flush()?;

    let answer = read_answer(input)?.unwrap_or_default();
    let answer = answer.trim();
    if answer.is_empty() {
        return Ok(default);
    }

    Ok(answer.starts_with(['y', 'Y']))
}

/// Read one line, without its line ending. `None` at end of input.
///
/// Only the line ending is removed so that a tab or space can be chosen as
/// the delimiter.
fn read_answer<R: BufRead>(input: &mut R) -> Result<Option<String>> {
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
}
