//! Text sample files
//!
//! Input: the sample count `N` on the first line, then one sample per line. A sample is a
//! real number, optionally followed by its imaginary part. Blank lines are skipped.
//!
//! Output: `N` on the first line, then `re im` per bin with six fractional digits.

use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use log::debug;
use num_complex::Complex64;

use crate::error::{FftError, Result};

/// Samples reserved up front; the header is untrusted until the samples are actually read.
const MAX_PREALLOCATED: usize = 1 << 16;

/// Load the samples of the file at `path`
pub fn read_samples(path: impl AsRef<Path>) -> Result<Vec<Complex64>> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| FftError::io(path, e))?;

    let samples = parse_samples(BufReader::new(file)).map_err(|e| match e {
        FftError::Io { source, .. } => FftError::io(path, source),
        other => other,
    })?;
    debug!("read {} samples from {}", samples.len(), path.display());
    Ok(samples)
}

/// Parse a sample file from `reader`
pub fn parse_samples<R: BufRead>(reader: R) -> Result<Vec<Complex64>> {
    let mut lines = reader
        .lines()
        .enumerate()
        .map(|(i, line)| (i + 1, line))
        .filter(|(_, line)| !matches!(line, Ok(text) if text.trim().is_empty()));

    let (header_line, header) = match lines.next() {
        Some((number, line)) => (number, line.map_err(|e| FftError::io("<input>", e))?),
        None => return Err(FftError::parse(1, "missing sample count")),
    };
    let len: usize = header
        .trim()
        .parse()
        .map_err(|e| FftError::parse(header_line, format!("invalid sample count: {e}")))?;
    if len == 0 {
        return Err(FftError::EmptySequence);
    }

    let mut samples = Vec::with_capacity(len.min(MAX_PREALLOCATED));
    let mut last_line = header_line;
    for (number, line) in lines.take(len) {
        let line = line.map_err(|e| FftError::io("<input>", e))?;
        samples.push(parse_sample(&line, number)?);
        last_line = number;
    }

    if samples.len() < len {
        return Err(FftError::parse(
            last_line + 1,
            format!("expected {len} samples, found {}", samples.len()),
        ));
    }
    Ok(samples)
}

fn parse_sample(line: &str, number: usize) -> Result<Complex64> {
    let mut fields = line.split_whitespace().map(|field| {
        field
            .parse::<f64>()
            .map_err(|e| FftError::parse(number, format!("invalid sample {field:?}: {e}")))
    });

    let re = fields
        .next()
        .ok_or_else(|| FftError::parse(number, "empty sample"))??;
    let im = fields.next().transpose()?.unwrap_or(0.0);
    if fields.next().is_some() {
        return Err(FftError::parse(number, "too many fields"));
    }
    Ok(Complex64::new(re, im))
}

/// Write `spectrum` to the file at `path`, replacing it
pub fn write_spectrum(path: impl AsRef<Path>, spectrum: &[Complex64]) -> Result<()> {
    let path = path.as_ref();
    let file = File::create(path).map_err(|e| FftError::io(path, e))?;

    let mut writer = BufWriter::new(file);
    format_spectrum(&mut writer, spectrum)
        .and_then(|()| writer.flush())
        .map_err(|e| FftError::io(path, e))?;
    debug!("wrote {} bins to {}", spectrum.len(), path.display());
    Ok(())
}

/// Format `spectrum` into `writer`
pub fn format_spectrum<W: Write>(writer: &mut W, spectrum: &[Complex64]) -> io::Result<()> {
    writeln!(writer, "{}", spectrum.len())?;
    for z in spectrum {
        writeln!(writer, "{:.6} {:.6}", z.re, z.im)?;
    }
    Ok(())
}
