//! Strict text parsers for the external tool's output files.
//!
//! The generator writes complex signals as free-form text of `(real,imag)`
//! pairs and BER curves as whitespace/comma-separated decimals. Parsing is
//! strict: the first malformed token fails the whole file with a positioned
//! reason instead of being skipped, so a corrupted output can never be
//! mistaken for a shorter valid one.

use crate::signal::buffer::{ComplexSample, RealSeries, SignalBuffer};
use crate::{AnalysisError, AnalysisResult};
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

/// Reads a complex-signal file of `(real,imag)` pairs.
pub fn read_complex_file<P: AsRef<Path>>(path: P) -> AnalysisResult<SignalBuffer> {
    let text = read_text(path.as_ref())?;
    let samples =
        parse_complex_text(&text).map_err(|reason| parse_error(path.as_ref(), reason))?;
    Ok(SignalBuffer::new(samples))
}

/// Reads a real-series file of whitespace/comma-separated decimals.
pub fn read_real_file<P: AsRef<Path>>(path: P) -> AnalysisResult<RealSeries> {
    let text = read_text(path.as_ref())?;
    let values = parse_real_text(&text).map_err(|reason| parse_error(path.as_ref(), reason))?;
    Ok(RealSeries::new(values))
}

fn read_text(path: &Path) -> AnalysisResult<String> {
    fs::read_to_string(path).map_err(|err| {
        if err.kind() == ErrorKind::NotFound {
            AnalysisError::FileMissing(path.display().to_string())
        } else {
            parse_error(path, format!("unreadable: {}", err))
        }
    })
}

fn parse_error(path: &Path, reason: String) -> AnalysisError {
    AnalysisError::FileParse {
        path: path.display().to_string(),
        reason,
    }
}

fn parse_complex_text(text: &str) -> Result<Vec<ComplexSample>, String> {
    let mut samples = Vec::new();
    let mut rest = text;
    let mut pos = 0usize;

    loop {
        let trimmed = rest.trim_start();
        pos += rest.len() - trimmed.len();
        if trimmed.is_empty() {
            break;
        }
        if !trimmed.starts_with('(') {
            return Err(format!("expected '(' at byte {}", pos));
        }
        let close = trimmed
            .find(')')
            .ok_or_else(|| format!("unterminated pair at byte {}", pos))?;
        let body = &trimmed[1..close];
        let (re_text, im_text) = body
            .split_once(',')
            .ok_or_else(|| format!("pair at byte {} lacks a comma", pos))?;
        let re = parse_finite(re_text, pos)?;
        let im = parse_finite(im_text, pos)?;
        samples.push(ComplexSample::new(re, im));
        rest = &trimmed[close + 1..];
        pos += close + 1;
    }

    if samples.is_empty() {
        return Err("no samples".to_string());
    }
    Ok(samples)
}

fn parse_real_text(text: &str) -> Result<Vec<f64>, String> {
    let mut values = Vec::new();
    for token in text
        .split(|c: char| c.is_whitespace() || c == ',')
        .filter(|t| !t.is_empty())
    {
        let value: f64 = token
            .parse()
            .map_err(|_| format!("bad decimal token {:?}", token))?;
        if !value.is_finite() {
            return Err(format!("non-finite value {:?}", token));
        }
        values.push(value);
    }
    if values.is_empty() {
        return Err("no values".to_string());
    }
    Ok(values)
}

fn parse_finite(token: &str, pos: usize) -> Result<f64, String> {
    let trimmed = token.trim();
    let value: f64 = trimmed
        .parse()
        .map_err(|_| format!("bad component {:?} in pair at byte {}", trimmed, pos))?;
    if !value.is_finite() {
        return Err(format!("non-finite component in pair at byte {}", pos));
    }
    Ok(value)
}
