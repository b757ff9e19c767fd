//! Exponentially weighted moving average used as a one-step price forecast.
//!
//! Uses the non-adjusted recurrence: `S_1 = x_1`,
//! `S_t = a * x_t + (1 - a) * S_{t-1}` with `a = 2 / (span + 1)`.

use crate::error::{Error, Result};

pub const DEFAULT_SPAN: usize = 7;

pub fn alpha(span: usize) -> Result<f64> {
    if span == 0 {
        return Err(Error::InvalidSpan(span));
    }
    Ok(2.0 / (span as f64 + 1.0))
}

/// The full smoothed series, same length as `series`.
pub fn ewma(series: &[f64], span: usize) -> Result<Vec<f64>> {
    let a = alpha(span)?;
    let mut out = Vec::with_capacity(series.len());
    let mut iter = series.iter().copied();
    let Some(first) = iter.next() else {
        return Err(Error::EmptySeries);
    };
    let mut s = first;
    out.push(s);
    for x in iter {
        s = a * x + (1.0 - a) * s;
        out.push(s);
    }
    Ok(out)
}

/// Next-value estimate: the last smoothed value, rounded to cents.
pub fn forecast_next(series: &[f64], span: usize) -> Result<f64> {
    let smoothed = ewma(series, span)?;
    let last = smoothed.last().copied().ok_or(Error::EmptySeries)?;
    Ok(round_cents(last))
}

pub fn round_cents(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}
