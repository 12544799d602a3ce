//! Histogram bin bookkeeping.
//!
//! Bin indices follow the usual convention: 0 is the underflow bin, `n_bins
//! + 1` the overflow bin, 1..=n_bins the visible range. Squared errors are
//! optional; a backend without an error store simply reports `None` and the
//! helpers leave errors alone.

use crate::error::{Error, Result};

/// Bin access as exposed by the plotting backend's histogram objects.
pub trait Bins {
    /// Number of visible bins; storage spans `0..=n_bins() + 1`.
    fn n_bins(&self) -> usize;

    fn content(&self, index: usize) -> f64;

    fn set_content(&mut self, index: usize, value: f64);

    fn add_content(&mut self, index: usize, value: f64) {
        let current = self.content(index);
        self.set_content(index, current + value);
    }

    /// Squared error of a bin, or `None` when no error store exists.
    fn sumw2(&self, index: usize) -> Option<f64>;

    /// No-op when no error store exists.
    fn set_sumw2(&mut self, index: usize, value: f64);
}

fn squared(err: Option<f64>, err2: Option<f64>) -> Option<f64> {
    err2.or_else(|| err.map(|e| e * e))
}

fn check_index(hist: &impl Bins, index: usize) -> Result<()> {
    let last = hist.n_bins() + 1;
    if index > last {
        return Err(Error::invalid(format!(
            "bin index {index} out of range 0..={last}"
        )));
    }
    Ok(())
}

/// Sets a bin's content and, when an error store exists, its squared error
/// (`err2` wins over `err`).
pub fn set_bin_value(
    hist: &mut impl Bins,
    index: usize,
    value: f64,
    err: Option<f64>,
    err2: Option<f64>,
) -> Result<()> {
    check_index(hist, index)?;
    hist.set_content(index, value);
    if hist.sumw2(index).is_some()
        && let Some(err2) = squared(err, err2)
    {
        hist.set_sumw2(index, err2);
    }
    Ok(())
}

/// Adds to a bin's content, accumulating the squared error alongside.
pub fn add_bin_value(
    hist: &mut impl Bins,
    index: usize,
    value: f64,
    err: Option<f64>,
    err2: Option<f64>,
) -> Result<()> {
    check_index(hist, index)?;
    let previous = hist.sumw2(index);
    hist.add_content(index, value);
    if let (Some(previous), Some(err2)) = (previous, squared(err, err2)) {
        hist.set_sumw2(index, previous + err2);
    }
    Ok(())
}

/// Folds the underflow bin into the first visible bin, propagating the
/// squared error. With `clear` the underflow is zeroed afterwards.
pub fn fold_underflow(hist: &mut impl Bins, clear: bool) -> Result<()> {
    let underflow = hist.content(0);
    if underflow == 0.0 {
        return Ok(());
    }
    let err2 = hist.sumw2(0);
    add_bin_value(hist, 1, underflow, None, err2)?;
    if clear {
        set_bin_value(hist, 0, 0.0, None, Some(0.0))?;
    }
    Ok(())
}

/// Overflow counterpart of [`fold_underflow`].
pub fn fold_overflow(hist: &mut impl Bins, clear: bool) -> Result<()> {
    let n_bins = hist.n_bins();
    let overflow = hist.content(n_bins + 1);
    if overflow == 0.0 {
        return Ok(());
    }
    let err2 = hist.sumw2(n_bins + 1);
    add_bin_value(hist, n_bins, overflow, None, err2)?;
    if clear {
        set_bin_value(hist, n_bins + 1, 0.0, None, Some(0.0))?;
    }
    Ok(())
}
