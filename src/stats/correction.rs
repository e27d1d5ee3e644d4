//! Correction of p-values for multiple testing

use std::cmp::Ordering;

use crate::stats::f64_from_usize;

/// Adjusts p-values with the Benjamini-Hochberg step-up procedure
///
/// The adjusted p-values are returned in the same order as the input.
/// Adjusted values are never smaller than the raw values and never
/// larger than `1.0`.
///
/// # Examples
///
/// ```
/// use gsea::stats::correction::benjamini_hochberg;
///
/// let adjusted = benjamini_hochberg(&[0.01, 0.04, 0.03]);
/// assert_eq!(adjusted.len(), 3);
/// assert!((adjusted[0] - 0.03).abs() < 1e-12);
/// assert!((adjusted[1] - 0.04).abs() < 1e-12);
/// assert!((adjusted[2] - 0.04).abs() < 1e-12);
///
/// assert!(benjamini_hochberg(&[]).is_empty());
/// ```
pub fn benjamini_hochberg(pvalues: &[f64]) -> Vec<f64> {
    let n = pvalues.len();
    let mut ranked: Vec<(usize, f64)> = pvalues.iter().copied().enumerate().collect();
    ranked.sort_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(Ordering::Equal));

    let mut adjusted = vec![1.0; n];
    let mut current_min: f64 = 1.0;
    // walk from the largest p-value down, keeping the running minimum
    for (idx, (orig_idx, pvalue)) in ranked.into_iter().enumerate().rev() {
        let rank = idx + 1;
        let value = (pvalue * f64_from_usize(n) / f64_from_usize(rank)).min(1.0);
        current_min = current_min.min(value);
        adjusted[orig_idx] = current_min;
    }
    adjusted
}
