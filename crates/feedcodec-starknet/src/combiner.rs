//! Pair combiner: derive a cross rate from two single-asset feeds.
//!
//! Prices of the two feeds are paired by position within the observation
//! stream, so `A[i] / B[i]` assumes both feeds were submitted in lockstep.

use feedcodec_core::{error::CombineError, feed::PriceObservation};

/// Prices of one feed, in stream order.
pub fn filter_feed(observations: &[PriceObservation], feed: &str) -> Vec<u128> {
    observations
        .iter()
        .filter(|o| o.feed == feed)
        .map(|o| o.price)
        .collect()
}

/// Positional ratios of feed `a` over feed `b`. The result has
/// `min(len A, len B)` elements.
pub fn combine_pair(
    observations: &[PriceObservation],
    a: &str,
    b: &str,
) -> Result<Vec<f64>, CombineError> {
    let numerators = filter_feed(observations, a);
    let denominators = filter_feed(observations, b);

    numerators
        .iter()
        .zip(&denominators)
        .enumerate()
        .map(|(index, (&num, &den))| {
            if den == 0 {
                return Err(CombineError::DivisionByZero {
                    index,
                    feed: b.to_string(),
                });
            }
            Ok(num as f64 / den as f64)
        })
        .collect()
}

/// Median of a set of values; the mean of the middle two for even counts.
pub fn median(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        Some((sorted[mid - 1] + sorted[mid]) / 2.0)
    } else {
        Some(sorted[mid])
    }
}

/// Median cross rate of `a` over `b`, or `None` if either feed is absent.
pub fn combine_median(
    observations: &[PriceObservation],
    a: &str,
    b: &str,
) -> Result<Option<f64>, CombineError> {
    Ok(median(&combine_pair(observations, a, b)?))
}
