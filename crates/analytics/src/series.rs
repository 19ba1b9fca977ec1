//! Series-level helpers shared by the metrics engine and the chart renderer.

use crate::normalize::NormalizedTrades;
use chrono::{Duration, DurationRound, NaiveDateTime};
use std::collections::BTreeMap;

/// Fractional drawdown of each point from the running peak.
///
/// A point whose running peak is zero or negative has no peak to fall from and
/// is assigned `0.0`. A point whose ratio overflows (a vanishing peak against a
/// large loss) is also assigned `0.0`, so the series is always finite and never
/// positive.
pub fn drawdown_series(cumulative: &[f64]) -> Vec<f64> {
    let mut peak = f64::NEG_INFINITY;
    cumulative
        .iter()
        .map(|&value| {
            peak = peak.max(value);
            if peak <= 0.0 {
                return 0.0;
            }
            let drawdown = (value - peak) / peak;
            // Also rules out -0.0.
            if drawdown < 0.0 && drawdown.is_finite() { drawdown } else { 0.0 }
        })
        .collect()
}

/// Period-over-period percentage changes.
///
/// Terms whose prior value is zero, or that come out non-finite, are dropped.
pub fn pct_changes(values: &[f64]) -> Vec<f64> {
    values
        .windows(2)
        .filter(|w| w[0] != 0.0)
        .map(|w| (w[1] - w[0]) / w[0])
        .filter(|r| r.is_finite())
        .collect()
}

pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Sample standard deviation (n - 1 denominator). Needs at least two values.
pub fn sample_std(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    let mean = mean(values)?;
    let variance = values.iter().map(|v| (v - mean) * (v - mean)).sum::<f64>() / (values.len() - 1) as f64;
    Some(variance.sqrt())
}

/// Trade volume and count aggregated into fixed time buckets.
#[derive(Debug, Clone, PartialEq)]
pub struct TradeBucket {
    pub start: NaiveDateTime,
    pub volume: f64,
    pub count: u64,
}

/// Groups trades into consecutive buckets of `width`, including empty buckets
/// between the first and last trade.
///
/// Returns an empty vector when the table has no time index or no rows.
pub fn bucket_trades(trades: &NormalizedTrades, width: Duration) -> Vec<TradeBucket> {
    if !trades.time_indexed || width <= Duration::zero() {
        return Vec::new();
    }

    let mut buckets: BTreeMap<NaiveDateTime, (f64, u64)> = BTreeMap::new();
    for row in &trades.rows {
        let Some(ts) = row.timestamp else { continue };
        let Ok(start) = ts.duration_trunc(width) else { continue };
        let entry = buckets.entry(start).or_insert((0.0, 0));
        entry.0 += row.quantity;
        entry.1 += 1;
    }

    let (Some(&first), Some(&last)) = (buckets.keys().next(), buckets.keys().next_back()) else {
        return Vec::new();
    };

    let mut out = Vec::new();
    let mut cursor = first;
    while cursor <= last {
        let (volume, count) = buckets.get(&cursor).copied().unwrap_or((0.0, 0));
        out.push(TradeBucket {
            start: cursor,
            volume,
            count,
        });
        cursor += width;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::TradeRow;
    use chrono::NaiveDate;
    use core_types::Side;

    fn at(h: u32, m: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, 2).unwrap().and_hms_opt(h, m, s).unwrap()
    }

    #[test]
    fn drawdown_tracks_running_peak() {
        let dd = drawdown_series(&[100.0, 200.0, 150.0, 250.0, 125.0]);
        assert_eq!(dd, vec![0.0, 0.0, -0.25, 0.0, -0.5]);
    }

    #[test]
    fn drawdown_with_non_positive_peak_is_zero() {
        let dd = drawdown_series(&[0.0, -10.0, -20.0, 5.0, 0.0]);
        assert_eq!(dd, vec![0.0, 0.0, 0.0, 0.0, -1.0]);
        assert!(dd.iter().all(|v| v.is_finite()));
    }

    #[test]
    fn drawdown_from_vanishing_peak_stays_finite() {
        let dd = drawdown_series(&[1e-300, -1e10, 1e-300]);
        assert_eq!(dd, vec![0.0, 0.0, 0.0]);
    }

    #[test]
    fn pct_changes_skip_zero_denominators() {
        let changes = pct_changes(&[100.0, 0.0, 50.0, 75.0]);
        assert_eq!(changes, vec![-1.0, 0.5]);
    }

    #[test]
    fn sample_std_needs_two_values() {
        assert_eq!(sample_std(&[1.0]), None);
        let std = sample_std(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]).unwrap();
        assert!((std - 2.138089935299395).abs() < 1e-12);
    }

    #[test]
    fn buckets_fill_gaps_between_minutes() {
        let row = |ts, quantity| TradeRow {
            timestamp: Some(ts),
            price: 10.0,
            quantity,
            side: Side::Buy,
            trade_value: 10.0 * quantity,
            signed_side: 1,
        };
        let trades = NormalizedTrades {
            rows: vec![row(at(9, 30, 5), 2.0), row(at(9, 30, 40), 3.0), row(at(9, 32, 0), 1.0)],
            time_indexed: true,
        };

        let buckets = bucket_trades(&trades, Duration::minutes(1));
        assert_eq!(buckets.len(), 3);
        assert_eq!(buckets[0].start, at(9, 30, 0));
        assert_eq!((buckets[0].volume, buckets[0].count), (5.0, 2));
        assert_eq!((buckets[1].volume, buckets[1].count), (0.0, 0));
        assert_eq!((buckets[2].volume, buckets[2].count), (1.0, 1));
    }

    #[test]
    fn unindexed_trades_have_no_buckets() {
        let trades = NormalizedTrades {
            rows: Vec::new(),
            time_indexed: false,
        };
        assert!(bucket_trades(&trades, Duration::minutes(1)).is_empty());
    }
}
