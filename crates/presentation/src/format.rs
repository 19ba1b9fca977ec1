use analytics::{MetricName, MetricValue, MetricsReport};

/// Inserts `,` between groups of three digits of an unsigned integer string.
fn group_thousands(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Formats a float with a fixed number of decimals and thousands separators,
/// e.g. `1234.5` -> `1,234.5000` at precision 4.
pub fn format_float(value: f64, precision: usize) -> String {
    let plain = format!("{:.*}", precision, value);
    if !value.is_finite() {
        return plain;
    }
    let (sign, unsigned) = match plain.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", plain.as_str()),
    };
    match unsigned.split_once('.') {
        Some((int_part, frac)) => format!("{}{}.{}", sign, group_thousands(int_part), frac),
        None => format!("{}{}", sign, group_thousands(unsigned)),
    }
}

pub fn format_count(value: u64) -> String {
    group_thousands(&value.to_string())
}

pub fn format_value(value: MetricValue, precision: usize) -> String {
    match value {
        MetricValue::Float(v) => format_float(v, precision),
        MetricValue::Count(n) => format_count(n),
    }
}

/// The headline figures shown on the dashboard and in the console summary.
///
/// Metrics whose family was not computed are shown as `n/a`.
pub fn headline_figures(report: &MetricsReport) -> Vec<(&'static str, String)> {
    let float = |name, render: fn(f64) -> String| {
        report
            .get(name)
            .map(|v| render(v.as_f64()))
            .unwrap_or_else(|| "n/a".to_string())
    };

    vec![
        ("Total PnL", float(MetricName::TotalPnL, |v| format!("${}", format_float(v, 2)))),
        ("Max Drawdown", float(MetricName::MaxDrawdown, |v| format!("{:.2}%", v * 100.0))),
        ("Sharpe Ratio", float(MetricName::SharpeRatio, |v| format!("{:.3}", v))),
        ("Volatility", float(MetricName::Volatility, |v| format!("{:.2}%", v * 100.0))),
        (
            "Total Trades",
            report
                .get(MetricName::TotalTrades)
                .map(|v| format_value(v, 0))
                .unwrap_or_else(|| "n/a".to_string()),
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use analytics::TradeMetrics;

    #[test]
    fn floats_get_separators_and_fixed_precision() {
        assert_eq!(format_float(1234.5, 4), "1,234.5000");
        assert_eq!(format_float(-1234567.891, 2), "-1,234,567.89");
        assert_eq!(format_float(0.25, 4), "0.2500");
        assert_eq!(format_float(999.0, 0), "999");
        assert_eq!(format_float(-0.5, 1), "-0.5");
    }

    #[test]
    fn counts_get_separators() {
        assert_eq!(format_count(0), "0");
        assert_eq!(format_count(12345), "12,345");
        assert_eq!(format_count(1_000_000), "1,000,000");
    }

    #[test]
    fn headline_marks_missing_families() {
        let report = MetricsReport {
            pnl: None,
            trades: Some(TradeMetrics {
                total_trades: 1500,
                buy_trades: 700,
                sell_trades: 800,
                total_volume: 1.0,
                avg_trade_size: 1.0,
                avg_trade_price: 1.0,
                price_range: 0.0,
            }),
        };
        let figures = headline_figures(&report);
        assert_eq!(figures[0], ("Total PnL", "n/a".to_string()));
        assert_eq!(figures[4], ("Total Trades", "1,500".to_string()));
    }
}
