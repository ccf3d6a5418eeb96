use chrono::{DateTime, Utc};
use crate::models::SECONDS_PER_DAY;

/// Compact USD for axis labels and cards: `$1.23M`, `$45.60K`, `$12.34`.
pub fn format_usd(value: f64) -> String {
    let sign = if value < 0.0 { "-" } else { "" };
    let abs = value.abs();
    if abs >= 1e9 {
        format!("{}${:.2}B", sign, abs / 1e9)
    } else if abs >= 1e6 {
        format!("{}${:.2}M", sign, abs / 1e6)
    } else if abs >= 1e3 {
        format!("{}${:.2}K", sign, abs / 1e3)
    } else {
        format!("{}${:.2}", sign, abs)
    }
}

/// Full USD with thousands separators: `$1,234,567.89`.
pub fn format_usd_exact(value: f64) -> String {
    let sign = if value < 0.0 { "-" } else { "" };
    let cents = format!("{:.2}", value.abs());
    let (whole, frac) = cents.split_once('.').unwrap_or((cents.as_str(), "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, ch) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    format!("{}${}.{}", sign, grouped, frac)
}

fn datetime(ts: i64) -> Option<DateTime<Utc>> {
    DateTime::<Utc>::from_timestamp(ts, 0)
}

/// Axis label for a protocol day, given as days since the unix epoch.
pub fn format_day(day_index: i64) -> String {
    day_index
        .checked_mul(SECONDS_PER_DAY)
        .and_then(datetime)
        .map(|d| d.format("%b %d").to_string())
        .unwrap_or_else(|| day_index.to_string())
}

pub fn format_time(ts: i64) -> String {
    datetime(ts)
        .map(|d| d.format("%H:%M").to_string())
        .unwrap_or_else(|| ts.to_string())
}

pub fn format_datetime(ts: i64) -> String {
    datetime(ts)
        .map(|d| d.format("%m-%d %H:%M").to_string())
        .unwrap_or_else(|| ts.to_string())
}

pub fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}
