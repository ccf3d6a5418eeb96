use serde::Serialize;
use crate::models::{Bucket, DayDatum, Pool, Token};
use crate::services::SwapFeed;
use super::format::{format_datetime, format_day, format_time, format_usd};

pub const SWAP_COLOR: &str = "#ff007a";
pub const TOKEN_COLOR: &str = "#2172e5";
pub const POOL_COLOR: &str = "#8a2be2";
pub const TVL_COLOR: &str = "#27ae60";
pub const VOLUME_COLOR: &str = "#f3a712";
pub const FEES_COLOR: &str = "#e74c3c";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartKind {
    /// Category axis, one bar per record
    Bar,
    /// Time axis, points in ascending order
    Line,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeriesPoint {
    pub label: String,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSeries {
    pub title: String,
    pub color: &'static str,
    pub kind: ChartKind,
    pub points: Vec<SeriesPoint>,
}

impl ChartSeries {
    fn new(title: &str, color: &'static str, kind: ChartKind, points: Vec<SeriesPoint>) -> Self {
        Self {
            title: title.to_string(),
            color,
            kind,
            points,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn max_value(&self) -> f64 {
        self.points.iter().map(|p| p.value).fold(0.0_f64, f64::max)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryCard {
    pub title: &'static str,
    pub value: String,
}

fn card(title: &'static str, value: String) -> SummaryCard {
    SummaryCard { title, value }
}

/// Buckets are already ascending; labels switch to date+time past one day.
pub fn swap_volume_series(buckets: &[Bucket]) -> ChartSeries {
    let span = match (buckets.first(), buckets.last()) {
        (Some(first), Some(last)) => last.timestamp - first.timestamp,
        _ => 0,
    };
    let label = |ts: i64| if span > 86_400 { format_datetime(ts) } else { format_time(ts) };

    let points = buckets
        .iter()
        .map(|b| SeriesPoint { label: label(b.timestamp), value: b.total_usd })
        .collect();
    ChartSeries::new("Swap Volume (USD)", SWAP_COLOR, ChartKind::Line, points)
}

pub fn token_volume_series(tokens: &[Token]) -> ChartSeries {
    let points = tokens
        .iter()
        .map(|t| SeriesPoint { label: t.symbol.clone(), value: t.volume_usd })
        .collect();
    ChartSeries::new("Token Volume (USD)", TOKEN_COLOR, ChartKind::Bar, points)
}

pub fn pool_volume_series(pools: &[Pool]) -> ChartSeries {
    let points = pools
        .iter()
        .map(|p| SeriesPoint { label: p.pair(), value: p.volume_usd })
        .collect();
    ChartSeries::new("Pair Volume (USD)", POOL_COLOR, ChartKind::Bar, points)
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProtocolCharts {
    pub tvl: ChartSeries,
    pub volume: ChartSeries,
    pub fees: ChartSeries,
}

/// Three independent lines over one shared date axis.
pub fn protocol_series(days: &[DayDatum]) -> ProtocolCharts {
    let mut ordered: Vec<&DayDatum> = days.iter().collect();
    ordered.sort_by_key(|d| d.date);

    let line = |title: &str, color: &'static str, value: fn(&DayDatum) -> f64| {
        let points = ordered
            .iter()
            .map(|d| SeriesPoint { label: format_day(d.day_index()), value: value(d) })
            .collect();
        ChartSeries::new(title, color, ChartKind::Line, points)
    };

    ProtocolCharts {
        tvl: line("TVL (USD)", TVL_COLOR, |d| d.tvl_usd),
        volume: line("Volume (USD)", VOLUME_COLOR, |d| d.volume_usd),
        fees: line("Fees (USD)", FEES_COLOR, |d| d.fees_usd),
    }
}

pub fn swap_cards(feed: &SwapFeed, buckets: &[Bucket]) -> Vec<SummaryCard> {
    let total: f64 = feed.swaps.iter().map(|s| s.amount_usd).sum();
    let average = if feed.swaps.is_empty() { 0.0 } else { total / feed.swaps.len() as f64 };

    let mut cards = vec![
        card("Total Volume", format_usd(total)),
        card("Swaps", feed.swaps.len().to_string()),
        card("Buckets", buckets.len().to_string()),
        card("Avg Swap", format_usd(average)),
    ];
    if feed.skipped > 0 {
        cards.push(card("Skipped", feed.skipped.to_string()));
    }
    cards
}

pub fn protocol_cards(days: &[DayDatum]) -> Vec<SummaryCard> {
    let latest_tvl = days.iter().max_by_key(|d| d.date).map(|d| d.tvl_usd).unwrap_or(0.0);
    let volume: f64 = days.iter().map(|d| d.volume_usd).sum();
    let fees: f64 = days.iter().map(|d| d.fees_usd).sum();

    vec![
        card("TVL", format_usd(latest_tvl)),
        card("Volume", format_usd(volume)),
        card("Fees", format_usd(fees)),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Swap;

    fn token(symbol: &str, volume: f64) -> Token {
        Token { id: symbol.to_lowercase(), symbol: symbol.into(), volume_usd: volume }
    }

    fn day(date: i64, tvl: f64) -> DayDatum {
        DayDatum { date, tvl_usd: tvl, volume_usd: tvl / 10.0, fees_usd: tvl / 1000.0 }
    }

    #[test]
    fn one_bar_per_token() {
        let series = token_volume_series(&[token("WETH", 9.0), token("USDC", 5.0), token("DAI", 1.0)]);
        assert_eq!(series.kind, ChartKind::Bar);
        assert_eq!(series.points.len(), 3);
        assert_eq!(series.points[0].label, "WETH");
        assert_eq!(series.max_value(), 9.0);
    }

    #[test]
    fn empty_buckets_give_empty_series() {
        let series = swap_volume_series(&[]);
        assert!(series.is_empty());
        assert_eq!(series.max_value(), 0.0);
    }

    #[test]
    fn swap_labels_include_date_past_a_day() {
        let short = [
            Bucket { timestamp: 1_700_006_400, total_usd: 1.0, count: 1 },
            Bucket { timestamp: 1_700_007_000, total_usd: 2.0, count: 1 },
        ];
        assert_eq!(swap_volume_series(&short).points[1].label, "00:10");

        let long = [
            Bucket { timestamp: 1_700_006_400, total_usd: 1.0, count: 1 },
            Bucket { timestamp: 1_700_006_400 + 2 * 86_400, total_usd: 2.0, count: 1 },
        ];
        assert_eq!(swap_volume_series(&long).points[1].label, "11-17 00:00");
    }

    #[test]
    fn protocol_lines_share_ascending_dates() {
        let days = [day(1_700_092_800, 200.0), day(1_700_006_400, 100.0)];
        let charts = protocol_series(&days);

        for series in [&charts.tvl, &charts.volume, &charts.fees] {
            let labels: Vec<&str> = series.points.iter().map(|p| p.label.as_str()).collect();
            assert_eq!(labels, vec!["Nov 15", "Nov 16"]);
        }
        assert_eq!(charts.tvl.points[0].value, 100.0);
        assert_eq!(charts.fees.points[1].value, 0.2);
    }

    #[test]
    fn protocol_cards_use_latest_tvl() {
        let cards = protocol_cards(&[day(1_700_092_800, 200.0), day(1_700_006_400, 100.0)]);
        assert_eq!(cards[0], SummaryCard { title: "TVL", value: "$200.00".into() });
        assert_eq!(cards[1].value, "$30.00");
    }

    #[test]
    fn swap_cards_report_skipped_records() {
        let feed = SwapFeed {
            swaps: vec![Swap::new("a", 10.0, 1, "A", "B"), Swap::new("b", 30.0, 2, "A", "B")],
            skipped: 1,
            pages: 1,
            exhausted: true,
        };
        let cards = swap_cards(&feed, &[]);
        assert_eq!(cards[0].value, "$40.00");
        assert_eq!(cards[3].value, "$20.00");
        assert_eq!(cards.last().unwrap().title, "Skipped");
    }
}
