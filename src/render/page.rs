use std::fmt::Write;
use crate::models::{Bucket, Swap};
use crate::services::{DashboardSnapshot, SectionKind, SectionState, SwapAggregator, SwapFeed};
use super::format::{escape_html, format_datetime, format_usd_exact};
use super::series::{
    pool_volume_series, protocol_cards, protocol_series, swap_cards, swap_volume_series,
    token_volume_series, SummaryCard,
};
use super::svg::render_chart;

const STYLE: &str = r#"
  :root { --bg:#0d1117; --panel:#161b22; --border:#30363d; --fg:#c9d1d9; --muted:#8b949e; --red:#f85149; }
  body { background:var(--bg); color:var(--fg); font-family:-apple-system,Segoe UI,Helvetica,Arial,sans-serif; margin:0; padding:1.5rem; }
  h1 { font-size:1.3rem; margin:0 0 1rem; }
  section { background:var(--panel); border:1px solid var(--border); border-radius:8px; padding:1rem; margin-bottom:1.25rem; }
  h2 { font-size:1rem; margin:0 0 .75rem; }
  .cards { display:flex; gap:.75rem; flex-wrap:wrap; margin-bottom:.75rem; }
  .card { border:1px solid var(--border); border-radius:6px; padding:.5rem .75rem; min-width:110px; }
  .card .title { color:var(--muted); font-size:.7rem; text-transform:uppercase; }
  .card .value { font-size:1.1rem; font-family:ui-monospace,monospace; }
  .chart .grid { stroke:var(--border); stroke-width:1; }
  .chart .axis, .chart .empty { fill:var(--muted); font-size:11px; }
  .loading { color:var(--muted); font-style:italic; }
  .error { color:var(--red); border:1px dashed var(--red); border-radius:6px; padding:.75rem; }
  .grid3 { display:grid; grid-template-columns:repeat(auto-fit,minmax(300px,1fr)); gap:1rem; }
  table { width:100%; border-collapse:collapse; font-size:.8rem; }
  td, th { padding:.25rem .5rem; border-bottom:1px solid var(--border); text-align:left; }
  td.num { text-align:right; font-family:ui-monospace,monospace; }
  .muted { color:var(--muted); font-size:.75rem; }
"#;

const SCRIPT: &str = r#"
  const ws = new WebSocket((location.protocol === 'https:' ? 'wss://' : 'ws://') + location.host + '/ws');
  ws.onmessage = (msg) => {
    const event = JSON.parse(msg.data);
    if (event.status !== 'pending') location.reload();
  };
  function loadMore(btn) {
    btn.disabled = true;
    fetch('/api/swaps/more', { method: 'POST' }).then(() => location.reload());
  }
  function reloadSection(section, btn) {
    btn.disabled = true;
    fetch('/api/sections/' + section + '/reload', { method: 'POST' }).then(() => location.reload());
  }
"#;

/// Full dashboard page: four sections in fixed order.
pub fn render_page(snapshot: &DashboardSnapshot, recent_swaps: usize) -> String {
    let aggregator = SwapAggregator::new(snapshot.policy);
    let mut html = String::with_capacity(64 * 1024);
    let _ = write!(
        html,
        "<!DOCTYPE html><html lang=\"en\"><head><meta charset=\"utf-8\"><title>Uniswap V3 Dashboard</title><style>{}</style></head><body><h1>Uniswap V3 Dashboard</h1>",
        STYLE
    );

    html.push_str(&section(SectionKind::Swaps, &snapshot.swaps, |feed| {
        let buckets = aggregator.aggregate(&feed.swaps);
        swaps_body(feed, &buckets, &aggregator.policy().describe(), recent_swaps)
    }));
    html.push_str(&section(SectionKind::Tokens, &snapshot.tokens, |tokens| {
        render_chart(&token_volume_series(&tokens.records))
    }));
    html.push_str(&section(SectionKind::Pools, &snapshot.pools, |pools| {
        render_chart(&pool_volume_series(&pools.records))
    }));
    html.push_str(&section(SectionKind::Protocol, &snapshot.protocol, |days| {
        let charts = protocol_series(&days.records);
        let mut body = cards(&protocol_cards(&days.records));
        body.push_str("<div class=\"grid3\">");
        for chart in [&charts.tvl, &charts.volume, &charts.fees] {
            let _ = write!(body, "<div><h3 class=\"muted\">{}</h3>{}</div>", escape_html(&chart.title), render_chart(chart));
        }
        body.push_str("</div>");
        body
    }));

    let _ = write!(html, "<script>{}</script></body></html>", SCRIPT);
    html
}

/// Pending → loading text, failed → the error plus a reload button and no
/// chart, succeeded → body.
pub fn section<T, F>(kind: SectionKind, state: &SectionState<T>, body: F) -> String
where
    F: FnOnce(&T) -> String,
{
    let inner = match state {
        SectionState::Pending => "<p class=\"loading\">Loading…</p>".to_string(),
        SectionState::Failed { message } => {
            format!(
                "<div class=\"error\">Error: {}</div><button onclick=\"reloadSection('{}', this)\">Reload</button>",
                escape_html(message),
                kind.as_str()
            )
        }
        SectionState::Succeeded { data } => body(data),
    };
    format!(
        "<section id=\"{}\"><h2>{}</h2>{}</section>",
        kind.as_str(),
        kind.title(),
        inner
    )
}

fn cards(cards: &[SummaryCard]) -> String {
    let mut html = String::from("<div class=\"cards\">");
    for card in cards {
        let _ = write!(
            html,
            "<div class=\"card\"><div class=\"title\">{}</div><div class=\"value\">{}</div></div>",
            card.title,
            escape_html(&card.value)
        );
    }
    html.push_str("</div>");
    html
}

fn swaps_body(feed: &SwapFeed, buckets: &[Bucket], policy: &str, recent: usize) -> String {
    let mut body = cards(&swap_cards(feed, buckets));
    let _ = write!(body, "<p class=\"muted\">{}</p>", escape_html(policy));
    body.push_str(&render_chart(&swap_volume_series(buckets)));
    body.push_str(&recent_swaps(&feed.swaps[..recent.min(feed.swaps.len())]));
    if !feed.exhausted {
        body.push_str("<button onclick=\"loadMore(this)\">Load more</button>");
    }
    body
}

fn recent_swaps(swaps: &[Swap]) -> String {
    if swaps.is_empty() {
        return "<p class=\"muted\">No swaps</p>".to_string();
    }
    let mut html = String::from("<table><thead><tr><th>Pair</th><th>Amount</th><th>Time (UTC)</th></tr></thead><tbody>");
    for swap in swaps {
        let _ = write!(
            html,
            "<tr><td>{}</td><td class=\"num\">{}</td><td>{}</td></tr>",
            escape_html(&swap.pair()),
            format_usd_exact(swap.amount_usd),
            format_datetime(swap.timestamp)
        );
    }
    html.push_str("</tbody></table>");
    html
}
