use serde::Serialize;
use tokio::sync::broadcast;
use crate::models::{DayDatum, Pool, Swap, Token};
use crate::sources::Decoded;
use super::aggregator::{BucketPolicy, SwapAggregator};
use super::section::{RecordCount, Section, SectionEvent, SectionKind, SectionState, SectionStatus};

/// Loaded swap pages, newest first as fetched.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SwapFeed {
    pub swaps: Vec<Swap>,
    pub skipped: usize,
    pub pages: usize,
    /// Last page came back short; there is nothing more to load.
    pub exhausted: bool,
}

impl RecordCount for SwapFeed {
    fn record_count(&self) -> usize {
        self.swaps.len()
    }
}

impl<T> RecordCount for Decoded<T> {
    fn record_count(&self) -> usize {
        self.records.len()
    }
}

/// The four sections plus the channel their transitions go out on.
pub struct Dashboard {
    pub swaps: Section<SwapFeed>,
    pub tokens: Section<Decoded<Token>>,
    pub pools: Section<Decoded<Pool>>,
    pub protocol: Section<Decoded<DayDatum>>,
    aggregator: SwapAggregator,
    events: broadcast::Sender<SectionEvent>,
}

/// Point-in-time copy of every section, handed to the renderer.
#[derive(Debug, Clone)]
pub struct DashboardSnapshot {
    pub swaps: SectionState<SwapFeed>,
    pub tokens: SectionState<Decoded<Token>>,
    pub pools: SectionState<Decoded<Pool>>,
    pub protocol: SectionState<Decoded<DayDatum>>,
    pub policy: BucketPolicy,
}

impl Dashboard {
    pub fn new(policy: BucketPolicy) -> Self {
        let (events, _) = broadcast::channel(64);
        Self {
            swaps: Section::new(SectionKind::Swaps, events.clone()),
            tokens: Section::new(SectionKind::Tokens, events.clone()),
            pools: Section::new(SectionKind::Pools, events.clone()),
            protocol: Section::new(SectionKind::Protocol, events.clone()),
            aggregator: SwapAggregator::new(policy),
            events,
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SectionEvent> {
        self.events.subscribe()
    }

    pub fn aggregator(&self) -> &SwapAggregator {
        &self.aggregator
    }

    pub fn status(&self, kind: SectionKind) -> SectionStatus {
        match kind {
            SectionKind::Swaps => self.swaps.status(),
            SectionKind::Tokens => self.tokens.status(),
            SectionKind::Pools => self.pools.status(),
            SectionKind::Protocol => self.protocol.status(),
        }
    }

    pub fn is_settled(&self) -> bool {
        SectionKind::ALL
            .iter()
            .all(|k| self.status(*k) != SectionStatus::Pending)
    }

    pub fn snapshot(&self) -> DashboardSnapshot {
        DashboardSnapshot {
            swaps: self.swaps.state(),
            tokens: self.tokens.state(),
            pools: self.pools.state(),
            protocol: self.protocol.state(),
            policy: self.aggregator.policy(),
        }
    }
}
