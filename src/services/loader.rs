use std::sync::Arc;
use serde_json::Value;
use tokio::sync::Mutex;
use crate::config::QueryConfig;
use crate::models::{DayDatum, Pool, RawDayDatum, RawPool, RawSwap, RawToken, Swap, Token};
use crate::sources::queries::{self, first_variables, page_variables};
use crate::sources::{Decoded, QueryError, QueryKind, SubgraphSource};
use super::dashboard::{Dashboard, SwapFeed};
use super::section::{SectionKind, SectionState};
use super::QueryCache;

#[derive(Debug, thiserror::Error)]
pub enum LoadMoreError {
    #[error("swap section is not loaded")]
    NotLoaded,
    #[error("swap section was reloaded while the page was in flight")]
    Superseded,
    #[error(transparent)]
    Query(#[from] QueryError),
}

/// Runs the four section fetches against the subgraph and writes the outcome
/// into the dashboard. Responses go through the query cache.
pub struct DashboardLoader {
    source: Arc<dyn SubgraphSource>,
    cache: Arc<QueryCache>,
    dashboard: Arc<Dashboard>,
    queries: QueryConfig,
    /// Serializes swap page fetches so pages append in order.
    swap_pages: Mutex<()>,
}

impl DashboardLoader {
    pub fn new(
        source: Arc<dyn SubgraphSource>,
        cache: Arc<QueryCache>,
        dashboard: Arc<Dashboard>,
        queries: QueryConfig,
    ) -> Self {
        Self {
            source,
            cache,
            dashboard,
            queries,
            swap_pages: Mutex::new(()),
        }
    }

    pub fn dashboard(&self) -> &Arc<Dashboard> {
        &self.dashboard
    }

    pub fn cache(&self) -> &Arc<QueryCache> {
        &self.cache
    }

    pub fn queries(&self) -> &QueryConfig {
        &self.queries
    }

    /// Fetch all four sections concurrently. Each settles on its own.
    pub async fn load_all(&self) {
        futures::join!(
            self.load_section(SectionKind::Swaps),
            self.load_section(SectionKind::Tokens),
            self.load_section(SectionKind::Pools),
            self.load_section(SectionKind::Protocol),
        );
        tracing::info!("✓ Dashboard sections settled (cache: {} responses)", self.cache.len());
    }

    pub async fn load_section(&self, kind: SectionKind) {
        match kind {
            SectionKind::Swaps => {
                let section = &self.dashboard.swaps;
                section.begin();
                let _guard = self.swap_pages.lock().await;
                section.resolve(self.fetch_swap_feed().await);
            }
            SectionKind::Tokens => {
                let section = &self.dashboard.tokens;
                section.begin();
                section.resolve(self.fetch_top_tokens().await);
            }
            SectionKind::Pools => {
                let section = &self.dashboard.pools;
                section.begin();
                section.resolve(self.fetch_top_pools().await);
            }
            SectionKind::Protocol => {
                let section = &self.dashboard.protocol;
                section.begin();
                section.resolve(self.fetch_day_datas().await);
            }
        }
    }

    /// Manual re-fetch: cached responses for the section are dropped first.
    pub async fn reload(&self, kind: SectionKind) {
        let query = match kind {
            SectionKind::Swaps => QueryKind::Swaps,
            SectionKind::Tokens => QueryKind::TopTokens,
            SectionKind::Pools => QueryKind::TopPools,
            SectionKind::Protocol => QueryKind::DayDatas,
        };
        self.cache.clear_query(query.document());
        tracing::info!("Reloading section {}", kind);
        self.load_section(kind).await;
    }

    /// Fetch the next swap page and append it after the loaded ones.
    /// Returns how many swaps were added.
    pub async fn load_more_swaps(&self) -> Result<usize, LoadMoreError> {
        let _guard = self.swap_pages.lock().await;

        let (loaded, exhausted) = match self.dashboard.swaps.state() {
            SectionState::Succeeded { data } => (data.swaps.len() + data.skipped, data.exhausted),
            _ => return Err(LoadMoreError::NotLoaded),
        };
        if exhausted {
            return Ok(0);
        }

        let page_size = self.queries.page_size;
        let page = self.fetch_swap_page(page_size, loaded).await?;
        let added = page.records.len();

        let appended = self.dashboard.swaps.update(|feed| {
            feed.exhausted = page.records.len() + page.skipped < page_size;
            feed.skipped += page.skipped;
            feed.pages += 1;
            feed.swaps.extend(page.records);
        });
        if !appended {
            tracing::debug!("Dropped swap page at skip={}: section reloaded", loaded);
            return Err(LoadMoreError::Superseded);
        }
        tracing::debug!("Loaded {} more swaps (skip={})", added, loaded);
        Ok(added)
    }

    async fn fetch(&self, kind: QueryKind, variables: Value) -> Result<Arc<Value>, QueryError> {
        let query = kind.document();
        if let Some(hit) = self.cache.get(query, &variables) {
            tracing::trace!("Cache hit for {:?} {}", kind, variables);
            return Ok(hit);
        }
        tracing::debug!("Querying {} for {:?} {}", self.source.name(), kind, variables);
        let data = self.source.execute(query, &variables).await?;
        Ok(self.cache.insert(query, &variables, data))
    }

    async fn fetch_swap_page(&self, first: usize, skip: usize) -> Result<Decoded<Swap>, QueryError> {
        let data = self.fetch(QueryKind::Swaps, page_variables(first, skip)).await?;
        queries::decode::<RawSwap, Swap>(QueryKind::Swaps, &data)
    }

    /// Pages through the swap list until `swap_limit` or a short page.
    async fn fetch_swap_feed(&self) -> Result<SwapFeed, QueryError> {
        let limit = self.queries.swap_limit;
        let page_size = self.queries.page_size.max(1);
        let mut feed = SwapFeed::default();

        while feed.swaps.len() + feed.skipped < limit {
            let seen = feed.swaps.len() + feed.skipped;
            let first = page_size.min(limit - seen);
            let page = self.fetch_swap_page(first, seen).await?;
            let received = page.records.len() + page.skipped;

            feed.pages += 1;
            feed.skipped += page.skipped;
            feed.swaps.extend(page.records);

            if received < first {
                feed.exhausted = true;
                break;
            }
        }

        Ok(feed)
    }

    async fn fetch_top_tokens(&self) -> Result<Decoded<Token>, QueryError> {
        let data = self.fetch(QueryKind::TopTokens, first_variables(self.queries.top_n)).await?;
        queries::decode::<RawToken, Token>(QueryKind::TopTokens, &data)
    }

    async fn fetch_top_pools(&self) -> Result<Decoded<Pool>, QueryError> {
        let data = self.fetch(QueryKind::TopPools, first_variables(self.queries.top_n)).await?;
        queries::decode::<RawPool, Pool>(QueryKind::TopPools, &data)
    }

    /// Newest days are fetched; charts want them oldest first.
    async fn fetch_day_datas(&self) -> Result<Decoded<DayDatum>, QueryError> {
        let data = self.fetch(QueryKind::DayDatas, first_variables(self.queries.protocol_days)).await?;
        let mut days = queries::decode::<RawDayDatum, DayDatum>(QueryKind::DayDatas, &data)?;
        days.records.sort_by_key(|d| d.date);
        Ok(days)
    }
}
