pub mod aggregator;
pub mod cache;
pub mod dashboard;
pub mod loader;
pub mod section;

pub use aggregator::{BucketPolicy, SwapAggregator};
pub use cache::QueryCache;
pub use dashboard::{Dashboard, DashboardSnapshot, SwapFeed};
pub use loader::{DashboardLoader, LoadMoreError};
pub use section::{SectionKind, SectionState};
