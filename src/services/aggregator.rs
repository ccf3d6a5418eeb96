use std::collections::BTreeMap;
use crate::config::{AggregationConfig, AggregationPolicy};
use crate::models::{Bucket, Swap};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BucketPolicy {
    /// Contiguous chunks of N swaps in time order; x = average timestamp of the chunk.
    ByCount(usize),
    /// Fixed windows of N seconds; x = window start.
    ByTime(i64),
}

impl BucketPolicy {
    pub fn from_config(config: &AggregationConfig) -> Self {
        match config.policy {
            AggregationPolicy::Count => BucketPolicy::ByCount(config.bucket_size.max(1)),
            AggregationPolicy::Time => BucketPolicy::ByTime(config.interval_secs.max(1)),
        }
    }

    pub fn describe(&self) -> String {
        match self {
            BucketPolicy::ByCount(n) => format!("{} swaps per bucket", n),
            BucketPolicy::ByTime(secs) if secs % 60 == 0 => format!("{}-minute buckets", secs / 60),
            BucketPolicy::ByTime(secs) => format!("{}-second buckets", secs),
        }
    }
}

pub struct SwapAggregator {
    policy: BucketPolicy,
}

impl SwapAggregator {
    pub fn new(policy: BucketPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> BucketPolicy {
        self.policy
    }

    /// Buckets come out in ascending time order and their totals sum to the
    /// input total. Empty input gives no buckets.
    pub fn aggregate(&self, swaps: &[Swap]) -> Vec<Bucket> {
        match self.policy {
            BucketPolicy::ByCount(size) => by_count(swaps, size),
            BucketPolicy::ByTime(width) => by_time(swaps, width),
        }
    }
}

fn by_count(swaps: &[Swap], size: usize) -> Vec<Bucket> {
    // Subgraph returns newest first
    let mut ordered: Vec<&Swap> = swaps.iter().collect();
    ordered.sort_by_key(|s| s.timestamp);

    ordered
        .chunks(size.max(1))
        .map(|chunk| {
            let ts_sum: i128 = chunk.iter().map(|s| s.timestamp as i128).sum();
            Bucket {
                timestamp: ts_sum.div_euclid(chunk.len() as i128) as i64,
                total_usd: chunk.iter().map(|s| s.amount_usd).sum(),
                count: chunk.len(),
            }
        })
        .collect()
}

fn by_time(swaps: &[Swap], width: i64) -> Vec<Bucket> {
    let width = width.max(1);
    let mut windows: BTreeMap<i64, (f64, usize)> = BTreeMap::new();

    for swap in swaps {
        let key = swap.timestamp.div_euclid(width) * width;
        let entry = windows.entry(key).or_insert((0.0, 0));
        entry.0 += swap.amount_usd;
        entry.1 += 1;
    }

    windows
        .into_iter()
        .map(|(timestamp, (total_usd, count))| Bucket { timestamp, total_usd, count })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn swap(amount: f64, ts: i64) -> Swap {
        Swap::new(&format!("0x{}", ts), amount, ts, "WETH", "USDC")
    }

    /// Newest-first, like the subgraph returns them.
    fn sample(n: i64) -> Vec<Swap> {
        (0..n)
            .rev()
            .map(|i| swap(((i * 37) % 1000) as f64 + 0.25, 1_700_000_000 + i * 47))
            .collect()
    }

    fn total(buckets: &[Bucket]) -> f64 {
        buckets.iter().map(|b| b.total_usd).sum()
    }

    #[test]
    fn two_swaps_fill_one_count_bucket() {
        let swaps = vec![swap(10.0, 1000), swap(20.0, 1001)];
        let buckets = SwapAggregator::new(BucketPolicy::ByCount(100)).aggregate(&swaps);

        assert_eq!(buckets.len(), 1);
        assert_eq!(buckets[0].total_usd, 30.0);
        assert_eq!(buckets[0].count, 2);
        assert_eq!(buckets[0].timestamp, 1000);
    }

    #[test]
    fn same_window_shares_a_time_bucket() {
        let swaps = vec![swap(5.0, 0), swap(7.5, 300)];
        let buckets = SwapAggregator::new(BucketPolicy::ByTime(600)).aggregate(&swaps);

        assert_eq!(buckets, vec![Bucket { timestamp: 0, total_usd: 12.5, count: 2 }]);
    }

    #[test]
    fn empty_input_gives_no_buckets() {
        for policy in [BucketPolicy::ByCount(100), BucketPolicy::ByTime(600)] {
            assert!(SwapAggregator::new(policy).aggregate(&[]).is_empty());
        }
    }

    #[test]
    fn remainder_chunk_uses_same_formula() {
        let swaps = sample(250);
        let buckets = SwapAggregator::new(BucketPolicy::ByCount(100)).aggregate(&swaps);

        assert_eq!(buckets.iter().map(|b| b.count).collect::<Vec<_>>(), vec![100, 100, 50]);
        let mut tail: Vec<&Swap> = swaps.iter().collect();
        tail.sort_by_key(|s| s.timestamp);
        let tail = &tail[200..];
        let expected: f64 = tail.iter().map(|s| s.amount_usd).sum();
        assert!((buckets[2].total_usd - expected).abs() < 1e-9);
    }

    #[test]
    fn totals_are_preserved() {
        let swaps = sample(1234);
        let raw: f64 = swaps.iter().map(|s| s.amount_usd).sum();

        for policy in [BucketPolicy::ByCount(100), BucketPolicy::ByCount(7), BucketPolicy::ByTime(600), BucketPolicy::ByTime(60)] {
            let buckets = SwapAggregator::new(policy).aggregate(&swaps);
            assert!((total(&buckets) - raw).abs() < 1e-6, "{:?}", policy);
            assert_eq!(buckets.iter().map(|b| b.count).sum::<usize>(), swaps.len());
        }
    }

    #[test]
    fn buckets_ascend_in_time() {
        let swaps = sample(500);
        for policy in [BucketPolicy::ByCount(100), BucketPolicy::ByTime(600)] {
            let buckets = SwapAggregator::new(policy).aggregate(&swaps);
            assert!(buckets.windows(2).all(|w| w[0].timestamp <= w[1].timestamp));
        }
    }

    #[test]
    fn count_bucket_x_is_average_timestamp() {
        let swaps = vec![swap(1.0, 30), swap(1.0, 10), swap(1.0, 20), swap(1.0, 100)];
        let buckets = SwapAggregator::new(BucketPolicy::ByCount(3)).aggregate(&swaps);
        assert_eq!(buckets[0].timestamp, 20);
        assert_eq!(buckets[1].timestamp, 100);
    }

    #[test]
    fn time_keys_floor_negative_timestamps() {
        let buckets = SwapAggregator::new(BucketPolicy::ByTime(600)).aggregate(&[swap(1.0, -1)]);
        assert_eq!(buckets[0].timestamp, -600);
    }

    #[test]
    fn policy_descriptions() {
        assert_eq!(BucketPolicy::ByTime(600).describe(), "10-minute buckets");
        assert_eq!(BucketPolicy::ByTime(45).describe(), "45-second buckets");
        assert_eq!(BucketPolicy::ByCount(100).describe(), "100 swaps per bucket");
    }
}
