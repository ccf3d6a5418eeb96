use serde::{Deserialize, Serialize};
use super::amount::{parse_timestamp, parse_usd, AmountError};

#[derive(Debug, Clone, Deserialize)]
pub struct RawTokenRef {
    pub symbol: String,
}

/// Swap record as returned by the subgraph.
#[derive(Debug, Clone, Deserialize)]
pub struct RawSwap {
    pub id: String,
    #[serde(rename = "amountUSD")]
    pub amount_usd: String,
    pub timestamp: String,
    pub token0: RawTokenRef,
    pub token1: RawTokenRef,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Swap {
    pub id: String,
    pub amount_usd: f64,
    pub timestamp: i64,
    pub token0: String,
    pub token1: String,
}

impl Swap {
    #[cfg(test)]
    pub fn new(id: &str, amount_usd: f64, timestamp: i64, token0: &str, token1: &str) -> Self {
        Self {
            id: id.to_string(),
            amount_usd,
            timestamp,
            token0: token0.to_string(),
            token1: token1.to_string(),
        }
    }

    pub fn pair(&self) -> String {
        format!("{}/{}", self.token0, self.token1)
    }
}

impl TryFrom<RawSwap> for Swap {
    type Error = AmountError;

    fn try_from(raw: RawSwap) -> Result<Self, Self::Error> {
        Ok(Self {
            amount_usd: parse_usd("amountUSD", &raw.amount_usd)?,
            timestamp: parse_timestamp("timestamp", &raw.timestamp)?,
            id: raw.id,
            token0: raw.token0.symbol,
            token1: raw.token1.symbol,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_subgraph_record() {
        let raw: RawSwap = serde_json::from_value(serde_json::json!({
            "id": "0xabc#1",
            "amountUSD": "1520.25",
            "timestamp": "1700000000",
            "token0": { "symbol": "WETH" },
            "token1": { "symbol": "USDC" }
        }))
        .unwrap();

        let swap = Swap::try_from(raw).unwrap();
        assert_eq!(swap.amount_usd, 1520.25);
        assert_eq!(swap.timestamp, 1_700_000_000);
        assert_eq!(swap.pair(), "WETH/USDC");
    }

    #[test]
    fn malformed_amount_is_an_error() {
        let raw = RawSwap {
            id: "x".into(),
            amount_usd: "n/a".into(),
            timestamp: "1".into(),
            token0: RawTokenRef { symbol: "A".into() },
            token1: RawTokenRef { symbol: "B".into() },
        };
        assert!(Swap::try_from(raw).is_err());
    }
}
