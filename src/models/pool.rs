use serde::{Deserialize, Serialize};
use super::amount::{parse_usd, AmountError};
use super::swap::RawTokenRef;

#[derive(Debug, Clone, Deserialize)]
pub struct RawPool {
    pub id: String,
    pub token0: RawTokenRef,
    pub token1: RawTokenRef,
    #[serde(rename = "feeTier", default)]
    pub fee_tier: Option<String>,
    #[serde(rename = "volumeUSD")]
    pub volume_usd: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pool {
    pub id: String,
    pub token0: String,
    pub token1: String,
    /// Hundredths of a basis point (500 = 0.05%)
    pub fee_tier: Option<u32>,
    pub volume_usd: f64,
}

impl Pool {
    pub fn pair(&self) -> String {
        match self.fee_tier {
            Some(tier) => format!("{}/{} {}%", self.token0, self.token1, tier as f64 / 10_000.0),
            None => format!("{}/{}", self.token0, self.token1),
        }
    }
}

impl TryFrom<RawPool> for Pool {
    type Error = AmountError;

    fn try_from(raw: RawPool) -> Result<Self, Self::Error> {
        Ok(Self {
            volume_usd: parse_usd("volumeUSD", &raw.volume_usd)?,
            // fee tier only decorates the label
            fee_tier: raw.fee_tier.and_then(|t| t.trim().parse().ok()),
            id: raw.id,
            token0: raw.token0.symbol,
            token1: raw.token1.symbol,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pool(fee_tier: Option<u32>) -> Pool {
        Pool {
            id: "0x88e6".into(),
            token0: "USDC".into(),
            token1: "WETH".into(),
            fee_tier,
            volume_usd: 1.0,
        }
    }

    #[test]
    fn pair_label_includes_fee_tier() {
        assert_eq!(pool(Some(500)).pair(), "USDC/WETH 0.05%");
        assert_eq!(pool(Some(3000)).pair(), "USDC/WETH 0.3%");
        assert_eq!(pool(None).pair(), "USDC/WETH");
    }
}
