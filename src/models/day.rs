use serde::{Deserialize, Serialize};
use super::amount::{parse_usd, AmountError};

pub const SECONDS_PER_DAY: i64 = 86_400;

#[derive(Debug, Clone, Deserialize)]
pub struct RawDayDatum {
    /// Start of the UTC day, unix seconds. The subgraph sends this one as a number.
    pub date: i64,
    #[serde(rename = "tvlUSD")]
    pub tvl_usd: String,
    #[serde(rename = "volumeUSD")]
    pub volume_usd: String,
    #[serde(rename = "feesUSD")]
    pub fees_usd: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayDatum {
    pub date: i64,
    pub tvl_usd: f64,
    pub volume_usd: f64,
    pub fees_usd: f64,
}

impl DayDatum {
    pub fn day_index(&self) -> i64 {
        self.date.div_euclid(SECONDS_PER_DAY)
    }
}

impl TryFrom<RawDayDatum> for DayDatum {
    type Error = AmountError;

    fn try_from(raw: RawDayDatum) -> Result<Self, Self::Error> {
        Ok(Self {
            date: raw.date,
            tvl_usd: parse_usd("tvlUSD", &raw.tvl_usd)?,
            volume_usd: parse_usd("volumeUSD", &raw.volume_usd)?,
            fees_usd: parse_usd("feesUSD", &raw.fees_usd)?,
        })
    }
}
