use serde::{Deserialize, Serialize};
use super::amount::{parse_usd, AmountError};

#[derive(Debug, Clone, Deserialize)]
pub struct RawToken {
    pub id: String,
    pub symbol: String,
    #[serde(rename = "volumeUSD")]
    pub volume_usd: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Token {
    pub id: String,
    pub symbol: String,
    pub volume_usd: f64,
}

impl TryFrom<RawToken> for Token {
    type Error = AmountError;

    fn try_from(raw: RawToken) -> Result<Self, Self::Error> {
        Ok(Self {
            volume_usd: parse_usd("volumeUSD", &raw.volume_usd)?,
            id: raw.id,
            symbol: raw.symbol,
        })
    }
}
