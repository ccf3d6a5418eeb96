use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{json, Value};
use crate::models::AmountError;
use super::QueryError;

pub const SWAPS_QUERY: &str = r#"query Swaps($first: Int!, $skip: Int!) {
  swaps(first: $first, skip: $skip, orderBy: timestamp, orderDirection: desc) {
    id
    amountUSD
    timestamp
    token0 { symbol }
    token1 { symbol }
  }
}"#;

pub const TOP_TOKENS_QUERY: &str = r#"query TopTokens($first: Int!) {
  tokens(first: $first, orderBy: volumeUSD, orderDirection: desc) {
    id
    symbol
    volumeUSD
  }
}"#;

pub const TOP_POOLS_QUERY: &str = r#"query TopPools($first: Int!) {
  pools(first: $first, orderBy: volumeUSD, orderDirection: desc) {
    id
    feeTier
    token0 { symbol }
    token1 { symbol }
    volumeUSD
  }
}"#;

pub const DAY_DATAS_QUERY: &str = r#"query ProtocolDays($first: Int!) {
  uniswapDayDatas(first: $first, orderBy: date, orderDirection: desc) {
    date
    tvlUSD
    volumeUSD
    feesUSD
  }
}"#;

/// The four fixed queries the dashboard issues.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum QueryKind {
    Swaps,
    TopTokens,
    TopPools,
    DayDatas,
}

impl QueryKind {
    pub fn document(&self) -> &'static str {
        match self {
            QueryKind::Swaps => SWAPS_QUERY,
            QueryKind::TopTokens => TOP_TOKENS_QUERY,
            QueryKind::TopPools => TOP_POOLS_QUERY,
            QueryKind::DayDatas => DAY_DATAS_QUERY,
        }
    }

    /// Top-level field holding the record list in `data`.
    pub fn root_field(&self) -> &'static str {
        match self {
            QueryKind::Swaps => "swaps",
            QueryKind::TopTokens => "tokens",
            QueryKind::TopPools => "pools",
            QueryKind::DayDatas => "uniswapDayDatas",
        }
    }
}

pub fn page_variables(first: usize, skip: usize) -> Value {
    json!({ "first": first, "skip": skip })
}

pub fn first_variables(first: usize) -> Value {
    json!({ "first": first })
}

/// Records that survived numeric parsing, plus how many were dropped.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Decoded<T> {
    pub records: Vec<T>,
    pub skipped: usize,
}

/// Decode `data.<root_field>` into typed records.
///
/// A missing or non-list field fails the whole response, and so does a record
/// with the wrong shape. Records whose numeric strings don't parse are skipped
/// and counted.
pub fn decode<R, T>(kind: QueryKind, data: &Value) -> Result<Decoded<T>, QueryError>
where
    R: DeserializeOwned,
    T: TryFrom<R, Error = AmountError>,
{
    let field = kind.root_field();
    let items = match data.get(field) {
        Some(Value::Array(items)) => items,
        Some(Value::Null) | None => return Err(QueryError::MissingField(field.to_string())),
        Some(other) => {
            return Err(QueryError::Decode(format!("`{}` is not a list: {}", field, other)))
        }
    };

    let mut records = Vec::with_capacity(items.len());
    let mut skipped = 0;
    for item in items {
        let raw: R = serde_json::from_value(item.clone())
            .map_err(|e| QueryError::Decode(format!("{}: {}", field, e)))?;
        match T::try_from(raw) {
            Ok(record) => records.push(record),
            Err(e) => {
                tracing::warn!("Skipping {} record: {}", field, e);
                skipped += 1;
            }
        }
    }

    Ok(Decoded { records, skipped })
}
