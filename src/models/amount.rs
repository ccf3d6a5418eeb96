/// Subgraph numerics arrive as decimal strings (`"1234.5678"`), never as
/// JSON numbers.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AmountError {
    #[error("{field}: empty value")]
    Empty { field: &'static str },
    #[error("{field}: invalid number {value:?}")]
    Invalid { field: &'static str, value: String },
}

/// Parse a USD decimal string. Non-finite values are rejected.
pub fn parse_usd(field: &'static str, raw: &str) -> Result<f64, AmountError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(AmountError::Empty { field });
    }
    match trimmed.parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(v),
        _ => Err(AmountError::Invalid { field, value: raw.to_string() }),
    }
}

/// Parse a unix timestamp string (seconds).
pub fn parse_timestamp(field: &'static str, raw: &str) -> Result<i64, AmountError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(AmountError::Empty { field });
    }
    trimmed
        .parse::<i64>()
        .map_err(|_| AmountError::Invalid { field, value: raw.to_string() })
}
