pub mod amount;
pub mod bucket;
pub mod day;
pub mod pool;
pub mod swap;
pub mod token;

pub use amount::AmountError;
pub use bucket::Bucket;
pub use day::{DayDatum, RawDayDatum, SECONDS_PER_DAY};
pub use pool::{Pool, RawPool};
pub use swap::{RawSwap, Swap};
pub use token::{RawToken, Token};
