mod money;

pub mod op;
mod helpers;

pub use helpers::parse_boolean_flag;
pub use money::{Money, MoneyConversionError};
