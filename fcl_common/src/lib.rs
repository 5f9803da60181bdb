mod helpers;
mod secret;
mod usd_cents;

pub use helpers::parse_boolean_flag;
pub use secret::Secret;
pub use usd_cents::{UsdCents, UsdConversionError, USD_CURRENCY_CODE, USD_CURRENCY_CODE_LOWER};
