pub mod fetch;
pub mod indicators;
pub mod series;

pub use fetch::{FetchError, OhlcClient};
pub use indicators::{add_bollinger_bands, add_moving_average};
pub use series::{PricePoint, PriceSeries};
