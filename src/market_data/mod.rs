pub mod bar;
pub mod memory;
pub mod source;

// Re-export the series types for convenient access (e.g. `use crate::market_data::PriceSeries`).
pub use bar::{PriceBar, PriceSeries};
pub use memory::InMemoryPriceSource;
pub use source::PriceDataSource;
