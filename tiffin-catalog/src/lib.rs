pub mod pricing;
pub mod http;

pub use pricing::{PricingEngine, PricingError};
pub use http::HttpCatalogClient;
