mod api;
mod timeouts;

pub use api::{ApiConfig, API_URL_ENV, DEFAULT_API_BASE_URL};
pub use timeouts::TimeoutConfig;
