mod schema;

pub use schema::{Config, RetryConfig, ServiceConfig};
