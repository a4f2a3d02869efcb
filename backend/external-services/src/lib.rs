pub mod service;
pub mod shared_metrics;

pub use service::HttpTransport;
