pub mod client;
pub mod escape;
pub mod queries;
pub mod reshape;
pub mod service;
pub mod window;

pub use client::EventStoreClient;
pub use service::InsightsService;
