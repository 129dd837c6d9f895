pub mod cache;
pub mod normalize;
pub mod provider;
pub mod service;
pub mod types;
