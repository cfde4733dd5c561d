//! Provider clients for mixfeed.
//!
//! This crate provides the concrete `ProviderClient` implementations the cache
//! refreshes from, and the glue that builds them from configuration.

pub mod http;
pub mod registry;
pub mod sample;

pub use http::{ClientError, HttpProvider, HttpProviderConfig};
pub use registry::{build_client, provider_configs};
pub use sample::SampleProvider;
