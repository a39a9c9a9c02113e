//! Blocking HTTP transport for provider API calls and archive downloads.

mod client;

pub use client::{HttpClient, HttpClientConfig, HttpError};
