//! Utility modules shared by the API client and the CLI.

mod http;

pub use http::HttpClient;
