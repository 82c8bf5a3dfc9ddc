pub mod client;
pub mod error;

pub use client::HttpClient;
pub use error::HttpError;
