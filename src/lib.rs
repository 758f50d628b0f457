pub mod api;
pub mod cli;
pub mod client;
pub mod compute;
pub mod core;
pub mod error;
pub mod wire;

pub use error::ProjectionError;
