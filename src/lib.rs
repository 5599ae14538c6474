pub mod config;
pub mod error;
pub mod fetch;
pub mod infra;
pub mod models;
pub mod output;
pub mod services;
pub mod timestamp;

pub use error::{Error, ErrorKind, Result};
