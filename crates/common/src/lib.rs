pub mod config;
pub mod data;
pub mod error;

mod log;

pub use config::CacheConfig;
pub use log::logging_stdout;
