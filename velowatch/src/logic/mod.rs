pub mod backoff;
pub mod builder;
pub mod client;
pub mod config;
pub mod reltime;
pub mod types;
