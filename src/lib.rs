// bria-proxy - Thin HTTP backend for the Bria image API
// Author: kelexine (https://github.com/kelexine)

pub mod bria;
pub mod cli;
pub mod config;
pub mod error;
pub mod forwarders;
pub mod metrics;
pub mod models;
pub mod server;
pub mod utils;
