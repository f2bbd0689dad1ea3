pub mod config;
pub mod error;
pub mod eth;
pub mod types;
pub mod worker;

pub use config::Config;
pub use eth::{EthClient, HatchChain};
pub use worker::run_worker;
