pub mod cli;
pub mod config;
pub mod error;
pub mod ledger;
pub mod notation;
pub mod report;
pub mod source;
pub mod store;

pub use config::Config;
pub use error::{Error, Result};
pub use source::{GameRecord, GameSource};
pub use store::GameStore;
