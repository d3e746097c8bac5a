#![deny(missing_docs, clippy::all, clippy::pedantic)]
#![doc = include_str!("../README.md")]

pub mod config;
pub use config::{Config, DefaultConfig};

pub mod error;
pub use error::OwnershipError;

pub mod lock;
pub use lock::SharedLock;

pub mod slots;
pub use slots::{SLOT_COUNT, UnitId};

#[cfg(test)]
mod tests;
