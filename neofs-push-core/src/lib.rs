#![doc = "neofs-push-core: core logic library for neofs-push."]

//! Everything needed to publish a directory into a NeoFS container, independent of the
//! command line: command execution, file enumeration, attribute compilation, expiration,
//! stale-object reconciliation, the publish flow and post-publish verification.
//!
//! # Usage
//! Implement [`contract::StorageClient`] for your transport (the `neofs-push` crate drives
//! `neofs-cli`) and call [`publish::publish`].

pub mod attributes;
pub mod config;
pub mod contract;
pub mod enumerate;
pub mod epoch;
pub mod error;
pub mod executor;
pub mod publish;
pub mod reconcile;
pub mod verify;

pub use error::PublishError;
