//! gitpulse crate
//!
//! This crate is an implementation detail of the `gitpulse` tool. This crate's API is fluid and may change without warning
//! and in a semver-incompatible way.

#[doc(hidden)]
pub mod analysis;

#[doc(hidden)]
pub mod commands;

#[doc(hidden)]
pub mod config;

#[doc(hidden)]
pub mod facts;

#[doc(hidden)]
pub mod misc;

#[doc(hidden)]
pub mod reports;

#[doc(hidden)]
pub mod server;

pub use crate::commands::{Host, run};
