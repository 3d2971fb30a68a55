//! Core types for the fair-share scheduler simulation.
//!
//! Everything in this crate is passive data: task identity, priorities and
//! their weights, burst sequences, and the mutable `Task` record that the
//! engine moves between its pending, ready, running, blocked and finished
//! collections.
//!
//! # Components
//!
//! - [`TaskId`] / [`Nice`] - identity and validated static priority
//! - [`nice_to_weight`] - the fixed 40-entry nice → weight table
//! - [`Burst`] / [`BurstKind`] - a single CPU or I/O demand
//! - [`TaskDescriptor`] - raw, unvalidated input record
//! - [`Task`] - the simulated process

mod burst;
mod error;
mod identifiers;
mod task;
mod time;
mod weight;

pub use burst::{Burst, BurstKind};
pub use error::TypeError;
pub use identifiers::{Nice, TaskId};
pub use task::{Task, TaskDescriptor};
pub use time::{SimTime, TimeKey};
pub use weight::{nice_to_weight, NICE_0_WEIGHT, NICE_TO_WEIGHT};
