//! # Database Operations
//!
//! The task database collaborator: the [`ActionDbAccessor`] seam the scheduler
//! reads queued stages from and writes command outcomes to, plus an in-memory
//! implementation used by the scheduler process and tests.

pub mod action_db;

pub use action_db::{ActionDbAccessor, InMemoryActionDb};
