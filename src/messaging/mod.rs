//! # Messaging Module
//!
//! Host command queue the scheduler delivers work through.

pub mod action_queue;

pub use action_queue::{ActionQueue, InMemoryActionQueue};
