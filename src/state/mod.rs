//! State module for tracking crawl progress
//!
//! - `WorkerState`: the lifecycle of a single genre worker, with the legal
//!   transitions between pages spelled out

mod worker_state;

pub use worker_state::WorkerState;
