//! 限速并发调度模块：固定间隔的起步节流、按批扇出、单流扇入收集。
//!
//! # Rate-Limited Dispatch Module
//!
//! This module owns the only real coordination logic in the crate: pacing,
//! fan-out, and fan-in of batch classification requests.
//!
//! ## Overview
//!
//! A dispatch run is driven by a single coordinating task. It walks the
//! batch sequence in input order; for each batch it waits on the
//! [`PacingGate`] for the next start permit, then spawns an independent
//! worker task. Workers invoke the classification capability and publish
//! their [`BatchOutcome`] to the shared outcome queue. The returned
//! [`OutcomeStream`] yields outcomes in completion order (not submission
//! order) and closes exactly once every batch has published.
//!
//! ## Key Components
//!
//! | Component | Description |
//! |-----------|-------------|
//! | [`PacingGate`] | Releases one start permit per fixed interval |
//! | [`Dispatcher`] | Paces, fans out, and tracks a dispatch run |
//! | [`DispatcherConfig`] | Pacing interval and queue capacity policy |
//! | [`QueueCapacity`] | Bounded (backpressuring) or unbounded outcome queue |
//! | [`BatchOutcome`] | Per-batch result, attributed to its originating batch |
//! | [`OutcomeStream`] | Single-consumer stream of outcomes |
//!
//! ## Rate semantics
//!
//! The configured requests-per-minute ceiling bounds how fast batch tasks
//! *start*, not how fast they complete. With the default
//! [`QueueCapacity::Bounded`] queue a slow consumer stalls publishes, so
//! real completion throughput is also gated by how fast the caller drains
//! the stream. [`QueueCapacity::Unbounded`] removes that coupling.

mod dispatcher;
mod pacing;

pub use dispatcher::{BatchOutcome, Dispatcher, DispatcherConfig, OutcomeStream, QueueCapacity};
pub use pacing::PacingGate;
