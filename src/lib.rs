//! # docclassify
//!
//! 限速批量文本分类客户端：按固定批次拆分文档，在请求速率上限内并发提交。
//!
//! Rate-limited batch dispatch client for remote text classification
//! services. Splits a document set into fixed-size batches and submits one
//! request per batch, concurrently, without exceeding a configured
//! requests-per-minute ceiling.
//!
//! ## Overview
//!
//! The crate is two components composed linearly:
//!
//! 1. [`batch::split`] partitions an ordered document set into contiguous,
//!    order-preserving batches of at most `max_size` documents.
//! 2. [`dispatch::Dispatcher`] consumes the batch sequence and a
//!    [`classify::Classify`] capability, starts one task per batch behind a
//!    fixed-interval pacing gate, and fans the per-batch outcomes into a
//!    single [`dispatch::OutcomeStream`] that closes once every batch has
//!    completed.
//!
//! The rate ceiling bounds how fast batch tasks *start*; completion
//! throughput is additionally gated by how fast the caller drains the
//! outcome stream (see [`dispatch::QueueCapacity`]).
//!
//! ## Module Organization
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`batch`] | Document batching: the [`batch::Batch`] type and [`batch::split`] |
//! | [`dispatch`] | Pacing gate, fan-out/fan-in dispatcher, outcome stream |
//! | [`classify`] | Classification capability trait and response model |
//! | [`client`] | HTTP classification client and builder |
//! | [`transport`] | Low-level HTTP plumbing (reqwest, auth, correlation ids) |
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use docclassify::{batch, ClassifyClientBuilder, Dispatcher, DispatcherConfig};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> docclassify::Result<()> {
//!     let documents = vec!["aabb".to_string(), "bbaa".to_string()];
//!     let batches = batch::split(documents, 1)?;
//!
//!     let client = ClassifyClientBuilder::new()
//!         .token("your-api-token")
//!         .build()?;
//!
//!     let dispatcher = Dispatcher::new(DispatcherConfig::from_rpm(120.0)?);
//!     let mut outcomes = dispatcher.dispatch(batches, "cl_example", Arc::new(client));
//!
//!     while let Some(outcome) = outcomes.recv().await {
//!         println!("batch {}: ok={}", outcome.batch, outcome.is_success());
//!     }
//!     Ok(())
//! }
//! ```

pub mod batch;
pub mod classify;
pub mod client;
pub mod dispatch;
pub mod transport;

mod error;

// Re-export main types for convenience
pub use batch::Batch;
pub use classify::{Classify, ClassificationRecord, ClassificationResponse, TagPrediction};
pub use client::{ClassifyClient, ClassifyClientBuilder};
pub use dispatch::{
    BatchOutcome, Dispatcher, DispatcherConfig, OutcomeStream, PacingGate, QueueCapacity,
};
pub use error::Error;

/// Result type alias for the library
pub type Result<T> = std::result::Result<T, Error>;
