//! Classification capability seam and response model.
//!
//! [`Classify`] is the one operation the dispatcher needs from the outside
//! world: turn a classifier id and a [`Batch`] into a typed response or a
//! failure. The production implementation is [`crate::ClassifyClient`];
//! tests substitute their own.

use crate::batch::Batch;
use crate::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// External classification capability.
///
/// Implementations must be safe to invoke concurrently from many tasks; a
/// call may stay outstanding arbitrarily long. Failures are returned, never
/// panicked, so one bad batch cannot take down a dispatch run.
#[async_trait]
pub trait Classify: Send + Sync {
    /// Classify every document of `batch` with the model identified by
    /// `classifier_id`.
    async fn classify(&self, classifier_id: &str, batch: &Batch) -> Result<ClassificationResponse>;
}

/// Response to classifying one batch: one record per submitted document,
/// in submission order.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClassificationResponse {
    pub records: Vec<ClassificationRecord>,
}

/// Classification result for a single document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassificationRecord {
    /// The submitted document text, echoed back by the service.
    pub text: String,
    #[serde(default)]
    pub external_id: Option<String>,
    /// Set when the service could not classify this document.
    #[serde(default)]
    pub error: bool,
    #[serde(default)]
    pub classifications: Vec<TagPrediction>,
}

/// A single predicted tag with its confidence.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TagPrediction {
    pub tag_name: String,
    #[serde(default)]
    pub tag_id: Option<u64>,
    pub confidence: f64,
}
