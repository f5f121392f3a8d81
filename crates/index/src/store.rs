//! The segment → index mapping consulted by RAG replies.

use crate::builder::IndexBuilder;
use crate::segment::SegmentIndex;
use futures::future::join_all;
use std::collections::{BTreeMap, HashMap};
use tracing::{error, info, warn};
use voibot_core::error::{Error, IngestError};

/// A segment whose index could not be built.
#[derive(Debug)]
pub struct SegmentFailure {
    pub segment: String,
    pub error: IngestError,
}

/// Outcome of [`DocumentIndexStore::initialize`].
#[derive(Debug, Default)]
pub struct InitReport {
    /// Segments that were built, in name order.
    pub built: Vec<String>,
    pub failed: Vec<SegmentFailure>,
}

impl InitReport {
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Owns one [`SegmentIndex`] per successfully built segment.
///
/// Populated once by [`initialize`](Self::initialize), read-only afterwards.
#[derive(Debug, Default)]
pub struct DocumentIndexStore {
    indices: HashMap<String, SegmentIndex>,
    initialized: bool,
}

impl DocumentIndexStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build every segment concurrently. A segment that fails is logged and
    /// left out; the others are still stored.
    ///
    /// Once the store is initialized, later calls rebuild nothing and report
    /// the segments already stored.
    pub async fn initialize(
        &mut self,
        builder: &IndexBuilder,
        segments: &BTreeMap<String, Vec<String>>,
    ) -> InitReport {
        if self.initialized {
            warn!(segments = self.indices.len(), "Document index store already initialized");
            return InitReport {
                built: self.segments().into_iter().map(String::from).collect(),
                failed: Vec::new(),
            };
        }

        let results = join_all(segments.iter().map(|(name, sources)| async move {
            (name.clone(), builder.build(name, sources).await)
        }))
        .await;

        let mut report = InitReport::default();
        for (segment, result) in results {
            match result {
                Ok(index) => {
                    report.built.push(segment.clone());
                    self.indices.insert(segment, index);
                }
                Err(e) => {
                    error!(segment = %segment, error = %e, "Failed to build segment index");
                    report.failed.push(SegmentFailure { segment, error: e });
                }
            }
        }

        self.initialized = true;
        info!(
            built = report.built.len(),
            failed = report.failed.len(),
            "Document index store initialized"
        );
        report
    }

    /// Insert a prebuilt index, marking the store initialized.
    pub fn insert(&mut self, index: SegmentIndex) {
        self.indices.insert(index.name().to_string(), index);
        self.initialized = true;
    }

    /// Look up a segment's index.
    pub fn get(&self, segment: &str) -> Result<&SegmentIndex, Error> {
        if !self.initialized {
            return Err(Error::UninitializedStore);
        }
        self.indices.get(segment).ok_or_else(|| Error::MissingSegment {
            segment: segment.to_string(),
        })
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    /// Names of the stored segments, sorted.
    pub fn segments(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.indices.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}
