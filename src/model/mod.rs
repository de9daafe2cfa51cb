//! Capability interface over the pre-trained classifier.
//!
//! The pipeline never sees a concrete model, only the three-part
//! capability contract the training side exported: vectorize text,
//! predict a label index, decode the index to a category name. Any
//! serving mechanism that implements these traits can be substituted.

pub mod artifacts;

use anyhow::Result;
use std::sync::Arc;

/// Sparse feature vector: sorted `(column, value)` pairs.
pub type SparseVector = Vec<(usize, f32)>;

/// Turns a URL string into a feature vector.
pub trait Vectorizer: Send + Sync {
    fn transform(&self, text: &str) -> Result<SparseVector>;
}

/// Predicts a label index from a feature vector.
pub trait Predictor: Send + Sync {
    fn predict(&self, features: &SparseVector) -> Result<usize>;
}

/// Decodes a label index into a human-readable category name.
pub trait LabelDecoder: Send + Sync {
    fn decode(&self, index: usize) -> Result<String>;

    /// The full label set, in index order.
    fn labels(&self) -> &[String];
}

/// The loaded vectorizer/classifier/decoder triple.
///
/// Each slot is independently optional: a missing or corrupt artifact
/// leaves its slot empty rather than failing the load, and the
/// adapter degrades to the "Classification Unavailable" sentinel.
/// Immutable after load and safely shared across concurrent runs.
#[derive(Clone, Default)]
pub struct ModelBundle {
    pub vectorizer: Option<Arc<dyn Vectorizer>>,
    pub predictor: Option<Arc<dyn Predictor>>,
    pub decoder: Option<Arc<dyn LabelDecoder>>,
}

impl ModelBundle {
    pub fn new(
        vectorizer: Arc<dyn Vectorizer>,
        predictor: Arc<dyn Predictor>,
        decoder: Arc<dyn LabelDecoder>,
    ) -> Self {
        Self {
            vectorizer: Some(vectorizer),
            predictor: Some(predictor),
            decoder: Some(decoder),
        }
    }

    /// True when all three components loaded.
    pub fn is_complete(&self) -> bool {
        self.vectorizer.is_some() && self.predictor.is_some() && self.decoder.is_some()
    }

    /// Names of the missing components, for error messages.
    pub fn missing(&self) -> Vec<&'static str> {
        let mut out = Vec::new();
        if self.vectorizer.is_none() {
            out.push("vectorizer");
        }
        if self.predictor.is_none() {
            out.push("classifier");
        }
        if self.decoder.is_none() {
            out.push("label decoder");
        }
        out
    }
}
