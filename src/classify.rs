//! Classifier adapter: one URL in, one category out.
//!
//! Wraps the vectorize → predict → decode triple behind a single call
//! with uniform degradation. A missing component yields the
//! "Classification Unavailable" sentinel without touching the model;
//! a failure on one URL yields "Classification Error" for that URL
//! only and never aborts its siblings.

use crate::model::{LabelDecoder, ModelBundle, Predictor, Vectorizer};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

/// Sentinel category: the model raised while classifying this URL.
pub const CLASSIFICATION_ERROR: &str = "Classification Error";

/// Sentinel category: one or more model components never loaded.
pub const CLASSIFICATION_UNAVAILABLE: &str = "Classification Unavailable";

/// A URL paired with its predicted category.
///
/// The category is always either a label known to the decoder or one
/// of the two sentinels — nothing else may appear here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassifiedLink {
    pub url: String,
    pub category: String,
}

/// Stateless adapter over an immutable [`ModelBundle`].
#[derive(Clone, Default)]
pub struct ClassifierAdapter {
    bundle: ModelBundle,
}

impl ClassifierAdapter {
    pub fn new(bundle: ModelBundle) -> Self {
        Self { bundle }
    }

    pub fn bundle(&self) -> &ModelBundle {
        &self.bundle
    }

    /// True when all three model components are present.
    pub fn is_ready(&self) -> bool {
        self.bundle.is_complete()
    }

    /// Classify a single URL. Never fails; degradation is a sentinel.
    pub fn classify(&self, url: &str) -> String {
        let (Some(vectorizer), Some(predictor), Some(decoder)) = (
            self.bundle.vectorizer.as_deref(),
            self.bundle.predictor.as_deref(),
            self.bundle.decoder.as_deref(),
        ) else {
            return CLASSIFICATION_UNAVAILABLE.to_string();
        };

        match try_classify(vectorizer, predictor, decoder, url) {
            Ok(category) => category,
            Err(e) => {
                tracing::warn!(url, error = %e, "classification failed");
                CLASSIFICATION_ERROR.to_string()
            }
        }
    }

    /// Classify a batch, preserving input order.
    ///
    /// Links are independent and side-effect-free, so the batch runs
    /// on the rayon pool; the indexed collect keeps output order equal
    /// to input order.
    pub fn classify_all(&self, urls: &[String]) -> Vec<ClassifiedLink> {
        urls.par_iter()
            .map(|url| ClassifiedLink {
                url: url.clone(),
                category: self.classify(url),
            })
            .collect()
    }
}

fn try_classify(
    vectorizer: &dyn Vectorizer,
    predictor: &dyn Predictor,
    decoder: &dyn LabelDecoder,
    url: &str,
) -> anyhow::Result<String> {
    let features = vectorizer.transform(url)?;
    let index = predictor.predict(&features)?;
    decoder.decode(index)
}
