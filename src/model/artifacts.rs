//! Serialized model artifacts and their concrete implementations.
//!
//! Three JSON files in a models directory, mirroring the triple the
//! training pipeline exports:
//!
//! - `vectorizer.json` — character n-gram TF-IDF vocabulary + idf table
//! - `classifier.json` — linear one-vs-rest weights + intercepts
//! - `labels.json`     — ordered category names
//!
//! The loader treats each file independently; a missing or corrupt
//! artifact leaves its [`ModelBundle`] slot empty instead of failing.

use super::{LabelDecoder, ModelBundle, Predictor, SparseVector, Vectorizer};
use anyhow::{bail, Context, Result};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

pub const VECTORIZER_FILE: &str = "vectorizer.json";
pub const CLASSIFIER_FILE: &str = "classifier.json";
pub const LABELS_FILE: &str = "labels.json";

/// Character n-gram TF-IDF vectorizer state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TfidfArtifact {
    pub ngram_min: usize,
    pub ngram_max: usize,
    #[serde(default = "default_true")]
    pub lowercase: bool,
    /// n-gram → feature column.
    pub vocabulary: HashMap<String, usize>,
    /// Inverse document frequency per column.
    pub idf: Vec<f32>,
}

fn default_true() -> bool {
    true
}

/// TF-IDF transform over character n-grams, L2-normalized.
pub struct TfidfVectorizer {
    artifact: TfidfArtifact,
}

impl TfidfVectorizer {
    pub fn new(artifact: TfidfArtifact) -> Self {
        Self { artifact }
    }
}

impl Vectorizer for TfidfVectorizer {
    fn transform(&self, text: &str) -> Result<SparseVector> {
        let a = &self.artifact;
        if a.ngram_min == 0 || a.ngram_min > a.ngram_max {
            bail!("invalid n-gram range [{}, {}]", a.ngram_min, a.ngram_max);
        }

        let text = if a.lowercase {
            text.to_lowercase()
        } else {
            text.to_string()
        };
        let chars: Vec<char> = text.chars().collect();

        let mut counts: HashMap<usize, f32> = HashMap::new();
        for n in a.ngram_min..=a.ngram_max {
            for window in chars.windows(n) {
                let gram: String = window.iter().collect();
                if let Some(&column) = a.vocabulary.get(&gram) {
                    *counts.entry(column).or_insert(0.0) += 1.0;
                }
            }
        }

        let mut features: SparseVector = Vec::with_capacity(counts.len());
        for (column, tf) in counts {
            let idf = *a
                .idf
                .get(column)
                .with_context(|| format!("idf table has no entry for column {column}"))?;
            features.push((column, tf * idf));
        }

        let norm: f32 = features.iter().map(|(_, v)| v * v).sum::<f32>().sqrt();
        if norm > 0.0 {
            for (_, v) in features.iter_mut() {
                *v /= norm;
            }
        }

        features.sort_by_key(|&(column, _)| column);
        Ok(features)
    }
}

/// Linear one-vs-rest classifier state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinearArtifact {
    pub n_features: usize,
    /// One weight row per class.
    pub weights: Vec<Vec<f32>>,
    /// One intercept per class.
    pub intercepts: Vec<f32>,
}

/// Argmax over per-class decision scores.
pub struct LinearClassifier {
    artifact: LinearArtifact,
}

impl LinearClassifier {
    pub fn new(artifact: LinearArtifact) -> Self {
        Self { artifact }
    }
}

impl Predictor for LinearClassifier {
    fn predict(&self, features: &SparseVector) -> Result<usize> {
        let a = &self.artifact;
        if a.weights.is_empty() {
            bail!("classifier has no weight rows");
        }
        if a.weights.len() != a.intercepts.len() {
            bail!(
                "classifier shape mismatch: {} weight rows, {} intercepts",
                a.weights.len(),
                a.intercepts.len()
            );
        }

        let mut best = (0usize, f32::NEG_INFINITY);
        for (class, row) in a.weights.iter().enumerate() {
            if row.len() != a.n_features {
                bail!(
                    "weight row {class} has {} columns, expected {}",
                    row.len(),
                    a.n_features
                );
            }
            let mut score = a.intercepts[class];
            for &(column, value) in features {
                let w = row
                    .get(column)
                    .with_context(|| format!("feature column {column} out of range"))?;
                score += w * value;
            }
            if score > best.1 {
                best = (class, score);
            }
        }
        Ok(best.0)
    }
}

/// Ordered label set; index order matches the classifier's classes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LabelSet {
    pub classes: Vec<String>,
}

impl LabelDecoder for LabelSet {
    fn decode(&self, index: usize) -> Result<String> {
        self.classes
            .get(index)
            .cloned()
            .with_context(|| format!("label index {index} out of range (have {})", self.classes.len()))
    }

    fn labels(&self) -> &[String] {
        &self.classes
    }
}

/// Load the bundle from a models directory.
///
/// Each artifact loads independently; failures are logged and leave
/// the slot empty so the caller can decide between failing fast and
/// emitting sentinel categories.
pub fn load_bundle(dir: &Path) -> ModelBundle {
    let vectorizer = read_artifact::<TfidfArtifact>(&dir.join(VECTORIZER_FILE))
        .map(|a| Arc::new(TfidfVectorizer::new(a)) as Arc<dyn Vectorizer>);
    let predictor = read_artifact::<LinearArtifact>(&dir.join(CLASSIFIER_FILE))
        .map(|a| Arc::new(LinearClassifier::new(a)) as Arc<dyn Predictor>);
    let decoder = read_artifact::<LabelSet>(&dir.join(LABELS_FILE))
        .map(|a| Arc::new(a) as Arc<dyn LabelDecoder>);

    ModelBundle {
        vectorizer,
        predictor,
        decoder,
    }
}

fn read_artifact<T: DeserializeOwned>(path: &Path) -> Option<T> {
    let raw = match std::fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "model artifact not readable");
            return None;
        }
    };
    match serde_json::from_str(&raw) {
        Ok(artifact) => Some(artifact),
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "model artifact not parseable");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Tiny two-class model: anything containing "ph" leans Phishing.
    pub(crate) fn tiny_bundle() -> ModelBundle {
        let vectorizer = TfidfArtifact {
            ngram_min: 2,
            ngram_max: 2,
            lowercase: true,
            vocabulary: HashMap::from([("ph".to_string(), 0), ("en".to_string(), 1)]),
            idf: vec![1.0, 1.0],
        };
        let classifier = LinearArtifact {
            n_features: 2,
            weights: vec![vec![-1.0, 1.0], vec![1.0, -1.0]],
            intercepts: vec![0.0, 0.0],
        };
        let labels = LabelSet {
            classes: vec!["Benign".to_string(), "Phishing".to_string()],
        };
        ModelBundle::new(
            Arc::new(TfidfVectorizer::new(vectorizer)),
            Arc::new(LinearClassifier::new(classifier)),
            Arc::new(labels),
        )
    }

    #[test]
    fn test_tfidf_counts_ngrams_and_normalizes() {
        let artifact = TfidfArtifact {
            ngram_min: 2,
            ngram_max: 2,
            lowercase: true,
            vocabulary: HashMap::from([("ab".to_string(), 0), ("bc".to_string(), 1)]),
            idf: vec![1.0, 2.0],
        };
        let v = TfidfVectorizer::new(artifact);
        let features = v.transform("ABC").unwrap();
        assert_eq!(features.len(), 2);
        assert_eq!(features[0].0, 0);
        assert_eq!(features[1].0, 1);
        // L2 norm of the output is 1.
        let norm: f32 = features.iter().map(|(_, x)| x * x).sum::<f32>().sqrt();
        assert!((norm - 1.0).abs() < 1e-6);
        // Column 1 carried the higher idf.
        assert!(features[1].1 > features[0].1);
    }

    #[test]
    fn test_tfidf_unknown_ngrams_yield_empty_vector() {
        let artifact = TfidfArtifact {
            ngram_min: 2,
            ngram_max: 3,
            lowercase: true,
            vocabulary: HashMap::from([("zz".to_string(), 0)]),
            idf: vec![1.0],
        };
        let v = TfidfVectorizer::new(artifact);
        assert!(v.transform("abcdef").unwrap().is_empty());
    }

    #[test]
    fn test_linear_predict_argmax() {
        let classifier = LinearClassifier::new(LinearArtifact {
            n_features: 2,
            weights: vec![vec![1.0, 0.0], vec![0.0, 1.0]],
            intercepts: vec![0.0, 0.1],
        });
        assert_eq!(classifier.predict(&vec![(0, 1.0)]).unwrap(), 0);
        assert_eq!(classifier.predict(&vec![(1, 1.0)]).unwrap(), 1);
        // Empty features fall to the highest intercept.
        assert_eq!(classifier.predict(&Vec::new()).unwrap(), 1);
    }

    #[test]
    fn test_linear_predict_rejects_bad_shapes() {
        let classifier = LinearClassifier::new(LinearArtifact {
            n_features: 2,
            weights: vec![],
            intercepts: vec![],
        });
        assert!(classifier.predict(&vec![(0, 1.0)]).is_err());
    }

    #[test]
    fn test_label_set_decode() {
        let labels = LabelSet {
            classes: vec!["Benign".to_string(), "Phishing".to_string()],
        };
        assert_eq!(labels.decode(1).unwrap(), "Phishing");
        assert!(labels.decode(7).is_err());
    }

    #[test]
    fn test_tiny_bundle_end_to_end() {
        let bundle = tiny_bundle();
        let v = bundle.vectorizer.as_ref().unwrap();
        let p = bundle.predictor.as_ref().unwrap();
        let d = bundle.decoder.as_ref().unwrap();

        let features = v.transform("http://phish.example/ph").unwrap();
        let label = d.decode(p.predict(&features).unwrap()).unwrap();
        assert_eq!(label, "Phishing");
    }

    #[test]
    fn test_load_bundle_from_directory() {
        let dir = tempfile::tempdir().unwrap();
        let vectorizer = TfidfArtifact {
            ngram_min: 2,
            ngram_max: 2,
            lowercase: true,
            vocabulary: HashMap::from([("ab".to_string(), 0)]),
            idf: vec![1.0],
        };
        let classifier = LinearArtifact {
            n_features: 1,
            weights: vec![vec![1.0]],
            intercepts: vec![0.0],
        };
        let labels = LabelSet {
            classes: vec!["Benign".to_string()],
        };
        std::fs::write(
            dir.path().join(VECTORIZER_FILE),
            serde_json::to_string(&vectorizer).unwrap(),
        )
        .unwrap();
        std::fs::write(
            dir.path().join(CLASSIFIER_FILE),
            serde_json::to_string(&classifier).unwrap(),
        )
        .unwrap();
        std::fs::write(
            dir.path().join(LABELS_FILE),
            serde_json::to_string(&labels).unwrap(),
        )
        .unwrap();

        let bundle = load_bundle(dir.path());
        assert!(bundle.is_complete());
    }

    #[test]
    fn test_load_bundle_missing_files_leaves_slots_empty() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(LABELS_FILE), r#"{"classes":["Benign"]}"#).unwrap();

        let bundle = load_bundle(dir.path());
        assert!(!bundle.is_complete());
        assert_eq!(bundle.missing(), vec!["vectorizer", "classifier"]);
    }

    #[test]
    fn test_load_bundle_corrupt_artifact_is_skipped() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(VECTORIZER_FILE), "not json at all").unwrap();

        let bundle = load_bundle(dir.path());
        assert!(bundle.vectorizer.is_none());
    }
}
