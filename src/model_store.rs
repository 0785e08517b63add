//! Persistence for the trained artifact set.
//!
//! The vectorizer, forest and SVM are serialized as three independent
//! bincode blobs plus a JSON manifest under one directory. They are
//! versioned as a set: the manifest carries a CRC32 tag of the training
//! configuration and the combined feature width, and `load` refuses to
//! hand back artifacts that disagree. Partial presence (any of the four
//! files missing) is reported as "absent", never as a partial result, so a
//! caller can fall back to training without special-casing.
//!
//! Writes go to `*.tmp` files that are renamed into place, manifest last.
//! A concurrent reader therefore never observes a manifest describing a
//! half-written run.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::classifier::ensemble::{DisasterClassifier, TrainingConfig};
use crate::classifier::forest::RandomForest;
use crate::classifier::svm::KernelSvm;
use crate::error::{Result, TriageError};
use crate::features::HANDCRAFTED_FEATURE_COUNT;
use crate::vectorizer::TfIdfVectorizer;

const VECTORIZER_FILE: &str = "vectorizer.bin";
const FOREST_FILE: &str = "forest.bin";
const SVM_FILE: &str = "svm.bin";
const MANIFEST_FILE: &str = "manifest.json";

/// Manifest schema version, bumped on incompatible layout changes.
const MANIFEST_SCHEMA_VERSION: u32 = 1;

/// Metadata binding the three blobs into one versioned set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Manifest {
    /// Layout version of the manifest itself.
    pub schema_version: u32,
    /// CRC32 of the training configuration JSON.
    pub config_tag: u32,
    /// Combined feature width (TF-IDF vocabulary + handcrafted features).
    pub feature_width: usize,
    /// TF-IDF vocabulary size.
    pub vocabulary_size: usize,
    /// When the run was persisted.
    pub created_at: chrono::DateTime<chrono::Utc>,
}

/// CRC32 tag over the serialized training configuration.
pub fn config_tag(config: &TrainingConfig) -> Result<u32> {
    let encoded = serde_json::to_vec(config)?;
    let mut hasher = crc32fast::Hasher::new();
    hasher.update(&encoded);
    Ok(hasher.finalize())
}

/// Directory-backed store for one trained artifact set.
#[derive(Debug, Clone)]
pub struct ModelStore {
    directory: PathBuf,
}

impl ModelStore {
    /// Create a store rooted at the given directory. The directory itself
    /// is created lazily on the first save.
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
        }
    }

    /// The store's root directory.
    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// Persist the artifact set atomically.
    pub fn save(&self, classifier: &DisasterClassifier, config: &TrainingConfig) -> Result<()> {
        fs::create_dir_all(&self.directory)?;

        let (vectorizer, forest, svm) = classifier.artifacts();
        self.write_blob(VECTORIZER_FILE, &bincode::serialize(vectorizer)?)?;
        self.write_blob(FOREST_FILE, &bincode::serialize(forest)?)?;
        self.write_blob(SVM_FILE, &bincode::serialize(svm)?)?;

        let manifest = Manifest {
            schema_version: MANIFEST_SCHEMA_VERSION,
            config_tag: config_tag(config)?,
            feature_width: classifier.feature_width(),
            vocabulary_size: classifier.feature_width() - HANDCRAFTED_FEATURE_COUNT,
            created_at: chrono::Utc::now(),
        };
        // Manifest goes last: its presence marks the set complete.
        self.write_blob(MANIFEST_FILE, &serde_json::to_vec_pretty(&manifest)?)?;

        Ok(())
    }

    /// Load the artifact set.
    ///
    /// Returns `Ok(None)` when any of the four files is missing — the
    /// caller decides whether to fall back to training. A present but
    /// internally inconsistent set is an [`TriageError::ArtifactMismatch`]
    /// error, not an absence.
    pub fn load(&self) -> Result<Option<DisasterClassifier>> {
        let paths = [
            self.directory.join(MANIFEST_FILE),
            self.directory.join(VECTORIZER_FILE),
            self.directory.join(FOREST_FILE),
            self.directory.join(SVM_FILE),
        ];
        if paths.iter().any(|p| !p.is_file()) {
            return Ok(None);
        }

        let manifest: Manifest = serde_json::from_slice(&fs::read(&paths[0])?)?;
        if manifest.schema_version != MANIFEST_SCHEMA_VERSION {
            return Err(TriageError::serialization(format!(
                "unsupported manifest schema version {}",
                manifest.schema_version
            )));
        }

        let vectorizer: TfIdfVectorizer = bincode::deserialize(&fs::read(&paths[1])?)?;
        let forest: RandomForest = bincode::deserialize(&fs::read(&paths[2])?)?;
        let svm: KernelSvm = bincode::deserialize(&fs::read(&paths[3])?)?;

        let expected = vectorizer.vocabulary_size() + HANDCRAFTED_FEATURE_COUNT;
        if manifest.feature_width != expected {
            return Err(TriageError::ArtifactMismatch {
                expected,
                found: manifest.feature_width,
            });
        }

        DisasterClassifier::from_artifacts(vectorizer, forest, svm).map(Some)
    }

    /// Read the manifest alone, if the set is complete.
    pub fn manifest(&self) -> Result<Option<Manifest>> {
        let path = self.directory.join(MANIFEST_FILE);
        if !path.is_file() {
            return Ok(None);
        }
        Ok(Some(serde_json::from_slice(&fs::read(&path)?)?))
    }

    /// Write bytes to `name.tmp`, then rename into place.
    fn write_blob(&self, name: &str, bytes: &[u8]) -> Result<()> {
        let final_path = self.directory.join(name);
        let temp_path = self.directory.join(format!("{name}.tmp"));
        fs::write(&temp_path, bytes)?;
        fs::rename(&temp_path, &final_path)?;
        Ok(())
    }
}
