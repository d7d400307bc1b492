//! Face registry used by the check-in endpoints.
//!
//! The registry maps a student number to a single face embedding. It is built
//! once at startup from a JSON flat file, held in [`crate::state::AppState`],
//! and written back on graceful shutdown. Turning an uploaded image into an
//! embedding is delegated to a [`FaceEncoder`].

use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

/// Dimension of the embeddings produced by the capture client.
pub const EMBEDDING_LEN: usize = 128;

#[derive(Debug, thiserror::Error)]
pub enum FaceError {
    #[error("No usable face embedding in upload: {0}")]
    InvalidEmbedding(String),
    #[error("Face registry I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("Face registry file is malformed: {0}")]
    Format(#[from] serde_json::Error),
}

/// Turns uploaded bytes into one face embedding.
pub trait FaceEncoder: Send + Sync {
    fn encode(&self, upload: &[u8]) -> Result<Vec<f32>, FaceError>;
}

/// Accepts a JSON array of [`EMBEDDING_LEN`] floats computed client-side.
#[derive(Debug, Default, Clone, Copy)]
pub struct EmbeddingUploadEncoder;

impl FaceEncoder for EmbeddingUploadEncoder {
    fn encode(&self, upload: &[u8]) -> Result<Vec<f32>, FaceError> {
        let values: Vec<f32> = serde_json::from_slice(upload)
            .map_err(|e| FaceError::InvalidEmbedding(e.to_string()))?;

        if values.len() != EMBEDDING_LEN {
            return Err(FaceError::InvalidEmbedding(format!(
                "expected {EMBEDDING_LEN} values, got {}",
                values.len()
            )));
        }
        if values.iter().any(|v| !v.is_finite()) {
            return Err(FaceError::InvalidEmbedding("non-finite value".into()));
        }
        Ok(values)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FaceMatch {
    pub student_id: String,
    pub distance: f32,
}

pub struct FaceRegistry {
    encodings: RwLock<HashMap<String, Vec<f32>>>,
    path: Option<PathBuf>,
    tolerance: f32,
    encoder: Box<dyn FaceEncoder>,
}

impl FaceRegistry {
    /// Empty registry; `path` is where [`FaceRegistry::save`] writes.
    pub fn new(path: Option<PathBuf>, tolerance: f32, encoder: Box<dyn FaceEncoder>) -> Self {
        Self {
            encodings: RwLock::new(HashMap::new()),
            path,
            tolerance,
            encoder,
        }
    }

    /// Loads the registry from `path`. A missing file yields an empty registry.
    pub fn load(
        path: impl AsRef<Path>,
        tolerance: f32,
        encoder: Box<dyn FaceEncoder>,
    ) -> Result<Self, FaceError> {
        let path = path.as_ref().to_path_buf();
        let registry = Self::new(Some(path.clone()), tolerance, encoder);

        if path.exists() {
            let raw = fs::read(&path)?;
            let stored: HashMap<String, Vec<f32>> = serde_json::from_slice(&raw)?;
            tracing::info!(count = stored.len(), path = %path.display(), "Loaded face encodings");
            *registry.write_map() = stored;
        } else {
            tracing::info!(path = %path.display(), "No face encodings file; starting empty");
        }

        Ok(registry)
    }

    fn read_map(&self) -> std::sync::RwLockReadGuard<'_, HashMap<String, Vec<f32>>> {
        self.encodings.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write_map(&self) -> std::sync::RwLockWriteGuard<'_, HashMap<String, Vec<f32>>> {
        self.encodings.write().unwrap_or_else(|e| e.into_inner())
    }

    pub fn len(&self) -> usize {
        self.read_map().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn contains(&self, student_id: &str) -> bool {
        self.read_map().contains_key(student_id)
    }

    /// Encodes `upload` without touching the registry.
    pub fn encode(&self, upload: &[u8]) -> Result<Vec<f32>, FaceError> {
        self.encoder.encode(upload)
    }

    /// Stores `encoding` under `student_id`, replacing any previous entry.
    pub fn insert(&self, student_id: &str, encoding: Vec<f32>) {
        self.write_map().insert(student_id.to_string(), encoding);
    }

    /// Encodes `upload` and returns the closest registered student within tolerance.
    pub fn recognize(&self, upload: &[u8]) -> Result<Option<FaceMatch>, FaceError> {
        let probe = self.encoder.encode(upload)?;
        Ok(self.best_match(&probe))
    }

    pub fn best_match(&self, probe: &[f32]) -> Option<FaceMatch> {
        self.read_map()
            .iter()
            .filter(|(_, known)| known.len() == probe.len())
            .map(|(student_id, known)| FaceMatch {
                student_id: student_id.clone(),
                distance: euclidean_distance(known, probe),
            })
            .filter(|m| m.distance <= self.tolerance)
            .min_by(|a, b| a.distance.total_cmp(&b.distance))
    }

    /// Writes every encoding back to the configured file.
    pub fn save(&self) -> Result<(), FaceError> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let snapshot: BTreeMap<String, Vec<f32>> = self
            .read_map()
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();

        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, serde_json::to_vec(&snapshot)?)?;
        fs::rename(&tmp, path)?;
        tracing::info!(count = snapshot.len(), path = %path.display(), "Saved face encodings");
        Ok(())
    }
}

pub fn euclidean_distance(a: &[f32], b: &[f32]) -> f32 {
    a.iter()
        .zip(b)
        .map(|(x, y)| (x - y) * (x - y))
        .sum::<f32>()
        .sqrt()
}

/// Little-endian byte form stored on the student profile.
pub fn encoding_to_bytes(encoding: &[f32]) -> Vec<u8> {
    encoding.iter().flat_map(|v| v.to_le_bytes()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn embedding(seed: f32) -> Vec<f32> {
        (0..EMBEDDING_LEN).map(|i| seed + i as f32 * 0.001).collect()
    }

    fn upload(values: &[f32]) -> Vec<u8> {
        serde_json::to_vec(values).unwrap()
    }

    fn registry() -> FaceRegistry {
        FaceRegistry::new(None, 0.6, Box::new(EmbeddingUploadEncoder))
    }

    #[test]
    fn encoder_rejects_wrong_length_and_garbage() {
        let enc = EmbeddingUploadEncoder;
        assert!(enc.encode(b"not json").is_err());
        assert!(enc.encode(&upload(&[0.1, 0.2])).is_err());
        assert_eq!(enc.encode(&upload(&embedding(0.0))).unwrap().len(), EMBEDDING_LEN);
    }

    #[test]
    fn recognize_picks_closest_within_tolerance() {
        let reg = registry();
        reg.insert("CS-2023-001", embedding(0.0));
        reg.insert("CS-2023-002", embedding(0.03));

        let hit = reg.recognize(&upload(&embedding(0.029))).unwrap().unwrap();
        assert_eq!(hit.student_id, "CS-2023-002");

        // Shifting every component by 1.0 puts the probe far outside 0.6.
        assert!(reg.recognize(&upload(&embedding(1.0))).unwrap().is_none());
    }

    #[test]
    fn save_and_load_round_trip_through_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("faces").join("encodings.json");

        let reg = FaceRegistry::new(Some(path.clone()), 0.6, Box::new(EmbeddingUploadEncoder));
        let encoding = reg.encode(&upload(&embedding(0.5))).unwrap();
        reg.insert("ABC-123", encoding);
        reg.save().unwrap();

        let loaded = FaceRegistry::load(&path, 0.6, Box::new(EmbeddingUploadEncoder)).unwrap();
        assert_eq!(loaded.len(), 1);
        assert!(loaded.contains("ABC-123"));
    }

    #[test]
    fn load_missing_file_is_empty() {
        let dir = TempDir::new().unwrap();
        let reg = FaceRegistry::load(
            dir.path().join("absent.json"),
            0.6,
            Box::new(EmbeddingUploadEncoder),
        )
        .unwrap();
        assert!(reg.is_empty());
    }
}
