//! Enrolled identities.
//!
//! On disk the registry is a directory with one JSON file per person:
//!
//! ```json
//! { "name": "ada", "embedding": [0.013, -0.2, ...] }
//! ```
//!
//! Loading is all-or-nothing: any unreadable or malformed file, an empty
//! directory, or mixed embedding dimensions is a startup error.

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::embedding::Embedding;

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("cannot read {path}: {source}")]
    Io { path: PathBuf, source: io::Error },

    #[error("malformed face file {path}: {source}")]
    Parse { path: PathBuf, source: serde_json::Error },

    #[error("no enrolled faces found")]
    Empty,

    #[error("{name} has a {got}-dimensional embedding, expected {expected}")]
    Dimension { name: String, expected: usize, got: usize },

    #[error("{0} is enrolled twice")]
    Duplicate(String),

    #[error("{0} is not enrolled")]
    Missing(String),
}

/// One person's stored reference embedding.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EnrolledFace {
    pub name:      String,
    pub embedding: Embedding,
}

impl EnrolledFace {
    pub fn load(path: &Path) -> Result<Self, RegistryError> {
        let text = fs::read_to_string(path)
            .map_err(|source| RegistryError::Io { path: path.to_path_buf(), source })?;
        serde_json::from_str(&text)
            .map_err(|source| RegistryError::Parse { path: path.to_path_buf(), source })
    }

    /// Write `<dir>/<name>.json`, creating `dir` if needed.
    pub fn save(&self, dir: &Path) -> Result<PathBuf, RegistryError> {
        let io_err = |path: &Path| {
            let path = path.to_path_buf();
            move |source| RegistryError::Io { path, source }
        };
        fs::create_dir_all(dir).map_err(io_err(dir))?;
        let path = dir.join(format!("{}.json", self.name));
        let json = serde_json::to_string_pretty(self)
            .map_err(|source| RegistryError::Parse { path: path.clone(), source })?;
        fs::write(&path, json).map_err(io_err(path.as_path()))?;
        Ok(path)
    }
}

/// Best registry hit under the match threshold.
#[derive(Clone, Debug, PartialEq)]
pub struct Match {
    pub name:     String,
    pub distance: f32,
}

/// Immutable mapping from name to reference embedding.
#[derive(Clone, Debug)]
pub struct Registry {
    faces: BTreeMap<String, Embedding>,
    dim:   usize,
}

impl Registry {
    pub fn from_faces<I>(faces: I) -> Result<Self, RegistryError>
    where
        I: IntoIterator<Item = EnrolledFace>,
    {
        let mut map = BTreeMap::new();
        let mut dim = None;
        for face in faces {
            let expected = *dim.get_or_insert(face.embedding.len());
            if face.embedding.len() != expected || expected == 0 {
                return Err(RegistryError::Dimension {
                    name: face.name,
                    expected,
                    got: face.embedding.len(),
                });
            }
            if map.contains_key(&face.name) {
                return Err(RegistryError::Duplicate(face.name));
            }
            map.insert(face.name, face.embedding);
        }
        let dim = dim.ok_or(RegistryError::Empty)?;
        Ok(Registry { faces: map, dim })
    }

    /// Load every `*.json` file in `dir`.
    pub fn load_dir(dir: &Path) -> Result<Self, RegistryError> {
        let io_err = |source| RegistryError::Io { path: dir.to_path_buf(), source };
        let mut paths: Vec<PathBuf> = fs::read_dir(dir)
            .map_err(io_err)?
            .map(|entry| entry.map(|e| e.path()))
            .collect::<Result<_, _>>()
            .map_err(io_err)?;
        paths.retain(|p| p.extension().is_some_and(|ext| ext == "json"));
        paths.sort();
        Self::load_files(&paths)
    }

    pub fn load_files(paths: &[PathBuf]) -> Result<Self, RegistryError> {
        let faces = paths
            .iter()
            .map(|p| {
                let face = EnrolledFace::load(p)?;
                debug!(name = %face.name, path = %p.display(), "loaded face");
                Ok(face)
            })
            .collect::<Result<Vec<_>, RegistryError>>()?;
        let registry = Self::from_faces(faces)?;
        info!(count = registry.len(), dim = registry.dim(), "face registry loaded");
        Ok(registry)
    }

    pub fn get(&self, name: &str) -> Option<&Embedding> { self.faces.get(name) }

    pub fn contains(&self, name: &str) -> bool { self.faces.contains_key(name) }

    pub fn names(&self) -> impl Iterator<Item = &str> { self.faces.keys().map(String::as_str) }

    pub fn len(&self) -> usize { self.faces.len() }

    pub fn is_empty(&self) -> bool { self.faces.is_empty() }

    pub fn dim(&self) -> usize { self.dim }

    /// The closest enrolled face strictly under `threshold`.
    ///
    /// Ties go to the alphabetically first name.  A probe of the wrong
    /// dimension matches nothing.
    pub fn nearest(&self, probe: &Embedding, threshold: f32) -> Option<Match> {
        if probe.len() != self.dim {
            warn!(got = probe.len(), expected = self.dim, "probe embedding has wrong dimension");
            return None;
        }
        let mut best: Option<Match> = None;
        for (name, reference) in &self.faces {
            let Some(distance) = probe.distance(reference) else { continue };
            let closer = best.as_ref().map_or(true, |b| distance < b.distance);
            if distance < threshold && closer {
                best = Some(Match { name: name.clone(), distance });
            }
        }
        best
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
