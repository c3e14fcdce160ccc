//! Frame sources: where landmarks and face embeddings come from.
//!
//! The loop in [`crate::app`] doesn't care whether frames are replayed from a
//! recording or synthesised from the keyboard.  Both implement
//! [`FrameSource`].

use std::fs::File;
use std::io::{self, BufRead, BufReader, Lines};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use face_gate::{Embedding, Recognizer};
use image::DynamicImage;
use hand_pose::Landmarks;
use serde::Deserialize;
use thiserror::Error;

// ════════════════════════════════════════════════════════════════════════════
// SensedFrame
// ════════════════════════════════════════════════════════════════════════════

/// Everything the pipeline learns from one camera frame.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SensedFrame {
    /// Time since the session started.  Read once per frame.
    pub at:    Duration,
    /// The first detected hand, if any.
    pub hand:  Option<Landmarks>,
    /// Embeddings already computed upstream, one per face.
    pub faces: Vec<Embedding>,
    /// The camera image, when faces still have to be detected in it.
    pub image: Option<Arc<DynamicImage>>,
}

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("frame source read failed: {0}")]
    Io(#[from] io::Error),

    #[error("line {line}: {source}")]
    Parse { line: usize, source: serde_json::Error },

    #[error("line {line}: timestamp {t} is negative, not finite, or goes backwards")]
    Timestamp { line: usize, t: f64 },

    #[error("line {line}: cannot load frame image {path}: {source}")]
    Image { line: usize, path: PathBuf, source: image::ImageError },

    #[cfg(feature = "window")]
    #[error("window: {0}")]
    Window(String),
}

/// Anything that can deliver frames, one at a time.
pub trait FrameSource {
    /// `Ok(None)` means stop: end of recording, window closed, quit key.
    fn next_frame(&mut self) -> Result<Option<SensedFrame>, SourceError>;
}

impl<S: FrameSource + ?Sized> FrameSource for Box<S> {
    fn next_frame(&mut self) -> Result<Option<SensedFrame>, SourceError> {
        (**self).next_frame()
    }
}

// ════════════════════════════════════════════════════════════════════════════
// PrecomputedFaces: the frame already carries embeddings
// ════════════════════════════════════════════════════════════════════════════

/// Recognizer for frames whose face embeddings were computed upstream.
#[derive(Clone, Copy, Debug, Default)]
pub struct PrecomputedFaces;

impl Recognizer<SensedFrame> for PrecomputedFaces {
    fn recognize(&mut self, frame: &SensedFrame) -> Vec<Embedding> {
        frame.faces.clone()
    }
}

/// Precomputed embeddings plus whatever `R` finds in the frame's image.
#[derive(Debug)]
pub struct CameraFaces<R>(pub R);

impl<R: Recognizer<DynamicImage>> Recognizer<SensedFrame> for CameraFaces<R> {
    fn recognize(&mut self, frame: &SensedFrame) -> Vec<Embedding> {
        let mut faces = frame.faces.clone();
        if let Some(img) = &frame.image {
            faces.extend(self.0.recognize(img));
        }
        faces
    }
}

// ════════════════════════════════════════════════════════════════════════════
// ScriptSource: JSON-lines replay
// ════════════════════════════════════════════════════════════════════════════

/// One line of a recording:
///
/// ```json
/// {"t": 0.033, "hand": [[412, 300], ...21 points], "faces": [[0.1, ...]]}
/// ```
///
/// `hand` may be `null` or absent; `faces` may be absent.  `image` names a
/// PNG or JPEG frame, relative to the recording's directory.
#[derive(Debug, Deserialize)]
struct ScriptLine {
    t:     f64,
    #[serde(default)]
    hand:  Option<Landmarks>,
    #[serde(default)]
    faces: Vec<Embedding>,
    #[serde(default)]
    image: Option<PathBuf>,
}

/// Replays a JSON-lines recording.  Blank lines and `//` comments are skipped.
pub struct ScriptSource<R> {
    lines:    Lines<R>,
    line_no:  usize,
    last_t:   f64,
    base_dir: PathBuf,
}

impl ScriptSource<BufReader<File>> {
    pub fn open(path: &Path) -> Result<Self, SourceError> {
        let base = path.parent().map(Path::to_path_buf).unwrap_or_default();
        Ok(Self::new(BufReader::new(File::open(path)?)).with_base_dir(base))
    }
}

impl<R: BufRead> ScriptSource<R> {
    pub fn new(reader: R) -> Self {
        ScriptSource { lines: reader.lines(), line_no: 0, last_t: 0.0, base_dir: PathBuf::new() }
    }

    /// Directory that relative `image` paths are resolved against.
    pub fn with_base_dir(mut self, dir: PathBuf) -> Self {
        self.base_dir = dir;
        self
    }

    /// Number of lines consumed so far.
    pub fn line_no(&self) -> usize { self.line_no }
}

impl<R: BufRead> FrameSource for ScriptSource<R> {
    fn next_frame(&mut self) -> Result<Option<SensedFrame>, SourceError> {
        for line in self.lines.by_ref() {
            let line = line?;
            self.line_no += 1;
            let text = line.trim();
            if text.is_empty() || text.starts_with("//") {
                continue;
            }

            let rec: ScriptLine = serde_json::from_str(text)
                .map_err(|source| SourceError::Parse { line: self.line_no, source })?;
            if !rec.t.is_finite() || rec.t < 0.0 || rec.t < self.last_t {
                return Err(SourceError::Timestamp { line: self.line_no, t: rec.t });
            }
            self.last_t = rec.t;

            let image = match rec.image {
                Some(rel) => {
                    let path = self.base_dir.join(rel);
                    let img = image::open(&path)
                        .map_err(|source| SourceError::Image { line: self.line_no, path, source })?;
                    Some(Arc::new(img))
                }
                None => None,
            };

            return Ok(Some(SensedFrame {
                at:    Duration::from_nanos((rec.t * 1e9).round() as u64),
                hand:  rec.hand,
                faces: rec.faces,
                image,
            }));
        }
        Ok(None)
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
