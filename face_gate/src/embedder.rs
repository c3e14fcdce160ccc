//! Image → embedding, and the enrollment pipeline built on it.

use std::path::{Path, PathBuf};

use image::imageops::{self, FilterType};
use image::DynamicImage;
use thiserror::Error;
use tracing::info;

use crate::embedding::Embedding;
use crate::face_box::FaceBox;
use crate::registry::{EnrolledFace, RegistryError};

#[derive(Debug, Error)]
pub enum EnrollError {
    #[error("cannot open image {path}: {source}")]
    Image { path: PathBuf, source: image::ImageError },

    #[error("face box {0} has no area in the image")]
    EmptyCrop(FaceBox),

    #[error("name must be non-empty and contain no path separators: {0:?}")]
    BadName(String),

    #[error(transparent)]
    Store(#[from] RegistryError),
}

/// Produces a fixed-length embedding from a face crop.
pub trait Embedder {
    fn embed(&self, face: &DynamicImage) -> Embedding;
}

/// Grayscale thumbnail of the crop, flattened to `[0, 1]` floats.
///
/// Not a real recognition model.  It is stable and cheap, which is enough
/// for enrollment round trips and tests.
#[derive(Clone, Copy, Debug)]
pub struct DownsampleEmbedder {
    pub side: u32,
}

impl Default for DownsampleEmbedder {
    fn default() -> Self { DownsampleEmbedder { side: 32 } }
}

impl Embedder for DownsampleEmbedder {
    fn embed(&self, face: &DynamicImage) -> Embedding {
        let gray = face.to_luma8();
        let small = imageops::resize(&gray, self.side, self.side, FilterType::Triangle);
        Embedding::new(small.into_raw().into_iter().map(|b| b as f32 / 255.0).collect())
    }
}

/// Cut `bbox` out of `img`.  `None` if the box has no area.
pub fn crop_face(img: &DynamicImage, bbox: &FaceBox) -> Option<DynamicImage> {
    let r = bbox.to_pixels(img.width(), img.height())?;
    Some(img.crop_imm(r.x, r.y, r.w, r.h))
}

/// Embed the face in `image_path` and write `<out_dir>/<name>.json`.
pub fn enroll<E: Embedder>(
    embedder:   &E,
    image_path: &Path,
    bbox:       &FaceBox,
    name:       &str,
    out_dir:    &Path,
) -> Result<PathBuf, EnrollError> {
    if name.is_empty() || name.contains(['/', '\\']) || name == "." || name == ".." {
        return Err(EnrollError::BadName(name.to_string()));
    }
    let img = image::open(image_path)
        .map_err(|source| EnrollError::Image { path: image_path.to_path_buf(), source })?;
    let face = crop_face(&img, bbox).ok_or(EnrollError::EmptyCrop(*bbox))?;
    let embedding = embedder.embed(&face);
    let path = EnrolledFace { name: name.to_string(), embedding }.save(out_dir)?;
    info!(name, path = %path.display(), "enrolled face");
    Ok(path)
}
