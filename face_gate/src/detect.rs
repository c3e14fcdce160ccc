//! Detect → crop → embed: a [`Recognizer`] over raw images.

use image::DynamicImage;
use tracing::debug;

use crate::embedder::{crop_face, Embedder};
use crate::embedding::Embedding;
use crate::face_box::FaceBox;
use crate::gate::Recognizer;

/// Finds faces in an image.
pub trait FaceDetector {
    fn detect(&mut self, img: &DynamicImage) -> Vec<FaceBox>;
}

impl<D: FaceDetector + ?Sized> FaceDetector for Box<D> {
    fn detect(&mut self, img: &DynamicImage) -> Vec<FaceBox> { (**self).detect(img) }
}

/// Reports the same boxes for every image.
///
/// Stands in for a real detector when the camera is framed on a known spot.
#[derive(Clone, Debug, PartialEq)]
pub struct FixedBoxes(pub Vec<FaceBox>);

impl Default for FixedBoxes {
    fn default() -> Self { FixedBoxes(vec![FaceBox::full()]) }
}

impl FaceDetector for FixedBoxes {
    fn detect(&mut self, _img: &DynamicImage) -> Vec<FaceBox> { self.0.clone() }
}

/// Runs `detector` on each image, crops every box and embeds it.
///
/// Boxes that crop to nothing are dropped for that image.
#[derive(Debug)]
pub struct DetectingRecognizer<D, E> {
    detector: D,
    embedder: E,
    skipped:  u64,
}

impl<D: FaceDetector, E: Embedder> DetectingRecognizer<D, E> {
    pub fn new(detector: D, embedder: E) -> Self {
        DetectingRecognizer { detector, embedder, skipped: 0 }
    }

    /// Degenerate crops dropped so far.
    pub fn skipped_crops(&self) -> u64 { self.skipped }
}

impl<D: FaceDetector, E: Embedder> Recognizer<DynamicImage> for DetectingRecognizer<D, E> {
    fn recognize(&mut self, img: &DynamicImage) -> Vec<Embedding> {
        let mut out = Vec::new();
        for bbox in self.detector.detect(img) {
            match crop_face(img, &bbox) {
                Some(face) => out.push(self.embedder.embed(&face)),
                None => {
                    self.skipped += 1;
                    debug!(%bbox, "zero-area face crop skipped");
                }
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::embedder::DownsampleEmbedder;
    use image::{GrayImage, Luma};

    fn img() -> DynamicImage {
        DynamicImage::ImageLuma8(GrayImage::from_fn(40, 20, |x, _| Luma([if x < 20 { 0 } else { 255 }])))
    }

    #[test]
    fn one_embedding_per_usable_box() {
        let det = FixedBoxes(vec![
            FaceBox::new(0.0, 0.0, 0.5, 1.0),
            FaceBox::new(0.5, 0.5, 0.0, 0.5),
            FaceBox::new(0.5, 0.0, 0.5, 1.0),
        ]);
        let mut rec = DetectingRecognizer::new(det, DownsampleEmbedder { side: 4 });
        let faces = rec.recognize(&img());
        assert_eq!(faces.len(), 2);
        assert!(faces[0].as_slice().iter().all(|&v| v < 0.01));
        assert!(faces[1].as_slice().iter().all(|&v| v > 0.99));
        assert_eq!(rec.skipped_crops(), 1);
    }

    #[test]
    fn only_degenerate_boxes_yield_nothing() {
        let det = FixedBoxes(vec![FaceBox::new(2.0, 0.0, 0.5, 0.5)]);
        let mut rec = DetectingRecognizer::new(det, DownsampleEmbedder::default());
        assert!(rec.recognize(&img()).is_empty());
        assert_eq!(rec.skipped_crops(), 1);
    }

    #[test]
    fn default_detector_uses_whole_image() {
        assert_eq!(FixedBoxes::default().detect(&img()), vec![FaceBox::full()]);
    }
}
