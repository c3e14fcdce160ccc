//! # face_gate
//!
//! One-shot identity gate in front of the gesture pipeline.
//!
//! * [`Registry`]: immutable name → [`Embedding`] map, loaded once from a
//!   directory of `<name>.json` files.
//! * [`IdentityGate`]: asks an external [`Recognizer`] for face embeddings
//!   each frame until the designated person is seen, then latches open for
//!   the rest of the session and never asks again.
//! * [`DetectingRecognizer`]: detect → crop → embed over raw images, dropping
//!   boxes that crop to nothing.
//! * [`enroll`]: produce one embedding from a reference image and store it.
//!
//! The face detector and embedding model are external collaborators.  The
//! crate ships a deliberately simple [`DownsampleEmbedder`] so enrollment and
//! tests work without a neural network.

pub mod detect;
pub mod embedder;
pub mod embedding;
pub mod face_box;
pub mod gate;
pub mod registry;

pub use detect::{DetectingRecognizer, FaceDetector, FixedBoxes};
pub use embedder::{crop_face, enroll, DownsampleEmbedder, Embedder, EnrollError};
pub use embedding::Embedding;
pub use face_box::{FaceBox, PixelRect};
pub use gate::{IdentityGate, Recognizer, DEFAULT_MATCH_THRESHOLD};
pub use registry::{EnrolledFace, Match, Registry, RegistryError};
