//! rollcall-core — face-matching pipeline for attendance tracking.
//!
//! Localizes faces with a SeetaFace cascade backend, encodes each face
//! region as a unit-normalized 10 000-dimensional pixel vector, and
//! classifies it by Euclidean nearest neighbor against a tenant-scoped
//! gallery of known identities.

pub mod codec;
pub mod detector;
pub mod encoder;
pub mod gallery;
pub mod input;
pub mod matcher;
pub mod pipeline;
pub mod rustface_backend;
pub mod types;

pub use detector::{DetectorBackend, FaceDetector};
pub use encoder::FaceEncoder;
pub use gallery::{Gallery, RebuildReport, RosterEntry};
pub use matcher::{Matcher, NearestNeighborMatcher, MATCH_THRESHOLD};
pub use pipeline::{RecognitionPipeline, DEFAULT_DETECTION_DOWNSCALE};
pub use rustface_backend::SeetaFaceBackend;
pub use types::{BoundingBox, FaceEncoding, RecognitionResult, ENCODING_DIM, FACE_SIZE};
