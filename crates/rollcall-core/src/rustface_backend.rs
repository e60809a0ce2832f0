//! Cascade detection backend backed by the `rustface` crate (SeetaFace).

use crate::detector::{DetectParams, DetectorBackend};
use crate::types::BoundingBox;
use std::io::BufReader;
use std::path::Path;
use thiserror::Error;

/// Sliding-window step in pixels, both axes.
const SLIDE_WINDOW_STEP: u32 = 4;

/// Score units per neighbor vote when translating `min_neighbors` into a
/// SeetaFace score threshold. The primary 5-vote setting lands on the
/// engine default of 2.0.
const SCORE_PER_NEIGHBOR: f64 = 0.4;

#[derive(Error, Debug)]
pub enum DetectorError {
    #[error("detection model not found: {0} — place seeta_fd_frontal_v1.0.bin there or set ROLLCALL_MODEL_PATH")]
    ModelNotFound(String),
    #[error("failed to load detection model {path}: {reason}")]
    ModelLoad { path: String, reason: String },
}

/// SeetaFace-based [`DetectorBackend`].
///
/// Holds only the parsed model; a fresh scanner is built per call so the
/// backend stays shareable across threads and per-pass parameters never
/// leak between calls.
pub struct SeetaFaceBackend {
    model: rustface::Model,
}

impl std::fmt::Debug for SeetaFaceBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SeetaFaceBackend").finish_non_exhaustive()
    }
}

impl SeetaFaceBackend {
    /// Load a SeetaFace frontal-face model from the given path.
    pub fn load(model_path: &str) -> Result<SeetaFaceBackend, DetectorError> {
        if !Path::new(model_path).exists() {
            return Err(DetectorError::ModelNotFound(model_path.to_string()));
        }

        let file = std::fs::File::open(model_path).map_err(|e| DetectorError::ModelLoad {
            path: model_path.to_string(),
            reason: e.to_string(),
        })?;
        let model =
            rustface::read_model(BufReader::new(file)).map_err(|e| DetectorError::ModelLoad {
                path: model_path.to_string(),
                reason: e.to_string(),
            })?;

        tracing::info!(path = model_path, "loaded SeetaFace detection model");
        Ok(SeetaFaceBackend { model })
    }
}

impl DetectorBackend for SeetaFaceBackend {
    fn scan(
        &self,
        gray: &[u8],
        width: u32,
        height: u32,
        params: &DetectParams,
    ) -> Vec<BoundingBox> {
        let mut detector = rustface::create_detector_with_model(self.model.clone());
        detector.set_min_face_size(params.min_size);
        // SeetaFace expresses the pyramid as a shrink factor in (0, 1];
        // the cascade-style scale step is its reciprocal.
        detector.set_pyramid_scale_factor(1.0 / params.scale_factor);
        detector.set_score_thresh(f64::from(params.min_neighbors) * SCORE_PER_NEIGHBOR);
        detector.set_slide_window_step(SLIDE_WINDOW_STEP, SLIDE_WINDOW_STEP);

        let faces = detector.detect(&rustface::ImageData::new(gray, width, height));

        faces
            .iter()
            .map(|face| {
                let bbox = face.bbox();
                BoundingBox {
                    x: bbox.x() as f32,
                    y: bbox.y() as f32,
                    width: bbox.width() as f32,
                    height: bbox.height() as f32,
                }
            })
            .collect()
    }
}
