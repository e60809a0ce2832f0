//! Detector → Encoder → Matcher orchestration for enrollment photos and
//! camera frames.

use crate::detector::{largest_box, FaceDetector};
use crate::encoder::FaceEncoder;
use crate::gallery::Gallery;
use crate::matcher::Matcher;
use crate::types::{BoundingBox, FaceEncoding, RecognitionResult};
use image::imageops::{self, FilterType};
use image::{DynamicImage, GrayImage};
use thiserror::Error;

/// Default frame shrink factor applied before detection. Detection cost
/// is roughly quadratic in edge length, so 0.5 quarters the scan work;
/// crops are always taken from the original-resolution frame.
pub const DEFAULT_DETECTION_DOWNSCALE: f32 = 0.5;

#[derive(Error, Debug)]
pub enum EnrollError {
    #[error("no face detected in enrollment photo")]
    NoFaceDetected,
    #[error("enrollment face produced a degenerate encoding")]
    DegenerateEncoding,
}

/// Synchronous recognition pipeline; one invocation per call, no internal
/// suspension points. The gallery is passed in per call, never held.
pub struct RecognitionPipeline {
    detector: FaceDetector,
    encoder: FaceEncoder,
    matcher: Box<dyn Matcher>,
    detection_downscale: f32,
}

impl RecognitionPipeline {
    pub fn new(
        detector: FaceDetector,
        matcher: Box<dyn Matcher>,
        detection_downscale: f32,
    ) -> RecognitionPipeline {
        RecognitionPipeline {
            detector,
            encoder: FaceEncoder::new(),
            matcher,
            detection_downscale,
        }
    }

    /// Encode the single subject face of an enrollment photo.
    ///
    /// Detection runs at full resolution; among survivors the largest-area
    /// box is taken as the subject.
    pub fn enroll(&self, image: &DynamicImage) -> Result<FaceEncoding, EnrollError> {
        let gray = image.to_luma8();
        let boxes = self.detector.detect(&gray);
        let face = largest_box(&boxes).ok_or(EnrollError::NoFaceDetected)?;

        tracing::debug!(
            candidates = boxes.len(),
            x = face.x,
            y = face.y,
            width = face.width,
            height = face.height,
            "enroll: subject face selected"
        );

        let crop = crop_region(&gray, face).ok_or(EnrollError::DegenerateEncoding)?;
        self.encoder
            .encode(&crop)
            .map_err(|_| EnrollError::DegenerateEncoding)
    }

    /// Classify every face in a frame against the gallery.
    ///
    /// Detection may run on a downscaled copy of the frame; box
    /// coordinates are rescaled back before cropping from the original
    /// resolution, so results are always in original-image coordinates
    /// and detection order. A face whose crop fails to encode yields an
    /// Unknown result instead of aborting the call.
    pub fn recognize(&self, frame: &DynamicImage, gallery: &Gallery) -> Vec<RecognitionResult> {
        let gray = frame.to_luma8();

        let factor = self.detection_downscale;
        let (boxes, inverse) = if factor < 1.0 {
            let w = ((gray.width() as f32 * factor).round() as u32).max(1);
            let h = ((gray.height() as f32 * factor).round() as u32).max(1);
            let small = imageops::resize(&gray, w, h, FilterType::Triangle);
            (self.detector.detect(&small), 1.0 / factor)
        } else {
            (self.detector.detect(&gray), 1.0)
        };

        tracing::debug!(faces = boxes.len(), downscale = factor, "recognize: detection complete");

        let mut results = Vec::with_capacity(boxes.len());
        for bbox in boxes {
            let full_box = bbox.scaled(inverse);

            let Some(crop) = crop_region(&gray, &full_box) else {
                tracing::warn!(x = full_box.x, y = full_box.y, "face box outside frame, reporting unknown");
                results.push(RecognitionResult::unknown(full_box));
                continue;
            };

            let encoding = match self.encoder.encode(&crop) {
                Ok(encoding) => encoding,
                Err(err) => {
                    tracing::warn!(error = %err, "face crop failed to encode, reporting unknown");
                    results.push(RecognitionResult::unknown(full_box));
                    continue;
                }
            };

            let outcome = self.matcher.classify(&encoding, gallery);
            results.push(RecognitionResult {
                identity: outcome.key,
                distance: outcome.distance,
                bbox: full_box,
            });
        }

        results
    }
}

/// Crop a bounding box out of the full-resolution frame, clamped to the
/// frame bounds. `None` when the clamped region is empty.
fn crop_region(gray: &GrayImage, bbox: &BoundingBox) -> Option<GrayImage> {
    let (x, y, w, h) = bbox.pixel_rect(gray.width(), gray.height())?;
    Some(imageops::crop_imm(gray, x, y, w, h).to_image())
}
