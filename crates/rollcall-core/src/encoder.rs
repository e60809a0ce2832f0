//! Face patch → unit-normalized pixel feature vector.
//!
//! Preprocessing order is fixed and deterministic: resize to the
//! canonical patch, histogram equalization for illumination, light
//! Gaussian blur for sensor noise, intensity scaling to [0, 1], flatten,
//! L2-normalize.

use crate::types::{FaceEncoding, FACE_SIZE};
use image::imageops::{self, FilterType};
use image::GrayImage;
use imageproc::contrast::equalize_histogram;
use imageproc::filter::gaussian_blur_f32;
use ndarray::Array1;
use thiserror::Error;

/// Blur radius equivalent to a 3×3 Gaussian kernel.
const BLUR_SIGMA: f32 = 0.8;

#[derive(Error, Debug)]
pub enum EncodeError {
    #[error("face region is empty")]
    EmptyRegion,
    #[error("degenerate encoding: zero-norm pixel vector")]
    DegenerateEncoding,
}

/// Stateless face encoder; safe to share across concurrent calls.
#[derive(Debug, Default)]
pub struct FaceEncoder;

impl FaceEncoder {
    pub fn new() -> FaceEncoder {
        FaceEncoder
    }

    /// Encode a cropped grayscale face region.
    ///
    /// Identical input pixels always produce an identical vector. A blank
    /// or empty patch yields an error instead of a NaN-laden vector.
    pub fn encode(&self, face: &GrayImage) -> Result<FaceEncoding, EncodeError> {
        if face.width() == 0 || face.height() == 0 {
            return Err(EncodeError::EmptyRegion);
        }

        let resized = imageops::resize(face, FACE_SIZE, FACE_SIZE, FilterType::Triangle);
        let equalized = equalize_histogram(&resized);
        let smoothed = gaussian_blur_f32(&equalized, BLUR_SIGMA);

        let values: Array1<f32> = smoothed
            .as_raw()
            .iter()
            .map(|&p| f32::from(p) / 255.0)
            .collect();

        FaceEncoding::from_raw(values).ok_or(EncodeError::DegenerateEncoding)
    }
}
