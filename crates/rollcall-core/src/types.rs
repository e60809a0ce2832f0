use ndarray::Array1;
use serde::{Deserialize, Serialize};

/// Canonical face patch edge length in pixels. Every encoding is derived
/// from a 100×100 grayscale patch.
pub const FACE_SIZE: u32 = 100;

/// Encoding dimensionality: one component per canonical-patch pixel.
pub const ENCODING_DIM: usize = (FACE_SIZE * FACE_SIZE) as usize;

/// Bounding box for a detected face, in pixel coordinates of a specific
/// image scale. Immutable once produced.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoundingBox {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl BoundingBox {
    pub fn area(&self) -> f32 {
        self.width * self.height
    }

    /// Scale all coordinates by `factor`, e.g. to map a box detected on a
    /// downscaled frame back to original-image coordinates.
    pub fn scaled(&self, factor: f32) -> BoundingBox {
        BoundingBox {
            x: self.x * factor,
            y: self.y * factor,
            width: self.width * factor,
            height: self.height * factor,
        }
    }

    /// Integer pixel rectangle `(x, y, w, h)` clamped to an image of
    /// `img_width` × `img_height`. Returns `None` if the clamped region
    /// is empty.
    pub fn pixel_rect(&self, img_width: u32, img_height: u32) -> Option<(u32, u32, u32, u32)> {
        let x = (self.x.max(0.0) as u32).min(img_width);
        let y = (self.y.max(0.0) as u32).min(img_height);
        let right = ((self.x + self.width).max(0.0) as u32).min(img_width);
        let bottom = ((self.y + self.height).max(0.0) as u32).min(img_height);
        if right <= x || bottom <= y {
            return None;
        }
        Some((x, y, right - x, bottom - y))
    }
}

/// Unit-normalized pixel feature vector for one face patch.
///
/// Always L2-normalized on construction; a zero-norm input is degenerate
/// and has no `FaceEncoding` representation at all.
#[derive(Debug, Clone, PartialEq)]
pub struct FaceEncoding {
    values: Array1<f32>,
}

impl FaceEncoding {
    /// Unit-normalize `values` into an encoding. Returns `None` when the
    /// input has zero norm, so degenerate vectors can never be stored or
    /// matched. Idempotent: normalizing an already-unit vector is a no-op
    /// up to float rounding.
    pub fn from_raw(values: Array1<f32>) -> Option<FaceEncoding> {
        let norm = values.dot(&values).sqrt();
        if norm == 0.0 {
            return None;
        }
        Some(FaceEncoding {
            values: values / norm,
        })
    }

    pub fn dim(&self) -> usize {
        self.values.len()
    }

    /// L2 norm. ≈ 1.0 for any constructed encoding.
    pub fn norm(&self) -> f32 {
        self.values.dot(&self.values).sqrt()
    }

    /// Euclidean distance to another encoding of the same dimension.
    pub fn distance(&self, other: &FaceEncoding) -> f32 {
        (&self.values - &other.values)
            .mapv(|d| d * d)
            .sum()
            .sqrt()
    }

    pub fn values(&self) -> &Array1<f32> {
        &self.values
    }
}

/// One classified face: the matched identity key (or `None` for an
/// unknown face), the best gallery distance found, and the bounding box
/// in original-image pixel coordinates.
#[derive(Debug, Clone, Serialize)]
pub struct RecognitionResult {
    pub identity: Option<String>,
    pub distance: f32,
    pub bbox: BoundingBox,
}

impl RecognitionResult {
    /// An unmatched face with no usable distance.
    pub fn unknown(bbox: BoundingBox) -> RecognitionResult {
        RecognitionResult {
            identity: None,
            distance: f32::INFINITY,
            bbox,
        }
    }
}
