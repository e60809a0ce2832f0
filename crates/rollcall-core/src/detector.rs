//! Face localization with relaxed-parameter retry and overlap consolidation.
//!
//! The cascade engine itself sits behind [`DetectorBackend`]; this module
//! owns the detection policy: primary parameters, one relaxed retry when
//! nothing is found, and IoU-based merging of duplicate boxes.

use crate::types::BoundingBox;
use image::GrayImage;

/// Cascade scan parameters, matching the classical `detectMultiScale`
/// triple: pyramid scale step, neighbor votes, minimum face edge.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DetectParams {
    pub scale_factor: f32,
    pub min_neighbors: u32,
    pub min_size: u32,
}

/// First-pass parameters: conservative, few false positives.
pub const PRIMARY_PARAMS: DetectParams = DetectParams {
    scale_factor: 1.1,
    min_neighbors: 5,
    min_size: 30,
};

/// Retry parameters when the primary pass finds nothing: coarser pyramid,
/// fewer votes, smaller faces admitted.
pub const RELAXED_PARAMS: DetectParams = DetectParams {
    scale_factor: 1.3,
    min_neighbors: 3,
    min_size: 20,
};

/// Boxes overlapping above this IoU are considered one physical face and
/// merged, keeping the larger-area box.
pub const MERGE_IOU_THRESHOLD: f32 = 0.3;

/// Pluggable cascade engine. Implementations scan a row-major grayscale
/// buffer and return candidate boxes in buffer coordinates.
///
/// `Send + Sync` so a single detector can serve concurrent pipelines;
/// implementations must not keep per-call state.
pub trait DetectorBackend: Send + Sync {
    fn scan(&self, gray: &[u8], width: u32, height: u32, params: &DetectParams)
        -> Vec<BoundingBox>;
}

/// Face detector: backend scan plus retry and consolidation policy.
pub struct FaceDetector {
    backend: Box<dyn DetectorBackend>,
}

impl FaceDetector {
    pub fn new(backend: Box<dyn DetectorBackend>) -> FaceDetector {
        FaceDetector { backend }
    }

    /// Locate candidate face regions in a grayscale image.
    ///
    /// Runs the primary-parameter scan; if it yields nothing, retries once
    /// with [`RELAXED_PARAMS`] before giving up. Overlapping candidates for
    /// the same physical face are consolidated via IoU.
    pub fn detect(&self, gray: &GrayImage) -> Vec<BoundingBox> {
        let (width, height) = gray.dimensions();

        let mut boxes = self.backend.scan(gray.as_raw(), width, height, &PRIMARY_PARAMS);
        if boxes.is_empty() {
            tracing::debug!(width, height, "primary detection pass empty, retrying relaxed");
            boxes = self.backend.scan(gray.as_raw(), width, height, &RELAXED_PARAMS);
        }

        let found = boxes.len();
        let merged = merge_overlapping(boxes, MERGE_IOU_THRESHOLD);
        if merged.len() < found {
            tracing::debug!(
                found,
                kept = merged.len(),
                "consolidated overlapping detections"
            );
        }
        merged
    }
}

/// Largest-area box among candidates; used to pick the subject face of an
/// enrollment photo.
pub fn largest_box(boxes: &[BoundingBox]) -> Option<&BoundingBox> {
    boxes.iter().max_by(|a, b| {
        a.area()
            .partial_cmp(&b.area())
            .unwrap_or(std::cmp::Ordering::Equal)
    })
}

/// Merge boxes covering the same physical face.
///
/// Greedy largest-first suppression: any box whose IoU with an already
/// kept (larger) box exceeds `iou_threshold` is dropped, so the larger
/// box always represents the merged pair.
fn merge_overlapping(mut boxes: Vec<BoundingBox>, iou_threshold: f32) -> Vec<BoundingBox> {
    boxes.sort_by(|a, b| {
        b.area()
            .partial_cmp(&a.area())
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    let mut keep: Vec<BoundingBox> = Vec::new();
    for candidate in boxes {
        if keep.iter().all(|kept| iou(kept, &candidate) <= iou_threshold) {
            keep.push(candidate);
        }
    }
    keep
}

/// Intersection-over-Union of two axis-aligned boxes, in [0, 1].
pub fn iou(a: &BoundingBox, b: &BoundingBox) -> f32 {
    let x1 = a.x.max(b.x);
    let y1 = a.y.max(b.y);
    let x2 = (a.x + a.width).min(b.x + b.width);
    let y2 = (a.y + a.height).min(b.y + b.height);

    let inter_w = (x2 - x1).max(0.0);
    let inter_h = (y2 - y1).max(0.0);
    let inter_area = inter_w * inter_h;

    let union_area = a.area() + b.area() - inter_area;
    if union_area > 0.0 {
        inter_area / union_area
    } else {
        0.0
    }
}
