//! End-to-end pipeline scenarios with a scripted detection backend and
//! synthetic photos.

use image::DynamicImage;
use rollcall_core::detector::DetectParams;
use rollcall_core::{
    codec, BoundingBox, DetectorBackend, FaceDetector, Gallery, NearestNeighborMatcher,
    RecognitionPipeline, RosterEntry, ENCODING_DIM, DEFAULT_DETECTION_DOWNSCALE,
};

/// Backend that reports one face covering the whole scanned buffer.
struct FullFrameBackend;

impl DetectorBackend for FullFrameBackend {
    fn scan(
        &self,
        _gray: &[u8],
        width: u32,
        height: u32,
        _params: &DetectParams,
    ) -> Vec<BoundingBox> {
        vec![BoundingBox {
            x: 0.0,
            y: 0.0,
            width: width as f32,
            height: height as f32,
        }]
    }
}

/// Backend that never finds a face, on either detection pass.
struct NoFaceBackend;

impl DetectorBackend for NoFaceBackend {
    fn scan(&self, _: &[u8], _: u32, _: u32, _: &DetectParams) -> Vec<BoundingBox> {
        Vec::new()
    }
}

/// Backend that reports a box entirely outside the scanned buffer, so
/// every crop comes back empty.
struct OutOfFrameBackend;

impl DetectorBackend for OutOfFrameBackend {
    fn scan(&self, _: &[u8], width: u32, height: u32, _: &DetectParams) -> Vec<BoundingBox> {
        vec![BoundingBox {
            x: width as f32 + 10.0,
            y: height as f32 + 10.0,
            width: 20.0,
            height: 20.0,
        }]
    }
}

fn pipeline_with(backend: Box<dyn DetectorBackend>) -> RecognitionPipeline {
    RecognitionPipeline::new(
        FaceDetector::new(backend),
        Box::new(NearestNeighborMatcher::new()),
        DEFAULT_DETECTION_DOWNSCALE,
    )
}

/// Synthetic "photo": a diagonal gradient with a bright blob, enough
/// structure to survive histogram equalization.
fn synthetic_photo(width: u32, height: u32) -> DynamicImage {
    let img = image::RgbImage::from_fn(width, height, |x, y| {
        let base = ((x * 200 / width.max(1)) + (y * 55 / height.max(1))) as u8;
        let blob = if x.abs_diff(width / 2) < width / 6 && y.abs_diff(height / 3) < height / 6 {
            40u8
        } else {
            0
        };
        image::Rgb([base.saturating_add(blob); 3])
    });
    DynamicImage::ImageRgb8(img)
}

#[test]
fn enroll_returns_unit_vector_of_canonical_dimension() {
    let pipeline = pipeline_with(Box::new(FullFrameBackend));
    let encoding = pipeline.enroll(&synthetic_photo(160, 120)).unwrap();

    assert_eq!(encoding.dim(), ENCODING_DIM);
    assert!((encoding.norm() - 1.0).abs() < 1e-4);
}

#[test]
fn enroll_then_recognize_same_photo_matches() {
    let pipeline = pipeline_with(Box::new(FullFrameBackend));
    let photo = synthetic_photo(160, 120);

    let encoding = pipeline.enroll(&photo).unwrap();
    let roster = vec![RosterEntry {
        key: "s-101".to_string(),
        name: "Ada".to_string(),
        encoding: Some(codec::serialize(&encoding)),
    }];
    let (gallery, report) = Gallery::rebuild(&roster);
    assert_eq!(report.succeeded, 1);

    let results = pipeline.recognize(&photo, &gallery);
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].identity.as_deref(), Some("s-101"));
    assert!(results[0].distance < 0.6, "distance {}", results[0].distance);
}

#[test]
fn recognize_reports_boxes_in_original_coordinates() {
    // Detection runs on a half-size frame; the reported box must cover
    // the full-resolution frame.
    let pipeline = pipeline_with(Box::new(FullFrameBackend));
    let photo = synthetic_photo(200, 100);

    let results = pipeline.recognize(&photo, &Gallery::empty());
    assert_eq!(results.len(), 1);
    let bbox = &results[0].bbox;
    assert!((bbox.width - 200.0).abs() < 2.0, "width {}", bbox.width);
    assert!((bbox.height - 100.0).abs() < 2.0, "height {}", bbox.height);
}

#[test]
fn recognize_with_no_detectable_face_returns_empty() {
    let pipeline = pipeline_with(Box::new(NoFaceBackend));
    let results = pipeline.recognize(&synthetic_photo(160, 120), &Gallery::empty());
    assert!(results.is_empty());
}

#[test]
fn recognize_against_empty_gallery_is_unknown() {
    let pipeline = pipeline_with(Box::new(FullFrameBackend));
    let results = pipeline.recognize(&synthetic_photo(160, 120), &Gallery::empty());

    assert_eq!(results.len(), 1);
    assert!(results[0].identity.is_none());
    assert_eq!(results[0].distance, f32::INFINITY);
}

#[test]
fn recognize_survives_uncroppable_face() {
    let pipeline = pipeline_with(Box::new(OutOfFrameBackend));
    let results = pipeline.recognize(&synthetic_photo(160, 120), &Gallery::empty());

    assert_eq!(results.len(), 1);
    assert!(results[0].identity.is_none());
    assert_eq!(results[0].distance, f32::INFINITY);
}

#[test]
fn enroll_with_no_face_fails() {
    let pipeline = pipeline_with(Box::new(NoFaceBackend));
    let err = pipeline.enroll(&synthetic_photo(160, 120)).unwrap_err();
    assert!(matches!(
        err,
        rollcall_core::pipeline::EnrollError::NoFaceDetected
    ));
}

#[test]
fn rebuild_with_corrupt_record_still_recognizes_good_ones() {
    let pipeline = pipeline_with(Box::new(FullFrameBackend));
    let photo = synthetic_photo(160, 120);
    let encoding = pipeline.enroll(&photo).unwrap();

    let roster = vec![
        RosterEntry {
            key: "corrupt".to_string(),
            name: "Bad Record".to_string(),
            encoding: Some("[1.0, 2.0".to_string()),
        },
        RosterEntry {
            key: "s-7".to_string(),
            name: "Grace".to_string(),
            encoding: Some(codec::serialize(&encoding)),
        },
    ];
    let (gallery, report) = Gallery::rebuild(&roster);
    assert_eq!(report.failed, 1);
    assert_eq!(report.succeeded, 1);

    let results = pipeline.recognize(&photo, &gallery);
    assert_eq!(results[0].identity.as_deref(), Some("s-7"));
}
