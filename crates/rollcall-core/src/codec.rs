//! Wire codec for stored face encodings.
//!
//! Format version 1 is a bare JSON array of exactly [`ENCODING_DIM`]
//! floats, matching what identity stores already hold. Parsing also
//! accepts a `{"version": 1, "values": [...]}` envelope so a future
//! dimension or preprocessing change is detectable instead of silently
//! corrupting comparisons. Parsed records are defensively re-normalized.

use crate::types::{FaceEncoding, ENCODING_DIM};
use ndarray::Array1;
use serde::Deserialize;
use thiserror::Error;

/// Current serialization format version.
pub const WIRE_VERSION: u32 = 1;

#[derive(Error, Debug)]
pub enum CodecError {
    #[error("encoding is not valid JSON: {0}")]
    Syntax(#[from] serde_json::Error),
    #[error("unsupported encoding format version {0}")]
    UnsupportedVersion(u32),
    #[error("encoding has {got} components, expected {expected}")]
    DimensionMismatch { expected: usize, got: usize },
    #[error("encoding contains non-finite components")]
    NonFinite,
    #[error("encoding has zero norm")]
    ZeroNorm,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum WireEncoding {
    Bare(Vec<f32>),
    Envelope { version: u32, values: Vec<f32> },
}

/// Serialize an encoding to the version-1 wire format.
pub fn serialize(encoding: &FaceEncoding) -> String {
    // Vec<f32> never fails JSON serialization.
    serde_json::to_string(&encoding.values().to_vec()).expect("serializing f32 slice")
}

/// Parse and validate a stored encoding.
///
/// Dimension, finiteness, and norm are checked before the value is
/// admitted; the result is unit-normalized regardless of how the record
/// was stored.
pub fn deserialize(text: &str) -> Result<FaceEncoding, CodecError> {
    let values = match serde_json::from_str::<WireEncoding>(text)? {
        WireEncoding::Bare(values) => values,
        WireEncoding::Envelope { version, values } => {
            if version != WIRE_VERSION {
                return Err(CodecError::UnsupportedVersion(version));
            }
            values
        }
    };

    if values.len() != ENCODING_DIM {
        return Err(CodecError::DimensionMismatch {
            expected: ENCODING_DIM,
            got: values.len(),
        });
    }
    if values.iter().any(|v| !v.is_finite()) {
        return Err(CodecError::NonFinite);
    }

    FaceEncoding::from_raw(Array1::from_vec(values)).ok_or(CodecError::ZeroNorm)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_encoding() -> FaceEncoding {
        FaceEncoding::from_raw(Array1::linspace(0.1, 1.0, ENCODING_DIM)).unwrap()
    }

    #[test]
    fn test_roundtrip() {
        let original = sample_encoding();
        let restored = deserialize(&serialize(&original)).unwrap();
        assert!(original.distance(&restored) < 1e-4);
    }

    #[test]
    fn test_deserialize_renormalizes_stored_record() {
        // A record stored before normalization was enforced still loads
        // as a unit vector.
        let raw: Vec<f32> = (0..ENCODING_DIM).map(|i| (i % 7) as f32 + 1.0).collect();
        let text = serde_json::to_string(&raw).unwrap();
        let enc = deserialize(&text).unwrap();
        assert!((enc.norm() - 1.0).abs() < 1e-4);
    }

    #[test]
    fn test_deserialize_rejects_garbage() {
        assert!(matches!(deserialize("not json"), Err(CodecError::Syntax(_))));
    }

    #[test]
    fn test_deserialize_rejects_wrong_dimension() {
        let err = deserialize("[0.5, 0.5, 0.5]").unwrap_err();
        assert!(matches!(err, CodecError::DimensionMismatch { got: 3, .. }));
    }

    #[test]
    fn test_deserialize_rejects_zero_norm() {
        let text = serde_json::to_string(&vec![0.0f32; ENCODING_DIM]).unwrap();
        assert!(matches!(deserialize(&text), Err(CodecError::ZeroNorm)));
    }

    #[test]
    fn test_envelope_accepted() {
        let values: Vec<f32> = (0..ENCODING_DIM).map(|i| (i + 1) as f32).collect();
        let text = format!(
            "{{\"version\":1,\"values\":{}}}",
            serde_json::to_string(&values).unwrap()
        );
        let enc = deserialize(&text).unwrap();
        assert!((enc.norm() - 1.0).abs() < 1e-4);
    }

    #[test]
    fn test_envelope_future_version_rejected() {
        let values: Vec<f32> = vec![1.0; ENCODING_DIM];
        let text = format!(
            "{{\"version\":2,\"values\":{}}}",
            serde_json::to_string(&values).unwrap()
        );
        assert!(matches!(
            deserialize(&text),
            Err(CodecError::UnsupportedVersion(2))
        ));
    }
}
