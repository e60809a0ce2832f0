use rollcall_core::{matcher, pipeline};

/// CLI configuration, loaded from environment variables.
pub struct Config {
    /// Path to the SeetaFace frontal-face detection model.
    pub model_path: String,
    /// Euclidean distance threshold for a positive match.
    pub match_threshold: f32,
    /// Frame shrink factor applied before detection (1.0 disables).
    pub detect_downscale: f32,
}

impl Config {
    /// Load configuration from `ROLLCALL_*` environment variables with
    /// defaults.
    pub fn from_env() -> Self {
        Self {
            model_path: std::env::var("ROLLCALL_MODEL_PATH")
                .unwrap_or_else(|_| "models/seeta_fd_frontal_v1.0.bin".to_string()),
            match_threshold: env_f32("ROLLCALL_MATCH_THRESHOLD", matcher::MATCH_THRESHOLD),
            detect_downscale: env_f32(
                "ROLLCALL_DETECT_DOWNSCALE",
                pipeline::DEFAULT_DETECTION_DOWNSCALE,
            ),
        }
    }
}

fn env_f32(key: &str, default: f32) -> f32 {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
