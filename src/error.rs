//! Error types for the ornament display.
//!
//! Nothing on the per-frame path can fail. Errors only surface while loading
//! or validating configuration and while the host window is being created.

use thiserror::Error;

/// Errors that can occur while loading or validating a [`SceneConfig`](crate::SceneConfig).
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read or write the config file.
    #[error("Failed to access config file: {0}")]
    Io(#[from] std::io::Error),

    /// The file is not valid config JSON.
    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),

    /// A geometry parameter is NaN, infinite or negative.
    #[error("Invalid {field}: {value} (must be finite and non-negative)")]
    InvalidGeometry {
        /// Dotted path of the offending field, e.g. `tree.height`.
        field: &'static str,
        /// The rejected value.
        value: f32,
    },

    /// A per-frame blend factor outside `[0, 1]`, which would overshoot or diverge.
    #[error("Invalid {field}: {value} (must be a finite rate in [0, 1])")]
    InvalidRate {
        /// Dotted path of the offending field.
        field: &'static str,
        /// The rejected value.
        value: f32,
    },

    /// The explosion shell's inner radius is larger than its outer radius.
    #[error("Explosion inner radius {inner} exceeds outer radius {outer}")]
    InvertedShell {
        /// Configured inner radius.
        inner: f32,
        /// Configured outer radius.
        outer: f32,
    },
}

/// Errors that can occur when running the display in a window.
#[derive(Error, Debug)]
pub enum SimulationError {
    /// Failed to create event loop.
    #[error("Failed to create event loop: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),

    /// Failed to create window.
    #[error("Failed to create window: {0}")]
    Window(#[from] winit::error::OsError),

    /// Configuration was rejected.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}
