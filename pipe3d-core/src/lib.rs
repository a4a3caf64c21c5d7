//! pipe3d Core Library - world/view/projection math and the frame driver
//!
//! This library provides the host-independent part of the renderer: vector
//! and matrix algebra, the transform pipeline that takes model-space points to
//! screen pixels, and a frame loop that talks to the host through the
//! `Platform` and `Canvas` traits.

pub mod canvas;
pub mod config;
pub mod driver;
pub mod error;
pub mod geometry;
pub mod input;
pub mod matrix;
pub mod projection;
pub mod transform;
pub mod vector;

// Re-export commonly used types
pub use canvas::{Canvas, Color, FillMode, Platform};
pub use config::SceneConfig;
pub use driver::{update, vector_screen_printf, FrameDriver, FramePipeline, Pose};
pub use error::TransformError;
pub use geometry::Mesh;
pub use input::{InputFrame, Key, KeyboardState};
pub use matrix::{inverse, multiply, Matrix4x4};
pub use projection::{
    orthographic_matrix, perspective_fov_matrix, project_to_screen, viewport_matrix, Camera,
    ProjectionMode, Viewport,
};
pub use transform::{transform, Transform};
pub use vector::{cross, Vector3};
