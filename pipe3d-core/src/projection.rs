//! Camera, projection and viewport matrices
use crate::error::TransformError;
use crate::matrix::Matrix4x4;
use crate::transform::{transform, Transform};
use crate::vector::Vector3;

/// Projection mode for rendering
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectionMode {
    Orthographic,
    Perspective,
}

/// Perspective projection with a vertical field of view.
///
/// `fov_y` is the full vertical angle in radians and `aspect_ratio` is
/// width / height. View-space depth maps near → 0 and far → 1 after the
/// divide by `w`, which the `1` at `[2][3]` sets to view-space z. The caller
/// must keep `fov_y` in (0, π) and `near_clip != far_clip`.
pub fn perspective_fov_matrix(
    fov_y: f32,
    aspect_ratio: f32,
    near_clip: f32,
    far_clip: f32,
) -> Matrix4x4 {
    let cot = 1.0 / (fov_y / 2.0).tan();
    let depth = far_clip / (far_clip - near_clip);
    Matrix4x4::from_rows([
        [cot / aspect_ratio, 0.0, 0.0, 0.0],
        [0.0, cot, 0.0, 0.0],
        [0.0, 0.0, depth, 1.0],
        [0.0, 0.0, -near_clip * depth, 0.0],
    ])
}

/// Orthographic projection of the box spanned by `left..right`, `top..bottom`
/// and `near..far` onto `[-1, 1] × [-1, 1] × [0, 1]`, with `left` → -1 and
/// `top` → +1.
pub fn orthographic_matrix(
    left: f32,
    top: f32,
    right: f32,
    bottom: f32,
    near_clip: f32,
    far_clip: f32,
) -> Matrix4x4 {
    Matrix4x4::from_rows([
        [2.0 / (right - left), 0.0, 0.0, 0.0],
        [0.0, 2.0 / (top - bottom), 0.0, 0.0],
        [0.0, 0.0, 1.0 / (far_clip - near_clip), 0.0],
        [
            (left + right) / (left - right),
            (top + bottom) / (bottom - top),
            near_clip / (near_clip - far_clip),
            1.0,
        ],
    ])
}

/// Maps NDC to screen pixels, with Y flipped so that +Y in NDC points up the screen.
pub fn viewport_matrix(
    left: f32,
    top: f32,
    width: f32,
    height: f32,
    min_depth: f32,
    max_depth: f32,
) -> Matrix4x4 {
    Matrix4x4::from_rows([
        [width / 2.0, 0.0, 0.0, 0.0],
        [0.0, -height / 2.0, 0.0, 0.0],
        [0.0, 0.0, max_depth - min_depth, 0.0],
        [left + width / 2.0, top + height / 2.0, min_depth, 1.0],
    ])
}

/// Screen rectangle and depth range targeted by the viewport transform
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
    pub min_depth: f32,
    pub max_depth: f32,
}

impl Viewport {
    /// Full-window viewport with depth range `[0, 1]`
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            left: 0.0,
            top: 0.0,
            width,
            height,
            min_depth: 0.0,
            max_depth: 1.0,
        }
    }

    pub fn aspect_ratio(&self) -> f32 {
        self.width / self.height
    }

    pub fn matrix(&self) -> Matrix4x4 {
        viewport_matrix(
            self.left,
            self.top,
            self.width,
            self.height,
            self.min_depth,
            self.max_depth,
        )
    }
}

/// Take a model-space point to screen space: `wvp`, divide, then viewport.
pub fn project_to_screen(
    point: Vector3,
    world_view_projection: &Matrix4x4,
    viewport: &Matrix4x4,
) -> Result<Vector3, TransformError> {
    let ndc = transform(point, world_view_projection)?;
    transform(ndc, viewport)
}

/// Camera configuration for 3D rendering.
///
/// The camera is placed in the world by its own affine transform; the view
/// matrix is the inverse of that placement.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub position: Vector3,
    pub rotation: Vector3,
    pub fov_y: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
    pub mode: ProjectionMode,
}

impl Camera {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            position: Vector3::new(0.0, 0.0, -300.0),
            rotation: Vector3::ZERO,
            fov_y: 0.45,
            aspect: width as f32 / height as f32,
            near: 0.1,
            far: 100.0,
            mode: ProjectionMode::Perspective,
        }
    }

    /// Camera placement in world space
    pub fn world_matrix(&self) -> Matrix4x4 {
        Transform::affine_matrix(Vector3::ONE, self.rotation, self.position)
    }

    /// World-to-camera transform
    pub fn view_matrix(&self) -> Result<Matrix4x4, TransformError> {
        self.world_matrix().try_inverse()
    }

    pub fn projection_matrix(&self) -> Matrix4x4 {
        match self.mode {
            ProjectionMode::Perspective => {
                perspective_fov_matrix(self.fov_y, self.aspect, self.near, self.far)
            }
            ProjectionMode::Orthographic => {
                let height = self.position.length();
                let width = height * self.aspect;
                orthographic_matrix(
                    -width / 2.0,
                    height / 2.0,
                    width / 2.0,
                    -height / 2.0,
                    self.near,
                    self.far,
                )
            }
        }
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(1280, 720)
    }
}
