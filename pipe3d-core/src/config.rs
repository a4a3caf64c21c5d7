//! Scene and frame-loop configuration
use crate::canvas::{Color, FillMode};
use crate::projection::{Camera, ProjectionMode, Viewport};
use crate::vector::Vector3;

/// Every tunable constant of the demo scene.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneConfig {
    /// Virtual screen size in pixels
    pub window_width: u32,
    pub window_height: u32,

    pub camera_position: Vector3,
    pub camera_rotation: Vector3,
    /// Full vertical field of view (radians)
    pub fov_y: f32,
    pub near_clip: f32,
    pub far_clip: f32,
    pub projection: ProjectionMode,

    /// Per-frame translation along Z while Forward/Backward is held
    pub forward_step: f32,
    /// Per-frame translation along X while Left/Right is held
    pub strafe_step: f32,
    /// Per-frame rotation about Y (radians)
    pub spin_speed: f32,

    pub triangle_color: Color,
    pub fill_mode: FillMode,

    /// Operands of the cross product shown in the overlay
    pub cross_operands: (Vector3, Vector3),
    pub overlay_origin: (i32, i32),

    pub target_fps: u32,
}

impl SceneConfig {
    pub fn aspect_ratio(&self) -> f32 {
        self.window_width as f32 / self.window_height as f32
    }

    pub fn camera(&self) -> Camera {
        Camera {
            position: self.camera_position,
            rotation: self.camera_rotation,
            fov_y: self.fov_y,
            aspect: self.aspect_ratio(),
            near: self.near_clip,
            far: self.far_clip,
            mode: self.projection,
        }
    }

    pub fn viewport(&self) -> Viewport {
        Viewport::new(self.window_width as f32, self.window_height as f32)
    }
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            window_width: 1280,
            window_height: 720,
            camera_position: Vector3::new(0.0, 0.0, -300.0),
            camera_rotation: Vector3::ZERO,
            fov_y: 0.45,
            near_clip: 0.1,
            far_clip: 100.0,
            projection: ProjectionMode::Perspective,
            forward_step: 2.0,
            strafe_step: 0.5,
            spin_speed: 0.05,
            triangle_color: Color::RED,
            fill_mode: FillMode::Solid,
            cross_operands: (Vector3::new(1.2, -3.9, 2.5), Vector3::new(2.8, 0.4, -1.3)),
            overlay_origin: (0, 0),
            target_fps: 60,
        }
    }
}
