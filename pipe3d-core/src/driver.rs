//! Per-frame state update, pipeline evaluation and the frame loop
use crate::canvas::{Canvas, Platform};
use crate::config::SceneConfig;
use crate::error::TransformError;
use crate::geometry::Mesh;
use crate::input::{InputFrame, Key};
use crate::matrix::Matrix4x4;
use crate::projection::project_to_screen;
use crate::transform::Transform;
use crate::vector::Vector3;

/// Overlay column width in pixels
pub const COLUMN_WIDTH: i32 = 60;

/// Glyphs per overlay value; fits a 60 px column with an 8 px font.
const VALUE_GLYPHS: usize = 7;

/// Pose of the single object: scale, per-axis rotation and translation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pose {
    pub scale: Vector3,
    pub rotate: Vector3,
    pub translate: Vector3,
}

impl Pose {
    pub fn world_matrix(&self) -> Matrix4x4 {
        Transform::affine_matrix(self.scale, self.rotate, self.translate)
    }
}

impl Default for Pose {
    fn default() -> Self {
        Self {
            scale: Vector3::ONE,
            rotate: Vector3::ZERO,
            translate: Vector3::ZERO,
        }
    }
}

/// Advance the pose by one frame of input.
///
/// Opposing keys do not cancel: Forward beats Backward and Right beats Left
/// when both are held. The Y spin is applied every frame and never wrapped.
pub fn update(pose: Pose, input: &InputFrame, config: &SceneConfig) -> Pose {
    let mut next = pose;

    if input.held(Key::Forward) {
        next.translate.z += config.forward_step;
    } else if input.held(Key::Backward) {
        next.translate.z -= config.forward_step;
    }

    if input.held(Key::Right) {
        next.translate.x += config.strafe_step;
    } else if input.held(Key::Left) {
        next.translate.x -= config.strafe_step;
    }

    next.rotate.y += config.spin_speed;
    next
}

/// Matrices for one frame, from object space to screen pixels
#[derive(Debug, Clone, Copy)]
pub struct FramePipeline {
    pub world_view_projection: Matrix4x4,
    pub viewport: Matrix4x4,
}

impl FramePipeline {
    /// Fails only if the camera placement cannot be inverted.
    pub fn new(pose: &Pose, config: &SceneConfig) -> Result<Self, TransformError> {
        let camera = config.camera();
        let world = pose.world_matrix();
        let view = camera.view_matrix()?;
        let projection = camera.projection_matrix();
        Ok(Self {
            world_view_projection: Transform::world_view_projection(&world, &view, &projection),
            viewport: config.viewport().matrix(),
        })
    }

    pub fn project(&self, point: Vector3) -> Result<Vector3, TransformError> {
        project_to_screen(point, &self.world_view_projection, &self.viewport)
    }

    pub fn project_triangle(&self, tri: [Vector3; 3]) -> Result<[Vector3; 3], TransformError> {
        Ok([
            self.project(tri[0])?,
            self.project(tri[1])?,
            self.project(tri[2])?,
        ])
    }
}

/// Print a vector as `[x][y][z][label]` in `COLUMN_WIDTH` pixel columns,
/// numbers right-aligned with two decimals.
pub fn vector_screen_printf<C: Canvas + ?Sized>(
    canvas: &mut C,
    x: i32,
    y: i32,
    vector: Vector3,
    label: &str,
) {
    for (column, value) in [vector.x, vector.y, vector.z].into_iter().enumerate() {
        let text = format!("{value:>width$.2}", width = VALUE_GLYPHS);
        canvas.print(x + COLUMN_WIDTH * column as i32, y, &text);
    }
    canvas.print(x + COLUMN_WIDTH * 3, y, label);
}

fn to_screen_point(v: Vector3) -> (i32, i32) {
    (v.x as i32, v.y as i32)
}

/// Owns the persistent frame state and runs the loop against a [`Platform`].
#[derive(Debug)]
pub struct FrameDriver {
    config: SceneConfig,
    mesh: Mesh,
    pose: Pose,
    input: InputFrame,
    cross: Vector3,
}

impl FrameDriver {
    pub fn new(config: SceneConfig) -> Self {
        Self::with_mesh(config, Mesh::triangle())
    }

    pub fn with_mesh(config: SceneConfig, mesh: Mesh) -> Self {
        let (v1, v2) = config.cross_operands;
        Self {
            cross: v1.cross(v2),
            config,
            mesh,
            pose: Pose::default(),
            input: InputFrame::default(),
        }
    }

    pub fn pose(&self) -> &Pose {
        &self.pose
    }

    pub fn cross(&self) -> Vector3 {
        self.cross
    }

    /// Run until the exit key is pressed or the platform asks to close.
    ///
    /// Returns the number of frames rendered. `finalize` is called on the
    /// platform whether the loop ends normally or with an error.
    pub fn run<P: Platform>(&mut self, platform: &mut P) -> Result<u64, P::Error> {
        log::info!(
            "frame loop starting ({}x{}, {:?})",
            self.config.window_width,
            self.config.window_height,
            self.config.fill_mode
        );

        let result = self.main_loop(platform);
        let finalized = platform.finalize();

        let frames = result?;
        finalized?;
        log::info!("frame loop finished after {frames} frames");
        Ok(frames)
    }

    fn main_loop<P: Platform>(&mut self, platform: &mut P) -> Result<u64, P::Error> {
        let mut frames = 0;

        while !platform.process_message()? {
            platform.begin_frame()?;

            self.input.advance(platform.keyboard());
            self.pose = update(self.pose, &self.input, &self.config);
            self.draw(platform);

            platform.end_frame()?;
            frames += 1;

            if self.input.just_pressed(Key::Exit) {
                log::debug!("exit key pressed on frame {frames}");
                break;
            }
        }

        Ok(frames)
    }

    /// Draw the overlay and the mesh for the current pose.
    pub fn draw<C: Canvas + ?Sized>(&self, canvas: &mut C) {
        let (x, y) = self.config.overlay_origin;
        vector_screen_printf(canvas, x, y, self.cross, "Cross");

        let pipeline = match FramePipeline::new(&self.pose, &self.config) {
            Ok(pipeline) => pipeline,
            Err(err) => {
                log::warn!("skipping mesh this frame: {err}");
                return;
            }
        };

        for tri in self.mesh.triangles() {
            match pipeline.project_triangle(tri) {
                Ok([a, b, c]) => canvas.draw_triangle(
                    to_screen_point(a),
                    to_screen_point(b),
                    to_screen_point(c),
                    self.config.triangle_color,
                    self.config.fill_mode,
                ),
                Err(err) => log::warn!("skipping triangle: {err}"),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::{Color, FillMode};
    use crate::input::KeyboardState;
    use approx::assert_abs_diff_eq;
    use std::collections::VecDeque;

    #[derive(Debug, Default)]
    struct Recorder {
        triangles: Vec<[(i32, i32); 3]>,
        text: Vec<(i32, i32, String)>,
    }

    impl Canvas for Recorder {
        fn draw_triangle(
            &mut self,
            p0: (i32, i32),
            p1: (i32, i32),
            p2: (i32, i32),
            _color: Color,
            _fill: FillMode,
        ) {
            self.triangles.push([p0, p1, p2]);
        }

        fn print(&mut self, x: i32, y: i32, text: &str) {
            self.text.push((x, y, text.to_string()));
        }
    }

    /// Replays a fixed keyboard script, then requests close.
    struct ScriptedPlatform {
        script: VecDeque<KeyboardState>,
        canvas: Recorder,
        frames_begun: u32,
        frames_ended: u32,
        finalized: bool,
        fail_on_begin: bool,
    }

    impl ScriptedPlatform {
        fn new(script: Vec<KeyboardState>) -> Self {
            Self {
                script: script.into(),
                canvas: Recorder::default(),
                frames_begun: 0,
                frames_ended: 0,
                finalized: false,
                fail_on_begin: false,
            }
        }
    }

    impl Canvas for ScriptedPlatform {
        fn draw_triangle(
            &mut self,
            p0: (i32, i32),
            p1: (i32, i32),
            p2: (i32, i32),
            color: Color,
            fill: FillMode,
        ) {
            self.canvas.draw_triangle(p0, p1, p2, color, fill);
        }

        fn print(&mut self, x: i32, y: i32, text: &str) {
            self.canvas.print(x, y, text);
        }
    }

    impl Platform for ScriptedPlatform {
        type Error = String;

        fn process_message(&mut self) -> Result<bool, String> {
            Ok(self.script.is_empty())
        }

        fn begin_frame(&mut self) -> Result<(), String> {
            if self.fail_on_begin {
                return Err("host lost".to_string());
            }
            self.frames_begun += 1;
            Ok(())
        }

        fn keyboard(&mut self) -> KeyboardState {
            self.script.pop_front().unwrap_or_default()
        }

        fn end_frame(&mut self) -> Result<(), String> {
            self.frames_ended += 1;
            Ok(())
        }

        fn finalize(&mut self) -> Result<(), String> {
            self.finalized = true;
            Ok(())
        }
    }

    fn frame(keys: &[Key]) -> InputFrame {
        let mut input = InputFrame::default();
        input.advance(KeyboardState::with_pressed(keys));
        input
    }

    #[test]
    fn test_update_spins_every_frame() {
        let config = SceneConfig::default();
        let pose = update(Pose::default(), &frame(&[]), &config);
        assert_eq!(pose.rotate.y, 0.05);
        assert_eq!(pose.translate, Vector3::ZERO);
    }

    #[test]
    fn test_update_moves_on_held_keys() {
        let config = SceneConfig::default();
        let pose = update(Pose::default(), &frame(&[Key::Forward, Key::Left]), &config);
        assert_eq!(pose.translate, Vector3::new(-0.5, 0.0, 2.0));

        let pose = update(pose, &frame(&[Key::Backward, Key::Right]), &config);
        assert_eq!(pose.translate, Vector3::new(0.0, 0.0, 0.0));
    }

    #[test]
    fn test_update_first_checked_key_wins() {
        let config = SceneConfig::default();
        let pose = update(
            Pose::default(),
            &frame(&[Key::Forward, Key::Backward, Key::Left, Key::Right]),
            &config,
        );
        assert_eq!(pose.translate.z, 2.0);
        assert_eq!(pose.translate.x, 0.5);
    }

    #[test]
    fn test_update_rotation_is_unbounded() {
        let config = SceneConfig::default();
        let mut pose = Pose::default();
        for _ in 0..1000 {
            pose = update(pose, &frame(&[]), &config);
        }
        assert!(pose.rotate.y > std::f32::consts::TAU * 7.0);
    }

    #[test]
    fn test_pipeline_projects_origin_to_screen_center() {
        let config = SceneConfig::default();
        let pipeline = FramePipeline::new(&Pose::default(), &config).unwrap();
        let center = pipeline.project(Vector3::ZERO).unwrap();
        assert_abs_diff_eq!(center.x, 640.0, epsilon = 1e-3);
        assert_abs_diff_eq!(center.y, 360.0, epsilon = 1e-3);
    }

    #[test]
    fn test_pipeline_degenerates_at_camera_plane() {
        let config = SceneConfig::default();
        let pose = Pose {
            translate: Vector3::new(0.0, 0.0, -300.0),
            ..Pose::default()
        };
        let pipeline = FramePipeline::new(&pose, &config).unwrap();
        assert_eq!(
            pipeline.project(Vector3::ZERO),
            Err(TransformError::DegenerateProjection { w: 0.0 })
        );
    }

    #[test]
    fn test_vector_screen_printf_layout() {
        let mut canvas = Recorder::default();
        vector_screen_printf(&mut canvas, 10, 20, Vector3::new(4.07, 8.56, 11.4), "Cross");
        assert_eq!(
            canvas.text,
            vec![
                (10, 20, "   4.07".to_string()),
                (70, 20, "   8.56".to_string()),
                (130, 20, "  11.40".to_string()),
                (190, 20, "Cross".to_string()),
            ]
        );
    }

    #[test]
    fn test_draw_emits_overlay_and_triangle() {
        let driver = FrameDriver::new(SceneConfig::default());
        let mut canvas = Recorder::default();
        driver.draw(&mut canvas);

        assert_eq!(canvas.text.len(), 4);
        assert_eq!(canvas.text[3].2, "Cross");
        assert_eq!(canvas.triangles.len(), 1);

        let [a, b, c] = canvas.triangles[0];
        // Unrotated triangle straddles the center, apex above it.
        assert!(a.0 > 640 && b.0 < 640);
        assert_eq!(a.1, b.1);
        assert!(c.1 < a.1);
    }

    #[test]
    fn test_draw_skips_degenerate_triangle() {
        let mut driver = FrameDriver::new(SceneConfig::default());
        driver.pose.translate = Vector3::new(0.0, 0.0, -300.0);
        let mut canvas = Recorder::default();
        driver.draw(&mut canvas);
        assert!(canvas.triangles.is_empty());
        assert_eq!(canvas.text.len(), 4);
    }

    #[test]
    fn test_run_until_platform_closes() {
        let script = vec![
            KeyboardState::with_pressed(&[Key::Forward]),
            KeyboardState::with_pressed(&[Key::Forward]),
            KeyboardState::new(),
        ];
        let mut platform = ScriptedPlatform::new(script);
        let mut driver = FrameDriver::new(SceneConfig::default());

        let frames = driver.run(&mut platform).unwrap();
        assert_eq!(frames, 3);
        assert_eq!(platform.frames_begun, 3);
        assert_eq!(platform.frames_ended, 3);
        assert!(platform.finalized);
        assert_eq!(platform.canvas.triangles.len(), 3);
        assert_eq!(driver.pose().translate.z, 4.0);
        assert_abs_diff_eq!(driver.pose().rotate.y, 0.15, epsilon = 1e-6);
    }

    #[test]
    fn test_run_stops_on_exit_press() {
        let script = vec![
            KeyboardState::new(),
            KeyboardState::with_pressed(&[Key::Exit]),
            KeyboardState::new(),
            KeyboardState::new(),
        ];
        let mut platform = ScriptedPlatform::new(script);
        let mut driver = FrameDriver::new(SceneConfig::default());

        assert_eq!(driver.run(&mut platform), Ok(2));
        assert!(platform.finalized);
        assert_eq!(platform.script.len(), 2);
    }

    #[test]
    fn test_exit_held_from_first_frame_still_exits() {
        let script = vec![KeyboardState::with_pressed(&[Key::Exit]); 3];
        let mut platform = ScriptedPlatform::new(script);
        let mut driver = FrameDriver::new(SceneConfig::default());
        assert_eq!(driver.run(&mut platform), Ok(1));
    }

    #[test]
    fn test_run_finalizes_on_error() {
        let mut platform = ScriptedPlatform::new(vec![KeyboardState::new()]);
        platform.fail_on_begin = true;
        let mut driver = FrameDriver::new(SceneConfig::default());

        assert_eq!(driver.run(&mut platform), Err("host lost".to_string()));
        assert!(platform.finalized);
    }

    #[test]
    fn test_driver_computes_cross_overlay() {
        let driver = FrameDriver::new(SceneConfig::default());
        assert_abs_diff_eq!(driver.cross(), Vector3::new(4.07, 8.56, 11.4), epsilon = 1e-5);
    }
}
