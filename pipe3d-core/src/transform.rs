//! Affine transformation matrices and the homogeneous point transform
use crate::error::TransformError;
use crate::matrix::Matrix4x4;
use crate::vector::Vector3;

/// Transform builder for 3D transformations.
///
/// All matrices follow the row-vector convention of [`transform`]: a point is
/// `(x, y, z, 1) · M`, so `A · B` applies `A` first.
pub struct Transform;

impl Transform {
    /// Rotation about the X axis (radians)
    pub fn rotate_x_matrix(radian: f32) -> Matrix4x4 {
        let (sin, cos) = radian.sin_cos();
        Matrix4x4::from_rows([
            [1.0, 0.0, 0.0, 0.0],
            [0.0, cos, sin, 0.0],
            [0.0, -sin, cos, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }

    /// Rotation about the Y axis (radians)
    pub fn rotate_y_matrix(radian: f32) -> Matrix4x4 {
        let (sin, cos) = radian.sin_cos();
        Matrix4x4::from_rows([
            [cos, 0.0, -sin, 0.0],
            [0.0, 1.0, 0.0, 0.0],
            [sin, 0.0, cos, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }

    /// Rotation about the Z axis (radians)
    pub fn rotate_z_matrix(radian: f32) -> Matrix4x4 {
        let (sin, cos) = radian.sin_cos();
        Matrix4x4::from_rows([
            [cos, sin, 0.0, 0.0],
            [-sin, cos, 0.0, 0.0],
            [0.0, 0.0, 1.0, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }

    /// Combined rotation `X · (Y · Z)` for per-axis angles
    pub fn rotation_matrix(rotate: Vector3) -> Matrix4x4 {
        Self::rotate_x_matrix(rotate.x)
            * (Self::rotate_y_matrix(rotate.y) * Self::rotate_z_matrix(rotate.z))
    }

    pub fn scale_matrix(scale: Vector3) -> Matrix4x4 {
        Matrix4x4::from_rows([
            [scale.x, 0.0, 0.0, 0.0],
            [0.0, scale.y, 0.0, 0.0],
            [0.0, 0.0, scale.z, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }

    pub fn translation_matrix(translate: Vector3) -> Matrix4x4 {
        Matrix4x4::from_rows([
            [1.0, 0.0, 0.0, 0.0],
            [0.0, 1.0, 0.0, 0.0],
            [0.0, 0.0, 1.0, 0.0],
            [translate.x, translate.y, translate.z, 1.0],
        ])
    }

    /// Scale, then rotate, then translate.
    ///
    /// Equivalent to `S · R · T` but built directly: row `i` of the rotation
    /// is scaled by the `i`th scale component and the translation fills row 3.
    pub fn affine_matrix(scale: Vector3, rotate: Vector3, translate: Vector3) -> Matrix4x4 {
        let r = Self::rotation_matrix(rotate);
        let s = [scale.x, scale.y, scale.z];

        let mut result = Matrix4x4::default();
        for (i, factor) in s.into_iter().enumerate() {
            for j in 0..3 {
                result.m[i][j] = factor * r.m[i][j];
            }
        }
        result.m[3] = [translate.x, translate.y, translate.z, 1.0];
        result
    }

    /// Compose `world · (view · projection)`
    pub fn world_view_projection(
        world: &Matrix4x4,
        view: &Matrix4x4,
        projection: &Matrix4x4,
    ) -> Matrix4x4 {
        world * &(view * projection)
    }
}

/// Transform `vector` as the homogeneous point `(x, y, z, 1)` and divide by
/// the resulting `w`.
///
/// Returns [`TransformError::DegenerateProjection`] when `w` is exactly zero.
pub fn transform(vector: Vector3, matrix: &Matrix4x4) -> Result<Vector3, TransformError> {
    let m = &matrix.m;
    let Vector3 { x, y, z } = vector;

    let tx = x * m[0][0] + y * m[1][0] + z * m[2][0] + m[3][0];
    let ty = x * m[0][1] + y * m[1][1] + z * m[2][1] + m[3][1];
    let tz = x * m[0][2] + y * m[1][2] + z * m[2][2] + m[3][2];
    let w = x * m[0][3] + y * m[1][3] + z * m[2][3] + m[3][3];

    if w == 0.0 {
        return Err(TransformError::DegenerateProjection { w });
    }
    Ok(Vector3::new(tx / w, ty / w, tz / w))
}
