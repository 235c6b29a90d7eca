//! Local transform with a cached world matrix
//!
//! A [`Transform`] stores position, Euler rotation (degrees) and scale in the
//! space of its parent, plus the world matrix computed the last time it was
//! clean. Every setter marks the transform dirty; only
//! [`Transform::compute_world_matrix`] clears the flag.

use cgmath::{Deg, InnerSpace, Matrix3, Matrix4, SquareMatrix, Vector3, Zero};

/// Rotation axis selector for [`Transform::set_local_rotation_axis`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
    Z,
}

/// Position / rotation / scale triple plus its cached world matrix
#[derive(Debug, Clone)]
pub struct Transform {
    position: Vector3<f32>,
    /// Euler angles in degrees, composed as Y · X · Z
    rotation: Vector3<f32>,
    scale: Vector3<f32>,
    world_matrix: Matrix4<f32>,
    dirty: bool,
}

impl Default for Transform {
    fn default() -> Self {
        Self::new()
    }
}

impl Transform {
    /// Identity transform, dirty until first computed
    pub fn new() -> Self {
        Self {
            position: Vector3::zero(),
            rotation: Vector3::zero(),
            scale: Vector3::new(1.0, 1.0, 1.0),
            world_matrix: Matrix4::identity(),
            dirty: true,
        }
    }

    /// Creates a transform whose local components are decomposed from `matrix`
    pub fn from_matrix(matrix: Matrix4<f32>) -> Self {
        let mut transform = Self::new();
        transform.set_world_matrix(matrix);
        transform
    }

    /// Convenience constructor for a translated transform
    pub fn from_position(position: Vector3<f32>) -> Self {
        let mut transform = Self::new();
        transform.set_local_position(position);
        transform
    }

    pub fn set_local_position(&mut self, position: Vector3<f32>) {
        self.position = position;
        self.dirty = true;
    }

    pub fn set_local_rotation(&mut self, rotation_deg: Vector3<f32>) {
        self.rotation = rotation_deg;
        self.dirty = true;
    }

    /// Overwrites a single Euler component (degrees)
    pub fn set_local_rotation_axis(&mut self, axis: Axis, value_deg: f32) {
        match axis {
            Axis::X => self.rotation.x = value_deg,
            Axis::Y => self.rotation.y = value_deg,
            Axis::Z => self.rotation.z = value_deg,
        }
        self.dirty = true;
    }

    pub fn set_local_scale(&mut self, scale: Vector3<f32>) {
        self.scale = scale;
        self.dirty = true;
    }

    /// Stores `matrix` as the cached world matrix and re-derives the local
    /// components from it.
    ///
    /// Skew and perspective terms are discarded, so a later recomputation
    /// only reproduces `matrix` when it was a pure translate/rotate/scale.
    pub fn set_world_matrix(&mut self, matrix: Matrix4<f32>) {
        self.world_matrix = matrix;

        let (position, rotation, scale) = decompose(&matrix);
        self.position = position;
        self.rotation = rotation;
        self.scale = scale;
        self.dirty = true;
    }

    pub fn local_position(&self) -> Vector3<f32> {
        self.position
    }

    pub fn local_rotation(&self) -> Vector3<f32> {
        self.rotation
    }

    pub fn local_scale(&self) -> Vector3<f32> {
        self.scale
    }

    /// Cached world matrix; only meaningful while the transform is clean
    pub fn world_matrix(&self) -> &Matrix4<f32> {
        &self.world_matrix
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    /// Local matrix `T · Ry · Rx · Rz · S`
    pub fn local_matrix(&self) -> Matrix4<f32> {
        let rotation = Matrix4::from_angle_y(Deg(self.rotation.y))
            * Matrix4::from_angle_x(Deg(self.rotation.x))
            * Matrix4::from_angle_z(Deg(self.rotation.z));

        Matrix4::from_translation(self.position)
            * rotation
            * Matrix4::from_nonuniform_scale(self.scale.x, self.scale.y, self.scale.z)
    }

    /// Rebuilds the world matrix from the local components and clears the
    /// dirty flag. `parent` is the parent's current world matrix, if any.
    pub fn compute_world_matrix(&mut self, parent: Option<&Matrix4<f32>>) {
        let local = self.local_matrix();
        self.world_matrix = match parent {
            Some(parent_world) => parent_world * local,
            None => local,
        };
        self.dirty = false;
    }

    /// Transforms a local-space point into world space using the cached matrix
    pub fn transform_point(&self, point: Vector3<f32>) -> Vector3<f32> {
        let p = self.world_matrix * point.extend(1.0);
        p.truncate()
    }
}

/// Splits an affine matrix into translation, Y·X·Z Euler angles (degrees) and scale
fn decompose(matrix: &Matrix4<f32>) -> (Vector3<f32>, Vector3<f32>, Vector3<f32>) {
    let translation = matrix.w.truncate();

    let mut basis = Matrix3::from_cols(
        matrix.x.truncate(),
        matrix.y.truncate(),
        matrix.z.truncate(),
    );

    let mut scale = Vector3::new(
        basis.x.magnitude(),
        basis.y.magnitude(),
        basis.z.magnitude(),
    );

    // Mirrored basis: fold the reflection into the X scale
    if basis.determinant() < 0.0 {
        scale.x = -scale.x;
    }

    if scale.x.abs() > f32::EPSILON {
        basis.x /= scale.x;
    }
    if scale.y.abs() > f32::EPSILON {
        basis.y /= scale.y;
    }
    if scale.z.abs() > f32::EPSILON {
        basis.z /= scale.z;
    }

    (translation, euler_yxz_degrees(&basis), scale)
}

/// Extracts angles such that `R = Ry(y) · Rx(x) · Rz(z)`.
///
/// cgmath matrices are column-major, so `m.c.r` is row `r` of column `c`.
fn euler_yxz_degrees(m: &Matrix3<f32>) -> Vector3<f32> {
    // Row 1, column 2 holds -sin(x)
    let sin_x = (-m.z.y).clamp(-1.0, 1.0);
    let x = sin_x.asin();

    let (y, z) = if sin_x.abs() < 0.999_999 {
        (m.z.x.atan2(m.z.z), m.x.y.atan2(m.y.y))
    } else {
        // Gimbal lock: Y and Z share an axis, put everything into Y
        ((-m.x.z).atan2(m.x.x), 0.0)
    };

    Vector3::new(x.to_degrees(), y.to_degrees(), z.to_degrees())
}
