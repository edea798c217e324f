use glam::Mat4;
use glam::Quat;
use glam::Vec3;

use crate::Component;

/// # Visibility
///
/// Visibility of the node.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub enum Visibility {
    /// Inherit the visibility from the node's parent.
    #[default]
    Inherit,
    /// Node is visible.
    Visible,
    /// Node is not visible.
    Invisible,
}

impl Component for Visibility {}

/// # Computed Visibility
///
/// Visibility of the node after resolving inheritance. Written by
/// [crate::systems::compute_visibility].
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum ComputedVisibility {
    /// Node is visible.
    Visible,
    /// Node is not visible.
    Invisible,
}

impl ComputedVisibility {
    /// Returns true if the node is visible.
    pub fn is_visible(self) -> bool {
        self == Self::Visible
    }
}

impl Component for ComputedVisibility {}

/// # Local Transform
///
/// Position, rotation, and scale of the node relative to its parent.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct LocalTransform {
    /// Position of the transform.
    pub position: Vec3,
    /// Rotation of the transform.
    pub rotation: Quat,
    /// Scale of the transform.
    pub scale: Vec3,
}

impl LocalTransform {
    /// Identity transform.
    pub const IDENTITY: Self = Self {
        position: Vec3::ZERO,
        rotation: Quat::IDENTITY,
        scale: Vec3::ONE,
    };

    /// Returns a transform with the given position, rotation, and scale.
    pub const fn new(position: Vec3, rotation: Quat, scale: Vec3) -> Self {
        Self {
            position,
            rotation,
            scale,
        }
    }

    /// Returns a transform with the given position.
    pub const fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Self::IDENTITY
        }
    }

    /// Returns a transform with the given rotation.
    pub const fn from_rotation(rotation: Quat) -> Self {
        Self {
            rotation,
            ..Self::IDENTITY
        }
    }

    /// Returns a transform with the given scale.
    pub const fn from_scale(scale: Vec3) -> Self {
        Self {
            scale,
            ..Self::IDENTITY
        }
    }

    /// Returns a copy with the position replaced.
    pub const fn with_position(self, position: Vec3) -> Self {
        Self { position, ..self }
    }

    /// Returns a copy with the rotation replaced.
    pub const fn with_rotation(self, rotation: Quat) -> Self {
        Self { rotation, ..self }
    }

    /// Returns a copy with the scale replaced.
    pub const fn with_scale(self, scale: Vec3) -> Self {
        Self { scale, ..self }
    }

    /// Moves the transform by the given offset.
    pub fn translate(&mut self, offset: Vec3) {
        self.position += offset;
    }

    /// Applies the given rotation on top of the current one.
    pub fn rotate(&mut self, rotation: Quat) {
        self.rotation = (rotation * self.rotation).normalize();
    }

    /// Returns the matrix that scales, then rotates, then translates.
    pub fn matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.rotation, self.position)
    }
}

impl Component for LocalTransform {}

impl Default for LocalTransform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// # World Transform
///
/// Transform of the node in world coordinates. Written by
/// [crate::systems::compute_world_transform].
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct WorldTransform {
    /// Transform matrix.
    pub matrix: Mat4,
}

impl WorldTransform {
    /// Identity transform.
    pub const IDENTITY: Self = Self {
        matrix: Mat4::IDENTITY,
    };

    /// Returns a transform with the given transform matrix.
    pub const fn new(matrix: Mat4) -> Self {
        Self { matrix }
    }

    /// Returns the translation part of the transform.
    pub fn position(&self) -> Vec3 {
        self.matrix.w_axis.truncate()
    }

    /// Transforms a point from the node's local space to world space.
    pub fn transform_point(&self, point: Vec3) -> Vec3 {
        self.matrix.transform_point3(point)
    }
}

impl Component for WorldTransform {}

impl Default for WorldTransform {
    fn default() -> Self {
        Self::IDENTITY
    }
}
