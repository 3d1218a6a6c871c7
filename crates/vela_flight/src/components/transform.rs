//! Spatial pose component.

use vela_core::Component;
use vela_shared::math::{Quaternion, Vec3};

/// World-space position, orientation and scale of an entity.
///
/// The `dirty` flag marks poses that changed since the previous frame so
/// downstream consumers (interpolation, replication) can skip untouched
/// entities. The physics integrator sets it whenever it moves a body.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    /// World-space position in meters.
    pub position: Vec3,
    /// World-space orientation. Body axes: +X right, +Y up, +Z forward.
    pub rotation: Quaternion,
    /// Per-axis scale. Purely visual; physics ignores it.
    pub scale: Vec3,
    /// Set when position or rotation changed this frame.
    pub dirty: bool,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quaternion::IDENTITY,
            scale: Vec3::splat(1.0),
            dirty: false,
        }
    }
}

impl Component for Transform {
    const ID: u8 = 0;
    const NAME: &'static str = "transform";
}

impl Transform {
    /// Transform at `position` with identity rotation.
    pub fn at(position: Vec3) -> Self {
        Self {
            position,
            ..Self::default()
        }
    }

    /// Body-frame forward axis (+Z) expressed in world space.
    pub fn forward(&self) -> Vec3 {
        self.rotation.forward()
    }

    /// Body-frame right axis (+X) expressed in world space.
    pub fn right(&self) -> Vec3 {
        self.rotation.right()
    }

    /// Body-frame up axis (+Y) expressed in world space.
    pub fn up(&self) -> Vec3 {
        self.rotation.up()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_identity_pose() {
        let t = Transform::default();
        assert_eq!(t.position, Vec3::ZERO);
        assert_eq!(t.scale, Vec3::splat(1.0));
        assert!(!t.dirty);
        assert!((t.forward() - Vec3::Z).length() < 1e-6);
    }

    #[test]
    fn axes_follow_rotation() {
        let t = Transform {
            rotation: Quaternion::from_axis_angle(Vec3::Y, core::f32::consts::FRAC_PI_2),
            ..Transform::default()
        };
        // Quarter turn about +Y swings forward (+Z) onto +X.
        assert!((t.forward() - Vec3::X).length() < 1e-5);
        assert!((t.up() - Vec3::Y).length() < 1e-5);
    }
}
