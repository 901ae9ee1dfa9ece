use std::time::Duration;

use bevy::prelude::*;

/// Local transform of a node captured at a point in time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransformState {
    pub position: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
    /// Time since startup at capture.
    pub timestamp: Duration,
}

impl TransformState {
    pub fn capture(transform: &Transform, timestamp: Duration) -> Self {
        Self {
            position: transform.translation,
            rotation: transform.rotation,
            scale: transform.scale,
            timestamp,
        }
    }

    /// Writes this state over `transform`, leaving its scale alone unless `mirror_scale` is set.
    pub fn write_to(&self, transform: &Transform, mirror_scale: bool) -> Transform {
        let mut next = *transform;
        next.translation = self.position;
        next.rotation = self.rotation;
        if mirror_scale {
            next.scale = self.scale;
        }
        next
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn write_to_keeps_scale_without_flag() {
        let source = Transform::from_xyz(1.0, 2.0, 3.0).with_scale(Vec3::splat(4.0));
        let state = TransformState::capture(&source, Duration::from_millis(500));

        let target = Transform::default();
        let written = state.write_to(&target, false);
        assert_eq!(written.translation, Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(written.scale, Vec3::ONE);

        let written = state.write_to(&target, true);
        assert_eq!(written.scale, Vec3::splat(4.0));
    }
}
