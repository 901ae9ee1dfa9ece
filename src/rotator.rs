use bevy::prelude::*;

pub struct RotatorPlugin;

impl Plugin for RotatorPlugin {
    fn build(&self, app: &mut App) {
        app.register_type::<Rotator>()
            .add_systems(Update, rotate);
    }
}

/// Spins an entity around its local Y axis.
#[derive(Component, Reflect, Debug, Clone, Copy)]
#[reflect(Component)]
pub struct Rotator {
    pub degrees_per_second: f32,
}

impl Default for Rotator {
    fn default() -> Self {
        Self {
            degrees_per_second: 10.0,
        }
    }
}

fn rotate(mut q_rotators: Query<(&mut Transform, &Rotator)>, time: Res<Time>) {
    for (mut transform, rotator) in q_rotators.iter_mut() {
        let angle = rotator.degrees_per_second * time.delta_seconds();
        transform.rotate_local_y(angle.to_radians());
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[test]
    fn rotates_by_speed_times_delta() {
        let mut app = App::new();
        app.init_resource::<Time>().add_plugins(RotatorPlugin);

        let tilted = Quat::from_rotation_x(0.3);
        let entity = app
            .world
            .spawn((
                Transform::from_rotation(tilted),
                Rotator {
                    degrees_per_second: 90.0,
                },
            ))
            .id();

        app.world
            .resource_mut::<Time>()
            .advance_by(Duration::from_millis(500));
        app.update();

        let rotation = app.world.get::<Transform>(entity).map(|t| t.rotation);
        let expected = tilted * Quat::from_rotation_y(45f32.to_radians());
        assert!(rotation.is_some_and(|r| r.abs_diff_eq(expected, 1e-5)));
    }
}
