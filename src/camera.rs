use bevy::prelude::*;
use bevy_third_person_camera::{
    camera::Offset, ThirdPersonCamera, ThirdPersonCameraPlugin, ThirdPersonCameraTarget,
};

use crate::rig::{MirroredRig, SourceRig};

pub struct CameraPlugin;

impl Plugin for CameraPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins(ThirdPersonCameraPlugin)
            .add_systems(Startup, spawn_camera)
            .add_systems(Update, (focus_between_rigs, follow_orbit).chain());
    }
}

const FOCUS_HEIGHT: f32 = 1.2;

/// Orbit target kept halfway between the source and the mirrored rig.
#[derive(Component)]
pub struct CameraFocus;

pub fn spawn_camera(mut commands: Commands) {
    let focus = Vec3::Y * FOCUS_HEIGHT;
    let eye = Transform::from_xyz(0.0, 2.0, 6.0).looking_at(focus, Vec3::Y);

    commands.spawn((
        Name::new("CameraFocus"),
        CameraFocus,
        ThirdPersonCameraTarget,
        SpatialBundle::from_transform(Transform::from_translation(focus)),
    ));

    commands.spawn((
        Name::new("Orbit"),
        ThirdPersonCamera {
            offset_enabled: true,
            offset: Offset::new(0.0, 0.4),
            offset_toggle_key: KeyCode::KeyE,
            cursor_lock_toggle_enabled: true,
            // Unlocked so the mirror panel is usable right away.
            cursor_lock_active: false,
            cursor_lock_key: KeyCode::Space,
            ..default()
        },
        eye,
    ));

    commands.spawn((
        Name::new("Viewer"),
        Camera3dBundle {
            transform: eye,
            ..default()
        },
    ));
}

/// Moves the orbit target to the midpoint of both rigs.
fn focus_between_rigs(
    mut q_focus: Query<&mut Transform, With<CameraFocus>>,
    q_source: Query<&GlobalTransform, (With<SourceRig>, Without<MirroredRig>)>,
    q_mirrored: Query<&GlobalTransform, (With<MirroredRig>, Without<SourceRig>)>,
) {
    let (Ok(source), Ok(mirrored)) = (q_source.get_single(), q_mirrored.get_single()) else {
        return;
    };

    let midpoint = source.translation().lerp(mirrored.translation(), 0.5);
    for mut focus in q_focus.iter_mut() {
        focus.translation = Vec3::new(midpoint.x, FOCUS_HEIGHT, midpoint.z);
    }
}

/// Eases the rendering camera towards the orbit camera.
fn follow_orbit(
    mut q_viewer: Query<&mut Transform, (With<Camera3d>, Without<ThirdPersonCamera>)>,
    q_orbit: Query<&Transform, (With<ThirdPersonCamera>, Without<Camera3d>)>,
    time: Res<Time>,
) {
    const SPEED: f32 = 15.0;

    let (Ok(orbit), Ok(mut viewer)) = (q_orbit.get_single(), q_viewer.get_single_mut()) else {
        return;
    };

    let factor = f32::min(1.0, time.delta_seconds() * SPEED);
    viewer.translation = viewer.translation.lerp(orbit.translation, factor);
    viewer.rotation = viewer.rotation.slerp(orbit.rotation, factor);
}
