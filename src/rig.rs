use bevy::prelude::*;
use bevy::utils::HashMap;
use bevy::transform::TransformSystem;
use bevy_transform_mirror::prelude::*;

use crate::base_map::BaseMapSwitcher;
use crate::rotator::Rotator;
use crate::settings::PlaygroundSettings;

/// Spawns the ground, the light, and the source and mirrored rigs.
pub struct RigPlugin;

impl Plugin for RigPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<ShowJointAxes>()
            .add_systems(Startup, (spawn_rigs, spawn_light, spawn_ground))
            .add_systems(
                PostUpdate,
                draw_joint_axes
                    .run_if(|show: Res<ShowJointAxes>| show.0)
                    .after(TransformSystem::TransformPropagate),
            );
    }
}

/// Distance of each rig from the origin along X.
pub const RIG_SPACING: f32 = 1.5;

#[derive(Component)]
pub struct SourceRig;

#[derive(Component)]
pub struct MirroredRig;

#[derive(Component)]
pub struct Joint;

#[derive(Resource, Default)]
pub struct ShowJointAxes(pub bool);

struct JointSpec {
    name: &'static str,
    parent: Option<&'static str>,
    /// Offset from the parent joint.
    offset: Vec3,
    size: Vec3,
    /// Spins on the source rig.
    spins: bool,
}

const fn joint(
    name: &'static str,
    parent: Option<&'static str>,
    offset: Vec3,
    size: Vec3,
    spins: bool,
) -> JointSpec {
    JointSpec {
        name,
        parent,
        offset,
        size,
        spins,
    }
}

#[rustfmt::skip]
const SKELETON: &[JointSpec] = &[
    joint("Hips", None, Vec3::new(0.0, 1.0, 0.0), Vec3::new(0.35, 0.15, 0.2), false),
    joint("Spine", Some("Hips"), Vec3::new(0.0, 0.2, 0.0), Vec3::new(0.3, 0.25, 0.18), false),
    joint("Chest", Some("Spine"), Vec3::new(0.0, 0.3, 0.0), Vec3::new(0.4, 0.3, 0.2), false),
    joint("Neck", Some("Chest"), Vec3::new(0.0, 0.22, 0.0), Vec3::new(0.08, 0.1, 0.08), false),
    joint("Head", Some("Neck"), Vec3::new(0.0, 0.15, 0.0), Vec3::new(0.2, 0.22, 0.2), true),
    joint("LeftUpperArm", Some("Chest"), Vec3::new(0.28, 0.08, 0.0), Vec3::new(0.25, 0.08, 0.08), true),
    joint("LeftForearm", Some("LeftUpperArm"), Vec3::new(0.25, 0.0, 0.0), Vec3::new(0.22, 0.07, 0.07), false),
    joint("RightUpperArm", Some("Chest"), Vec3::new(-0.28, 0.08, 0.0), Vec3::new(0.25, 0.08, 0.08), true),
    joint("RightForearm", Some("RightUpperArm"), Vec3::new(-0.25, 0.0, 0.0), Vec3::new(0.22, 0.07, 0.07), false),
    joint("LeftThigh", Some("Hips"), Vec3::new(0.1, -0.25, 0.0), Vec3::new(0.1, 0.35, 0.1), false),
    joint("LeftShin", Some("LeftThigh"), Vec3::new(0.0, -0.4, 0.0), Vec3::new(0.08, 0.35, 0.08), false),
    joint("RightThigh", Some("Hips"), Vec3::new(-0.1, -0.25, 0.0), Vec3::new(0.1, 0.35, 0.1), false),
    joint("RightShin", Some("RightThigh"), Vec3::new(0.0, -0.4, 0.0), Vec3::new(0.08, 0.35, 0.08), false),
];

/// Joints the mirrored rig lacks, so setup has something to report.
#[rustfmt::skip]
const SOURCE_ONLY: &[JointSpec] = &[
    joint("Cape", Some("Chest"), Vec3::new(0.0, 0.0, -0.15), Vec3::new(0.4, 0.5, 0.02), false),
];

fn spawn_rigs(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    settings: Res<PlaygroundSettings>,
) {
    let source_material = materials.add(Color::rgb(0.9, 0.5, 0.2));
    let mirrored_material = materials.add(Color::rgb(0.2, 0.6, 0.9));

    let source_anchor = spawn_anchor(&mut commands, "SourceAnchor", -RIG_SPACING);
    let source = spawn_rig(
        &mut commands,
        &mut meshes,
        &source_material,
        SKELETON.iter().chain(SOURCE_ONLY),
        Some(settings.rotation_speed),
    );
    commands
        .entity(source)
        .insert((
            SourceRig,
            Rotator {
                degrees_per_second: settings.rotation_speed,
            },
        ))
        .set_parent(source_anchor);

    let mirrored_anchor = spawn_anchor(&mut commands, "MirroredAnchor", RIG_SPACING);
    let mirrored = spawn_rig(
        &mut commands,
        &mut meshes,
        &mirrored_material,
        SKELETON.iter(),
        None,
    );
    commands
        .entity(mirrored)
        .insert((MirroredRig, TransformMirror::new(source, settings.mirror)))
        .set_parent(mirrored_anchor);

    info!("Spawned source rig {:?} mirrored by {:?}.", source, mirrored);
}

/// Gives each rig its own parent space, so mirroring the rig root's local transform keeps the
/// rigs apart.
fn spawn_anchor(commands: &mut Commands, name: &'static str, x: f32) -> Entity {
    commands
        .spawn((
            Name::new(name),
            SpatialBundle::from_transform(Transform::from_xyz(x, 0.0, 0.0)),
        ))
        .id()
}

fn spawn_rig<'a>(
    commands: &mut Commands,
    meshes: &mut Assets<Mesh>,
    material: &Handle<StandardMaterial>,
    joints: impl Iterator<Item = &'a JointSpec>,
    spin_speed: Option<f32>,
) -> Entity {
    let root = commands
        .spawn((Name::new("Armature"), SpatialBundle::default()))
        .id();
    let mut spawned = HashMap::<&str, Entity>::default();

    for spec in joints {
        let mut entity = commands.spawn((
            Name::new(spec.name),
            Joint,
            PbrBundle {
                mesh: meshes.add(Cuboid {
                    half_size: spec.size * 0.5,
                }),
                material: material.clone(),
                transform: Transform::from_translation(spec.offset),
                ..default()
            },
        ));

        if let (true, Some(degrees_per_second)) = (spec.spins, spin_speed) {
            entity.insert(Rotator { degrees_per_second });
        }

        let entity = entity.id();
        let parent = spec
            .parent
            .and_then(|name| spawned.get(name).copied())
            .unwrap_or(root);
        commands.entity(parent).add_child(entity);
        spawned.insert(spec.name, entity);
    }

    root
}

fn spawn_light(mut commands: Commands) {
    commands
        .spawn(DirectionalLightBundle {
            directional_light: DirectionalLight {
                shadows_enabled: true,
                ..default()
            },
            ..default()
        })
        .insert(Transform::from_rotation(Quat::from_euler(
            EulerRot::XYZ,
            f32::to_radians(-45.0),
            f32::to_radians(45.0),
            0.0,
        )));
}

fn spawn_ground(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    settings: Res<PlaygroundSettings>,
) {
    let size = 25.0;

    let mut ground = commands.spawn((
        Name::new("Ground"),
        PbrBundle {
            mesh: meshes.add(Plane3d::default().mesh().size(size, size)),
            material: materials.add(StandardMaterial {
                base_color: Color::rgb(0.35, 0.35, 0.38),
                reflectance: 0.5,
                metallic: 0.5,
                ..default()
            }),
            ..default()
        },
    ));

    if let Some(base_map) = settings.base_map.as_ref() {
        ground.insert(BaseMapSwitcher::new(base_map.clone()));
    }
}

fn draw_joint_axes(mut gizmos: Gizmos, q_joints: Query<&GlobalTransform, With<Joint>>) {
    const SIZE: f32 = 0.1;

    for transform in q_joints.iter() {
        let start = transform.translation();
        gizmos.arrow(start, start + transform.right() * SIZE, Color::RED);
        gizmos.arrow(start, start + transform.up() * SIZE, Color::GREEN);
        gizmos.arrow(start, start + transform.back() * SIZE, Color::BLUE);
    }
}
