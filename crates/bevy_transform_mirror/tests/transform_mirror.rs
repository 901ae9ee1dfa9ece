//! Headless app tests for the transform mirror plugin.
//!
//! Time is advanced by hand so the mirror sees exact frame timestamps.

use std::time::Duration;

use bevy::prelude::*;
use bevy_transform_mirror::prelude::*;

struct Scene {
    app: App,
    source: Entity,
    target: Entity,
    source_arm: Entity,
    target_arm: Entity,
}

/// Source has children "Arm" and "Tail", the target only "Arm".
fn headless_scene(config: MirrorConfig) -> Scene {
    let mut app = App::new();
    app.init_resource::<Time>()
        .add_plugins(TransformMirrorPlugin);

    let world = &mut app.world;
    let source_arm = world.spawn((Name::new("Arm"), Transform::default())).id();
    let source_tail = world.spawn((Name::new("Tail"), Transform::default())).id();
    let source = world
        .spawn((Name::new("Source"), Transform::default()))
        .push_children(&[source_arm, source_tail])
        .id();

    let target_arm = world.spawn((Name::new("Arm"), Transform::default())).id();
    let target = world
        .spawn((
            Name::new("Target"),
            Transform::default(),
            TransformMirror::new(source, config),
        ))
        .push_children(&[target_arm])
        .id();

    Scene {
        app,
        source,
        target,
        source_arm,
        target_arm,
    }
}

impl Scene {
    /// Runs one frame at `millis` since startup.
    fn frame_at(&mut self, millis: u64) {
        self.app
            .world
            .resource_mut::<Time>()
            .advance_to(Duration::from_millis(millis));
        self.app.update();
    }

    fn transform_mut(&mut self, entity: Entity) -> Mut<Transform> {
        self.app
            .world
            .get_mut::<Transform>(entity)
            .expect("entity should have a transform")
    }

    fn transform(&self, entity: Entity) -> Transform {
        *self
            .app
            .world
            .get::<Transform>(entity)
            .expect("entity should have a transform")
    }

    fn mirror(&self) -> &TransformMirror {
        self.app
            .world
            .get::<TransformMirror>(self.target)
            .expect("target should carry the mirror")
    }
}

#[test]
fn setup_pairs_matching_children_only() {
    let mut scene = headless_scene(MirrorConfig::default());
    scene.frame_at(0);

    let mirror = scene.mirror();
    assert!(mirror.mirror().is_configured());
    assert_eq!(mirror.mirror().pairs().len(), 1);
    assert_eq!(mirror.mirror().pairs()[0].target, scene.target_arm);

    let report = mirror.last_report().expect("setup should leave a report");
    assert_eq!(report.unmatched_names().collect::<Vec<_>>(), ["Tail"]);
}

#[test]
fn target_lags_source_by_two_seconds() {
    let mut scene = headless_scene(MirrorConfig::default());

    for frame in 0..=25 {
        if frame == 5 {
            scene.transform_mut(scene.source).translation = Vec3::X;
            scene.transform_mut(scene.source_arm).rotation = Quat::from_rotation_z(0.5);
        }
        scene.frame_at(frame * 100);

        let target = scene.transform(scene.target);
        let arm = scene.transform(scene.target_arm);
        if frame < 25 {
            assert_eq!(target.translation, Vec3::ZERO, "frame {}", frame);
            assert_eq!(arm.rotation, Quat::IDENTITY, "frame {}", frame);
        } else {
            assert_eq!(target.translation, Vec3::X);
            assert_eq!(arm.rotation, Quat::from_rotation_z(0.5));
        }
    }
}

#[test]
fn change_on_frame_three_lands_at_2300_ms() {
    let mut scene = headless_scene(MirrorConfig::default());

    for frame in 0..=23 {
        if frame == 3 {
            scene.transform_mut(scene.source_arm).translation = Vec3::Y;
        }
        scene.frame_at(frame * 100);

        let arm = scene.transform(scene.target_arm);
        if frame < 23 {
            assert_eq!(arm.translation, Vec3::ZERO, "frame {}", frame);
        } else {
            assert_eq!(arm.translation, Vec3::Y);
        }
    }
}

#[test]
fn scale_stays_put_unless_enabled() {
    let config = MirrorConfig {
        delay: DelayWindow::ZERO,
        mirror_scale: false,
    };
    let mut scene = headless_scene(config);
    scene.transform_mut(scene.source).scale = Vec3::splat(2.0);
    scene.frame_at(0);
    assert_eq!(scene.transform(scene.target).scale, Vec3::ONE);

    scene
        .app
        .world
        .get_mut::<TransformMirror>(scene.target)
        .expect("target should carry the mirror")
        .mirror_mut()
        .set_mirror_scale(true);
    scene.frame_at(100);
    assert_eq!(scene.transform(scene.target).scale, Vec3::splat(2.0));
}

#[test]
fn despawned_target_child_stops_the_mirror() {
    let mut scene = headless_scene(MirrorConfig::default());
    scene.frame_at(0);
    assert!(scene.mirror().mirror().is_configured());

    let target_arm = scene.target_arm;
    scene.app.world.despawn(target_arm);
    scene.frame_at(2000);
    assert!(scene.mirror().mirror().is_configured() == false);
}

#[test]
fn requested_setup_picks_up_late_children() {
    let mut scene = headless_scene(MirrorConfig::default());
    scene.frame_at(0);
    assert_eq!(scene.mirror().mirror().pairs().len(), 1);

    let world = &mut scene.app.world;
    let late_tail = world.spawn((Name::new("Tail"), Transform::default())).id();
    world.entity_mut(scene.target).push_children(&[late_tail]);
    world
        .get_mut::<TransformMirror>(scene.target)
        .expect("target should carry the mirror")
        .request_setup();

    scene.frame_at(100);
    assert_eq!(scene.mirror().mirror().pairs().len(), 2);
    assert!(scene
        .mirror()
        .last_report()
        .is_some_and(|r| r.diagnostics.is_empty()));
}

#[test]
fn switching_source_drops_pending_snapshots() {
    let mut scene = headless_scene(MirrorConfig::default());
    scene.transform_mut(scene.source).translation = Vec3::X;
    scene.frame_at(0);
    scene.frame_at(100);
    assert_eq!(scene.mirror().mirror().queue_len(), 2);

    let world = &mut scene.app.world;
    let other_arm = world.spawn((Name::new("Arm"), Transform::default())).id();
    let other = world
        .spawn((Name::new("Other"), Transform::from_xyz(0.0, 0.0, 5.0)))
        .push_children(&[other_arm])
        .id();
    world
        .get_mut::<TransformMirror>(scene.target)
        .expect("target should carry the mirror")
        .set_source(other);
    assert_eq!(scene.mirror().source(), other);
    assert_eq!(scene.mirror().mirror().queue_len(), 0);

    // The old source's captures would have been due by now.
    scene.frame_at(2100);
    assert_eq!(scene.mirror().mirror().pairs()[0].source, other_arm);
    assert_eq!(scene.mirror().mirror().queue_len(), 1);
    assert_eq!(scene.transform(scene.target).translation, Vec3::ZERO);

    scene.frame_at(4100);
    assert_eq!(
        scene.transform(scene.target).translation,
        Vec3::new(0.0, 0.0, 5.0)
    );
}
