use bevy::ecs::system::SystemParam;
use bevy::prelude::*;
use bevy::transform::TransformSystem;

use crate::config::MirrorConfig;
use crate::delayed_mirror::{DelayedMirror, SetupReport};
use crate::scene_graph::SceneGraph;

/// Drives every [`TransformMirror`] once per frame, after gameplay has moved the sources.
pub struct TransformMirrorPlugin;

impl Plugin for TransformMirrorPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            PostUpdate,
            (setup_transform_mirrors, tick_transform_mirrors)
                .chain()
                .before(TransformSystem::TransformPropagate),
        );
    }
}

/// Mirrors the hierarchy under `source` onto the entity holding this component, with a delay.
#[derive(Component)]
pub struct TransformMirror {
    source: Entity,
    mirror: DelayedMirror<Entity>,
    setup_requested: bool,
    last_report: Option<SetupReport>,
}

impl TransformMirror {
    /// Pairs are discovered on the next frame.
    pub fn new(source: Entity, config: MirrorConfig) -> Self {
        Self {
            source,
            mirror: DelayedMirror::new(config),
            setup_requested: true,
            last_report: None,
        }
    }

    pub fn source(&self) -> Entity {
        self.source
    }

    /// Follows a different source from the next frame on.
    ///
    /// Snapshots of the old source are dropped so they never land on the target.
    pub fn set_source(&mut self, source: Entity) {
        if source == self.source {
            return;
        }
        self.source = source;
        self.mirror.clear_pending();
        self.setup_requested = true;
    }

    /// Rediscover the mirrored pairs on the next frame, e.g. after a scene finished spawning.
    pub fn request_setup(&mut self) {
        self.setup_requested = true;
    }

    pub fn mirror(&self) -> &DelayedMirror<Entity> {
        &self.mirror
    }

    pub fn mirror_mut(&mut self) -> &mut DelayedMirror<Entity> {
        &mut self.mirror
    }

    /// Report of the last successful setup.
    pub fn last_report(&self) -> Option<&SetupReport> {
        self.last_report.as_ref()
    }
}

/// The entity hierarchy seen through [`Children`], [`Name`] and [`Transform`].
#[derive(SystemParam)]
pub struct EntityHierarchy<'w, 's> {
    q_children: Query<'w, 's, &'static Children>,
    q_names: Query<'w, 's, &'static Name>,
    q_transforms: Query<'w, 's, &'static mut Transform>,
}

impl SceneGraph for EntityHierarchy<'_, '_> {
    type Node = Entity;

    fn children(&self, node: Entity) -> Vec<Entity> {
        self.q_children
            .get(node)
            .map(|children| children.to_vec())
            .unwrap_or_default()
    }

    fn name(&self, node: Entity) -> Option<&str> {
        self.q_names.get(node).ok().map(Name::as_str)
    }

    fn local_transform(&self, node: Entity) -> Option<Transform> {
        self.q_transforms.get(node).ok().copied()
    }

    fn set_local_transform(&mut self, node: Entity, transform: Transform) -> bool {
        let Ok(mut local) = self.q_transforms.get_mut(node) else {
            return false;
        };
        *local = transform;
        true
    }
}

fn setup_transform_mirrors(
    mut q_mirrors: Query<(Entity, &mut TransformMirror)>,
    hierarchy: EntityHierarchy,
) {
    for (entity, mirror) in q_mirrors.iter_mut() {
        if mirror.setup_requested == false {
            continue;
        }

        let mirror = mirror.into_inner();
        mirror.setup_requested = false;

        match mirror
            .mirror
            .configure(&hierarchy, Some(mirror.source), Some(entity))
        {
            Ok(report) => {
                info!(
                    "Transform mirror {:?} set up with {} pairs ({} skipped).",
                    entity,
                    report.pairs,
                    report.diagnostics.len()
                );
                mirror.last_report = Some(report);
            }
            Err(err) => {
                error!("Failed to set up transform mirror {:?}: {}", entity, err);
                mirror.last_report = None;
            }
        }
    }
}

fn tick_transform_mirrors(
    mut q_mirrors: Query<(Entity, &mut TransformMirror)>,
    mut hierarchy: EntityHierarchy,
    time: Res<Time>,
) {
    let now = time.elapsed();

    for (entity, mut mirror) in q_mirrors.iter_mut() {
        if mirror.mirror.is_configured() == false {
            continue;
        }

        if let Err(err) = mirror.mirror.tick(&mut hierarchy, now) {
            error!("Transform mirror {:?} stopped: {}", entity, err);
        }
    }
}
