use bevy::prelude::*;
use bevy_transform_mirror::prelude::*;

pub mod base_map;
pub mod camera;
pub mod rig;
pub mod rotator;
pub mod settings;
pub mod ui;

pub struct MirrorPlaygroundAppPlugin;

impl Plugin for MirrorPlaygroundAppPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins((
            DefaultPlugins,
            settings::SettingsPlugin,
            TransformMirrorPlugin,
            rotator::RotatorPlugin,
            base_map::BaseMapPlugin,
            rig::RigPlugin,
            camera::CameraPlugin,
            ui::UiPlugin,
        ));

        #[cfg(feature = "debug")]
        app.add_plugins(bevy_inspector_egui::quick::WorldInspectorPlugin::new());
    }
}
