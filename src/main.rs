use bevy::prelude::*;
use bevy_delayed_mirroring::MirrorPlaygroundAppPlugin;

fn main() {
    App::new().add_plugins(MirrorPlaygroundAppPlugin).run();
}
