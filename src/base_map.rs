use bevy::asset::LoadState;
use bevy::prelude::*;

pub struct BaseMapPlugin;

impl Plugin for BaseMapPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Update, (load_base_maps, apply_base_maps).chain());
    }
}

/// Swaps the base color texture of this entity's [`StandardMaterial`] for an image once it has
/// loaded.
///
/// The material asset is shared, so every entity using it changes along.
#[derive(Component, Debug, Clone)]
pub struct BaseMapSwitcher {
    image_path: String,
    state: BaseMapState,
}

#[derive(Default, Debug, Clone, PartialEq)]
pub enum BaseMapState {
    #[default]
    Idle,
    Loading(Handle<Image>),
    Applied,
    Failed,
}

impl BaseMapSwitcher {
    pub fn new(image_path: impl Into<String>) -> Self {
        Self {
            image_path: image_path.into(),
            state: BaseMapState::Idle,
        }
    }

    pub fn image_path(&self) -> &str {
        &self.image_path
    }

    pub fn state(&self) -> &BaseMapState {
        &self.state
    }
}

fn load_base_maps(mut q_switchers: Query<&mut BaseMapSwitcher>, asset_server: Res<AssetServer>) {
    for mut switcher in q_switchers.iter_mut() {
        if switcher.state != BaseMapState::Idle {
            continue;
        }

        if switcher.image_path.is_empty() {
            warn!("No base map path specified!");
            switcher.state = BaseMapState::Failed;
            continue;
        }

        let image = asset_server.load(switcher.image_path.clone());
        switcher.state = BaseMapState::Loading(image);
    }
}

fn apply_base_maps(
    mut q_switchers: Query<(&mut BaseMapSwitcher, Option<&Handle<StandardMaterial>>)>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    asset_server: Res<AssetServer>,
) {
    for (mut switcher, material) in q_switchers.iter_mut() {
        let BaseMapState::Loading(image) = &switcher.state else {
            continue;
        };
        let image = image.clone();

        match asset_server.get_load_state(image.id()) {
            Some(LoadState::Loaded) => {
                let material = match material {
                    Some(handle) => materials.get_mut(handle),
                    None => None,
                };
                match material {
                    Some(material) => {
                        info!("Changing base map to {}.", switcher.image_path);
                        material.base_color_texture = Some(image);
                        switcher.state = BaseMapState::Applied;
                    }
                    None => {
                        warn!("Assign a material before switching its base map!");
                        switcher.state = BaseMapState::Failed;
                    }
                }
            }
            Some(LoadState::Failed { .. }) => {
                error!("Failed to load base map: {}", switcher.image_path);
                switcher.state = BaseMapState::Failed;
            }
            _ => {}
        }
    }
}
