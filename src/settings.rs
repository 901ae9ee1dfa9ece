use std::io::ErrorKind;
use std::path::Path;

use bevy::prelude::*;
use bevy_transform_mirror::prelude::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const SETTINGS_PATH: &str = "assets/playground.json";

/// Loads [`PlaygroundSettings`] from disk, falling back to defaults.
pub struct SettingsPlugin;

impl Plugin for SettingsPlugin {
    fn build(&self, app: &mut App) {
        let settings = match PlaygroundSettings::load(SETTINGS_PATH) {
            Ok(settings) => {
                info!("Loaded settings from {}.", SETTINGS_PATH);
                settings
            }
            Err(SettingsError::Io(err)) if err.kind() == ErrorKind::NotFound => {
                info!("No settings at {}, using defaults.", SETTINGS_PATH);
                PlaygroundSettings::default()
            }
            Err(err) => {
                warn!("{} Using defaults.", err);
                PlaygroundSettings::default()
            }
        };

        app.insert_resource(settings);
    }
}

#[derive(Resource, Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct PlaygroundSettings {
    /// Settings of the mirror attached to the mirrored rig.
    pub mirror: MirrorConfig,
    /// Degrees per second of every [`Rotator`](crate::rotator::Rotator) on the source rig.
    pub rotation_speed: f32,
    /// Asset path of an image to put on the ground material.
    pub base_map: Option<String>,
}

impl Default for PlaygroundSettings {
    fn default() -> Self {
        Self {
            mirror: MirrorConfig::default(),
            rotation_speed: 10.0,
            base_map: None,
        }
    }
}

impl PlaygroundSettings {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let json = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&json)?)
    }
}

/// Possible errors that can be produced by [`PlaygroundSettings::load`]
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("Could not read settings file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Could not parse settings: {0}")]
    Json(#[from] serde_json::Error),
}
