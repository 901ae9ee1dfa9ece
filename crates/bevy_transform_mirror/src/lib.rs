pub mod prelude {
    pub use crate::config::{DelayWindow, MirrorConfig};
    pub use crate::delayed_mirror::{
        ConfigurationFault, DelayedMirror, MirrorError, MirroredPair, PairId, SetupDiagnostic,
        SetupReport, Snapshot, TickReport,
    };
    pub use crate::mirror_plugin::{EntityHierarchy, TransformMirror, TransformMirrorPlugin};
    pub use crate::scene_graph::SceneGraph;
    pub use crate::transform_state::TransformState;
    pub use crate::transform_tree::{NodeId, TransformTree};
}

pub mod config;
pub mod delayed_mirror;
pub mod mirror_plugin;
pub mod scene_graph;
pub mod transform_state;
pub mod transform_tree;
