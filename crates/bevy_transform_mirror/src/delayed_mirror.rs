use std::collections::VecDeque;
use std::fmt::Debug;
use std::time::Duration;

use bevy::prelude::*;
use thiserror::Error;

use crate::config::{DelayWindow, MirrorConfig};
use crate::scene_graph::SceneGraph;
use crate::transform_state::TransformState;

/// Identity of a [`MirroredPair`], never reused by the [`DelayedMirror`] that issued it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PairId(u32);

/// A source node and the target node it is mirrored onto.
#[derive(Debug, Clone, PartialEq)]
pub struct MirroredPair<N> {
    pub id: PairId,
    /// Name the pair was matched (or registered) by.
    pub name: String,
    pub source: N,
    pub target: N,
}

/// One frame worth of captured transforms.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub root: TransformState,
    /// Captured source state of every pair registered at capture time.
    pub pairs: Vec<(PairId, TransformState)>,
}

impl Snapshot {
    pub fn timestamp(&self) -> Duration {
        self.root.timestamp
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SetupDiagnostic {
    /// A source descendant without a name, which cannot be matched.
    Unnamed,
    /// No target descendant shares this name.
    MissingCounterpart(String),
    /// A match was found but one side carries no transform.
    MissingTransform(String),
}

/// Outcome of a successful configuration.
#[derive(Default, Debug, Clone, PartialEq)]
pub struct SetupReport {
    pub pairs: usize,
    pub diagnostics: Vec<SetupDiagnostic>,
}

impl SetupReport {
    /// Names of source descendants that were left out of mirroring.
    pub fn unmatched_names(&self) -> impl Iterator<Item = &str> {
        self.diagnostics.iter().filter_map(|d| match d {
            SetupDiagnostic::MissingCounterpart(name) | SetupDiagnostic::MissingTransform(name) => {
                Some(name.as_str())
            }
            SetupDiagnostic::Unnamed => None,
        })
    }
}

#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickReport {
    /// Snapshots popped and applied during this tick.
    pub applied: usize,
}

struct MirrorBinding<N> {
    source: N,
    target: N,
    /// Sorted by id.
    pairs: Vec<MirroredPair<N>>,
}

/// Replays the local transforms of a source hierarchy onto a target hierarchy after a fixed delay.
///
/// Every [`tick`](Self::tick) captures one [`Snapshot`] and then applies, oldest first, every
/// pending snapshot whose age has reached the configured [`DelayWindow`].
pub struct DelayedMirror<N> {
    config: MirrorConfig,
    binding: Option<MirrorBinding<N>>,
    pending: VecDeque<Snapshot>,
    next_pair_id: u32,
}

impl<N> Default for DelayedMirror<N> {
    fn default() -> Self {
        Self::new(MirrorConfig::default())
    }
}

impl<N> DelayedMirror<N> {
    pub fn new(config: MirrorConfig) -> Self {
        Self {
            config,
            binding: None,
            pending: VecDeque::new(),
            next_pair_id: 0,
        }
    }

    pub fn config(&self) -> &MirrorConfig {
        &self.config
    }

    pub fn set_delay(&mut self, delay: DelayWindow) {
        self.config.delay = delay;
    }

    pub fn set_mirror_scale(&mut self, mirror_scale: bool) {
        self.config.mirror_scale = mirror_scale;
    }

    pub fn is_configured(&self) -> bool {
        self.binding.is_some()
    }

    /// Stops mirroring until the next successful configuration.
    pub fn detach(&mut self) {
        self.binding = None;
    }

    pub fn pairs(&self) -> &[MirroredPair<N>] {
        self.binding.as_ref().map_or(&[], |b| b.pairs.as_slice())
    }

    /// Unregisters a pair; pending snapshots still holding it skip it on apply.
    pub fn remove_pair(&mut self, id: PairId) -> Option<MirroredPair<N>> {
        let binding = self.binding.as_mut()?;
        let index = binding.pairs.binary_search_by_key(&id, |p| p.id).ok()?;
        Some(binding.pairs.remove(index))
    }

    pub fn pending(&self) -> impl ExactSizeIterator<Item = &Snapshot> {
        self.pending.iter()
    }

    pub fn queue_len(&self) -> usize {
        self.pending.len()
    }

    pub fn clear_pending(&mut self) {
        self.pending.clear();
    }

    fn issue_pair(&mut self, name: &str, source: N, target: N) -> MirroredPair<N> {
        let id = PairId(self.next_pair_id);
        self.next_pair_id += 1;
        MirroredPair {
            id,
            name: name.to_owned(),
            source,
            target,
        }
    }
}

impl<N: Copy + Eq + Debug> DelayedMirror<N> {
    /// Binds `source` to `target` and pairs up their descendants by name.
    ///
    /// Unmatched descendants are reported but do not fail the setup. The pending queue is left
    /// untouched.
    pub fn configure<G>(
        &mut self,
        graph: &G,
        source: Option<N>,
        target: Option<N>,
    ) -> Result<SetupReport, MirrorError>
    where
        G: SceneGraph<Node = N>,
    {
        self.detach();
        let (source, target) = resolve_roots(graph, source, target)?;

        let mut report = SetupReport::default();
        let mut pairs = Vec::new();

        for original in graph.descendants(source) {
            let Some(name) = graph.name(original) else {
                warn!("Skipping unnamed node {:?} under the mirror source.", original);
                report.diagnostics.push(SetupDiagnostic::Unnamed);
                continue;
            };

            let Some(mirrored) = graph.find_descendant_by_name(target, name) else {
                warn!("Missing a mirrored transform for: {}", name);
                report
                    .diagnostics
                    .push(SetupDiagnostic::MissingCounterpart(name.to_owned()));
                continue;
            };

            if graph.local_transform(original).is_none() || graph.local_transform(mirrored).is_none()
            {
                warn!("Mirrored pair {} has no transform on one side.", name);
                report
                    .diagnostics
                    .push(SetupDiagnostic::MissingTransform(name.to_owned()));
                continue;
            }

            pairs.push(self.issue_pair(name, original, mirrored));
        }

        report.pairs = pairs.len();
        self.binding = Some(MirrorBinding {
            source,
            target,
            pairs,
        });

        Ok(report)
    }

    /// Binds `source` to `target` with an explicit list of `(name, source, target)` pairs.
    ///
    /// Every node must resolve to a transform, otherwise nothing is registered.
    pub fn configure_with_pairs<G, S>(
        &mut self,
        graph: &G,
        source: Option<N>,
        target: Option<N>,
        pairs: impl IntoIterator<Item = (S, N, N)>,
    ) -> Result<SetupReport, MirrorError>
    where
        G: SceneGraph<Node = N>,
        S: AsRef<str>,
    {
        self.detach();
        let (source, target) = resolve_roots(graph, source, target)?;

        let mut registered = Vec::new();
        for (name, original, mirrored) in pairs {
            let name = name.as_ref();
            if graph.local_transform(original).is_none() || graph.local_transform(mirrored).is_none()
            {
                return Err(ConfigurationFault::MissingPairNode(name.to_owned()).into());
            }
            registered.push((name.to_owned(), original, mirrored));
        }

        let pairs: Vec<_> = registered
            .iter()
            .map(|(name, original, mirrored)| self.issue_pair(name, *original, *mirrored))
            .collect();

        let report = SetupReport {
            pairs: pairs.len(),
            diagnostics: Vec::new(),
        };
        self.binding = Some(MirrorBinding {
            source,
            target,
            pairs,
        });

        Ok(report)
    }

    /// Captures the current source state at `now`, then applies every snapshot that is due.
    ///
    /// A node that stopped resolving since setup detaches the mirror and fails the tick.
    pub fn tick<G>(&mut self, graph: &mut G, now: Duration) -> Result<TickReport, MirrorError>
    where
        G: SceneGraph<Node = N>,
    {
        let Some(binding) = self.binding.as_ref() else {
            return Err(MirrorError::NotConfigured);
        };

        let snapshot = match binding.capture(graph, now) {
            Ok(snapshot) => snapshot,
            Err(err) => {
                self.detach();
                return Err(err);
            }
        };
        self.pending.push_back(snapshot);

        let delay = self.config.delay;
        let mirror_scale = self.config.mirror_scale;
        let mut report = TickReport::default();

        while self
            .pending
            .front()
            .is_some_and(|s| delay.has_elapsed(s.timestamp(), now))
        {
            let Some(snapshot) = self.pending.pop_front() else {
                break;
            };

            if let Err(err) = binding.apply(graph, &snapshot, mirror_scale) {
                self.detach();
                return Err(err);
            }
            report.applied += 1;
        }

        Ok(report)
    }
}

impl<N: Copy + Eq + Debug> MirrorBinding<N> {
    fn capture<G>(&self, graph: &G, now: Duration) -> Result<Snapshot, MirrorError>
    where
        G: SceneGraph<Node = N>,
    {
        let root = graph
            .local_transform(self.source)
            .ok_or_else(|| MirrorError::lost("source root", self.source))?;

        let pairs = self
            .pairs
            .iter()
            .map(|pair| {
                graph
                    .local_transform(pair.source)
                    .map(|t| (pair.id, TransformState::capture(&t, now)))
                    .ok_or_else(|| MirrorError::lost(&pair.name, pair.source))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Snapshot {
            root: TransformState::capture(&root, now),
            pairs,
        })
    }

    fn apply<G>(&self, graph: &mut G, snapshot: &Snapshot, mirror_scale: bool) -> Result<(), MirrorError>
    where
        G: SceneGraph<Node = N>,
    {
        write_state(graph, self.target, "target root", &snapshot.root, mirror_scale)?;

        for (id, state) in snapshot.pairs.iter() {
            // Pairs removed after capture are skipped.
            let Ok(index) = self.pairs.binary_search_by_key(id, |p| p.id) else {
                continue;
            };
            let pair = &self.pairs[index];
            write_state(graph, pair.target, &pair.name, state, mirror_scale)?;
        }

        Ok(())
    }
}

fn resolve_roots<G: SceneGraph>(
    graph: &G,
    source: Option<G::Node>,
    target: Option<G::Node>,
) -> Result<(G::Node, G::Node), MirrorError> {
    let source = source
        .filter(|&s| graph.local_transform(s).is_some())
        .ok_or(ConfigurationFault::MissingSource)?;
    let target = target
        .filter(|&t| graph.local_transform(t).is_some())
        .ok_or(ConfigurationFault::MissingTarget)?;
    Ok((source, target))
}

/// Writes only when the target would actually change.
fn write_state<G: SceneGraph>(
    graph: &mut G,
    node: G::Node,
    role: &str,
    state: &TransformState,
    mirror_scale: bool,
) -> Result<(), MirrorError> {
    let current = graph
        .local_transform(node)
        .ok_or_else(|| MirrorError::lost(role, node))?;

    let next = state.write_to(&current, mirror_scale);
    if next != current && graph.set_local_transform(node, next) == false {
        return Err(MirrorError::lost(role, node));
    }

    Ok(())
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConfigurationFault {
    #[error("the source root is missing or has no transform")]
    MissingSource,
    #[error("the target root is missing or has no transform")]
    MissingTarget,
    #[error("mirrored pair {0} refers to a node without a transform")]
    MissingPairNode(String),
    #[error("delay must be a finite, non-negative number of seconds, got {0}")]
    InvalidDelay(f64),
}

/// Possible errors that can be produced by [`DelayedMirror`].
#[non_exhaustive]
#[derive(Debug, Error, Clone, PartialEq)]
pub enum MirrorError {
    #[error("Invalid mirror configuration: {0}")]
    InvalidConfiguration(#[from] ConfigurationFault),
    #[error("The mirror has not been configured")]
    NotConfigured,
    /// A node registered at setup stopped resolving.
    #[error("Mirrored node {role} ({node}) no longer has a transform")]
    LostNode { role: String, node: String },
}

impl MirrorError {
    fn lost(role: &str, node: impl Debug) -> Self {
        Self::LostNode {
            role: role.to_owned(),
            node: format!("{:?}", node),
        }
    }
}
