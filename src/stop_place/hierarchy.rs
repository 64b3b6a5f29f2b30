//! Stop-place forest built from flat records with parent references.
//!
//! Nodes live in an arena and link to each other by [`NodeId`]. A parent
//! reference that points at an unknown record, at the record itself, or
//! closes a cycle is dropped and the record becomes a root.

use hashbrown::hash_map::Entry;
use hashbrown::HashMap;
use tracing::{debug, warn};

use crate::models::StopPlaceRecord;

/// Hard limit for upward and downward walks
pub const MAX_DEPTH: usize = 64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

#[derive(Debug)]
pub struct StopPlaceNode {
    pub record: StopPlaceRecord,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

impl StopPlaceNode {
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }
}

#[derive(Debug)]
pub struct StopPlaceForest {
    nodes: Vec<StopPlaceNode>,
    roots: Vec<NodeId>,
}

impl StopPlaceForest {
    pub fn build(records: Vec<StopPlaceRecord>) -> Self {
        let mut parents = parent_indices(&records);
        break_cycles(&records, &mut parents);

        let mut nodes: Vec<StopPlaceNode> = records
            .into_iter()
            .zip(parents.iter())
            .map(|(record, parent)| StopPlaceNode {
                record,
                parent: parent.map(NodeId),
                children: Vec::new(),
            })
            .collect();

        let mut roots = Vec::new();
        for (idx, parent) in parents.iter().enumerate() {
            match parent {
                Some(parent) => nodes[*parent].children.push(NodeId(idx)),
                None => roots.push(NodeId(idx)),
            }
        }

        Self { nodes, roots }
    }

    pub fn node(&self, id: NodeId) -> &StopPlaceNode {
        &self.nodes[id.0]
    }

    pub fn record(&self, id: NodeId) -> &StopPlaceRecord {
        &self.node(id).record
    }

    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Every node of the forest, each before its descendants
    pub fn pre_order(&self) -> Vec<NodeId> {
        let mut out = Vec::with_capacity(self.nodes.len());
        let mut stack: Vec<NodeId> = self.roots.iter().rev().copied().collect();

        while let Some(current) = stack.pop() {
            out.push(current);
            stack.extend(self.node(current).children.iter().rev());
        }

        out
    }

    /// Strict ancestors, closest first
    pub fn ancestors(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        std::iter::successors(self.node(id).parent, move |&current| self.node(current).parent)
            .take(MAX_DEPTH)
    }

    /// The node followed by its descendants in pre-order, at most
    /// [`MAX_DEPTH`] levels below the node
    pub fn subtree(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = vec![(id, 0usize)];

        while let Some((current, depth)) = stack.pop() {
            out.push(current);
            if depth >= MAX_DEPTH {
                warn!(
                    "Stop place hierarchy below {} deeper than {}, truncating",
                    self.record(id).id,
                    MAX_DEPTH
                );
                continue;
            }
            for &child in self.node(current).children.iter().rev() {
                stack.push((child, depth + 1));
            }
        }

        out
    }
}

/// Parent index of each record. Unknown and self references become `None`.
fn parent_indices(records: &[StopPlaceRecord]) -> Vec<Option<usize>> {
    let mut by_id: HashMap<&str, usize> = HashMap::with_capacity(records.len());
    for (idx, record) in records.iter().enumerate() {
        match by_id.entry(record.id.as_str()) {
            Entry::Occupied(_) => {
                warn!("Duplicate stop place id {}, keeping the first", record.id);
            }
            Entry::Vacant(slot) => {
                slot.insert(idx);
            }
        }
    }

    records
        .iter()
        .enumerate()
        .map(|(idx, record)| {
            let parent_ref = record.parent_ref.as_deref()?;
            match by_id.get(parent_ref) {
                Some(&parent) if parent != idx => Some(parent),
                Some(_) => {
                    debug!("Stop place {} refers to itself as parent", record.id);
                    None
                }
                None => {
                    debug!(
                        "Parent {} of stop place {} not found, treating as root",
                        parent_ref, record.id
                    );
                    None
                }
            }
        })
        .collect()
}

/// Drop one parent link in every cycle. The cycle member with the smallest
/// id becomes a root, so the result does not depend on record order.
fn break_cycles(records: &[StopPlaceRecord], parents: &mut [Option<usize>]) {
    #[derive(Clone, Copy, PartialEq)]
    enum State {
        Unvisited,
        OnPath,
        Done,
    }

    let mut state = vec![State::Unvisited; parents.len()];
    let mut path: Vec<usize> = Vec::new();

    for start in 0..parents.len() {
        let mut current = Some(start);
        path.clear();

        while let Some(idx) = current {
            match state[idx] {
                State::Done => break,
                State::OnPath => {
                    let cycle_start = path.iter().position(|&p| p == idx).unwrap_or(0);
                    let cycle = &path[cycle_start..];
                    if let Some(orphan) = cycle
                        .iter()
                        .copied()
                        .min_by(|&a, &b| records[a].id.cmp(&records[b].id))
                    {
                        warn!(
                            "Parent cycle through stop place {}, treating it as root",
                            records[orphan].id
                        );
                        parents[orphan] = None;
                    }
                    break;
                }
                State::Unvisited => {
                    state[idx] = State::OnPath;
                    path.push(idx);
                    current = parents[idx];
                }
            }
        }

        for &idx in &path {
            state[idx] = State::Done;
        }
    }
}
