//! The ancestry tree ("soul" tree).
//!
//! Nodes mirror organism descent but have their own lifetime: a node
//! survives its organism for as long as any descendant is still alive,
//! and is pruned lazily once its whole subtree is dead. Nodes live in
//! an index arena with a free list; pruning is an iterative upward
//! walk, so arbitrarily long lineages cannot overflow the stack.

use std::collections::VecDeque;

/// Stable handle into the arena. Slots are recycled, so a handle is
/// only meaningful while its organism (or a living descendant) keeps
/// the node in the tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

#[derive(Debug)]
struct Node {
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    alive: bool,
    name: Option<String>,
}

/// Arena-backed ancestry tree with lazy pruning.
#[derive(Debug)]
pub struct LineageTree {
    slots: Vec<Option<Node>>,
    free: Vec<usize>,
    root: NodeId,
}

impl Default for LineageTree {
    fn default() -> Self {
        Self::new()
    }
}

impl LineageTree {
    /// A tree containing only the progenitor root, which is pinned
    /// alive for the whole run so the tree never empties mid-run.
    pub fn new() -> Self {
        let root = Node {
            parent: None,
            children: Vec::new(),
            alive: true,
            name: Some("adam".to_string()),
        };
        Self {
            slots: vec![Some(root)],
            free: Vec::new(),
            root: NodeId(0),
        }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Number of nodes currently in the tree.
    pub fn len(&self) -> usize {
        self.slots.len() - self.free.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.slots.get(id.0).map_or(false, Option::is_some)
    }

    pub fn is_alive(&self, id: NodeId) -> bool {
        self.slots
            .get(id.0)
            .and_then(Option::as_ref)
            .map_or(false, |n| n.alive)
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.slots
            .get(id.0)
            .and_then(Option::as_ref)
            .map_or(&[], |n| n.children.as_slice())
    }

    pub fn name(&self, id: NodeId) -> Option<&str> {
        self.slots
            .get(id.0)
            .and_then(Option::as_ref)
            .and_then(|n| n.name.as_deref())
    }

    /// Adds a living child under `parent` and returns its handle.
    pub fn birth(&mut self, parent: NodeId) -> NodeId {
        let node = Node {
            parent: Some(parent),
            children: Vec::new(),
            alive: true,
            name: None,
        };
        let idx = match self.free.pop() {
            Some(idx) => {
                self.slots[idx] = Some(node);
                idx
            }
            None => {
                self.slots.push(Some(node));
                self.slots.len() - 1
            }
        };
        let id = NodeId(idx);
        match self.slots[parent.0].as_mut() {
            Some(p) => p.children.push(id),
            None => tracing::error!(parent = parent.0, "birth under a freed lineage node"),
        }
        id
    }

    /// True if any node in `id`'s subtree (excluding `id` itself) is
    /// alive.
    pub fn has_living_descendant(&self, id: NodeId) -> bool {
        let Some(node) = self.slots.get(id.0).and_then(Option::as_ref) else {
            return false;
        };
        let mut stack: Vec<NodeId> = node.children.clone();
        while let Some(next) = stack.pop() {
            if let Some(n) = self.slots.get(next.0).and_then(Option::as_ref) {
                if n.alive {
                    return true;
                }
                stack.extend(n.children.iter().copied());
            }
        }
        false
    }

    /// Marks a node dead and lazily prunes.
    ///
    /// A node is physically removed only when it is dead and no node in
    /// its subtree is alive; removal detaches it from its parent and
    /// then re-examines the parent, walking upward until a node with a
    /// reason to stay is found. The root is never removed.
    pub fn mark_dead(&mut self, id: NodeId) {
        if id == self.root {
            // The progenitor stays pinned alive.
            return;
        }
        match self.slots.get_mut(id.0).and_then(Option::as_mut) {
            Some(node) => node.alive = false,
            None => {
                tracing::error!(node = id.0, "mark_dead on a freed lineage node");
                return;
            }
        }
        self.prune_upward(id);
    }

    fn prune_upward(&mut self, start: NodeId) {
        let mut cur = start;
        loop {
            if cur == self.root {
                break;
            }
            let (alive, parent, child_count) =
                match self.slots.get(cur.0).and_then(Option::as_ref) {
                    Some(n) => (n.alive, n.parent, n.children.len()),
                    None => break,
                };
            if alive || self.has_living_descendant(cur) {
                break;
            }
            if child_count > 0 {
                // A prunable node is always a leaf: dead subtrees prune
                // bottom-up through this walk. Children still attached
                // here mean the tree is inconsistent; refuse to free.
                tracing::error!(
                    node = cur.0,
                    children = child_count,
                    "refusing to free lineage node with attached children"
                );
                break;
            }
            self.slots[cur.0] = None;
            self.free.push(cur.0);
            match parent {
                Some(p) => {
                    if let Some(pn) = self.slots.get_mut(p.0).and_then(Option::as_mut) {
                        pn.children.retain(|&c| c != cur);
                    }
                    cur = p;
                }
                None => break,
            }
        }
    }

    /// Post-run naming pass, breadth-first from the root: child `i` of
    /// a node named `n` becomes `n_i`.
    pub fn assign_names(&mut self) {
        let mut queue = VecDeque::from([self.root]);
        while let Some(id) = queue.pop_front() {
            let (name, children) = match self.slots.get(id.0).and_then(Option::as_ref) {
                Some(n) => (
                    n.name.clone().unwrap_or_default(),
                    n.children.clone(),
                ),
                None => continue,
            };
            for (i, &child) in children.iter().enumerate() {
                if let Some(c) = self.slots.get_mut(child.0).and_then(Option::as_mut) {
                    c.name = Some(format!("{name}_{i}"));
                }
                queue.push_back(child);
            }
        }
    }
}
