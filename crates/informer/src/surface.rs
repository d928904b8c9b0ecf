//! Rendering surface abstraction.
//!
//! The notifier never talks to a concrete document directly — it drives a
//! [`Surface`], which provides node creation, style mutation and the
//! resolved stacking values used by the layering probe. [`MemorySurface`]
//! implements it headless for tests and dry runs.

use std::collections::{BTreeMap, HashMap};

/// Opaque handle to a node attached to a surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(u64);

/// A DOM-like environment the overlay renders into.
///
/// `is_ready` gates first-time setup: creating a node before the root
/// container exists is a precondition violation surfaced by the notifier
/// as [`crate::InformerError::SurfaceNotReady`].
pub trait Surface: Send + 'static {
    /// Whether the root container exists and nodes can be attached.
    fn is_ready(&self) -> bool;

    /// Create a node with the given element id, attached to the root.
    fn create_node(&mut self, id: &str) -> NodeId;

    /// Replace the node's inner structure. Drops any previous content.
    fn set_markup(&mut self, node: NodeId, markup: &str);

    /// Write raw markup into the node's content container.
    fn set_content(&mut self, node: NodeId, content: &str);

    /// Set one style property on the node.
    fn set_style(&mut self, node: NodeId, property: &str, value: &str);

    /// Unset one style property on the node.
    fn clear_style(&mut self, node: NodeId, property: &str);

    /// Toggle the node's visibility.
    fn set_visible(&mut self, node: NodeId, visible: bool);

    /// Resolved stacking values of every rendered element, as reported by
    /// the surface's computed-style query. Non-numeric entries ("auto")
    /// are expected and skipped by the probe.
    fn layer_values(&self) -> Vec<String>;
}

/// Next-highest stacking value on the surface.
///
/// Parses every resolved stacking value as a float, ignores non-numeric
/// ones, and returns the maximum observed plus one — so a fresh overlay
/// renders above all existing content. An empty surface probes to 1.
pub fn next_highest_layer(surface: &impl Surface) -> i64 {
    let mut highest = 0.0f64;
    for raw in surface.layer_values() {
        if let Ok(z) = raw.trim().parse::<f64>() {
            if z > highest {
                highest = z;
            }
        }
    }
    // The float-to-int cast saturates, so absurd stacking values land on
    // i64::MAX and must not overflow the increment.
    (highest as i64).saturating_add(1)
}

/// A node held by a [`MemorySurface`].
#[derive(Debug, Default, Clone)]
pub struct MemoryNode {
    /// Element id the node was created with.
    pub element_id: String,
    /// Inner structure markup (close control + content container).
    pub markup: String,
    /// Content container payload.
    pub content: String,
    /// Style properties currently set.
    pub styles: BTreeMap<String, String>,
    pub visible: bool,
}

/// In-memory rendering surface.
///
/// Used headless and in tests: nodes are plain records, readiness is a
/// toggle, and the layering probe reads seeded values plus any `zIndex`
/// styles set on existing nodes.
#[derive(Debug)]
pub struct MemorySurface {
    ready: bool,
    next_id: u64,
    nodes: HashMap<NodeId, MemoryNode>,
    seeded_layers: Vec<String>,
}

impl MemorySurface {
    /// A ready surface with no nodes.
    pub fn new() -> Self {
        Self {
            ready: true,
            next_id: 0,
            nodes: HashMap::new(),
            seeded_layers: Vec::new(),
        }
    }

    /// A surface whose root container does not exist yet.
    pub fn detached() -> Self {
        Self {
            ready: false,
            ..Self::new()
        }
    }

    /// Toggle root container availability.
    pub fn set_ready(&mut self, ready: bool) {
        self.ready = ready;
    }

    /// Seed resolved stacking values for the layering probe.
    pub fn seed_layers<I, S>(&mut self, values: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.seeded_layers = values.into_iter().map(Into::into).collect();
    }

    pub fn node(&self, id: NodeId) -> Option<&MemoryNode> {
        self.nodes.get(&id)
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// The only node on the surface, if exactly one exists.
    pub fn sole_node(&self) -> Option<&MemoryNode> {
        if self.nodes.len() == 1 {
            self.nodes.values().next()
        } else {
            None
        }
    }
}

impl Default for MemorySurface {
    fn default() -> Self {
        Self::new()
    }
}

impl Surface for MemorySurface {
    fn is_ready(&self) -> bool {
        self.ready
    }

    fn create_node(&mut self, id: &str) -> NodeId {
        let node = NodeId(self.next_id);
        self.next_id += 1;
        self.nodes.insert(
            node,
            MemoryNode {
                element_id: id.to_string(),
                // A freshly attached node renders visible until a display
                // style says otherwise.
                visible: true,
                ..MemoryNode::default()
            },
        );
        node
    }

    fn set_markup(&mut self, node: NodeId, markup: &str) {
        if let Some(n) = self.nodes.get_mut(&node) {
            n.markup = markup.to_string();
            // Rewriting the inner structure destroys the content container.
            n.content.clear();
        }
    }

    fn set_content(&mut self, node: NodeId, content: &str) {
        if let Some(n) = self.nodes.get_mut(&node) {
            n.content = content.to_string();
        }
    }

    fn set_style(&mut self, node: NodeId, property: &str, value: &str) {
        if let Some(n) = self.nodes.get_mut(&node) {
            n.styles.insert(property.to_string(), value.to_string());
        }
    }

    fn clear_style(&mut self, node: NodeId, property: &str) {
        if let Some(n) = self.nodes.get_mut(&node) {
            n.styles.remove(property);
        }
    }

    fn set_visible(&mut self, node: NodeId, visible: bool) {
        if let Some(n) = self.nodes.get_mut(&node) {
            n.visible = visible;
        }
    }

    fn layer_values(&self) -> Vec<String> {
        self.seeded_layers
            .iter()
            .cloned()
            .chain(
                self.nodes
                    .values()
                    .filter_map(|n| n.styles.get("zIndex").cloned()),
            )
            .collect()
    }
}
