use std::any::Any;
use std::any::TypeId;
use std::cell::Ref;
use std::cell::RefCell;
use std::cell::RefMut;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::atomic::AtomicUsize;
use std::sync::atomic::Ordering;

use log::debug;
use log::trace;
use nohash::IntMap;
use nohash::IntSet;
use thiserror::Error;

static NEXT_NODE_ID: AtomicUsize = AtomicUsize::new(1);

/// # Component
///
/// Value that can be attached to a [Node]. Values are compared on write so that unchanged
/// writes don't produce [ComponentEvent::Modified].
pub trait Component: 'static + Clone + PartialEq {}

/// # Component Event
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum ComponentEvent {
    /// Component was added to the node.
    Added(Node),
    /// Component was modified for node.
    Modified(Node),
    /// Component was removed from node.
    Removed(Node),
}

/// # Node
///
/// Handle to an element of a [Scene]. Ids are unique for the lifetime of the process, so a
/// despawned node's handle never refers to a newer node.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct Node {
    id: usize,
}

impl Node {
    fn next() -> Self {
        Self {
            id: NEXT_NODE_ID.fetch_add(1, Ordering::Relaxed),
        }
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Node({})", self.id)
    }
}

impl nohash::IsEnabled for Node {}

/// # Hierarchy Error
///
/// Reason a [Scene::set_parent] call was rejected.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Error)]
pub enum HierarchyError {
    /// The node isn't part of the scene.
    #[error("{0} is not in the scene")]
    NodeNotFound(Node),
    /// The parent is the node itself or one of its descendants.
    #[error("making {parent} the parent of {node} would create a cycle")]
    Cycle {
        /// Node being re-parented.
        node: Node,
        /// Rejected parent.
        parent: Node,
    },
}

trait ComponentStorage {
    fn as_any(&self) -> &dyn Any;

    fn as_any_mut(&mut self) -> &mut dyn Any;

    fn remove_node(&mut self, node: Node);

    fn events(&self) -> &[ComponentEvent];

    fn clear_events(&mut self);
}

/// Dense storage for a single component type. `nodes[i]` owns `values[i]`.
struct ComponentColumn<T> {
    indexes: IntMap<Node, usize>,
    nodes: Vec<Node>,
    values: Vec<T>,
    events: Vec<ComponentEvent>,
}

impl<T: Component> ComponentColumn<T> {
    fn new() -> Self {
        Self {
            indexes: IntMap::default(),
            nodes: Vec::new(),
            values: Vec::new(),
            events: Vec::new(),
        }
    }

    fn contains(&self, node: Node) -> bool {
        self.indexes.contains_key(&node)
    }

    fn insert(&mut self, node: Node, value: T) {
        if self.contains(node) {
            return;
        }

        self.indexes.insert(node, self.values.len());
        self.nodes.push(node);
        self.values.push(value);
        self.events.push(ComponentEvent::Added(node));
    }

    fn get(&self, node: Node) -> Option<&T> {
        self.indexes.get(&node).map(|&index| &self.values[index])
    }

    fn replace(&mut self, node: Node, value: T) {
        let Some(&index) = self.indexes.get(&node) else {
            return;
        };

        if self.values[index] != value {
            self.values[index] = value;
            self.events.push(ComponentEvent::Modified(node));
        }
    }

    fn remove(&mut self, node: Node) {
        let Some(index) = self.indexes.remove(&node) else {
            return;
        };

        self.nodes.swap_remove(index);
        self.values.swap_remove(index);
        if let Some(&moved) = self.nodes.get(index) {
            self.indexes.insert(moved, index);
        }

        self.events.push(ComponentEvent::Removed(node));
    }

    fn iter(&self) -> impl Iterator<Item = (Node, &T)> {
        self.nodes.iter().copied().zip(&self.values)
    }
}

impl<T: Component> ComponentStorage for ComponentColumn<T> {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn remove_node(&mut self, node: Node) {
        self.remove(node);
    }

    fn events(&self) -> &[ComponentEvent] {
        &self.events
    }

    fn clear_events(&mut self) {
        self.events.clear();
    }
}

fn new_column<T: Component>() -> Box<dyn ComponentStorage> {
    Box::new(ComponentColumn::<T>::new())
}

/// # Scene
///
/// Hierarchy of nodes and the components attached to them.
///
/// Structural changes (spawning, despawning, re-parenting) need `&mut Scene`. Component access
/// only needs `&Scene`, so systems can read and write components while walking the hierarchy.
/// Holding the [Ref] returned by [Scene::events] while writing components panics.
pub struct Scene {
    nodes: IntSet<Node>,
    parents: IntMap<Node, Node>,
    children: IntMap<Node, Vec<Node>>,
    columns: RefCell<BTreeMap<TypeId, Box<dyn ComponentStorage>>>,
}

impl Scene {
    /// Returns an empty scene.
    pub fn new() -> Self {
        Self {
            nodes: IntSet::default(),
            parents: IntMap::default(),
            children: IntMap::default(),
            columns: RefCell::new(BTreeMap::new()),
        }
    }

    /// Returns true if the scene contains the given node.
    pub fn contains(&self, node: Node) -> bool {
        self.nodes.contains(&node)
    }

    /// Returns the number of nodes in the scene.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns true if the scene has no nodes.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Returns all of the nodes in the scene, in no particular order.
    pub fn nodes(&self) -> impl '_ + Iterator<Item = Node> {
        self.nodes.iter().copied()
    }

    /// Creates a new node and adds it to the scene.
    pub fn spawn(&mut self) -> Node {
        let node = Node::next();
        self.nodes.insert(node);
        trace!("spawned {node}");
        node
    }

    /// Removes the given node, its descendants, and all of their components from the scene.
    pub fn despawn(&mut self, node: Node) {
        if !self.contains(node) {
            return;
        }

        self.remove_parent(node);

        let columns = self.columns.get_mut();
        let mut pending = vec![node];
        let mut removed = 0usize;
        while let Some(current) = pending.pop() {
            self.nodes.remove(&current);
            self.parents.remove(&current);
            if let Some(children) = self.children.remove(&current) {
                pending.extend(children);
            }

            for column in columns.values_mut() {
                column.remove_node(current);
            }

            removed += 1;
        }

        debug!("despawned {node} ({removed} nodes)");
    }

    /// Returns the parent node for the given node.
    pub fn get_parent(&self, node: Node) -> Option<Node> {
        self.parents.get(&node).copied()
    }

    /// Sets the parent node for the given node. The node is appended to the parent's children.
    ///
    /// Fails, keeping the existing parent, if either node isn't in the scene or if the parent
    /// is the node itself or one of its descendants.
    pub fn set_parent(&mut self, node: Node, parent: Node) -> Result<(), HierarchyError> {
        if let Some(missing) = [node, parent].into_iter().find(|n| !self.contains(*n)) {
            debug!("rejected parent {parent} for {node}: {missing} is not in the scene");
            return Err(HierarchyError::NodeNotFound(missing));
        }

        if parent == node || self.ancestors(parent).any(|ancestor| ancestor == node) {
            debug!("rejected parent {parent} for {node}: cycle");
            return Err(HierarchyError::Cycle { node, parent });
        }

        self.remove_parent(node);
        self.parents.insert(node, parent);
        self.children.entry(parent).or_default().push(node);

        Ok(())
    }

    /// Removes the parent node for the given node, making it a root node.
    pub fn remove_parent(&mut self, node: Node) {
        let Some(parent) = self.parents.remove(&node) else {
            return;
        };

        if let Some(siblings) = self.children.get_mut(&parent) {
            siblings.retain(|child| *child != node);
            if siblings.is_empty() {
                self.children.remove(&parent);
            }
        }
    }

    /// Returns the root nodes i.e. nodes that don't have a parent.
    pub fn get_root_nodes(&self) -> impl '_ + Iterator<Item = Node> {
        self.nodes
            .iter()
            .copied()
            .filter(move |node| !self.parents.contains_key(node))
    }

    /// Returns the children for the given node, or `None` if it has no children.
    pub fn get_children(&self, node: Node) -> Option<&[Node]> {
        self.children.get(&node).map(Vec::as_slice)
    }

    /// Returns the parent of the given node, the parent's parent, and so on up to the root.
    pub fn ancestors(&self, node: Node) -> impl '_ + Iterator<Item = Node> {
        std::iter::successors(self.get_parent(node), move |current| self.get_parent(*current))
    }

    /// Returns every node below the given node in depth-first pre-order.
    pub fn descendants(&self, node: Node) -> Vec<Node> {
        let mut descendants = Vec::new();
        let mut pending: Vec<Node> = self.get_children(node).unwrap_or(&[]).to_vec();
        pending.reverse();

        while let Some(current) = pending.pop() {
            descendants.push(current);
            pending.extend(self.get_children(current).unwrap_or(&[]).iter().rev());
        }

        descendants
    }

    /// Adds the component to the node. Does nothing if the node isn't in the scene or already
    /// has the component.
    pub fn add<T: Component>(&self, node: Node, value: T) {
        if !self.contains(node) {
            trace!("ignored component for {node}: not in the scene");
            return;
        }

        let mut columns = self.columns.borrow_mut();
        let column = columns
            .entry(TypeId::of::<T>())
            .or_insert_with(new_column::<T>);

        if let Some(column) = column.as_any_mut().downcast_mut::<ComponentColumn<T>>() {
            column.insert(node, value);
        }
    }

    /// Returns the component value for the given node.
    pub fn get<T: Component>(&self, node: Node) -> Option<T> {
        self.column::<T>()
            .and_then(|column| column.get(node).cloned())
    }

    /// Returns true if the node has the component.
    pub fn has<T: Component>(&self, node: Node) -> bool {
        self.column::<T>()
            .is_some_and(|column| column.contains(node))
    }

    /// Sets the component value for the given node. Does nothing if the node doesn't have the
    /// component.
    pub fn set<T: Component>(&self, node: Node, value: T) {
        if let Some(mut column) = self.column_mut::<T>() {
            column.replace(node, value);
        }
    }

    /// Sets the component value for the given node or adds the component.
    pub fn set_or_add<T: Component>(&self, node: Node, value: T) {
        if self.has::<T>(node) {
            self.set(node, value);
        } else {
            self.add(node, value);
        }
    }

    /// Modifies the component value for the given node in place. Returns false if the node
    /// doesn't have the component.
    pub fn update<T: Component>(&self, node: Node, f: impl FnOnce(&mut T)) -> bool {
        let Some(mut value) = self.get::<T>(node) else {
            return false;
        };

        f(&mut value);
        self.set(node, value);

        true
    }

    /// Removes the component from the given node.
    pub fn remove<T: Component>(&self, node: Node) {
        if let Some(mut column) = self.column_mut::<T>() {
            column.remove(node);
        }
    }

    /// Returns every node with the given component, paired with its value.
    pub fn query<T: Component>(&self) -> Vec<(Node, T)> {
        self.column::<T>()
            .map(|column| {
                column
                    .iter()
                    .map(|(node, value)| (node, value.clone()))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Returns the events recorded for the given component since the last
    /// [Scene::clear_events].
    pub fn events<T: Component>(&self) -> Ref<'_, [ComponentEvent]> {
        Ref::map(self.columns.borrow(), |columns| {
            columns
                .get(&TypeId::of::<T>())
                .map(|column| column.events())
                .unwrap_or_default()
        })
    }

    /// Clears the component events for all the components.
    pub fn clear_events(&self) {
        for column in self.columns.borrow_mut().values_mut() {
            column.clear_events();
        }
    }

    fn column<T: Component>(&self) -> Option<Ref<'_, ComponentColumn<T>>> {
        Ref::filter_map(self.columns.borrow(), |columns| {
            columns
                .get(&TypeId::of::<T>())?
                .as_any()
                .downcast_ref::<ComponentColumn<T>>()
        })
        .ok()
    }

    fn column_mut<T: Component>(&self) -> Option<RefMut<'_, ComponentColumn<T>>> {
        RefMut::filter_map(self.columns.borrow_mut(), |columns| {
            columns
                .get_mut(&TypeId::of::<T>())?
                .as_any_mut()
                .downcast_mut::<ComponentColumn<T>>()
        })
        .ok()
    }
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}
