//! Host page abstraction
//!
//! The engine never touches a real document. Everything it needs from the
//! page (element creation, class/style writes, queries for host markers,
//! canvas painting, side-loading resources) goes through [`Host`]. A
//! browser binding implements it over the DOM; [`crate::MemoryPage`]
//! implements it in memory for tests and previews.

use vello::kurbo::{Circle, Rect, Size};
use vello::peniko::Color;

/// Opaque handle to an element owned by the host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u64);

/// The two selector forms the engine uses
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selector<'a> {
    /// `.class`
    Class(&'a str),
    /// `#id`
    Id(&'a str),
}

/// A page-level asset referenced by relative path
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource<'a> {
    Stylesheet(&'a str),
    Script(&'a str),
}

impl Resource<'_> {
    pub fn path(&self) -> &str {
        match self {
            Resource::Stylesheet(path) | Resource::Script(path) => path,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Resource::Stylesheet(_) => "CSS",
            Resource::Script(_) => "JS",
        }
    }
}

/// Notifications delivered by the host to the engine
#[derive(Debug, Clone, PartialEq)]
pub enum HostEvent {
    /// Something in the document changed (children, attributes, classes)
    Mutation,
    /// An observed element changed size
    Resize(NodeId),
    /// The user clicked an element
    Click(NodeId),
    /// A form control changed value (`checked` state is sent as "true"/"false")
    Change { node: NodeId, value: String },
}

/// Host errors
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum HostError {
    /// A stylesheet or script could not be loaded
    #[error("failed to load {kind}: {path}")]
    ResourceLoad { kind: &'static str, path: String },

    /// The referenced node is not part of the document
    #[error("node {0:?} is not attached")]
    Detached(NodeId),
}

/// The page the overlay lives in
pub trait Host {
    /// The document body
    fn body(&self) -> NodeId;

    /// First attached element matching `selector`, in document order
    fn query(&self, selector: Selector<'_>) -> Option<NodeId>;

    /// Whether `node` carries `class`
    fn has_class(&self, node: NodeId, class: &str) -> bool;

    /// Create a detached element
    fn create_element(&mut self, tag: &str) -> NodeId;

    /// Append `child` as the last child of `parent`
    fn append_child(&mut self, parent: NodeId, child: NodeId);

    /// Insert `child` as the first child of `parent`
    fn prepend_child(&mut self, parent: NodeId, child: NodeId);

    /// Detach and drop `node` with its subtree
    fn remove(&mut self, node: NodeId);

    /// Whether `node` is `ancestor` or inside it
    fn contains(&self, ancestor: NodeId, node: NodeId) -> bool;

    /// Replace the whole class list
    fn set_class_name(&mut self, node: NodeId, class_name: &str);

    fn set_attribute(&mut self, node: NodeId, name: &str, value: &str);

    /// Set an inline style property (custom `--properties` included)
    fn set_style(&mut self, node: NodeId, property: &str, value: &str);

    fn set_text(&mut self, node: NodeId, text: &str);

    /// Inner size of the window
    fn viewport(&self) -> Size;

    /// Layout box of an element in viewport coordinates
    fn bounding_rect(&self, node: NodeId) -> Rect;

    /// Side-load a stylesheet or script into the page
    fn load_resource(&mut self, resource: Resource<'_>) -> Result<(), HostError>;

    /// Start delivering [`HostEvent::Resize`] for `node`
    fn observe_resize(&mut self, node: NodeId);

    /// Stop delivering [`HostEvent::Resize`] for `node`
    fn unobserve_resize(&mut self, node: NodeId);

    /// Clear a canvas element
    fn clear_canvas(&mut self, canvas: NodeId);

    /// Fill a circle on a canvas element
    fn fill_circle(&mut self, canvas: NodeId, circle: Circle, color: Color);

    /// Reload the page (settings changes apply on the next load)
    fn reload(&mut self);
}

/// Find the element for `class` or create it under the body
///
/// A freshly created container is marked `aria-hidden`.
pub fn ensure_container(host: &mut dyn Host, class: &str) -> NodeId {
    if let Some(existing) = host.query(Selector::Class(class)) {
        return existing;
    }

    let container = host.create_element("div");
    host.set_class_name(container, class);
    host.set_attribute(container, "aria-hidden", "true");
    let body = host.body();
    host.append_child(body, container);
    container
}
