//! In-memory host page for tests and headless previews
//!
//! Provides a [`MemoryPage`] that implements [`Host`] over a tiny element
//! tree and records side effects (loaded resources, canvas paint, reloads)
//! for assertions, without requiring a browser.

use std::collections::{BTreeMap, HashMap, HashSet};

use vello::kurbo::{Circle, Point, Rect, Size};
use vello::peniko::Color;

use crate::host::{Host, HostError, NodeId, Resource, Selector};

/// Default window size used by [`MemoryPage::new`]
pub const DEFAULT_VIEWPORT: Size = Size::new(1280.0, 720.0);

/// A single element in the page
#[derive(Debug, Clone, Default)]
struct Element {
    tag: String,
    class_name: String,
    attributes: BTreeMap<String, String>,
    style: BTreeMap<String, String>,
    text: String,
    children: Vec<NodeId>,
    parent: Option<NodeId>,
}

impl Element {
    fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_string(),
            ..Default::default()
        }
    }

    fn has_class(&self, class: &str) -> bool {
        self.class_name.split_whitespace().any(|c| c == class)
    }

    fn style_px(&self, property: &str) -> f64 {
        self.style
            .get(property)
            .and_then(|v| v.trim_end_matches("px").parse().ok())
            .unwrap_or(0.0)
    }
}

/// Record of a canvas paint call for test inspection
#[derive(Debug, Clone, PartialEq)]
pub enum PaintCall {
    /// Canvas was cleared
    Clear,
    /// A circle was filled
    Circle(Circle),
}

/// A document held entirely in memory
#[derive(Debug)]
pub struct MemoryPage {
    elements: HashMap<NodeId, Element>,
    next_id: u64,
    body: NodeId,
    viewport: Size,
    /// Size reported for `img` elements without an explicit rect
    image_size: Size,
    rects: HashMap<NodeId, Rect>,
    loaded: Vec<String>,
    failing: HashSet<String>,
    resize_observed: HashSet<NodeId>,
    paint: HashMap<NodeId, Vec<PaintCall>>,
    reloads: usize,
    mutations: usize,
}

impl Default for MemoryPage {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryPage {
    /// Create an empty page with the default viewport
    pub fn new() -> Self {
        Self::with_viewport(DEFAULT_VIEWPORT)
    }

    /// Create an empty page with a given window size
    pub fn with_viewport(viewport: Size) -> Self {
        let body = NodeId(0);
        let mut elements = HashMap::new();
        elements.insert(body, Element::new("body"));
        Self {
            elements,
            next_id: 1,
            body,
            viewport,
            image_size: Size::new(120.0, 80.0),
            rects: HashMap::new(),
            loaded: Vec::new(),
            failing: HashSet::new(),
            resize_observed: HashSet::new(),
            paint: HashMap::new(),
            reloads: 0,
            mutations: 0,
        }
    }

    /// Change the window size
    pub fn set_viewport(&mut self, viewport: Size) {
        self.viewport = viewport;
    }

    /// Change the layout size reported for images
    pub fn set_image_size(&mut self, size: Size) {
        self.image_size = size;
    }

    /// Pin the layout box of an element
    pub fn set_rect(&mut self, node: NodeId, rect: Rect) {
        self.rects.insert(node, rect);
    }

    /// Make loading `path` fail
    pub fn fail_resource(&mut self, path: &str) {
        self.failing.insert(path.to_string());
    }

    /// Create an element with a class and attach it under `parent`
    pub fn add_element(&mut self, parent: NodeId, tag: &str, class_name: &str) -> NodeId {
        let node = self.create_element(tag);
        self.set_class_name(node, class_name);
        self.append_child(parent, node);
        node
    }

    /// Add a class to the body
    pub fn add_body_class(&mut self, class: &str) {
        let body = self.body;
        if let Some(element) = self.elements.get_mut(&body) {
            if !element.has_class(class) {
                element.class_name = format!("{} {}", element.class_name, class).trim().to_string();
                self.mutations += 1;
            }
        }
    }

    /// Remove a class from the body
    pub fn remove_body_class(&mut self, class: &str) {
        let body = self.body;
        if let Some(element) = self.elements.get_mut(&body) {
            let remaining: Vec<&str> = element.class_name.split_whitespace().filter(|c| *c != class).collect();
            element.class_name = remaining.join(" ");
            self.mutations += 1;
        }
    }

    /// All attached elements carrying `class`, in document order
    pub fn query_all(&self, class: &str) -> Vec<NodeId> {
        self.walk()
            .into_iter()
            .filter(|id| self.elements.get(id).is_some_and(|e| e.has_class(class)))
            .collect()
    }

    /// Number of attached elements carrying `class`
    pub fn count(&self, class: &str) -> usize {
        self.query_all(class).len()
    }

    /// Whether `node` is reachable from the body
    pub fn is_attached(&self, node: NodeId) -> bool {
        let mut current = Some(node);
        while let Some(id) = current {
            if id == self.body {
                return true;
            }
            current = self.elements.get(&id).and_then(|e| e.parent);
        }
        false
    }

    pub fn tag(&self, node: NodeId) -> Option<&str> {
        self.elements.get(&node).map(|e| e.tag.as_str())
    }

    pub fn class_name(&self, node: NodeId) -> Option<&str> {
        self.elements.get(&node).map(|e| e.class_name.as_str())
    }

    pub fn attribute(&self, node: NodeId, name: &str) -> Option<&str> {
        self.elements.get(&node)?.attributes.get(name).map(|v| v.as_str())
    }

    pub fn style(&self, node: NodeId, property: &str) -> Option<&str> {
        self.elements.get(&node)?.style.get(property).map(|v| v.as_str())
    }

    pub fn text(&self, node: NodeId) -> Option<&str> {
        self.elements.get(&node).map(|e| e.text.as_str())
    }

    pub fn children(&self, node: NodeId) -> &[NodeId] {
        self.elements.get(&node).map(|e| e.children.as_slice()).unwrap_or(&[])
    }

    /// Paths passed to `load_resource`, failures included
    pub fn loaded_resources(&self) -> &[String] {
        &self.loaded
    }

    /// Paint calls recorded for a canvas since it was created
    pub fn paint_calls(&self, canvas: NodeId) -> &[PaintCall] {
        self.paint.get(&canvas).map(|c| c.as_slice()).unwrap_or(&[])
    }

    /// Circles drawn since the last clear
    pub fn circles_in_last_frame(&self, canvas: NodeId) -> usize {
        let calls = self.paint_calls(canvas);
        let start = calls.iter().rposition(|c| *c == PaintCall::Clear).map(|i| i + 1).unwrap_or(0);
        calls[start..].len()
    }

    pub fn is_resize_observed(&self, node: NodeId) -> bool {
        self.resize_observed.contains(&node)
    }

    pub fn reload_count(&self) -> usize {
        self.reloads
    }

    /// Number of mutations since the last call, resetting the counter
    pub fn take_mutations(&mut self) -> usize {
        std::mem::take(&mut self.mutations)
    }

    /// Attached elements in document order
    fn walk(&self) -> Vec<NodeId> {
        let mut order = Vec::new();
        let mut stack = vec![self.body];
        while let Some(id) = stack.pop() {
            order.push(id);
            if let Some(element) = self.elements.get(&id) {
                stack.extend(element.children.iter().rev());
            }
        }
        order
    }

    fn detach(&mut self, node: NodeId) {
        let parent = self.elements.get_mut(&node).and_then(|e| e.parent.take());
        if let Some(parent) = parent.and_then(|p| self.elements.get_mut(&p)) {
            parent.children.retain(|c| *c != node);
        }
    }

    fn drop_subtree(&mut self, node: NodeId) {
        if let Some(element) = self.elements.remove(&node) {
            self.rects.remove(&node);
            self.paint.remove(&node);
            self.resize_observed.remove(&node);
            for child in element.children {
                self.drop_subtree(child);
            }
        }
    }
}

impl Host for MemoryPage {
    fn body(&self) -> NodeId {
        self.body
    }

    fn query(&self, selector: Selector<'_>) -> Option<NodeId> {
        self.walk().into_iter().find(|id| {
            let Some(element) = self.elements.get(id) else {
                return false;
            };
            match selector {
                Selector::Class(class) => element.has_class(class),
                Selector::Id(wanted) => element.attributes.get("id").is_some_and(|v| v == wanted),
            }
        })
    }

    fn has_class(&self, node: NodeId, class: &str) -> bool {
        self.elements.get(&node).is_some_and(|e| e.has_class(class))
    }

    fn create_element(&mut self, tag: &str) -> NodeId {
        let id = NodeId(self.next_id);
        self.next_id += 1;
        self.elements.insert(id, Element::new(tag));
        id
    }

    fn append_child(&mut self, parent: NodeId, child: NodeId) {
        if !self.elements.contains_key(&parent) || !self.elements.contains_key(&child) {
            return;
        }
        self.detach(child);
        if let Some(p) = self.elements.get_mut(&parent) {
            p.children.push(child);
        }
        if let Some(c) = self.elements.get_mut(&child) {
            c.parent = Some(parent);
        }
        self.mutations += 1;
    }

    fn prepend_child(&mut self, parent: NodeId, child: NodeId) {
        if !self.elements.contains_key(&parent) || !self.elements.contains_key(&child) {
            return;
        }
        self.detach(child);
        if let Some(p) = self.elements.get_mut(&parent) {
            p.children.insert(0, child);
        }
        if let Some(c) = self.elements.get_mut(&child) {
            c.parent = Some(parent);
        }
        self.mutations += 1;
    }

    fn remove(&mut self, node: NodeId) {
        if node == self.body || !self.elements.contains_key(&node) {
            return;
        }
        self.detach(node);
        self.drop_subtree(node);
        self.mutations += 1;
    }

    fn contains(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut current = Some(node);
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            current = self.elements.get(&id).and_then(|e| e.parent);
        }
        false
    }

    fn set_class_name(&mut self, node: NodeId, class_name: &str) {
        if let Some(element) = self.elements.get_mut(&node) {
            element.class_name = class_name.to_string();
            self.mutations += 1;
        }
    }

    fn set_attribute(&mut self, node: NodeId, name: &str, value: &str) {
        if let Some(element) = self.elements.get_mut(&node) {
            element.attributes.insert(name.to_string(), value.to_string());
            self.mutations += 1;
        }
    }

    fn set_style(&mut self, node: NodeId, property: &str, value: &str) {
        if let Some(element) = self.elements.get_mut(&node) {
            element.style.insert(property.to_string(), value.to_string());
            self.mutations += 1;
        }
    }

    fn set_text(&mut self, node: NodeId, text: &str) {
        if let Some(element) = self.elements.get_mut(&node) {
            element.text = text.to_string();
            self.mutations += 1;
        }
    }

    fn viewport(&self) -> Size {
        self.viewport
    }

    fn bounding_rect(&self, node: NodeId) -> Rect {
        if let Some(rect) = self.rects.get(&node) {
            return *rect;
        }
        match self.elements.get(&node) {
            Some(element) if element.tag == "img" => {
                let origin = Point::new(element.style_px("left"), element.style_px("top"));
                Rect::from_origin_size(origin, self.image_size)
            }
            Some(_) => Rect::from_origin_size(Point::ORIGIN, self.viewport),
            None => Rect::ZERO,
        }
    }

    fn load_resource(&mut self, resource: Resource<'_>) -> Result<(), HostError> {
        let path = resource.path().to_string();
        let tag = match resource {
            Resource::Stylesheet(_) => "link",
            Resource::Script(_) => "script",
        };
        let element = self.create_element(tag);
        self.set_attribute(element, if tag == "link" { "href" } else { "src" }, &path);
        let body = self.body;
        self.append_child(body, element);
        self.loaded.push(path.clone());

        if self.failing.contains(&path) {
            return Err(HostError::ResourceLoad { kind: resource.kind(), path });
        }
        Ok(())
    }

    fn observe_resize(&mut self, node: NodeId) {
        self.resize_observed.insert(node);
    }

    fn unobserve_resize(&mut self, node: NodeId) {
        self.resize_observed.remove(&node);
    }

    fn clear_canvas(&mut self, canvas: NodeId) {
        let calls = self.paint.entry(canvas).or_default();
        // Keep only the frame being drawn so long previews stay small
        calls.clear();
        calls.push(PaintCall::Clear);
    }

    fn fill_circle(&mut self, canvas: NodeId, circle: Circle, _color: Color) {
        self.paint.entry(canvas).or_default().push(PaintCall::Circle(circle));
    }

    fn reload(&mut self) {
        self.reloads += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_in_document_order() {
        let mut page = MemoryPage::new();
        let body = page.body();
        let first = page.add_element(body, "div", "item a");
        let nested = page.add_element(first, "div", "item b");
        let second = page.add_element(body, "div", "item c");

        assert_eq!(page.query(Selector::Class("item")), Some(first));
        assert_eq!(page.query_all("item"), vec![first, nested, second]);
    }

    #[test]
    fn test_detached_nodes_are_invisible_to_queries() {
        let mut page = MemoryPage::new();
        let node = page.create_element("div");
        page.set_class_name(node, "floating");
        assert_eq!(page.query(Selector::Class("floating")), None);

        let body = page.body();
        page.append_child(body, node);
        assert_eq!(page.query(Selector::Class("floating")), Some(node));
    }

    #[test]
    fn test_query_by_id() {
        let mut page = MemoryPage::new();
        let body = page.body();
        let node = page.add_element(body, "div", "");
        page.set_attribute(node, "id", "app-user-menu");
        assert_eq!(page.query(Selector::Id("app-user-menu")), Some(node));
    }

    #[test]
    fn test_remove_drops_subtree() {
        let mut page = MemoryPage::new();
        let body = page.body();
        let parent = page.add_element(body, "div", "parent");
        let child = page.add_element(parent, "div", "child");

        page.remove(parent);
        assert!(page.tag(child).is_none());
        assert_eq!(page.count("child"), 0);
        assert!(page.children(body).is_empty());
    }

    #[test]
    fn test_prepend() {
        let mut page = MemoryPage::new();
        let body = page.body();
        let a = page.add_element(body, "div", "a");
        let b = page.create_element("div");
        page.prepend_child(body, b);
        assert_eq!(page.children(body), &[b, a]);
    }

    #[test]
    fn test_failing_resource() {
        let mut page = MemoryPage::new();
        page.fail_resource("missing.css");
        assert!(page.load_resource(Resource::Stylesheet("ok.css")).is_ok());
        let err = page.load_resource(Resource::Stylesheet("missing.css")).unwrap_err();
        assert_eq!(err, HostError::ResourceLoad { kind: "CSS", path: "missing.css".to_string() });
        assert_eq!(page.loaded_resources().len(), 2);
    }

    #[test]
    fn test_body_classes() {
        let mut page = MemoryPage::new();
        let body = page.body();
        page.add_body_class("dashboardDocument");
        assert!(page.has_class(body, "dashboardDocument"));
        page.remove_body_class("dashboardDocument");
        assert!(!page.has_class(body, "dashboardDocument"));
    }

    #[test]
    fn test_image_rect_follows_style() {
        let mut page = MemoryPage::new();
        let body = page.body();
        let img = page.add_element(body, "img", "santa");
        page.set_style(img, "left", "40px");
        page.set_style(img, "top", "25.5px");
        let rect = page.bounding_rect(img);
        assert_eq!(rect.x0, 40.0);
        assert_eq!(rect.y0, 25.5);
        assert_eq!(rect.height(), 80.0);
    }

    #[test]
    fn test_mutation_counter() {
        let mut page = MemoryPage::new();
        page.take_mutations();
        let body = page.body();
        page.add_element(body, "div", "x");
        assert!(page.take_mutations() > 0);
        assert_eq!(page.take_mutations(), 0);
    }
}
