// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Core document implementation: structure, attributes, geometry, focus state.

use kurbo::{Rect, Size, Vec2};

use crate::selector::Selector;
use crate::types::{ElementData, ElementFlags, ElementId};

/// Tags that are focusable without a `tabindex` attribute.
const NATIVELY_FOCUSABLE: &[&str] = &["button", "input", "select", "textarea"];

/// An element tree with the state the interaction primitives consume.
///
/// The document owns a root (`html`) and a body. Elements created with
/// [`Document::create_element`] start out detached and become connected once
/// appended under the body (or any connected element).
///
/// Geometry is supplied by the host: this is not a layout engine. Callers set
/// each element's viewport-space border box with [`Document::set_rect`] after
/// their own layout pass; scrolling a container translates the boxes of its
/// descendants.
///
/// ## Example
///
/// ```rust
/// use kurbo::Size;
/// use trellis_dom::Document;
///
/// let mut doc = Document::new(Size::new(800.0, 600.0));
/// let button = doc.create_element("button");
/// doc.append_child(doc.body(), button);
///
/// assert!(doc.is_connected(button));
/// assert!(doc.is_focusable(button));
/// ```
pub struct Document {
    /// slots
    nodes: Vec<Option<Node>>,
    /// last generation per slot (persists across frees)
    generations: Vec<u32>,
    free_list: Vec<usize>,
    root: ElementId,
    body: ElementId,
    active: Option<ElementId>,
    viewport: Size,
    reduced_motion: bool,
}

impl core::fmt::Debug for Document {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let total = self.nodes.len();
        let alive = self.nodes.iter().filter(|n| n.is_some()).count();
        f.debug_struct("Document")
            .field("nodes_total", &total)
            .field("nodes_alive", &alive)
            .field("free_list", &self.free_list.len())
            .field("active", &self.active)
            .field("viewport", &self.viewport)
            .finish_non_exhaustive()
    }
}

#[derive(Clone, Debug)]
struct Node {
    generation: u32,
    parent: Option<ElementId>,
    children: Vec<ElementId>,
    data: ElementData,
    scroll: Vec2,
}

impl Node {
    fn new(generation: u32, tag: &str) -> Self {
        Self {
            generation,
            parent: None,
            children: Vec::new(),
            data: ElementData::new(tag),
            scroll: Vec2::ZERO,
        }
    }
}

impl Document {
    /// Create a document with an `html` root, a `body`, and the given viewport size.
    pub fn new(viewport: Size) -> Self {
        let mut doc = Self {
            nodes: Vec::new(),
            generations: Vec::new(),
            free_list: Vec::new(),
            root: ElementId::new(0, 1),
            body: ElementId::new(0, 1),
            active: None,
            viewport,
            reduced_motion: false,
        };
        doc.root = doc.create_element("html");
        doc.body = doc.create_element("body");
        doc.link_parent(doc.body, doc.root, None);
        let full = Rect::from_origin_size((0.0, 0.0), viewport);
        doc.set_rect(doc.root, full);
        doc.set_rect(doc.body, full);
        doc.set_flags(doc.root, ElementFlags::SCROLLABLE);
        doc
    }

    /// The document element (`html`).
    pub fn root(&self) -> ElementId {
        self.root
    }

    /// The body element; the default portal container.
    pub fn body(&self) -> ElementId {
        self.body
    }

    /// Create a detached element.
    pub fn create_element(&mut self, tag: &str) -> ElementId {
        let (idx, generation) = if let Some(idx) = self.free_list.pop() {
            let generation = self.generations[idx].saturating_add(1);
            self.generations[idx] = generation;
            self.nodes[idx] = Some(Node::new(generation, tag));
            #[allow(
                clippy::cast_possible_truncation,
                reason = "ElementId uses 32-bit indices by design."
            )]
            (idx as u32, generation)
        } else {
            let generation = 1_u32;
            self.nodes.push(Some(Node::new(generation, tag)));
            self.generations.push(generation);
            #[allow(
                clippy::cast_possible_truncation,
                reason = "ElementId uses 32-bit indices by design."
            )]
            ((self.nodes.len() - 1) as u32, generation)
        };
        ElementId::new(idx, generation)
    }

    /// Append `child` as the last child of `parent`, moving it if it already has a parent.
    ///
    /// Returns false (and does nothing) if either id is stale, if `child` is the
    /// root, or if the move would make `child` an ancestor of itself.
    pub fn append_child(&mut self, parent: ElementId, child: ElementId) -> bool {
        self.insert_before(parent, child, None)
    }

    /// Insert `child` under `parent` before `reference` (or last if `None`).
    ///
    /// A `reference` that is not a child of `parent` appends.
    pub fn insert_before(
        &mut self,
        parent: ElementId,
        child: ElementId,
        reference: Option<ElementId>,
    ) -> bool {
        if !self.is_alive(parent)
            || !self.is_alive(child)
            || child == self.root
            || self.contains(child, parent)
        {
            return false;
        }
        if let Some(old) = self.node(child).parent {
            self.unlink_parent(child, old);
        }
        self.link_parent(child, parent, reference);
        true
    }

    /// Detach an element (and its subtree) from its parent without destroying it.
    pub fn detach(&mut self, id: ElementId) {
        if !self.is_alive(id) || id == self.root {
            return;
        }
        if let Some(parent) = self.node(id).parent {
            self.unlink_parent(id, parent);
        }
        if self.active.is_some_and(|a| self.contains(id, a)) {
            self.active = None;
        }
    }

    /// Remove an element and its subtree; all their ids become stale.
    pub fn remove(&mut self, id: ElementId) {
        if !self.is_alive(id) || id == self.root || id == self.body {
            return;
        }
        self.detach(id);
        self.free_subtree(id);
    }

    fn free_subtree(&mut self, id: ElementId) {
        let children = core::mem::take(&mut self.node_mut(id).children);
        for child in children {
            self.free_subtree(child);
        }
        self.nodes[id.idx()] = None;
        self.free_list.push(id.idx());
    }

    /// Returns true if `id` refers to a live element.
    ///
    /// An `ElementId` is live if its slot exists and its generation matches
    /// the current generation stored in that slot.
    pub fn is_alive(&self, id: ElementId) -> bool {
        self.nodes
            .get(id.idx())
            .and_then(|n| n.as_ref())
            .is_some_and(|n| n.generation == id.1)
    }

    /// Returns true if the element is live and attached under the root.
    pub fn is_connected(&self, id: ElementId) -> bool {
        self.is_alive(id) && self.ancestors(id).last() == Some(self.root)
    }

    /// Returns the parent of an element if live, or `None` for detached elements or stale ids.
    pub fn parent_of(&self, id: ElementId) -> Option<ElementId> {
        self.node_opt(id).and_then(|n| n.parent)
    }

    /// Get the children of an element, or an empty slice if the id is stale.
    pub fn children_of(&self, id: ElementId) -> &[ElementId] {
        self.node_opt(id).map_or(&[], |n| &n.children)
    }

    /// Iterate `id` and its ancestors, innermost first.
    pub fn ancestors(&self, id: ElementId) -> impl Iterator<Item = ElementId> + '_ {
        let start = self.is_alive(id).then_some(id);
        core::iter::successors(start, |&n| self.parent_of(n))
    }

    /// Path from the outermost ancestor to `id` (inclusive); empty for stale ids.
    pub fn path_to(&self, id: ElementId) -> Vec<ElementId> {
        let mut path: Vec<ElementId> = self.ancestors(id).collect();
        path.reverse();
        path
    }

    /// Returns true if `node` is `ancestor` or one of its descendants.
    pub fn contains(&self, ancestor: ElementId, node: ElementId) -> bool {
        self.is_alive(ancestor) && self.ancestors(node).any(|n| n == ancestor)
    }

    /// Iterate the descendants of `container` in document (depth-first, pre-) order.
    ///
    /// The container itself is not yielded.
    pub fn descendants(&self, container: ElementId) -> Descendants<'_> {
        let stack = self
            .children_of(container)
            .iter()
            .rev()
            .copied()
            .collect();
        Descendants { doc: self, stack }
    }

    /// All descendants of `container` matching `selector`, in document order.
    pub fn query_all(&self, container: ElementId, selector: &Selector) -> Vec<ElementId> {
        self.descendants(container)
            .filter(|&id| selector.matches(self, id))
            .collect()
    }

    /// The first descendant of `container` matching `selector`.
    pub fn query(&self, container: ElementId, selector: &Selector) -> Option<ElementId> {
        self.descendants(container)
            .find(|&id| selector.matches(self, id))
    }

    /// Lowercase tag name of a live element.
    pub fn tag(&self, id: ElementId) -> Option<&str> {
        self.node_opt(id).map(|n| n.data.tag.as_str())
    }

    /// Read an attribute.
    pub fn attribute(&self, id: ElementId, name: &str) -> Option<&str> {
        let node = self.node_opt(id)?;
        if name.bytes().any(|b| b.is_ascii_uppercase()) {
            node.data
                .attributes
                .get(&name.to_ascii_lowercase())
                .map(String::as_str)
        } else {
            node.data.attributes.get(name).map(String::as_str)
        }
    }

    /// Returns true if the attribute is present.
    pub fn has_attribute(&self, id: ElementId, name: &str) -> bool {
        self.attribute(id, name).is_some()
    }

    /// Set an attribute. Names are case-insensitive.
    pub fn set_attribute(&mut self, id: ElementId, name: &str, value: &str) {
        if let Some(n) = self.node_opt_mut(id) {
            n.data
                .attributes
                .insert(name.to_ascii_lowercase(), value.to_owned());
        }
    }

    /// Remove an attribute.
    pub fn remove_attribute(&mut self, id: ElementId, name: &str) {
        if let Some(n) = self.node_opt_mut(id) {
            n.data.attributes.remove(&name.to_ascii_lowercase());
        }
    }

    /// Parsed `tabindex`, if present and numeric.
    pub fn tab_index(&self, id: ElementId) -> Option<i32> {
        self.attribute(id, "tabindex")
            .and_then(|v| v.trim().parse().ok())
    }

    /// Returns the flags of an element if the identifier is live.
    pub fn flags(&self, id: ElementId) -> Option<ElementFlags> {
        self.node_opt(id).map(|n| n.data.flags)
    }

    /// Update element flags.
    pub fn set_flags(&mut self, id: ElementId, flags: ElementFlags) {
        if let Some(n) = self.node_opt_mut(id) {
            n.data.flags = flags;
        }
        if flags.intersects(ElementFlags::DISABLED | ElementFlags::HIDDEN)
            && self.active.is_some_and(|a| self.contains(id, a))
        {
            self.active = None;
        }
    }

    /// Insert or remove individual flags.
    pub fn toggle_flags(&mut self, id: ElementId, flags: ElementFlags, on: bool) {
        if let Some(current) = self.flags(id) {
            let mut next = current;
            next.set(flags, on);
            self.set_flags(id, next);
        }
    }

    /// Returns true if the element is disabled via flag, `disabled`, or `aria-disabled="true"`.
    pub fn is_disabled(&self, id: ElementId) -> bool {
        self.flags(id)
            .is_some_and(|f| f.contains(ElementFlags::DISABLED))
            || self.has_attribute(id, "disabled")
            || self.attribute(id, "aria-disabled") == Some("true")
    }

    /// Returns true if the element or any ancestor is hidden.
    pub fn is_hidden(&self, id: ElementId) -> bool {
        self.ancestors(id).any(|a| {
            self.flags(a)
                .is_some_and(|f| f.contains(ElementFlags::HIDDEN))
                || self.has_attribute(a, "hidden")
        })
    }

    /// Returns true if the element can receive focus (programmatically or by keyboard).
    ///
    /// Natively focusable controls, links with `href`, and any element with a
    /// `tabindex` qualify, provided they are connected, rendered, and enabled.
    pub fn is_focusable(&self, id: ElementId) -> bool {
        let Some(tag) = self.tag(id) else {
            return false;
        };
        let natively = match tag {
            "a" | "area" => self.has_attribute(id, "href"),
            "input" => self.attribute(id, "type") != Some("hidden"),
            t => NATIVELY_FOCUSABLE.contains(&t),
        };
        let candidate = natively
            || self.tab_index(id).is_some()
            || self.attribute(id, "contenteditable") == Some("true");
        candidate && self.is_connected(id) && !self.is_hidden(id) && !self.is_disabled(id)
    }

    /// Returns true if the element is focusable and reachable with Tab.
    pub fn is_tabbable(&self, id: ElementId) -> bool {
        self.is_focusable(id) && self.tab_index(id).is_none_or(|t| t >= 0)
    }

    /// Border box of a live element in viewport coordinates.
    pub fn rect(&self, id: ElementId) -> Option<Rect> {
        self.node_opt(id).map(|n| n.data.rect)
    }

    /// Set the border box of an element in viewport coordinates.
    pub fn set_rect(&mut self, id: ElementId, rect: Rect) {
        if let Some(n) = self.node_opt_mut(id) {
            n.data.rect = rect;
        }
    }

    /// Current scroll offset of a scroll container.
    pub fn scroll_offset(&self, id: ElementId) -> Option<Vec2> {
        self.node_opt(id).map(|n| n.scroll)
    }

    /// Scroll a container by `delta`, moving the boxes of all its descendants.
    ///
    /// Returns false if the id is stale.
    pub fn apply_scroll(&mut self, id: ElementId, delta: Vec2) -> bool {
        if !self.is_alive(id) {
            return false;
        }
        self.node_mut(id).scroll += delta;
        let moved: Vec<ElementId> = self.descendants(id).collect();
        for d in moved {
            let n = self.node_mut(d);
            n.data.rect = n.data.rect - delta;
        }
        true
    }

    /// Scrollable ancestors of `id`, innermost first, ending with the root.
    pub fn scroll_ancestors(&self, id: ElementId) -> Vec<ElementId> {
        self.ancestors(id)
            .skip(1)
            .filter(|&a| {
                self.flags(a)
                    .is_some_and(|f| f.contains(ElementFlags::SCROLLABLE))
            })
            .collect()
    }

    /// The viewport rectangle (origin at zero).
    pub fn viewport(&self) -> Rect {
        Rect::from_origin_size((0.0, 0.0), self.viewport)
    }

    /// Resize the viewport. The root and body boxes track the viewport.
    pub fn set_viewport(&mut self, size: Size) {
        self.viewport = size;
        let full = Rect::from_origin_size((0.0, 0.0), size);
        self.set_rect(self.root, full);
        self.set_rect(self.body, full);
    }

    /// The `prefers-reduced-motion` media preference.
    pub fn prefers_reduced_motion(&self) -> bool {
        self.reduced_motion
    }

    /// Set the `prefers-reduced-motion` media preference.
    pub fn set_prefers_reduced_motion(&mut self, reduce: bool) {
        self.reduced_motion = reduce;
    }

    /// The focused element, if any and still connected.
    pub fn active_element(&self) -> Option<ElementId> {
        self.active.filter(|&a| self.is_connected(a))
    }

    pub(crate) fn set_active(&mut self, id: Option<ElementId>) {
        self.active = id;
    }

    /// Tabbable elements in the whole document, in document order.
    pub fn tabbable_elements(&self) -> Vec<ElementId> {
        self.descendants(self.root)
            .filter(|&id| self.is_tabbable(id))
            .collect()
    }

    // --- internals ---

    fn node(&self, id: ElementId) -> &Node {
        self.nodes[id.idx()].as_ref().expect("dangling ElementId")
    }

    fn node_mut(&mut self, id: ElementId) -> &mut Node {
        self.nodes[id.idx()].as_mut().expect("dangling ElementId")
    }

    fn node_opt(&self, id: ElementId) -> Option<&Node> {
        let n = self.nodes.get(id.idx())?.as_ref()?;
        (n.generation == id.1).then_some(n)
    }

    fn node_opt_mut(&mut self, id: ElementId) -> Option<&mut Node> {
        let n = self.nodes.get_mut(id.idx())?.as_mut()?;
        if n.generation != id.1 {
            return None;
        }
        Some(n)
    }

    fn link_parent(&mut self, id: ElementId, parent: ElementId, before: Option<ElementId>) {
        let parent_node = self.node_mut(parent);
        let pos = before
            .and_then(|b| parent_node.children.iter().position(|&c| c == b))
            .unwrap_or(parent_node.children.len());
        parent_node.children.insert(pos, id);
        self.node_mut(id).parent = Some(parent);
    }

    fn unlink_parent(&mut self, id: ElementId, parent: ElementId) {
        let p = self.node_mut(parent);
        p.children.retain(|c| *c != id);
        self.node_mut(id).parent = None;
    }
}

/// Depth-first iterator over a subtree, returned by [`Document::descendants`].
#[derive(Debug)]
pub struct Descendants<'a> {
    doc: &'a Document,
    stack: Vec<ElementId>,
}

impl Iterator for Descendants<'_> {
    type Item = ElementId;

    fn next(&mut self) -> Option<ElementId> {
        let next = self.stack.pop()?;
        // Push all children to the stack. The `.rev()` means we visit the
        // children in the order they are given in `children`.
        self.stack
            .extend(self.doc.children_of(next).iter().rev().copied());
        Some(next)
    }
}
