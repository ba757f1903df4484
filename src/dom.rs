//! Headless document tree.
//!
//! `Document` is a small arena-backed element tree that plays the role of the
//! browser document for the renderer. Host pages are parsed with `scraper`
//! (html5ever), mutated through the [`View`](crate::view::View) trait and
//! serialized back to HTML with all text escaped.
//!
//! Removed subtrees release their arena slots, and every slot carries a
//! generation counter so a handle to a removed node can never alias a node
//! created later.

use crate::{Error, Result, TextSnapshot};
use scraper::{ElementRef, Html, Node as HtmlNode};
use sha2::{Digest, Sha256};

/// Elements serialized without an end tag
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source",
    "track", "wbr",
];

/// Elements whose text children are emitted verbatim. html5ever tokenizes
/// these as raw text (`noscript` too, since scraper parses with scripting
/// enabled), so escaping their content would change it on reparse.
const RAW_TEXT_ELEMENTS: &[&str] = &[
    "iframe", "noembed", "noframes", "noscript", "plaintext", "script", "style", "xmp",
];

/// Elements whose content never shows up as page text
const HIDDEN_TEXT_ELEMENTS: &[&str] = &[
    "iframe", "noembed", "noframes", "noscript", "script", "style", "template",
];

/// Elements that start a new line in a text snapshot
const BLOCK_ELEMENTS: &[&str] = &[
    "address", "article", "aside", "div", "footer", "h1", "h2", "h3", "h4", "h5", "h6",
    "header", "li", "main", "nav", "ol", "p", "section", "table", "tr", "ul",
];

/// Handle to a node owned by a [`Document`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId {
    index: usize,
    generation: u32,
}

impl NodeId {
    /// Arena slot of this node
    pub fn index(&self) -> usize {
        self.index
    }
}

/// Tag name and attributes of an element node
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementData {
    pub tag: String,
    pub attrs: Vec<(String, String)>,
}

impl ElementData {
    fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_ascii_lowercase(),
            attrs: Vec::new(),
        }
    }

    /// Value of the named attribute, if set
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// Whitespace-separated entries of the `class` attribute
    pub fn classes(&self) -> impl Iterator<Item = &str> {
        self.attr("class").unwrap_or("").split_whitespace()
    }

    fn set_attr(&mut self, name: &str, value: &str) {
        match self.attrs.iter_mut().find(|(n, _)| n == name) {
            Some(slot) => slot.1 = value.to_string(),
            None => self.attrs.push((name.to_string(), value.to_string())),
        }
    }
}

/// Payload of a node
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    Element(ElementData),
    Text(String),
}

#[derive(Debug, Clone)]
struct Node {
    kind: NodeKind,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

#[derive(Debug, Clone)]
struct Slot {
    generation: u32,
    node: Option<Node>,
}

/// An in-memory HTML document
#[derive(Debug, Clone)]
pub struct Document {
    slots: Vec<Slot>,
    free: Vec<usize>,
    root: NodeId,
    doctype: Option<String>,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// An empty `<html><head></head><body></body></html>` document
    pub fn new() -> Self {
        let mut doc = Self::with_root("html");
        doc.doctype = Some("html".to_string());
        let root = doc.root;
        for tag in ["head", "body"] {
            let child = doc.create_element(tag);
            // Root and child were both just allocated.
            let _ = doc.append_child(root, child);
        }
        doc
    }

    fn with_root(tag: &str) -> Self {
        let mut doc = Self {
            slots: Vec::new(),
            free: Vec::new(),
            root: NodeId {
                index: 0,
                generation: 0,
            },
            doctype: None,
        };
        doc.root = doc.alloc(NodeKind::Element(ElementData::new(tag)));
        doc
    }

    /// Parse a host page. Comments and processing instructions are dropped;
    /// a doctype is kept and re-emitted by [`Document::to_html`].
    pub fn parse_html(html: &str) -> Result<Self> {
        let parsed = Html::parse_document(html);
        if !parsed.errors.is_empty() {
            log::debug!("host document parsed with {} recoverable errors", parsed.errors.len());
        }

        let root_el = parsed.root_element();
        let mut doc = Self::with_root(root_el.value().name());
        doc.doctype = parsed.tree.root().children().find_map(|n| match n.value() {
            HtmlNode::Doctype(d) => Some(d.name().to_string()),
            _ => None,
        });

        let root = doc.root;
        doc.import_attrs(root, root_el)?;
        doc.import_children(root, root_el)?;
        Ok(doc)
    }

    fn import_attrs(&mut self, id: NodeId, el: ElementRef<'_>) -> Result<()> {
        // scraper keeps attributes in a hash map; sort them for stable output.
        let mut attrs: Vec<(&str, &str)> = el.value().attrs().collect();
        attrs.sort_by(|a, b| a.0.cmp(b.0));
        for (name, value) in attrs {
            self.set_attribute(id, name, value)?;
        }
        Ok(())
    }

    fn import_children(&mut self, parent: NodeId, el: ElementRef<'_>) -> Result<()> {
        for child in el.children() {
            match child.value() {
                HtmlNode::Element(e) => {
                    let id = self.create_element(e.name());
                    self.append_child(parent, id)?;
                    if let Some(child_el) = ElementRef::wrap(child) {
                        self.import_attrs(id, child_el)?;
                        self.import_children(id, child_el)?;
                    }
                }
                HtmlNode::Text(t) => {
                    let text: &str = t;
                    let id = self.create_text(text);
                    self.append_child(parent, id)?;
                }
                _ => {}
            }
        }
        Ok(())
    }

    fn alloc(&mut self, kind: NodeKind) -> NodeId {
        let node = Node {
            kind,
            parent: None,
            children: Vec::new(),
        };
        match self.free.pop() {
            Some(index) => {
                let slot = &mut self.slots[index];
                slot.node = Some(node);
                NodeId {
                    index,
                    generation: slot.generation,
                }
            }
            None => {
                self.slots.push(Slot {
                    generation: 0,
                    node: Some(node),
                });
                NodeId {
                    index: self.slots.len() - 1,
                    generation: 0,
                }
            }
        }
    }

    fn node(&self, id: NodeId) -> Result<&Node> {
        self.slots
            .get(id.index)
            .filter(|s| s.generation == id.generation)
            .and_then(|s| s.node.as_ref())
            .ok_or(Error::InvalidNode(id.index))
    }

    fn node_mut(&mut self, id: NodeId) -> Result<&mut Node> {
        self.slots
            .get_mut(id.index)
            .filter(|s| s.generation == id.generation)
            .and_then(|s| s.node.as_mut())
            .ok_or(Error::InvalidNode(id.index))
    }

    /// The document element (`<html>`)
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Number of live nodes in the arena
    pub fn node_count(&self) -> usize {
        self.slots.len() - self.free.len()
    }

    /// Whether `id` still refers to a live node of this document
    pub fn contains(&self, id: NodeId) -> bool {
        self.node(id).is_ok()
    }

    pub fn kind(&self, id: NodeId) -> Result<&NodeKind> {
        Ok(&self.node(id)?.kind)
    }

    /// Element data of `id`; text nodes are rejected
    pub fn element(&self, id: NodeId) -> Result<&ElementData> {
        match &self.node(id)?.kind {
            NodeKind::Element(e) => Ok(e),
            NodeKind::Text(_) => Err(Error::InvalidNode(id.index)),
        }
    }

    pub fn children(&self, id: NodeId) -> Result<&[NodeId]> {
        Ok(&self.node(id)?.children)
    }

    pub fn parent(&self, id: NodeId) -> Result<Option<NodeId>> {
        Ok(self.node(id)?.parent)
    }

    /// Element children of `id`, skipping text nodes
    pub fn child_elements(&self, id: NodeId) -> Result<Vec<NodeId>> {
        Ok(self
            .children(id)?
            .iter()
            .copied()
            .filter(|c| matches!(self.kind(*c), Ok(NodeKind::Element(_))))
            .collect())
    }

    /// Depth-first, document-order walk of the subtree rooted at `id`
    fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = vec![id];
        while let Some(cur) = stack.pop() {
            if let Ok(node) = self.node(cur) {
                out.push(cur);
                stack.extend(node.children.iter().rev().copied());
            }
        }
        out
    }

    /// First element in document order whose `id` attribute equals `id`
    pub fn get_element_by_id(&self, id: &str) -> Option<NodeId> {
        self.descendants(self.root).into_iter().find(|n| {
            self.element(*n)
                .map(|e| e.attr("id") == Some(id))
                .unwrap_or(false)
        })
    }

    /// First element with the given tag name
    pub fn first_element_by_tag(&self, tag: &str) -> Option<NodeId> {
        self.descendants(self.root).into_iter().find(|n| {
            self.element(*n)
                .map(|e| e.tag.eq_ignore_ascii_case(tag))
                .unwrap_or(false)
        })
    }

    /// All elements under `scope` (inclusive) carrying `class`
    pub fn elements_by_class(&self, scope: NodeId, class: &str) -> Vec<NodeId> {
        self.descendants(scope)
            .into_iter()
            .filter(|n| {
                self.element(*n)
                    .map(|e| e.classes().any(|c| c == class))
                    .unwrap_or(false)
            })
            .collect()
    }

    /// Create a detached element
    pub fn create_element(&mut self, tag: &str) -> NodeId {
        self.alloc(NodeKind::Element(ElementData::new(tag)))
    }

    /// Create a detached text node
    pub fn create_text(&mut self, text: &str) -> NodeId {
        self.alloc(NodeKind::Text(text.to_string()))
    }

    pub fn set_attribute(&mut self, id: NodeId, name: &str, value: &str) -> Result<()> {
        match &mut self.node_mut(id)?.kind {
            NodeKind::Element(e) => {
                e.set_attr(&name.to_ascii_lowercase(), value);
                Ok(())
            }
            NodeKind::Text(_) => Err(Error::InvalidNode(id.index)),
        }
    }

    /// Append `child` as the last child of `parent`, detaching it from any
    /// previous parent first.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> Result<()> {
        self.element(parent)?;
        self.node(child)?;

        let mut cur = Some(parent);
        while let Some(ancestor) = cur {
            if ancestor == child {
                return Err(Error::InvalidNode(child.index));
            }
            cur = self.node(ancestor)?.parent;
        }

        if let Some(old) = self.node(child)?.parent {
            self.node_mut(old)?.children.retain(|c| *c != child);
        }
        self.node_mut(child)?.parent = Some(parent);
        self.node_mut(parent)?.children.push(child);
        Ok(())
    }

    /// Detach `id` from its parent and free its whole subtree
    pub fn remove(&mut self, id: NodeId) -> Result<()> {
        if id == self.root {
            return Err(Error::InvalidNode(id.index));
        }
        if let Some(parent) = self.node(id)?.parent {
            self.node_mut(parent)?.children.retain(|c| *c != id);
        }
        self.release(id);
        Ok(())
    }

    /// Free every descendant of `id`, leaving it empty
    pub fn clear_children(&mut self, id: NodeId) -> Result<()> {
        let children = std::mem::take(&mut self.node_mut(id)?.children);
        for child in children {
            self.release(child);
        }
        Ok(())
    }

    fn release(&mut self, id: NodeId) {
        for n in self.descendants(id) {
            let slot = &mut self.slots[n.index];
            slot.node = None;
            slot.generation = slot.generation.wrapping_add(1);
            self.free.push(n.index);
        }
    }

    /// Replace all children of `id` with a single literal text node
    pub fn set_text_content(&mut self, id: NodeId, text: &str) -> Result<()> {
        self.element(id)?;
        self.clear_children(id)?;
        if !text.is_empty() {
            let t = self.create_text(text);
            self.append_child(id, t)?;
        }
        Ok(())
    }

    /// Concatenated text of all text descendants of `id`
    pub fn text_content(&self, id: NodeId) -> Result<String> {
        self.node(id)?;
        let mut out = String::new();
        for n in self.descendants(id) {
            if let Ok(NodeKind::Text(t)) = self.kind(n) {
                out.push_str(t);
            }
        }
        Ok(out)
    }

    /// Serialize the document to HTML
    pub fn to_html(&self) -> String {
        let mut out = String::new();
        if let Some(name) = &self.doctype {
            out.push_str("<!DOCTYPE ");
            out.push_str(name);
            out.push_str(">\n");
        }
        self.write_node(self.root, false, &mut out);
        out
    }

    /// Serialize only the children of `id`
    pub fn inner_html(&self, id: NodeId) -> Result<String> {
        let raw = RAW_TEXT_ELEMENTS.contains(&self.element(id)?.tag.as_str());
        let mut out = String::new();
        for child in self.children(id)? {
            self.write_node(*child, raw, &mut out);
        }
        Ok(out)
    }

    fn write_node(&self, id: NodeId, raw_text: bool, out: &mut String) {
        let node = match self.node(id) {
            Ok(n) => n,
            Err(_) => return,
        };
        match &node.kind {
            NodeKind::Text(t) if raw_text => out.push_str(t),
            NodeKind::Text(t) => out.push_str(&escape_text(t)),
            NodeKind::Element(e) => {
                out.push('<');
                out.push_str(&e.tag);
                for (name, value) in &e.attrs {
                    out.push(' ');
                    out.push_str(name);
                    out.push_str("=\"");
                    out.push_str(&escape_attr(value));
                    out.push('"');
                }
                out.push('>');
                if VOID_ELEMENTS.contains(&e.tag.as_str()) {
                    return;
                }
                let raw = RAW_TEXT_ELEMENTS.contains(&e.tag.as_str());
                for child in &node.children {
                    self.write_node(*child, raw, out);
                }
                out.push_str("</");
                out.push_str(&e.tag);
                out.push('>');
            }
        }
    }

    /// Hex SHA-256 of the serialized document
    pub fn digest(&self) -> String {
        hex::encode(Sha256::digest(self.to_html().as_bytes()))
    }

    /// Title plus visible body text, one line per block element
    pub fn text_snapshot(&self) -> TextSnapshot {
        let title = self
            .first_element_by_tag("title")
            .and_then(|t| self.text_content(t).ok())
            .map(|t| t.trim().to_string())
            .unwrap_or_default();

        let mut raw = String::new();
        if let Some(body) = self.first_element_by_tag("body") {
            self.collect_block_text(body, &mut raw);
        }
        let text = raw
            .lines()
            .map(|l| l.split_whitespace().collect::<Vec<_>>().join(" "))
            .filter(|l| !l.is_empty())
            .collect::<Vec<_>>()
            .join("\n");

        TextSnapshot { title, text }
    }

    fn collect_block_text(&self, id: NodeId, out: &mut String) {
        let node = match self.node(id) {
            Ok(n) => n,
            Err(_) => return,
        };
        match &node.kind {
            NodeKind::Text(t) => out.push_str(t),
            NodeKind::Element(e) => {
                if HIDDEN_TEXT_ELEMENTS.contains(&e.tag.as_str()) {
                    return;
                }
                let block = BLOCK_ELEMENTS.contains(&e.tag.as_str());
                if block {
                    out.push('\n');
                }
                for child in &node.children {
                    self.collect_block_text(*child, out);
                }
                if block {
                    out.push('\n');
                }
            }
        }
    }
}

/// Escape text for use between tags
pub fn escape_text(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '\u{a0}' => out.push_str("&nbsp;"),
            _ => out.push(c),
        }
    }
    out
}

/// Escape text for use inside a double-quoted attribute value
pub fn escape_attr(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '\u{a0}' => out.push_str("&nbsp;"),
            _ => out.push(c),
        }
    }
    out
}
