//! The view handle projection routines write through.
//!
//! Renderers never reach for a global document: every routine receives a
//! `&mut dyn View`, which lets tests drive them against a fresh headless
//! [`Document`] (or any other tree that implements this trait).

use crate::dom::{Document, NodeId};
use crate::{Error, Result};

/// Minimal mutable tree API needed to project résumé data
pub trait View {
    /// Resolve a mount point by its element id. A missing id is an error.
    fn mount_point(&self, id: &str) -> Result<NodeId>;

    /// Create a detached element
    fn create_element(&mut self, tag: &str) -> NodeId;

    fn set_attribute(&mut self, node: NodeId, name: &str, value: &str) -> Result<()>;

    fn append_child(&mut self, parent: NodeId, child: NodeId) -> Result<()>;

    /// Remove (and release) everything below `node`
    fn clear_children(&mut self, node: NodeId) -> Result<()>;

    /// Replace the children of `node` with literal text
    fn set_text_content(&mut self, node: NodeId, text: &str) -> Result<()>;

    // --- Convenience helpers (default implementations) ---

    /// Create `<tag class="..">`, optionally filled with literal text
    fn create_with_class(&mut self, tag: &str, class: &str, text: Option<&str>) -> Result<NodeId> {
        let node = self.create_element(tag);
        if !class.is_empty() {
            self.set_attribute(node, "class", class)?;
        }
        if let Some(text) = text {
            self.set_text_content(node, text)?;
        }
        Ok(node)
    }

    /// Resolve a mount point and empty it, ready for fresh content
    fn claim_region(&mut self, id: &str) -> Result<NodeId> {
        let region = self.mount_point(id)?;
        self.clear_children(region)?;
        Ok(region)
    }
}

impl View for Document {
    fn mount_point(&self, id: &str) -> Result<NodeId> {
        self.get_element_by_id(id)
            .ok_or_else(|| Error::MissingMountPoint(id.to_string()))
    }

    fn create_element(&mut self, tag: &str) -> NodeId {
        Document::create_element(self, tag)
    }

    fn set_attribute(&mut self, node: NodeId, name: &str, value: &str) -> Result<()> {
        Document::set_attribute(self, node, name, value)
    }

    fn append_child(&mut self, parent: NodeId, child: NodeId) -> Result<()> {
        Document::append_child(self, parent, child)
    }

    fn clear_children(&mut self, node: NodeId) -> Result<()> {
        Document::clear_children(self, node)
    }

    fn set_text_content(&mut self, node: NodeId, text: &str) -> Result<()> {
        Document::set_text_content(self, node, text)
    }
}
