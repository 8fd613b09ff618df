//! Ordered XML element tree
//!
//! An [`XmlElement`] is a shared handle. A parent owns its children through its
//! child list; each child points back at its parent with a weak reference, so a
//! tree never forms an ownership cycle and a node can only ever have one parent.

use std::fmt;
use std::sync::{Arc, Weak};

use indexmap::IndexMap;
use parking_lot::{RwLock, RwLockReadGuard};

use crate::error::{ParseError, ParseErrorKind, Result};
use crate::formatter::XmlFormatter;
use crate::parser::XmlParser;

/// Tag given to elements created without one
pub const DEFAULT_TAG: &str = "unnamed";

pub(crate) struct ElementData {
    pub(crate) tag: String,
    pub(crate) attributes: IndexMap<String, String>,
    pub(crate) contents: String,
    pub(crate) children: Vec<XmlElement>,
    parent: Weak<RwLock<ElementData>>,
}

// Subtrees are torn down from a work list so dropping a deep tree never
// recurses once per level
impl Drop for ElementData {
    fn drop(&mut self) {
        let mut pending = std::mem::take(&mut self.children);
        while let Some(child) = pending.pop() {
            if let Some(lock) = Arc::into_inner(child.0) {
                let mut data = lock.into_inner();
                pending.append(&mut data.children);
            }
        }
    }
}

#[derive(Clone)]
pub struct XmlElement(Arc<RwLock<ElementData>>);

impl Default for XmlElement {
    fn default() -> Self {
        Self::new(DEFAULT_TAG)
    }
}

impl XmlElement {
    pub fn new(tag: impl Into<String>) -> Self {
        Self::with_contents(tag, String::new())
    }

    pub fn with_contents(tag: impl Into<String>, contents: impl Into<String>) -> Self {
        Self(Arc::new(RwLock::new(ElementData {
            tag: tag.into(),
            attributes: IndexMap::new(),
            contents: contents.into(),
            children: Vec::new(),
            parent: Weak::new(),
        })))
    }

    /// Create an element and append it to `parent` in one step
    pub fn new_child(
        parent: &Self,
        tag: impl Into<String>,
        contents: impl Into<String>,
    ) -> Self {
        let child = Self::with_contents(tag, contents);
        child.0.write().parent = Arc::downgrade(&parent.0);
        parent.0.write().children.push(child.clone());
        child
    }

    pub(crate) fn read(&self) -> RwLockReadGuard<'_, ElementData> {
        self.0.read()
    }

    /// True when both handles refer to the same node
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    pub fn tag(&self) -> String {
        self.0.read().tag.clone()
    }

    pub fn set_tag(&self, tag: impl Into<String>) {
        self.0.write().tag = tag.into();
    }

    pub fn attribute(&self, key: &str) -> Option<String> {
        self.0.read().attributes.get(key).cloned()
    }

    /// Insert or overwrite an attribute. A new key goes to the end; an existing
    /// key keeps its position.
    pub fn set_attribute(&self, key: impl Into<String>, value: impl Into<String>) {
        self.0.write().attributes.insert(key.into(), value.into());
    }

    pub fn remove_attribute(&self, key: &str) -> Option<String> {
        self.0.write().attributes.shift_remove(key)
    }

    pub fn attributes(&self) -> IndexMap<String, String> {
        self.0.read().attributes.clone()
    }

    pub fn contents(&self) -> String {
        self.0.read().contents.clone()
    }

    pub fn set_contents(&self, contents: impl Into<String>) {
        self.0.write().contents = contents.into();
    }

    pub fn children(&self) -> Vec<Self> {
        self.0.read().children.clone()
    }

    pub fn child_count(&self) -> usize {
        self.0.read().children.len()
    }

    pub fn parent(&self) -> Option<Self> {
        self.0.read().parent.upgrade().map(Self)
    }

    /// Append `child`, detaching it from its previous parent first.
    ///
    /// Fails with `CyclicAttachment` if `child` is this node or one of its ancestors.
    pub fn add_child(&self, child: &Self) -> Result<()> {
        if self.all_parents().iter().any(|node| node.ptr_eq(child)) {
            return Err(ParseError::new(ParseErrorKind::CyclicAttachment(
                child.tag(),
            )));
        }
        if let Some(previous) = child.parent() {
            previous.remove_child(child);
        }
        child.0.write().parent = Arc::downgrade(&self.0);
        self.0.write().children.push(child.clone());
        Ok(())
    }

    /// Detach `child`; returns false if it was not a child of this node
    pub fn remove_child(&self, child: &Self) -> bool {
        let removed = {
            let mut data = self.0.write();
            let before = data.children.len();
            data.children.retain(|node| !node.ptr_eq(child));
            data.children.len() != before
        };
        if removed {
            child.0.write().parent = Weak::new();
        }
        removed
    }

    pub fn child_named(&self, tag: &str) -> Option<Self> {
        self.0
            .read()
            .children
            .iter()
            .find(|child| child.read().tag == tag)
            .cloned()
    }

    pub fn children_named(&self, tag: &str) -> Vec<Self> {
        self.0
            .read()
            .children
            .iter()
            .filter(|child| child.read().tag == tag)
            .cloned()
            .collect()
    }

    /// Like [`XmlElement::child_named`], but a missing child is an error
    pub fn require(&self, tag: &str) -> Result<Self> {
        self.child_named(tag)
            .ok_or_else(|| ParseError::new(ParseErrorKind::MissingElement(tag.to_string())))
    }

    pub fn require_or(&self, tag: &str, fallback: Self) -> Self {
        self.child_named(tag).unwrap_or(fallback)
    }

    pub fn require_or_else<F>(&self, tag: &str, fallback: F) -> Self
    where
        F: FnOnce() -> Self,
    {
        self.child_named(tag).unwrap_or_else(fallback)
    }

    /// Nearest node with `tag`, starting at this node and walking up
    pub fn parent_named(&self, tag: &str) -> Option<Self> {
        self.all_parents()
            .into_iter()
            .find(|node| node.read().tag == tag)
    }

    pub fn root(&self) -> Self {
        let mut current = self.clone();
        while let Some(parent) = current.parent() {
            current = parent;
        }
        current
    }

    /// This node followed by its ancestors, nearest first
    pub fn all_parents(&self) -> Vec<Self> {
        let mut result = Vec::new();
        let mut current = Some(self.clone());
        while let Some(node) = current {
            current = node.parent();
            result.push(node);
        }
        result
    }

    /// This node and every descendant, in document order
    pub fn all_children(&self) -> Vec<Self> {
        let mut result = Vec::new();
        let mut pending = vec![self.clone()];
        while let Some(node) = pending.pop() {
            pending.extend(node.read().children.iter().rev().cloned());
            result.push(node);
        }
        result
    }

    /// Parse `text` into this node, replacing its tag and contents and
    /// appending parsed children
    pub fn parse_string(&self, text: &str) -> Result<()> {
        XmlParser::new(text).parse_into(self)
    }

    pub fn to_xml_string(&self, formatted: bool) -> String {
        XmlFormatter::serialize(self, formatted)
    }
}

/// `{}` writes compact XML, `{:#}` the indented form
impl fmt::Display for XmlElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_xml_string(f.alternate()))
    }
}

impl fmt::Debug for XmlElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let data = self.read();
        f.debug_struct("XmlElement")
            .field("tag", &data.tag)
            .field("attributes", &data.attributes)
            .field("contents", &data.contents)
            .field("children", &data.children.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> XmlElement {
        let project = XmlElement::new("project");
        let stage = XmlElement::new_child(&project, "stage", "");
        XmlElement::new_child(&stage, "sprite", "");
        XmlElement::new_child(&stage, "sprite", "");
        XmlElement::new_child(&project, "notes", "hello");
        project
    }

    #[test]
    fn test_default_tag() {
        let node = XmlElement::default();
        assert_eq!(node.tag(), "unnamed");
        assert!(node.attributes().is_empty());
        assert_eq!(node.contents(), "");
        assert_eq!(node.child_count(), 0);
        assert!(node.parent().is_none());
    }

    #[test]
    fn test_new_child_links_parent() {
        let parent = XmlElement::new("a");
        let child = XmlElement::new_child(&parent, "b", "text");
        assert_eq!(parent.child_count(), 1);
        assert!(child.parent().is_some_and(|p| p.ptr_eq(&parent)));
        assert_eq!(child.contents(), "text");
    }

    #[test]
    fn test_child_lookup() {
        let project = sample();
        let stage = project.child_named("stage");
        assert!(stage.is_some());
        assert!(project.child_named("sprite").is_none());
        let sprites = stage.map(|s| s.children_named("sprite")).unwrap_or_default();
        assert_eq!(sprites.len(), 2);
    }

    #[test]
    fn test_require() {
        let project = sample();
        assert!(project.require("notes").is_ok());
        let err = project.require("media").err();
        assert_eq!(
            err.map(|e| e.kind().clone()),
            Some(ParseErrorKind::MissingElement("media".to_string()))
        );
        let fallback = project.require_or("media", XmlElement::new("media"));
        assert_eq!(fallback.tag(), "media");
        let lazy = project.require_or_else("media", || XmlElement::new("generated"));
        assert_eq!(lazy.tag(), "generated");
        assert_eq!(project.require_or("notes", XmlElement::default()).tag(), "notes");
    }

    #[test]
    fn test_parent_named_includes_self() {
        let project = sample();
        let sprite = project
            .child_named("stage")
            .and_then(|s| s.child_named("sprite"));
        let found = sprite.as_ref().and_then(|s| s.parent_named("project"));
        assert!(found.is_some_and(|p| p.ptr_eq(&project)));
        let same = sprite.as_ref().and_then(|s| s.parent_named("sprite"));
        assert!(same.zip(sprite).is_some_and(|(a, b)| a.ptr_eq(&b)));
        assert!(project.parent_named("missing").is_none());
    }

    #[test]
    fn test_add_child_moves_between_parents() {
        let first = XmlElement::new("first");
        let second = XmlElement::new("second");
        let child = XmlElement::new_child(&first, "child", "");
        assert!(second.add_child(&child).is_ok());
        assert_eq!(first.child_count(), 0);
        assert_eq!(second.child_count(), 1);
        assert!(child.parent().is_some_and(|p| p.ptr_eq(&second)));
    }

    #[test]
    fn test_add_child_rejects_cycles() {
        let project = sample();
        let stage = project.child_named("stage").unwrap_or_default();
        assert!(stage.add_child(&project).is_err());
        assert!(project.add_child(&project).is_err());
        assert_eq!(project.child_count(), 2);
    }

    #[test]
    fn test_remove_child() {
        let project = sample();
        let notes = project.child_named("notes").unwrap_or_default();
        assert!(project.remove_child(&notes));
        assert!(notes.parent().is_none());
        assert!(!project.remove_child(&notes));
        assert_eq!(project.child_count(), 1);
    }

    #[test]
    fn test_root_and_traversal() {
        let project = sample();
        let all = project.all_children();
        let tags: Vec<String> = all.iter().map(XmlElement::tag).collect();
        assert_eq!(tags, ["project", "stage", "sprite", "sprite", "notes"]);
        let sprite = all.get(2).cloned().unwrap_or_default();
        assert!(sprite.root().ptr_eq(&project));
        let chain: Vec<String> = sprite.all_parents().iter().map(XmlElement::tag).collect();
        assert_eq!(chain, ["sprite", "stage", "project"]);
    }

    #[test]
    fn test_attribute_order_survives_updates() {
        let node = XmlElement::new("a");
        node.set_attribute("a", "1");
        node.set_attribute("b", "2");
        node.set_attribute("c", "3");
        node.set_attribute("a", "changed");
        node.set_contents("x");
        let keys: Vec<String> = node.attributes().keys().cloned().collect();
        assert_eq!(keys, ["a", "b", "c"]);
        assert_eq!(node.remove_attribute("b"), Some("2".to_string()));
        let keys: Vec<String> = node.attributes().keys().cloned().collect();
        assert_eq!(keys, ["a", "c"]);
    }

    #[test]
    fn test_deep_tree_without_recursion() {
        const DEPTH: usize = 200_000;
        let root = XmlElement::new("n");
        let mut current = root.clone();
        for _ in 1..DEPTH {
            current = XmlElement::new_child(&current, "n", "");
        }
        assert_eq!(root.all_children().len(), DEPTH);
        assert!(current.root().ptr_eq(&root));
        assert_eq!(root.to_string().len(), 7 * (DEPTH - 1) + 4);
        assert!(format!("{root:?}").contains("children: 1"));
        drop(current);
        drop(root);
    }

    #[test]
    fn test_dropping_root_releases_tree() {
        let project = sample();
        let stage = project.child_named("stage").unwrap_or_default();
        drop(project);
        assert!(stage.parent().is_none());
    }
}
