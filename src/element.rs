//! Generic ordered XML tree.
//!
//! `ElementNode` is a named node with ordered attributes and an ordered
//! sequence of children that may mix sub-elements and text fragments.
//! Entity loaders read typed attributes through the tri-state [`Lookup`]
//! so that "absent" and "present but unparsable" stay distinguishable.

use crate::date::ArbDate;
use crate::types::{arb_double, ArbVersion, Lookup};

/// A child of an [`ElementNode`]: either a nested node or a text run.
#[derive(Debug, Clone, PartialEq)]
pub enum Element {
    Node(ElementNode),
    Text(ElementText),
}

impl Element {
    pub fn as_node(&self) -> Option<&ElementNode> {
        match self {
            Element::Node(n) => Some(n),
            Element::Text(_) => None,
        }
    }

    pub fn as_node_mut(&mut self) -> Option<&mut ElementNode> {
        match self {
            Element::Node(n) => Some(n),
            Element::Text(_) => None,
        }
    }

    pub fn as_text(&self) -> Option<&ElementText> {
        match self {
            Element::Node(_) => None,
            Element::Text(t) => Some(t),
        }
    }
}

/// A text fragment child.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ElementText {
    pub value: String,
}

/// Attribute values that can be parsed out of a node.
pub trait AttribValue: Sized {
    fn parse_attrib(raw: &str) -> Option<Self>;
}

impl AttribValue for String {
    fn parse_attrib(raw: &str) -> Option<Self> {
        Some(raw.to_string())
    }
}

impl AttribValue for bool {
    fn parse_attrib(raw: &str) -> Option<Self> {
        match raw {
            "y" => Some(true),
            "n" => Some(false),
            _ => None,
        }
    }
}

macro_rules! numeric_attrib {
    ($($ty:ty),*) => {
        $(impl AttribValue for $ty {
            fn parse_attrib(raw: &str) -> Option<Self> {
                raw.trim().parse().ok()
            }
        })*
    };
}
numeric_attrib!(i16, i32, u16, u32, f64);

impl AttribValue for ArbVersion {
    fn parse_attrib(raw: &str) -> Option<Self> {
        raw.parse().ok()
    }
}

impl AttribValue for ArbDate {
    fn parse_attrib(raw: &str) -> Option<Self> {
        let d = ArbDate::parse_iso(raw);
        if d.is_valid() {
            Some(d)
        } else {
            None
        }
    }
}

/// A named node with ordered, unique-keyed attributes and ordered children.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ElementNode {
    name: String,
    attribs: Vec<(String, String)>,
    elements: Vec<Element>,
}

impl ElementNode {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attribs: Vec::new(),
            elements: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// Concatenation of all text children.
    pub fn value(&self) -> String {
        self.elements
            .iter()
            .filter_map(|e| e.as_text())
            .map(|t| t.value.as_str())
            .collect()
    }

    /// Replace all children with a single text fragment. An empty value
    /// just clears the children.
    pub fn set_value(&mut self, value: impl Into<String>) {
        self.elements.clear();
        let value = value.into();
        if !value.is_empty() {
            self.elements.push(Element::Text(ElementText { value }));
        }
    }

    // ---- attributes ----

    pub fn attrib_count(&self) -> usize {
        self.attribs.len()
    }

    pub fn attribs(&self) -> impl Iterator<Item = (&str, &str)> {
        self.attribs.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn raw_attrib(&self, name: &str) -> Option<&str> {
        self.attribs
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// Typed lookup: `NotFound` when absent, `Invalid` when present but
    /// unparsable as `T`.
    pub fn attrib<T: AttribValue>(&self, name: &str) -> Lookup<T> {
        match self.raw_attrib(name) {
            None => Lookup::NotFound,
            Some(raw) => match T::parse_attrib(raw) {
                Some(v) => Lookup::Found(v),
                None => Lookup::Invalid,
            },
        }
    }

    /// Required attribute: absent or unparsable is a load error.
    pub fn req_attrib<T: AttribValue>(&self, name: &str) -> crate::errors::ArbResult<T> {
        match self.attrib::<T>(name) {
            Lookup::Found(v) => Ok(v),
            Lookup::NotFound => Err(crate::errors::ArbError::missing(self.name(), name)),
            Lookup::Invalid => Err(crate::errors::ArbError::invalid(
                self.name(),
                name,
                format!("unparsable value '{}'", self.raw_attrib(name).unwrap_or("")),
            )),
        }
    }

    /// Optional attribute: absent keeps `dest`, unparsable is an error.
    pub fn opt_attrib<T: AttribValue>(
        &self,
        name: &str,
        dest: &mut T,
    ) -> crate::errors::ArbResult<()> {
        match self.attrib::<T>(name) {
            Lookup::Found(v) => {
                *dest = v;
                Ok(())
            }
            Lookup::NotFound => Ok(()),
            Lookup::Invalid => Err(crate::errors::ArbError::invalid(
                self.name(),
                name,
                format!("unparsable value '{}'", self.raw_attrib(name).unwrap_or("")),
            )),
        }
    }

    /// Overwrite-or-insert. Returns false only for an empty name.
    pub fn add_attrib(&mut self, name: &str, value: impl Into<String>) -> bool {
        if name.is_empty() {
            return false;
        }
        let value = value.into();
        match self.attribs.iter_mut().find(|(k, _)| k == name) {
            Some((_, v)) => *v = value,
            None => self.attribs.push((name.to_string(), value)),
        }
        true
    }

    pub fn add_attrib_bool(&mut self, name: &str, value: bool) -> bool {
        self.add_attrib(name, if value { "y" } else { "n" })
    }

    pub fn add_attrib_short(&mut self, name: &str, value: i16) -> bool {
        self.add_attrib(name, value.to_string())
    }

    pub fn add_attrib_long(&mut self, name: &str, value: i32) -> bool {
        self.add_attrib(name, value.to_string())
    }

    /// Doubles are written with trailing zeros trimmed; `precision` 2 is
    /// the file-format default.
    pub fn add_attrib_double(&mut self, name: &str, value: f64, precision: usize) -> bool {
        self.add_attrib(name, arb_double::to_string(value, precision))
    }

    pub fn add_attrib_version(&mut self, name: &str, value: ArbVersion) -> bool {
        self.add_attrib(name, value.to_string())
    }

    pub fn add_attrib_date(&mut self, name: &str, value: ArbDate) -> bool {
        self.add_attrib(name, value.iso())
    }

    pub fn remove_attrib(&mut self, name: &str) -> bool {
        let before = self.attribs.len();
        self.attribs.retain(|(k, _)| k != name);
        self.attribs.len() != before
    }

    // ---- children ----

    pub fn element_count(&self) -> usize {
        self.elements.len()
    }

    pub fn elements(&self) -> impl Iterator<Item = &Element> {
        self.elements.iter()
    }

    /// Child nodes only, skipping text fragments.
    pub fn nodes(&self) -> impl Iterator<Item = &ElementNode> {
        self.elements.iter().filter_map(|e| e.as_node())
    }

    pub fn element(&self, index: usize) -> Option<&Element> {
        self.elements.get(index)
    }

    pub fn node_at(&self, index: usize) -> Option<&ElementNode> {
        self.elements.get(index).and_then(|e| e.as_node())
    }

    /// Append a new child node and return it for population.
    pub fn add_element_node(&mut self, name: impl Into<String>) -> &mut ElementNode {
        self.elements.push(Element::Node(ElementNode::new(name)));
        match self.elements.last_mut() {
            Some(Element::Node(n)) => n,
            _ => unreachable!("just pushed a node"),
        }
    }

    /// Insert a child node at `index`, appending when out of range.
    pub fn insert_element_node(&mut self, name: impl Into<String>, index: usize) -> &mut ElementNode {
        let at = index.min(self.elements.len());
        self.elements.insert(at, Element::Node(ElementNode::new(name)));
        match &mut self.elements[at] {
            Element::Node(n) => n,
            _ => unreachable!("just inserted a node"),
        }
    }

    pub fn add_element_text(&mut self, value: impl Into<String>) {
        self.elements.push(Element::Text(ElementText {
            value: value.into(),
        }));
    }

    pub fn push_element(&mut self, element: Element) {
        self.elements.push(element);
    }

    pub fn remove_element(&mut self, index: usize) -> Option<Element> {
        if index < self.elements.len() {
            Some(self.elements.remove(index))
        } else {
            None
        }
    }

    pub fn remove_all_elements(&mut self, name: &str) -> usize {
        let before = self.elements.len();
        self.elements
            .retain(|e| e.as_node().map(|n| n.name() != name).unwrap_or(true));
        before - self.elements.len()
    }

    /// First child node named `name`, scanning from `start`.
    pub fn find_element(&self, name: &str, start: usize) -> Option<usize> {
        self.elements
            .iter()
            .enumerate()
            .skip(start)
            .find(|(_, e)| e.as_node().map(|n| n.name() == name).unwrap_or(false))
            .map(|(i, _)| i)
    }

    pub fn find_element_node(&self, name: &str) -> Option<&ElementNode> {
        self.find_element(name, 0).and_then(|i| self.node_at(i))
    }

    /// Depth-first pre-order search for a node named `name` (optionally
    /// with an exact value). Returns the matched node's parent and its
    /// child index so callers can continue scanning siblings.
    pub fn find_element_deep(
        &self,
        name: &str,
        value: Option<&str>,
    ) -> Option<(&ElementNode, usize)> {
        for (i, e) in self.elements.iter().enumerate() {
            if let Element::Node(n) = e {
                if n.name() == name && value.map(|v| n.value() == v).unwrap_or(true) {
                    return Some((self, i));
                }
            }
        }
        for e in &self.elements {
            if let Element::Node(n) = e {
                if let Some(found) = n.find_element_deep(name, value) {
                    return Some(found);
                }
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> ElementNode {
        let mut root = ElementNode::new("Root");
        root.add_attrib("a", "1");
        let child = root.add_element_node("Child");
        child.add_attrib("b", "two");
        let grand = child.add_element_node("Leaf");
        grand.set_value("payload");
        root.add_element_node("Child");
        root
    }

    #[test]
    fn attrib_lookup_is_tri_state() {
        let mut n = ElementNode::new("N");
        n.add_attrib("flag", "y");
        n.add_attrib("count", "oops");
        assert_eq!(n.attrib::<bool>("flag"), Lookup::Found(true));
        assert_eq!(n.attrib::<bool>("missing"), Lookup::NotFound);
        assert_eq!(n.attrib::<i16>("count"), Lookup::Invalid);
    }

    #[test]
    fn add_attrib_overwrites_in_place() {
        let mut n = ElementNode::new("N");
        assert!(n.add_attrib("k", "1"));
        assert!(n.add_attrib("k", "2"));
        assert_eq!(n.attrib_count(), 1);
        assert_eq!(n.raw_attrib("k"), Some("2"));
        assert!(!n.add_attrib("", "x"));
    }

    #[test]
    fn set_value_replaces_text_children() {
        let mut n = ElementNode::new("N");
        n.add_element_text("a");
        n.add_element_text("b");
        assert_eq!(n.value(), "ab");
        n.set_value("c");
        assert_eq!(n.value(), "c");
        assert_eq!(n.element_count(), 1);
    }

    #[test]
    fn find_element_scans_from_start() {
        let root = sample();
        assert_eq!(root.find_element("Child", 0), Some(0));
        assert_eq!(root.find_element("Child", 1), Some(1));
        assert_eq!(root.find_element("Child", 2), None);
    }

    #[test]
    fn deep_find_returns_parent_and_index() {
        let root = sample();
        let (parent, idx) = root.find_element_deep("Leaf", None).unwrap();
        assert_eq!(parent.name(), "Child");
        assert_eq!(idx, 0);
        let (parent, idx) = root.find_element_deep("Leaf", Some("payload")).unwrap();
        assert_eq!(parent.node_at(idx).unwrap().value(), "payload");
        assert!(root.find_element_deep("Leaf", Some("nope")).is_none());
    }
}
