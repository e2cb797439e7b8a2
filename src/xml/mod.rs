//! Streaming XML backend for the element tree, built on quick-xml.
//!
//! Output is compact; whitespace between elements is not significant in
//! this format and is not preserved on load.

mod read;
mod write;

use std::io::{Read, Write};
use std::path::Path;

use crate::element::ElementNode;
use crate::errors::{ArbError, ArbResult};

impl ElementNode {
    /// Parse a complete document from a string. Parse failures return
    /// `ArbError::Xml` with a byte-offset message.
    pub fn load_xml_str(data: &str) -> ArbResult<ElementNode> {
        read::parse_document(data)
    }

    pub fn load_xml_reader(reader: &mut impl Read) -> ArbResult<ElementNode> {
        let mut buf = String::new();
        reader.read_to_string(&mut buf)?;
        Self::load_xml_str(&buf)
    }

    pub fn load_xml_file(path: &Path) -> ArbResult<ElementNode> {
        let data = std::fs::read_to_string(path)?;
        Self::load_xml_str(&data)
    }

    /// Serialize this node as a complete document (XML declaration
    /// included).
    pub fn save_xml(&self, writer: &mut impl Write) -> ArbResult<()> {
        writer.write_all(b"<?xml version=\"1.0\" encoding=\"utf-8\"?>\n")?;
        write::write_node(self, writer)?;
        writer.write_all(b"\n")?;
        Ok(())
    }

    pub fn save_xml_string(&self) -> ArbResult<String> {
        let mut out = Vec::new();
        self.save_xml(&mut out)?;
        String::from_utf8(out).map_err(|e| ArbError::Xml(e.to_string()))
    }

    pub fn save_xml_file(&self, path: &Path) -> ArbResult<()> {
        let mut file = std::fs::File::create(path)?;
        self.save_xml(&mut file)
    }
}

#[cfg(test)]
mod tests {
    use crate::element::ElementNode;

    #[test]
    fn document_round_trips_through_string() {
        let mut root = ElementNode::new("Root");
        root.add_attrib("attr", "a \"quoted\" & <angled> value");
        let child = root.add_element_node("Child");
        child.set_value("text with <entities> & such");
        root.add_element_node("Empty");

        let xml = root.save_xml_string().unwrap();
        let parsed = ElementNode::load_xml_str(&xml).unwrap();
        assert_eq!(parsed, root);
    }

    #[test]
    fn malformed_input_is_rejected() {
        let err = ElementNode::load_xml_str("<Root>\n<Child></Mismatch>\n</Root>").unwrap_err();
        assert!(matches!(err, crate::errors::ArbError::Xml(_)));
    }
}
