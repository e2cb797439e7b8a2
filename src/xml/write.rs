//! Serializer for the element tree.

use std::io::Write;

use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;

use crate::element::{Element, ElementNode};
use crate::errors::ArbResult;

pub(super) fn write_node(node: &ElementNode, out: &mut impl Write) -> ArbResult<()> {
    let mut writer = Writer::new(out);
    write_element(&mut writer, node)
}

fn write_element<W: Write>(writer: &mut Writer<W>, node: &ElementNode) -> ArbResult<()> {
    let mut start = BytesStart::new(node.name());
    for (name, value) in node.attribs() {
        start.push_attribute((name, value));
    }
    if node.element_count() == 0 {
        writer.write_event(Event::Empty(start))?;
        return Ok(());
    }
    writer.write_event(Event::Start(start))?;
    for child in node.elements() {
        match child {
            Element::Node(n) => write_element(writer, n)?,
            Element::Text(t) => writer.write_event(Event::Text(BytesText::new(&t.value)))?,
        }
    }
    writer.write_event(Event::End(BytesEnd::new(node.name())))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_elements_self_close() {
        let node = ElementNode::new("Empty");
        let mut buf = Vec::new();
        write_node(&node, &mut buf).unwrap();
        assert_eq!(String::from_utf8(buf).unwrap(), "<Empty/>");
    }

    #[test]
    fn attributes_and_text_are_escaped() {
        let mut node = ElementNode::new("N");
        node.add_attrib("a", "x<y>\"z\"&w");
        node.set_value("1 < 2 & 3");
        let mut buf = Vec::new();
        write_node(&node, &mut buf).unwrap();
        assert_eq!(
            String::from_utf8(buf).unwrap(),
            "<N a=\"x&lt;y&gt;&quot;z&quot;&amp;w\">1 &lt; 2 &amp; 3</N>"
        );
    }
}
