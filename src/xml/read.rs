//! Event-stream parser producing an [`ElementNode`] tree.

use quick_xml::escape::unescape;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use crate::element::{Element, ElementNode};
use crate::errors::{ArbError, ArbResult};

fn err_at(reader: &Reader<&[u8]>, msg: impl std::fmt::Display) -> ArbError {
    ArbError::Xml(format!("{} at byte {}", msg, reader.buffer_position()))
}

fn open_node(reader: &Reader<&[u8]>, e: &BytesStart<'_>) -> ArbResult<ElementNode> {
    let qname = e.name();
    let name = std::str::from_utf8(qname.as_ref()).map_err(|err| err_at(reader, err))?;
    let mut node = ElementNode::new(name);
    for a in e.attributes() {
        let a = a.map_err(|err| err_at(reader, err))?;
        let key = std::str::from_utf8(a.key.as_ref()).map_err(|err| err_at(reader, err))?;
        let value = a
            .unescape_value()
            .map_err(|err| err_at(reader, err))?
            .into_owned();
        node.add_attrib(key, value);
    }
    Ok(node)
}

/// A finished element goes into its parent, or becomes the document
/// element when the stack is empty.
fn close_node(
    stack: &mut Vec<ElementNode>,
    root: &mut Option<ElementNode>,
    node: ElementNode,
) -> ArbResult<()> {
    match stack.last_mut() {
        Some(parent) => {
            parent.push_element(Element::Node(node));
            Ok(())
        }
        None if root.is_none() => {
            *root = Some(node);
            Ok(())
        }
        None => Err(ArbError::Xml("multiple document elements".to_string())),
    }
}

pub(super) fn parse_document(data: &str) -> ArbResult<ElementNode> {
    let mut reader = Reader::from_str(data);
    // No global trim_text; indentation-only text nodes are dropped
    // below, everything else is kept exactly.
    let mut stack: Vec<ElementNode> = Vec::new();
    let mut root: Option<ElementNode> = None;
    loop {
        let event = reader.read_event().map_err(|e| err_at(&reader, e))?;
        match event {
            Event::Start(e) => {
                if root.is_some() && stack.is_empty() {
                    return Err(err_at(&reader, "content after document element"));
                }
                stack.push(open_node(&reader, &e)?);
            }
            Event::Empty(e) => {
                if root.is_some() && stack.is_empty() {
                    return Err(err_at(&reader, "content after document element"));
                }
                let node = open_node(&reader, &e)?;
                close_node(&mut stack, &mut root, node)?;
            }
            Event::End(_) => {
                // Name balance is checked by the reader.
                let node = stack
                    .pop()
                    .ok_or_else(|| err_at(&reader, "unexpected close tag"))?;
                close_node(&mut stack, &mut root, node)?;
            }
            Event::Text(t) => {
                let text = reader.decoder().decode(&t).map_err(|e| err_at(&reader, e))?;
                if !text.trim().is_empty() {
                    let text = unescape(&text).map_err(|e| err_at(&reader, e))?;
                    let parent = stack
                        .last_mut()
                        .ok_or_else(|| err_at(&reader, "text outside the document element"))?;
                    parent.add_element_text(text.into_owned());
                }
            }
            Event::CData(c) => {
                let text = c.decode().map_err(|e| err_at(&reader, e))?;
                if !text.trim().is_empty() {
                    let parent = stack
                        .last_mut()
                        .ok_or_else(|| err_at(&reader, "text outside the document element"))?;
                    parent.add_element_text(text.into_owned());
                }
            }
            Event::Decl(_) | Event::Comment(_) | Event::PI(_) | Event::DocType(_) => {}
            Event::Eof => break,
        }
    }
    if !stack.is_empty() {
        return Err(ArbError::Xml("unexpected end of input".to_string()));
    }
    root.ok_or_else(|| ArbError::Xml("no document element".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_attributes_and_nested_text() {
        let root = parse_document(
            "<?xml version=\"1.0\"?>\n<A x=\"1\" y='two'><B>hi &amp; bye</B><C/></A>",
        )
        .unwrap();
        assert_eq!(root.name(), "A");
        assert_eq!(root.raw_attrib("x"), Some("1"));
        assert_eq!(root.raw_attrib("y"), Some("two"));
        assert_eq!(root.find_element_node("B").unwrap().value(), "hi & bye");
        assert!(root.find_element_node("C").is_some());
    }

    #[test]
    fn rejects_mismatched_tags() {
        assert!(parse_document("<A><B></A></B>").is_err());
        assert!(parse_document("<A>").is_err());
        assert!(parse_document("<A/><B/>").is_err());
    }

    #[test]
    fn skips_comments_and_cdata_wraps_text() {
        let root = parse_document("<A><!-- note --><![CDATA[<raw>]]></A>").unwrap();
        assert_eq!(root.value(), "<raw>");
    }
}
