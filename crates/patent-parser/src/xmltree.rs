//! A minimal, namespace-agnostic XML tree.
//!
//! PTGRXML grant archives ship with inconsistent namespacing across years and
//! frequently concatenate multiple document roots in one byte stream without
//! a single enclosing root. We build a forest of lightweight nodes (local
//! name only, `text`/`tail` split mirroring `ElementTree`'s `itertext`
//! semantics) rather than a strict single-document DOM, then search the
//! forest for `us-patent-grant` nodes regardless of nesting.

use quick_xml::events::Event;
use quick_xml::reader::Reader;

use crate::error::ParseError;

/// One XML element, local-name only (namespace prefixes are dropped).
#[derive(Debug, Clone, Default)]
pub struct Node {
    pub name: String,
    pub attrs: Vec<(String, String)>,
    /// Text immediately following the open tag, before the first child.
    pub text: String,
    /// Text following this node's close tag, before the next sibling.
    pub tail: String,
    pub children: Vec<Node>,
}

impl Node {
    #[must_use]
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// `ElementTree.itertext()` equivalent: this node's `text`, then each
    /// child's `itertext` followed by that child's `tail`, in document order.
    pub fn itertext(&self, out: &mut String) {
        out.push_str(&self.text);
        for child in &self.children {
            child.itertext(out);
            out.push_str(&child.tail);
        }
    }

    #[must_use]
    pub fn text_joined(&self) -> String {
        let mut out = String::new();
        self.itertext(&mut out);
        out
    }

    /// All descendants (not including self) with local name `name`, in
    /// document order.
    pub fn find_all<'a>(&'a self, name: &str, out: &mut Vec<&'a Node>) {
        for child in &self.children {
            if child.name == name {
                out.push(child);
            }
            child.find_all(name, out);
        }
    }

    #[must_use]
    pub fn find_all_vec(&self, name: &str) -> Vec<&Node> {
        let mut out = Vec::new();
        self.find_all(name, &mut out);
        out
    }

    /// First descendant (not including self) with local name `name`.
    #[must_use]
    pub fn find_first(&self, name: &str) -> Option<&Node> {
        for child in &self.children {
            if child.name == name {
                return Some(child);
            }
            if let Some(found) = child.find_first(name) {
                return Some(found);
            }
        }
        None
    }

    /// Text of the first descendant matching a `/`-separated path of local
    /// names, joined via `itertext`, mirroring `Element.findtext`.
    #[must_use]
    pub fn findtext_path(&self, path: &[&str]) -> Option<String> {
        let mut current = self;
        for segment in path {
            current = current.find_first(segment)?;
        }
        Some(current.text_joined())
    }
}

fn local_name(bytes: &[u8]) -> String {
    let qname = quick_xml::name::QName(bytes);
    String::from_utf8_lossy(qname.local_name().as_ref()).into_owned()
}

/// Parse `xml_bytes` into a forest of top-level element trees.
///
/// A well-formed single-root document yields one tree; a byte stream
/// concatenating multiple document roots (common in weekly PTGRXML dumps)
/// yields one tree per root.
pub fn parse_forest(xml_bytes: &[u8]) -> Result<Vec<Node>, ParseError> {
    let mut reader = Reader::from_reader(xml_bytes);
    reader.config_mut().trim_text = false;
    reader.config_mut().check_end_names = false;

    let mut roots: Vec<Node> = Vec::new();
    let mut stack: Vec<Node> = Vec::new();

    loop {
        match reader.read_event() {
            Ok(Event::Eof) => break,
            Ok(Event::Start(e)) => {
                let mut node = Node {
                    name: local_name(e.name().as_ref()),
                    ..Node::default()
                };
                for attr in e.attributes().flatten() {
                    let key = local_name(attr.key.as_ref());
                    let value = attr.unescape_value().unwrap_or_default().into_owned();
                    node.attrs.push((key, value));
                }
                stack.push(node);
            }
            Ok(Event::Empty(e)) => {
                let mut node = Node {
                    name: local_name(e.name().as_ref()),
                    ..Node::default()
                };
                for attr in e.attributes().flatten() {
                    let key = local_name(attr.key.as_ref());
                    let value = attr.unescape_value().unwrap_or_default().into_owned();
                    node.attrs.push((key, value));
                }
                push_finished(&mut stack, &mut roots, node);
            }
            Ok(Event::End(_)) => {
                let Some(node) = stack.pop() else {
                    continue;
                };
                push_finished(&mut stack, &mut roots, node);
            }
            Ok(Event::Text(e)) | Ok(Event::CData(e)) => {
                let text = e.unescape().map(|c| c.into_owned()).unwrap_or_else(|_| {
                    String::from_utf8_lossy(e.as_ref()).into_owned()
                });
                append_text(&mut stack, &text);
            }
            Ok(_) => {}
            Err(err) => return Err(ParseError::Xml(err.to_string())),
        }
    }

    Ok(roots)
}

fn push_finished(stack: &mut Vec<Node>, roots: &mut Vec<Node>, node: Node) {
    match stack.last_mut() {
        Some(parent) => parent.children.push(node),
        None => roots.push(node),
    }
}

fn append_text(stack: &mut [Node], text: &str) {
    let Some(top) = stack.last_mut() else {
        return;
    };
    match top.children.last_mut() {
        Some(last_child) => last_child.tail.push_str(text),
        None => top.text.push_str(text),
    }
}
