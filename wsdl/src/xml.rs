//! A small owned, namespace-aware element tree.
//!
//! Element names are resolved to their namespace URI while reading, so
//! queries match on `(namespace, local name)` and never on the prefix a
//! document happened to choose.

use quick_xml::{
    events::{BytesStart, Event},
    Reader,
};
use std::io::BufRead;

use crate::error::Error;

/// A namespace declaration found on some element of the document.
///
/// `prefix` is `None` for a default (`xmlns="..."`) declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Declaration {
    pub prefix: Option<String>,
    pub namespace: String,
}

#[derive(Debug, Clone)]
pub struct Node {
    namespace: Option<String>,
    local_name: String,
    attributes: Vec<(String, String)>,
    children: Vec<Node>,
}

#[derive(Debug, Clone)]
pub struct Document {
    root: Node,
    declarations: Vec<Declaration>,
}

pub struct Descendants<'a> {
    stack: Vec<&'a Node>,
}

fn split_prefixed(qualified: &str) -> (Option<&str>, &str) {
    match qualified.split_once(':') {
        Some((prefix, local)) => (Some(prefix), local),
        None => (None, qualified),
    }
}

impl Document {
    pub fn parse(bytes: &[u8]) -> Result<Self, Error> {
        let mut reader = Reader::from_reader(bytes);
        reader.trim_text(true);
        Self::read(reader)
    }

    #[allow(clippy::should_implement_trait)]
    pub fn from_str(text: &str) -> Result<Self, Error> {
        Self::parse(text.as_bytes())
    }

    fn read<B: BufRead>(mut reader: Reader<B>) -> Result<Self, Error> {
        let mut stack: Vec<Node> = Vec::new();
        let mut root = None;
        let mut declarations = Vec::new();

        let mut buffer = Vec::new();
        let mut namespace_buffer = Vec::new();

        loop {
            let (namespace, event) =
                reader.read_namespaced_event(&mut buffer, &mut namespace_buffer)?;

            match event {
                Event::Start(start) => {
                    let node = Node::from_start(&reader, &start, namespace, &mut declarations)?;
                    stack.push(node);
                }

                Event::Empty(start) => {
                    let node = Node::from_start(&reader, &start, namespace, &mut declarations)?;
                    attach(&mut stack, &mut root, node);
                }

                Event::End(..) => {
                    if let Some(node) = stack.pop() {
                        attach(&mut stack, &mut root, node);
                    }
                }

                Event::Eof => break,

                _ => (),
            }

            buffer.clear();
        }

        let root = root.ok_or(Error::EmptyDocument)?;
        tracing::trace!(
            root = %root.local_name,
            declarations = declarations.len(),
            "read xml document"
        );

        Ok(Self { root, declarations })
    }

    pub fn root(&self) -> &Node {
        &self.root
    }

    /// Every namespace declaration in document order.
    pub fn declarations(&self) -> &[Declaration] {
        &self.declarations
    }
}

fn attach(stack: &mut Vec<Node>, root: &mut Option<Node>, node: Node) {
    match stack.last_mut() {
        Some(parent) => parent.children.push(node),
        None => {
            if root.is_none() {
                *root = Some(node);
            }
        }
    }
}

impl Node {
    fn from_start<B: BufRead>(
        reader: &Reader<B>,
        start: &BytesStart<'_>,
        namespace: Option<&[u8]>,
        declarations: &mut Vec<Declaration>,
    ) -> Result<Self, Error> {
        let local_name = reader.decode(start.local_name())?.to_owned();
        let namespace = match namespace {
            Some(namespace) => Some(reader.decode(namespace)?.to_owned()),
            None => None,
        };

        let mut attributes = Vec::new();
        for attribute in start.attributes() {
            let attribute = attribute?;
            let key = reader.decode(attribute.key)?;
            let value = attribute.unescaped_value()?;
            let value = reader.decode(&value)?.to_owned();

            match split_prefixed(key) {
                (None, "xmlns") => declarations.push(Declaration {
                    prefix: None,
                    namespace: value.clone(),
                }),

                (Some("xmlns"), prefix) => declarations.push(Declaration {
                    prefix: Some(prefix.to_owned()),
                    namespace: value.clone(),
                }),

                _ => (),
            }

            attributes.push((key.to_owned(), value));
        }

        Ok(Self {
            namespace,
            local_name,
            attributes,
            children: Vec::new(),
        })
    }

    pub fn namespace(&self) -> Option<&str> {
        self.namespace.as_deref()
    }

    pub fn local_name(&self) -> &str {
        &self.local_name
    }

    pub fn is(&self, namespace: &str, local_name: &str) -> bool {
        self.local_name == local_name && self.namespace.as_deref() == Some(namespace)
    }

    /// Looks an attribute up by its name as written, e.g. `name` or `xmlns:tns`.
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn children(&self) -> &[Node] {
        &self.children
    }

    pub fn children_named<'a>(
        &'a self,
        namespace: &'a str,
        local_name: &'a str,
    ) -> impl Iterator<Item = &'a Node> + 'a {
        self.children
            .iter()
            .filter(move |child| child.is(namespace, local_name))
    }

    pub fn child(&self, namespace: &str, local_name: &str) -> Option<&Node> {
        self.children
            .iter()
            .find(|child| child.is(namespace, local_name))
    }

    /// All nodes below this one, depth first in document order.
    pub fn descendants(&self) -> Descendants<'_> {
        Descendants {
            stack: self.children.iter().rev().collect(),
        }
    }

    pub fn descendants_named<'a>(
        &'a self,
        namespace: &'a str,
        local_name: &'a str,
    ) -> impl Iterator<Item = &'a Node> + 'a {
        self.descendants()
            .filter(move |node| node.is(namespace, local_name))
    }
}

impl<'a> Iterator for Descendants<'a> {
    type Item = &'a Node;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.stack.extend(node.children.iter().rev());
        Some(node)
    }
}
