use serde::{Serialize, Serializer};
use std::{collections::BTreeMap, fmt};

/// A `prefix:name` pair as written in the document.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct QName {
    pub prefix: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Element {
    /// `None` when the schema element carries no `type` attribute.
    #[serde(rename = "type", serialize_with = "serialize_reference")]
    pub referenced_type: Option<QName>,
    pub singular: bool,
}

/// A named schema `element` or `complexType`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Type {
    pub name: String,
    pub prefix: String,
    pub target_namespace: String,
    pub elements: BTreeMap<String, Element>,
}

/// A WSDL message, reduced to the element reference of its first part.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Message {
    pub name: String,
    pub element: String,
}

/// Input and output serialize as the bare element reference of their message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PortTypeOperation {
    #[serde(serialize_with = "serialize_element")]
    pub input: Message,
    #[serde(serialize_with = "serialize_element")]
    pub output: Message,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BindingOperation {
    pub name: String,
    pub action: String,
    #[serde(serialize_with = "serialize_element")]
    pub input: Message,
    #[serde(serialize_with = "serialize_element")]
    pub output: Message,
}

impl QName {
    pub fn new(prefix: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            name: name.into(),
        }
    }

    /// The last non-empty `:`-separated segment of a raw reference.
    ///
    /// Trailing separators are ignored, so `tns:` yields `tns`.
    pub fn fragment(raw: &str) -> &str {
        let trimmed = raw.trim_end_matches(':');
        trimmed.rsplit(':').next().unwrap_or(trimmed)
    }

    /// Splits a raw reference into its first two `:`-separated segments.
    ///
    /// Anything after a second separator is dropped and trailing
    /// separators are ignored; `None` means the reference is unprefixed.
    pub fn split(raw: &str) -> (Option<&str>, &str) {
        let mut segments = raw.trim_end_matches(':').split(':');
        let first = segments.next().unwrap_or_default();

        match segments.next() {
            Some(second) => (Some(first), second),
            None => (None, first),
        }
    }
}

impl fmt::Display for QName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.prefix, self.name)
    }
}

impl Serialize for QName {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

fn serialize_reference<S: Serializer>(
    reference: &Option<QName>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    match reference {
        Some(name) => serializer.collect_str(name),
        None => serializer.serialize_str(""),
    }
}

fn serialize_element<S: Serializer>(message: &Message, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&message.element)
}

impl Type {
    /// The key this type is stored under, `prefix:name`.
    pub fn qualified_name(&self) -> QName {
        QName::new(&self.prefix, &self.name)
    }
}

impl Message {
    /// The prefix of the part's element reference, if it has one.
    pub fn element_prefix(&self) -> Option<&str> {
        QName::split(&self.element).0
    }

    pub fn element_name(&self) -> &str {
        QName::fragment(&self.element)
    }
}
