use std::collections::BTreeMap;

use super::{
    error::{Error, ReferenceKind},
    namespaces::{NamespaceResolver, SoapVersion, WSDL, XML_SCHEMA},
    types::{BindingOperation, Element, Message, PortTypeOperation, QName, Type},
    xml::{Document, Node},
};

/// Everything extracted from one WSDL document.
///
/// All tables are built once, in dependency order, when the definition is
/// created and never change afterwards.
#[derive(Debug, Clone)]
pub struct Definition {
    namespaces: NamespaceResolver,
    endpoint: String,
    types: BTreeMap<String, Type>,
    messages: BTreeMap<String, Message>,
    port_type_operations: BTreeMap<String, PortTypeOperation>,
    operations: BTreeMap<String, BindingOperation>,
}

struct Extractor<'a> {
    definitions: Option<&'a Node>,
    namespaces: &'a NamespaceResolver,
}

fn is_singular(max_occurs: Option<&str>) -> bool {
    matches!(max_occurs, None | Some("") | Some("1"))
}

impl<'a> Extractor<'a> {
    fn children(&self, local_name: &'a str) -> impl Iterator<Item = &'a Node> + 'a {
        self.definitions
            .into_iter()
            .flat_map(move |definitions| definitions.children_named(WSDL, local_name))
    }

    /// Ports that carry a SOAP address, paired with that address.
    fn addressed_ports(&self) -> impl Iterator<Item = (&'a Node, &'a Node)> + 'a {
        let soap = self.namespaces.soap_namespace();

        self.children("service")
            .flat_map(|service| service.children_named(WSDL, "port"))
            .flat_map(move |port| {
                port.children_named(soap, "address")
                    .map(move |address| (port, address))
            })
    }

    fn endpoint(&self) -> String {
        self.addressed_ports()
            .find_map(|(_, address)| address.attribute("location"))
            .unwrap_or_default()
            .to_owned()
    }

    fn binding_name(&self) -> Option<&'a str> {
        self.addressed_ports()
            .find_map(|(port, _)| port.attribute("binding"))
            .map(QName::fragment)
    }

    fn types(&self) -> Result<BTreeMap<String, Type>, Error> {
        let mut types = BTreeMap::new();

        let schemas = self
            .children("types")
            .flat_map(|types| types.children_named(XML_SCHEMA, "schema"));

        for schema in schemas {
            let target_namespace = schema.attribute("targetNamespace").unwrap_or_default();

            let declarations = schema.children().iter().filter(|node| {
                node.is(XML_SCHEMA, "element") || node.is(XML_SCHEMA, "complexType")
            });

            for node in declarations {
                let name = match node.attribute("name") {
                    Some(name) => self.namespaces.qualify(name, target_namespace)?,
                    None => continue,
                };

                let ty = Type {
                    elements: self.elements(node, target_namespace)?,
                    target_namespace: target_namespace.to_owned(),
                    name: name.name,
                    prefix: name.prefix,
                };

                tracing::trace!(
                    name = %ty.qualified_name(),
                    elements = ty.elements.len(),
                    "found schema type"
                );

                types.insert(ty.qualified_name().to_string(), ty);
            }
        }

        Ok(types)
    }

    fn elements(
        &self,
        node: &Node,
        target_namespace: &str,
    ) -> Result<BTreeMap<String, Element>, Error> {
        let mut elements = BTreeMap::new();

        for element in node.descendants_named(XML_SCHEMA, "element") {
            let reference = element.attribute("ref");

            let (name, referenced_type) = match (element.attribute("name"), reference) {
                (Some(name), _) => {
                    let name = self.namespaces.qualify(name, target_namespace)?.name;
                    let referenced_type = match element.attribute("type") {
                        Some(ty) => Some(self.namespaces.qualify(ty, target_namespace)?),
                        None => None,
                    };

                    (name, referenced_type)
                }

                (None, Some(reference)) => {
                    let reference = self.namespaces.qualify(reference, target_namespace)?;
                    (reference.name.clone(), Some(reference))
                }

                (None, None) => continue,
            };

            elements.insert(
                name,
                Element {
                    referenced_type,
                    singular: is_singular(element.attribute("maxOccurs")),
                },
            );
        }

        Ok(elements)
    }

    fn messages(&self) -> BTreeMap<String, Message> {
        self.children("message")
            .map(|message| {
                let name = message.attribute("name").unwrap_or_default().to_owned();
                let element = message
                    .children_named(WSDL, "part")
                    .find_map(|part| part.attribute("element"))
                    .unwrap_or_default()
                    .to_owned();

                (name.clone(), Message { name, element })
            })
            .collect()
    }

    fn port_type_operations(
        &self,
        messages: &BTreeMap<String, Message>,
    ) -> Result<BTreeMap<String, PortTypeOperation>, Error> {
        let lookup = |operation: &Node, direction: &str| -> Result<Message, Error> {
            let reference = operation
                .children_named(WSDL, direction)
                .find_map(|child| child.attribute("message"))
                .unwrap_or_default();
            let name = QName::fragment(reference);

            messages
                .get(name)
                .cloned()
                .ok_or_else(|| Error::missing(ReferenceKind::Message, name))
        };

        let mut operations = BTreeMap::new();

        let declared = self
            .children("portType")
            .flat_map(|port_type| port_type.children_named(WSDL, "operation"));

        for operation in declared {
            let name = operation.attribute("name").unwrap_or_default().to_owned();
            let resolved = PortTypeOperation {
                input: lookup(operation, "input")?,
                output: lookup(operation, "output")?,
            };

            operations.insert(name, resolved);
        }

        Ok(operations)
    }

    fn operations(
        &self,
        port_type_operations: &BTreeMap<String, PortTypeOperation>,
    ) -> Result<BTreeMap<String, BindingOperation>, Error> {
        let mut operations = BTreeMap::new();

        let binding_name = match self.binding_name() {
            Some(binding_name) => binding_name,
            None => {
                tracing::debug!("no addressed service port, skipping binding operations");
                return Ok(operations);
            }
        };

        let soap = self.namespaces.soap_namespace();

        let bound = self
            .children("binding")
            .filter(|binding| binding.attribute("name") == Some(binding_name))
            .flat_map(|binding| binding.children_named(WSDL, "operation"));

        for operation in bound {
            let name = operation.attribute("name").unwrap_or_default();
            let action = operation
                .children_named(soap, "operation")
                .find_map(|soap_operation| soap_operation.attribute("soapAction"))
                .unwrap_or_default();

            let abstract_operation = port_type_operations
                .get(name)
                .ok_or_else(|| Error::missing(ReferenceKind::PortTypeOperation, name))?;

            operations.insert(
                name.to_owned(),
                BindingOperation {
                    name: name.to_owned(),
                    action: action.to_owned(),
                    input: abstract_operation.input.clone(),
                    output: abstract_operation.output.clone(),
                },
            );
        }

        Ok(operations)
    }
}

impl Definition {
    pub fn from_document(document: &Document) -> Result<Self, Error> {
        let namespaces = NamespaceResolver::new(document.declarations());

        let root = document.root();
        let definitions = if root.is(WSDL, "definitions") {
            Some(root)
        } else {
            tracing::debug!(root = root.local_name(), "document root is not wsdl:definitions");
            None
        };

        let extractor = Extractor {
            definitions,
            namespaces: &namespaces,
        };

        let endpoint = extractor.endpoint();
        let types = extractor.types()?;
        let messages = extractor.messages();
        let port_type_operations = extractor.port_type_operations(&messages)?;
        let operations = extractor.operations(&port_type_operations)?;

        tracing::debug!(
            %endpoint,
            types = types.len(),
            messages = messages.len(),
            operations = operations.len(),
            "extracted wsdl definition"
        );

        Ok(Self {
            namespaces,
            endpoint,
            types,
            messages,
            port_type_operations,
            operations,
        })
    }

    pub fn parse(bytes: &[u8]) -> Result<Self, Error> {
        Self::from_document(&Document::parse(bytes)?)
    }

    pub fn namespaces(&self) -> &NamespaceResolver {
        &self.namespaces
    }

    pub fn soap_version(&self) -> SoapVersion {
        self.namespaces.soap_version()
    }

    /// Location of the first SOAP-addressed service port, or empty.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Schema types keyed by `prefix:name`.
    pub fn types(&self) -> &BTreeMap<String, Type> {
        &self.types
    }

    pub fn messages(&self) -> &BTreeMap<String, Message> {
        &self.messages
    }

    pub fn port_type_operations(&self) -> &BTreeMap<String, PortTypeOperation> {
        &self.port_type_operations
    }

    /// Operations of the binding used by the service port.
    pub fn operations(&self) -> &BTreeMap<String, BindingOperation> {
        &self.operations
    }

    pub fn operation(&self, name: &str) -> Option<&BindingOperation> {
        self.operations.get(name)
    }
}
