use std::collections::{BTreeMap, HashMap};

use crate::{error::Error, types::QName, xml::Declaration};

pub const WSDL: &str = "http://schemas.xmlsoap.org/wsdl/";
pub const SOAP: &str = "http://schemas.xmlsoap.org/wsdl/soap/";
pub const SOAP12: &str = "http://schemas.xmlsoap.org/wsdl/soap12/";
pub const XML_SCHEMA: &str = "http://www.w3.org/2001/XMLSchema";

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub enum SoapVersion {
    #[serde(rename = "1.1")]
    Soap11,
    #[serde(rename = "1.2")]
    Soap12,
}

/// Prefix/namespace tables of one document, plus the SOAP binding
/// namespace in effect for it.
#[derive(Debug, Clone)]
pub struct NamespaceResolver {
    namespaces: BTreeMap<String, String>,
    prefixes: HashMap<String, String>,
    soap_version: SoapVersion,
}

impl SoapVersion {
    pub fn namespace(self) -> &'static str {
        match self {
            SoapVersion::Soap11 => SOAP,
            SoapVersion::Soap12 => SOAP12,
        }
    }
}

impl NamespaceResolver {
    /// Builds the tables from declarations in document order.
    ///
    /// Default namespace declarations are ignored. When a prefix or a URI is
    /// declared more than once the last declaration wins.
    pub fn new(declarations: &[Declaration]) -> Self {
        let mut namespaces = BTreeMap::new();
        for declaration in declarations {
            if let Some(prefix) = &declaration.prefix {
                namespaces.insert(prefix.clone(), declaration.namespace.clone());
            }
        }

        let mut prefixes = HashMap::new();
        for declaration in declarations {
            if let Some(prefix) = &declaration.prefix {
                if namespaces.get(prefix) == Some(&declaration.namespace) {
                    prefixes.insert(declaration.namespace.clone(), prefix.clone());
                }
            }
        }

        let soap_version = if namespaces.values().any(|namespace| namespace == SOAP12) {
            SoapVersion::Soap12
        } else {
            SoapVersion::Soap11
        };

        tracing::debug!(
            namespaces = namespaces.len(),
            ?soap_version,
            "resolved document namespaces"
        );

        Self {
            namespaces,
            prefixes,
            soap_version,
        }
    }

    /// Prefix to namespace URI.
    pub fn namespaces(&self) -> &BTreeMap<String, String> {
        &self.namespaces
    }

    /// Namespace URI to prefix.
    pub fn prefixes(&self) -> &HashMap<String, String> {
        &self.prefixes
    }

    pub fn prefix_for(&self, namespace: &str) -> Option<&str> {
        self.prefixes.get(namespace).map(String::as_str)
    }

    pub fn soap_version(&self) -> SoapVersion {
        self.soap_version
    }

    pub fn soap_namespace(&self) -> &'static str {
        self.soap_version.namespace()
    }

    /// Parses `raw` as a qualified name.
    ///
    /// A prefixed name keeps its prefix as written. An unprefixed one takes
    /// the prefix bound to `target_namespace`, which must exist.
    pub fn qualify(&self, raw: &str, target_namespace: &str) -> Result<QName, Error> {
        let name = match QName::split(raw) {
            (Some(prefix), name) => return Ok(QName::new(prefix, name)),
            (None, name) => name,
        };

        match self.prefix_for(target_namespace) {
            Some(prefix) => Ok(QName::new(prefix, name)),
            None => Err(Error::UnresolvedPrefix {
                namespace: target_namespace.to_owned(),
                name: name.to_owned(),
            }),
        }
    }
}
