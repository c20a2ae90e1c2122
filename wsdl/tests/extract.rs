use pretty_assertions::assert_eq;
use soapdesc_wsdl::{
    error::{Error, ReferenceKind},
    namespaces::{SoapVersion, SOAP, SOAP12},
    types::{Element, Message, QName},
};

const PING: &str = include_str!("fixtures/ping.wsdl");
const CALCULATOR: &str = include_str!("fixtures/calculator12.wsdl");
const DANGLING: &str = include_str!("fixtures/dangling_operation.wsdl");
const UNBOUND_PORT: &str = include_str!("fixtures/unbound_port.wsdl");

fn message(name: &str, element: &str) -> Message {
    Message {
        name: name.into(),
        element: element.into(),
    }
}

#[test]
fn ping_operation_resolves_through_binding() {
    let definition = soapdesc_wsdl::from_str(PING).unwrap();
    let ping = definition.operation("Ping").unwrap();

    assert_eq!(ping.action, "urn:a:Ping");
    assert_eq!(ping.input, message("PingMsg", "tns:Ping"));
    assert_eq!(ping.output, message("PingResponseMsg", "tns:PingResponse"));
    assert_eq!(ping.input.element_prefix(), Some("tns"));
    assert_eq!(ping.input.element_name(), "Ping");
}

#[test]
fn ping_types_are_keyed_by_prefixed_name() {
    let definition = soapdesc_wsdl::from_str(PING).unwrap();
    let types = definition.types();

    assert_eq!(
        types.keys().collect::<Vec<_>>(),
        ["tns:Ping", "tns:PingResponse", "tns:Status"]
    );

    let ping = &types["tns:Ping"];
    assert_eq!(ping.name, "Ping");
    assert_eq!(ping.prefix, "tns");
    assert_eq!(ping.target_namespace, "urn:a");
    assert!(ping.elements["id"].singular);
    assert!(!ping.elements["tags"].singular);
    assert_eq!(
        ping.elements["tags"].referenced_type,
        Some(QName::new("xs", "string"))
    );

    let status = &types["tns:Status"];
    assert_eq!(
        status.elements["message"],
        Element {
            referenced_type: None,
            singular: true,
        }
    );
    assert!(types["tns:PingResponse"].elements["status"].singular);
}

#[test]
fn ping_endpoint_and_tables() {
    let definition = soapdesc_wsdl::from_str(PING).unwrap();

    assert_eq!(definition.endpoint(), "http://example.com/ping");
    assert_eq!(definition.soap_version(), SoapVersion::Soap11);
    assert_eq!(definition.namespaces().soap_namespace(), SOAP);
    assert_eq!(definition.messages().len(), 2);
    assert_eq!(
        definition.port_type_operations()["Ping"].output,
        message("PingResponseMsg", "tns:PingResponse")
    );
    assert_eq!(definition.namespaces().prefix_for("urn:a"), Some("tns"));
}

#[test]
fn soap12_document_uses_soap12_binding() {
    let definition = soapdesc_wsdl::from_str(CALCULATOR).unwrap();

    assert_eq!(definition.soap_version(), SoapVersion::Soap12);
    assert_eq!(definition.namespaces().soap_namespace(), SOAP12);
    assert_eq!(
        definition.endpoint(),
        "http://www.dneonline.com/calculator.asmx"
    );

    let add = definition.operation("Add").unwrap();
    assert_eq!(add.action, "http://tempuri.org/Add");
    assert_eq!(add.input, message("AddSoapIn", "calc:Add"));
    assert_eq!(definition.operations().len(), 1);
}

#[test]
fn soap12_schema_prefix_differs_from_binding_prefix() {
    let definition = soapdesc_wsdl::from_str(CALCULATOR).unwrap();
    let types = definition.types();

    assert!(types["calc:Add"].elements["intA"].singular);
    assert_eq!(
        types["calc:Add"].elements["intB"].referenced_type,
        Some(QName::new("s", "int"))
    );

    let entry = &types["calc:History"].elements["entry"];
    assert!(!entry.singular);
    assert_eq!(entry.referenced_type, Some(QName::new("calc", "Entry")));
}

#[test]
fn binding_operation_without_port_type_operation_fails() {
    let error = soapdesc_wsdl::from_str(DANGLING).unwrap_err();

    match error {
        Error::MissingReference { kind, name } => {
            assert_eq!(kind, ReferenceKind::PortTypeOperation);
            assert_eq!(name, "Pong");
        }
        other => panic!("unexpected error: {:?}", other),
    }
}

#[test]
fn document_without_service_is_permissive() {
    let without_service = PING
        .split("<wsdl:service")
        .next()
        .map(|head| format!("{}</wsdl:definitions>", head))
        .unwrap();

    let definition = soapdesc_wsdl::from_str(&without_service).unwrap();

    assert_eq!(definition.endpoint(), "");
    assert!(definition.operations().is_empty());
    assert_eq!(definition.types().len(), 3);
    assert_eq!(definition.port_type_operations().len(), 1);
}

#[test]
fn loads_fixture_from_path() {
    let path = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/ping.wsdl");
    let definition = soapdesc_wsdl::parse(path).unwrap();

    assert_eq!(definition.endpoint(), "http://example.com/ping");
    assert!(definition.operation("Ping").is_some());
}

#[test]
fn output_serializes_to_contract_shape() {
    let definition = soapdesc_wsdl::from_str(PING).unwrap();

    let ty = serde_json::to_value(&definition.types()["tns:Ping"]).unwrap();
    assert_eq!(ty["name"], "Ping");
    assert_eq!(ty["prefix"], "tns");
    assert_eq!(
        ty["elements"]["tags"],
        serde_json::json!({ "type": "xs:string", "singular": false })
    );

    let operation = serde_json::to_value(definition.operation("Ping").unwrap()).unwrap();
    assert_eq!(operation["action"], "urn:a:Ping");
    assert_eq!(operation["input"], "tns:Ping");
    assert_eq!(operation["output"], "tns:PingResponse");
}

#[test]
fn port_naming_unknown_binding_yields_no_operations() {
    let definition = soapdesc_wsdl::from_str(UNBOUND_PORT).unwrap();

    assert_eq!(definition.endpoint(), "http://example.com/lookup");
    assert!(definition.operations().is_empty());
    assert_eq!(definition.port_type_operations().len(), 1);
}

#[test]
fn empty_max_occurs_is_singular() {
    let definition = soapdesc_wsdl::from_str(UNBOUND_PORT).unwrap();
    let lookup = &definition.types()["tns:Lookup"];

    assert!(lookup.elements["key"].singular);
    assert!(!lookup.elements["hints"].singular);
}
