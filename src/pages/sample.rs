use crate::components::sankey::{GraphData, LinkRecord, NodeRecord};

const WSDL: &str = "sample-wsdl";
const XSD: &str = "sample-xsd";

/// `(type, id, parent, name)`
const NODES: &[(&str, &str, Option<&str>, &str)] = &[
	("WsdlDocument", WSDL, None, "sample.wsdl (WsdlDocument)"),
	("XsdDocument", XSD, None, "sample.xsd (XsdDocument)"),
	("ElementDeclaration", "ext-input", Some(XSD), "extInput (ElementDeclaration)"),
	("ComplexTypeDeclaration", "ext-output-type", Some(XSD), "extOutputType (ComplexTypeDeclaration)"),
	("Part", "request-part", Some(WSDL), "parameters (Part)"),
	("Message", "request-message", Some(WSDL), "findRequest (Message)"),
	("OperationInput", "operation-input", Some(WSDL), "findRequest (OperationInput)"),
	("Part", "fault-part", Some(WSDL), "message (Part)"),
	("Fault", "unknown-fault", Some(WSDL), "unknownFault (Fault)"),
	("Message", "fault-message", Some(WSDL), "faultMessage (Message)"),
	("Fault", "error-fault", Some(WSDL), "errorFault (Fault)"),
	("SoapBinding", "soap-binding", Some(WSDL), "soap:binding (SoapBinding)"),
	("BindingOperationInput", "binding-input", Some(WSDL), "findRequest (BindingOperationInput)"),
	("BindingOperationOutput", "binding-output", Some(WSDL), "findResponse (BindingOperationOutput)"),
	("BindingOperationFault", "binding-error-fault", Some(WSDL), "errorFault (BindingOperationFault)"),
	("BindingOperationFault", "binding-unknown-fault", Some(WSDL), "unknownFault (BindingOperationFault)"),
	("BindingOperation", "binding-operation", Some(WSDL), "find (BindingOperation)"),
	("SoapAddress", "soap-address", Some(WSDL), "soap:address (SoapAddress)"),
	("WsdlService", "service", Some(WSDL), "SampleService (WsdlService)"),
	("Port", "port", Some(WSDL), "SamplePort (Port)"),
	("Binding", "binding", Some(WSDL), "SampleBinding (Binding)"),
	("PortType", "port-type", Some(WSDL), "SamplePortType (PortType)"),
	("Operation", "operation", Some(WSDL), "find (Operation)"),
	("OperationOutput", "operation-output", Some(WSDL), "findResponse (OperationOutput)"),
	("Message", "response-message", Some(WSDL), "findResponse (Message)"),
	("Part", "response-part", Some(WSDL), "parameters (Part)"),
];

/// `(source, target, label)`, all of weight one.
const LINKS: &[(&str, &str, &str)] = &[
	(WSDL, XSD, "importedXsds"),
	("request-part", "ext-input", "element"),
	("request-message", "request-part", "part"),
	("operation-input", "request-message", "message"),
	("unknown-fault", "fault-message", "message"),
	("fault-message", "fault-part", "part"),
	("error-fault", "fault-message", "message"),
	("binding-operation", "operation", "operation"),
	("binding-operation", "binding-input", "input"),
	("binding-operation", "binding-error-fault", "fault"),
	("binding-operation", "binding-unknown-fault", "fault"),
	("binding-operation", "binding-output", "output"),
	("service", "port", "port"),
	("port", "soap-address", "extension"),
	("port", "binding", "binding"),
	("binding", "port-type", "portType"),
	("binding", "soap-binding", "extension"),
	("binding", "binding-operation", "bindingOperation"),
	("port-type", "operation", "operation"),
	("operation", "operation-input", "input"),
	("operation", "operation-output", "output"),
	("operation", "error-fault", "fault"),
	("operation", "unknown-fault", "fault"),
	("operation-output", "response-message", "message"),
	("response-message", "response-part", "part"),
	("response-part", "ext-output-type", "type"),
];

/// A WSDL document importing an XSD, as the repository would report it.
pub fn wsdl_sample() -> GraphData {
	GraphData {
		nodes: NODES
			.iter()
			.map(|&(kind, id, parent, name)| NodeRecord::new(kind, id, parent, name))
			.collect(),
		links: LINKS
			.iter()
			.map(|&(source, target, label)| LinkRecord::new(source, target, 1.0, label))
			.collect(),
	}
}
