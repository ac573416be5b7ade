//! Entity extraction: typed read-only views over the document tree.
//!
//! Every attribute the rule checks consume is reachable through a named
//! accessor on its entity view, so the fixed attribute set the importer
//! expects is enumerated here rather than looked up by ad-hoc strings at
//! the rule layer.
use crate::document::{DeviceDocument, DocumentError};
use libxml::tree::Node;
use thiserror::Error;

/// Errors emitted while locating the mandatory entities.
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("Manufacturer node not found")]
    MissingManufacturer,
    #[error("ApplicationProgram node not found")]
    MissingApplicationProgram,
    #[error(transparent)]
    Document(#[from] DocumentError),
}

/// The Manufacturer element.
pub struct Manufacturer {
    node: Node,
}

impl Manufacturer {
    pub fn ref_id(&self) -> Option<String> {
        self.node.get_attribute("RefId")
    }
}

/// The ApplicationProgram element beneath the Manufacturer.
pub struct ApplicationProgram {
    node: Node,
}

impl ApplicationProgram {
    pub fn application_number(&self) -> Option<String> {
        self.node.get_attribute("ApplicationNumber")
    }

    pub fn application_version(&self) -> Option<String> {
        self.node.get_attribute("ApplicationVersion")
    }

    pub fn mask_version(&self) -> Option<String> {
        self.node.get_attribute("MaskVersion")
    }

    pub fn default_language(&self) -> Option<String> {
        self.node.get_attribute("DefaultLanguage")
    }
}

/// The inner Hardware element (the one carrying attributes, not the
/// positional wrapper of the same name).
pub struct Hardware {
    node: Node,
}

impl Hardware {
    pub fn id(&self) -> Option<String> {
        self.node.get_attribute("Id")
    }

    pub fn name(&self) -> Option<String> {
        self.node.get_attribute("Name")
    }

    pub fn version_number(&self) -> Option<String> {
        self.node.get_attribute("VersionNumber")
    }

    /// The mis-authored sibling of `VersionNumber`; only read to produce a
    /// distinguishing diagnostic.
    pub fn version(&self) -> Option<String> {
        self.node.get_attribute("Version")
    }

    pub fn bus_current(&self) -> Option<String> {
        self.node.get_attribute("BusCurrent")
    }

    pub fn has_individual_address(&self) -> Option<String> {
        self.node.get_attribute("HasIndividualAddress")
    }

    pub fn has_application_program(&self) -> Option<String> {
        self.node.get_attribute("HasApplicationProgram")
    }
}

/// A CatalogItem element.
pub struct CatalogItem {
    node: Node,
}

impl CatalogItem {
    pub fn id(&self) -> Option<String> {
        self.node.get_attribute("Id")
    }

    pub fn hardware2program_ref_id(&self) -> Option<String> {
        self.node.get_attribute("Hardware2ProgramRefId")
    }
}

/// A Product element.
pub struct Product {
    node: Node,
}

impl Product {
    pub fn order_number(&self) -> Option<String> {
        self.node.get_attribute("OrderNumber")
    }
}

/// A Parameter element.
pub struct Parameter {
    node: Node,
}

impl Parameter {
    pub fn id(&self) -> Option<String> {
        self.node.get_attribute("Id")
    }
}

/// A ParameterRef element.
pub struct ParameterRef {
    node: Node,
}

impl ParameterRef {
    pub fn id(&self) -> Option<String> {
        self.node.get_attribute("Id")
    }

    pub fn ref_id(&self) -> Option<String> {
        self.node.get_attribute("RefId")
    }
}

/// A ComObject element.
pub struct ComObject {
    node: Node,
}

impl ComObject {
    pub fn id(&self) -> Option<String> {
        self.node.get_attribute("Id")
    }

    pub fn datapoint_type(&self) -> Option<String> {
        self.node.get_attribute("DatapointType")
    }

    pub fn object_size(&self) -> Option<String> {
        self.node.get_attribute("ObjectSize")
    }
}

/// A ComObjectRef element.
pub struct ComObjectRef {
    node: Node,
}

impl ComObjectRef {
    pub fn id(&self) -> Option<String> {
        self.node.get_attribute("Id")
    }
}

/// A ParameterBlock element in the Dynamic section.
pub struct ParameterBlock {
    node: Node,
}

impl ParameterBlock {
    pub fn id(&self) -> Option<String> {
        self.node.get_attribute("Id")
    }
}

/// A choose element in the Dynamic section.
pub struct Choose {
    node: Node,
}

impl Choose {
    pub fn param_ref_id(&self) -> Option<String> {
        self.node.get_attribute("ParamRefId")
    }
}

/// A ParameterRefRef element in the Dynamic section.
pub struct ParameterRefRef {
    node: Node,
}

impl ParameterRefRef {
    pub fn ref_id(&self) -> Option<String> {
        self.node.get_attribute("RefId")
    }
}

/// A ComObjectRefRef element in the Dynamic section.
pub struct ComObjectRefRef {
    node: Node,
}

impl ComObjectRefRef {
    pub fn ref_id(&self) -> Option<String> {
        self.node.get_attribute("RefId")
    }
}

/// Everything the rule checks consume, extracted once per run.
///
/// Manufacturer and ApplicationProgram are mandatory; Hardware resolution
/// may come up empty (reported by the hardware check, not here); the
/// remaining families are possibly-empty sequences in document order.
pub struct DeviceEntities {
    pub manufacturer: Manufacturer,
    pub application_program: ApplicationProgram,
    pub hardware: Option<Hardware>,
    pub catalog_items: Vec<CatalogItem>,
    pub products: Vec<Product>,
    pub parameters: Vec<Parameter>,
    pub parameter_refs: Vec<ParameterRef>,
    pub com_objects: Vec<ComObject>,
    pub com_object_refs: Vec<ComObjectRef>,
    pub parameter_blocks: Vec<ParameterBlock>,
    pub chooses: Vec<Choose>,
    pub parameter_ref_refs: Vec<ParameterRefRef>,
    pub com_object_ref_refs: Vec<ComObjectRefRef>,
}

/// Locate the entity set in `doc`.
///
/// # Errors
/// [`ExtractError::MissingManufacturer`] /
/// [`ExtractError::MissingApplicationProgram`] when a mandatory entity is
/// absent; no later check is meaningful without them.
pub fn extract(doc: &mut DeviceDocument) -> Result<DeviceEntities, ExtractError> {
    let manufacturer_node = doc
        .findnodes("//knx:Manufacturer", None)?
        .into_iter()
        .next()
        .ok_or(ExtractError::MissingManufacturer)?;

    let application_node = doc
        .findnodes(".//knx:ApplicationProgram", Some(&manufacturer_node))?
        .into_iter()
        .next()
        .ok_or(ExtractError::MissingApplicationProgram)?;

    let hardware = select_hardware(doc.findnodes(".//knx:Hardware", Some(&manufacturer_node))?);

    let catalog_items = doc
        .findnodes(".//knx:CatalogItem", Some(&manufacturer_node))?
        .into_iter()
        .map(|node| CatalogItem { node })
        .collect();
    let products = doc
        .findnodes(".//knx:Product", Some(&manufacturer_node))?
        .into_iter()
        .map(|node| Product { node })
        .collect();

    let parameters: Vec<_> = doc
        .findnodes(".//knx:Parameter", Some(&application_node))?
        .into_iter()
        .map(|node| Parameter { node })
        .collect();
    let parameter_refs: Vec<_> = doc
        .findnodes(".//knx:ParameterRef", Some(&application_node))?
        .into_iter()
        .map(|node| ParameterRef { node })
        .collect();
    let com_objects: Vec<_> = doc
        .findnodes(".//knx:ComObject", Some(&application_node))?
        .into_iter()
        .map(|node| ComObject { node })
        .collect();
    let com_object_refs: Vec<_> = doc
        .findnodes(".//knx:ComObjectRef", Some(&application_node))?
        .into_iter()
        .map(|node| ComObjectRef { node })
        .collect();

    let dynamic = doc
        .findnodes(".//knx:Dynamic", Some(&application_node))?
        .into_iter()
        .next();
    let (parameter_blocks, chooses, parameter_ref_refs, com_object_ref_refs) = match &dynamic {
        Some(dynamic_node) => (
            doc.findnodes(".//knx:ParameterBlock", Some(dynamic_node))?
                .into_iter()
                .map(|node| ParameterBlock { node })
                .collect(),
            doc.findnodes(".//knx:choose", Some(dynamic_node))?
                .into_iter()
                .map(|node| Choose { node })
                .collect(),
            doc.findnodes(".//knx:ParameterRefRef", Some(dynamic_node))?
                .into_iter()
                .map(|node| ParameterRefRef { node })
                .collect(),
            doc.findnodes(".//knx:ComObjectRefRef", Some(dynamic_node))?
                .into_iter()
                .map(|node| ComObjectRefRef { node })
                .collect(),
        ),
        None => (Vec::new(), Vec::new(), Vec::new(), Vec::new()),
    };

    tracing::debug!(
        parameters = parameters.len(),
        parameter_refs = parameter_refs.len(),
        com_objects = com_objects.len(),
        com_object_refs = com_object_refs.len(),
        has_dynamic = dynamic.is_some(),
        "entities extracted"
    );

    Ok(DeviceEntities {
        manufacturer: Manufacturer {
            node: manufacturer_node,
        },
        application_program: ApplicationProgram {
            node: application_node,
        },
        hardware,
        catalog_items,
        products,
        parameters,
        parameter_refs,
        com_objects,
        com_object_refs,
        parameter_blocks,
        chooses,
        parameter_ref_refs,
        com_object_ref_refs,
    })
}

/// Tie-break for the nested Hardware wrapper: the document nests a generic
/// `Hardware` container around the `Hardware` element that actually carries
/// attributes. Prefer the first node exposing `VersionNumber` or `Name`,
/// fall back to the first node exposing `Id`. Heuristic, not a schema
/// guarantee.
fn select_hardware(nodes: Vec<Node>) -> Option<Hardware> {
    let inner = nodes
        .iter()
        .find(|n| n.get_attribute("VersionNumber").is_some() || n.get_attribute("Name").is_some())
        .or_else(|| nodes.iter().find(|n| n.get_attribute("Id").is_some()));
    inner.map(|node| Hardware { node: node.clone() })
}
