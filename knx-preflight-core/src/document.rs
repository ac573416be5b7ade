//! Document loading and namespace resolution.
use libxml::parser::Parser;
use libxml::tree::{Document, Node};
use libxml::xpath::Context;
use std::path::Path;
use thiserror::Error;

/// Default namespace of KNX project documents; used when the root element
/// carries none of its own.
pub const KNX_PROJECT_NS: &str = "http://knx.org/xml/project/11";

/// Prefix the XPath context binds to the document namespace.
pub(crate) const NS_PREFIX: &str = "knx";

/// Errors emitted while loading a device description.
#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("XML parsing failed: {0}")]
    Parse(String),
    #[error("XPath error: {0}")]
    XPath(String),
    #[error("XML parsing failed: document has no root element")]
    NoRoot,
}

/// A loaded device description: the parsed tree plus its resolved
/// namespace. Immutable once created.
pub struct DeviceDocument {
    document: Document,
    namespace: String,
    context: Context,
}

impl DeviceDocument {
    /// Load a device description from a file.
    pub fn from_file(path: &Path) -> Result<Self, DocumentError> {
        let xml =
            std::fs::read_to_string(path).map_err(|e| DocumentError::Parse(e.to_string()))?;
        Self::from_xml(&xml)
    }

    /// Load a device description from an XML string.
    pub fn from_xml(xml: &str) -> Result<Self, DocumentError> {
        let document = Parser::default()
            .parse_string(xml)
            .map_err(|e| DocumentError::Parse(format!("{e:?}")))?;
        let root = document.get_root_element().ok_or(DocumentError::NoRoot)?;
        let namespace = root
            .get_namespace()
            .map(|ns| ns.get_href())
            .unwrap_or_else(|| KNX_PROJECT_NS.to_string());

        let context = Context::new(&document)
            .map_err(|()| DocumentError::XPath("failed to create context".to_string()))?;
        context
            .register_namespace(NS_PREFIX, &namespace)
            .map_err(|()| DocumentError::XPath(format!("cannot register '{namespace}'")))?;

        Ok(Self {
            document,
            namespace,
            context,
        })
    }

    /// Namespace URI the document's entities are qualified with.
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Root element of the parsed tree.
    pub fn root(&self) -> Option<Node> {
        self.document.get_root_element()
    }

    /// Evaluate `xpath` at `node` (or the document root), yielding the
    /// matching nodes in document order.
    pub(crate) fn findnodes(
        &mut self,
        xpath: &str,
        node: Option<&Node>,
    ) -> Result<Vec<Node>, DocumentError> {
        self.context
            .findnodes(xpath, node)
            .map_err(|()| DocumentError::XPath(xpath.to_string()))
    }
}
