//! # Local Catalog
//!
//! Read-only access to the instance templates are pushed *from*. The
//! pipeline only ever reads from the local side: template listings, folder
//! titles, configuration entries and full template documents.
//!
//! The [`LocalCatalog`] trait is the seam between the planner and the
//! transport. Production code talks to a release server over HTTP through
//! [`HttpLocalCatalog`]; tests substitute an in-memory catalog.

use serde_json::Value;

use crate::error::{Error, Result};
use crate::http::{ConnectionDetails, ServerConnection};
use crate::model::{ConfigurationDetails, ServerInfo, TemplateHandle};

/// Read operations against the source instance.
pub trait LocalCatalog: Send + Sync {
    /// Version and address of the instance.
    fn server_info(&self) -> Result<ServerInfo>;

    /// One page of the template listing, across all folders.
    ///
    /// Callers paginate from page zero until an empty page comes back.
    /// `depth` controls how much of each template tree is returned; the
    /// planner asks for enough depth to see every task.
    fn list_templates(&self, page: usize, page_size: usize, depth: u32)
        -> Result<Vec<TemplateHandle>>;

    /// Title of a folder by its identifier. Missing folders are an error;
    /// the listing only hands out folder ids that exist.
    fn folder_title(&self, folder_id: &str) -> Result<String>;

    /// A configuration entry by its identifier.
    fn configuration(&self, id: &str) -> Result<ConfigurationDetails>;

    /// A full template by its identifier, or `None` when it does not exist.
    fn template(&self, id: &str) -> Result<Option<TemplateHandle>>;
}

/// `LocalCatalog` implementation over the release server HTTP API.
#[derive(Debug)]
pub struct HttpLocalCatalog {
    connection: ServerConnection,
}

impl HttpLocalCatalog {
    /// Connect to the source instance.
    pub fn connect(details: &ConnectionDetails) -> Result<Self> {
        Ok(Self {
            connection: ServerConnection::open(details)?,
        })
    }
}

impl LocalCatalog for HttpLocalCatalog {
    fn server_info(&self) -> Result<ServerInfo> {
        self.connection.server_info()
    }

    fn list_templates(
        &self,
        page: usize,
        page_size: usize,
        depth: u32,
    ) -> Result<Vec<TemplateHandle>> {
        let response = self.connection.get(
            "api/v1/templates",
            &[
                ("page", page.to_string()),
                ("resultsPerPage", page_size.to_string()),
                ("depth", depth.to_string()),
            ],
        )?;
        if !response.is_success() {
            return Err(Error::Request {
                context: format!("list page {} of local templates", page),
                status: response.status,
                body: response.body,
            });
        }
        let documents: Vec<Value> =
            serde_json::from_str(&response.body).map_err(|e| Error::InvalidResponse {
                context: "the local template listing".to_string(),
                message: e.to_string(),
            })?;
        documents
            .into_iter()
            .map(TemplateHandle::from_document)
            .collect()
    }

    fn folder_title(&self, folder_id: &str) -> Result<String> {
        let response = self
            .connection
            .get(&format!("api/v1/folders/{}", folder_id), &[])?;
        if !response.is_success() {
            return Err(Error::Request {
                context: format!("read the title of folder [{}]", folder_id),
                status: response.status,
                body: response.body,
            });
        }
        let folder: Value =
            serde_json::from_str(&response.body).map_err(|e| Error::InvalidResponse {
                context: format!("folder [{}]", folder_id),
                message: e.to_string(),
            })?;
        folder
            .get("title")
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or_else(|| Error::InvalidResponse {
                context: format!("folder [{}]", folder_id),
                message: "folder document has no string [title] field".to_string(),
            })
    }

    fn configuration(&self, id: &str) -> Result<ConfigurationDetails> {
        let response = self.connection.get(&format!("api/v1/config/{}", id), &[])?;
        if !response.is_success() {
            return Err(Error::Request {
                context: format!("read configuration [{}]", id),
                status: response.status,
                body: response.body,
            });
        }
        serde_json::from_str(&response.body).map_err(|e| Error::InvalidResponse {
            context: format!("configuration [{}]", id),
            message: e.to_string(),
        })
    }

    fn template(&self, id: &str) -> Result<Option<TemplateHandle>> {
        let response = self
            .connection
            .get(&format!("api/v1/templates/{}", id), &[])?;
        if response.is_not_found() {
            return Ok(None);
        }
        if !response.is_success() {
            return Err(Error::Request {
                context: format!("read template [{}]", id),
                status: response.status,
                body: response.body,
            });
        }
        let document: Value =
            serde_json::from_str(&response.body).map_err(|e| Error::InvalidResponse {
                context: format!("template [{}]", id),
                message: e.to_string(),
            })?;
        TemplateHandle::from_document(document).map(Some)
    }
}
