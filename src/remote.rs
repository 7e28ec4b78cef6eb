//! # Remote Client
//!
//! Access to the instance templates are pushed *to*. The remote side is
//! queried during resolution (folders, configurations, folder template
//! listings) and written to during execution (template imports).
//!
//! The [`RemoteClient`] trait is the seam between the pipeline and the
//! transport; [`HttpRemoteClient`] implements it over the release server
//! HTTP API. The import endpoint takes a zip archive holding a data-model
//! manifest next to the template document, uploaded as a multipart form.
//!
//! Failure policy: a `404` from the folder lookup means "no such folder"
//! and is a regular outcome. Every other non-2xx response is an error that
//! aborts the run, carrying the status and response body.

use std::io::{Cursor, Write};

use serde_json::Value;
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

use crate::error::{Error, Result};
use crate::http::{ConnectionDetails, ServerConnection};
use crate::model::{ImportOutcome, ServerInfo, TemplateSummary, ROOT_FOLDER_ID};

/// Data-model manifest shipped inside every import archive.
const IMPORT_MANIFEST: &str = r#"{"xlr-data-model-version":"8.5.0#1","xlr-version":"8.5.1"}"#;

/// Operations against the target instance.
pub trait RemoteClient: Send + Sync {
    /// Version and address of the instance.
    fn server_info(&self) -> Result<ServerInfo>;

    /// Look up a folder by its renamed path, `None` when it does not exist.
    fn find_folder(&self, path: &str) -> Result<Option<String>>;

    /// Identifiers of all configurations with the given type and title, in
    /// server order.
    fn find_configurations(&self, kind: &str, title: &str) -> Result<Vec<String>>;

    /// One page of the templates directly inside a folder.
    fn list_folder_templates(
        &self,
        folder_id: &str,
        page: usize,
        page_size: usize,
    ) -> Result<Vec<TemplateSummary>>;

    /// Import a template document into a folder, or into the root when
    /// `folder_id` is `None`. Returns the outcome reported by the server.
    fn import_template(&self, folder_id: Option<&str>, body: &str) -> Result<ImportOutcome>;
}

/// `RemoteClient` implementation over the release server HTTP API.
#[derive(Debug)]
pub struct HttpRemoteClient {
    connection: ServerConnection,
}

impl HttpRemoteClient {
    /// Connect to the target instance.
    pub fn connect(details: &ConnectionDetails) -> Result<Self> {
        Ok(Self {
            connection: ServerConnection::open(details)?,
        })
    }
}

impl RemoteClient for HttpRemoteClient {
    fn server_info(&self) -> Result<ServerInfo> {
        self.connection.server_info()
    }

    fn find_folder(&self, path: &str) -> Result<Option<String>> {
        let response = self
            .connection
            .get("api/v1/folders/find", &[("byPath", path.to_string())])?;
        if response.is_not_found() {
            return Ok(None);
        }
        if !response.is_success() {
            return Err(Error::Request {
                context: format!("find a folder [{}]", path),
                status: response.status,
                body: response.body,
            });
        }
        let folder: Value =
            serde_json::from_str(&response.body).map_err(|e| Error::InvalidResponse {
                context: format!("folder lookup [{}]", path),
                message: e.to_string(),
            })?;
        folder
            .get("id")
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or_else(|| Error::InvalidResponse {
                context: format!("folder lookup [{}]", path),
                message: "folder document has no string [id] field".to_string(),
            })
            .map(Some)
    }

    fn find_configurations(&self, kind: &str, title: &str) -> Result<Vec<String>> {
        let response = self.connection.get(
            "api/v1/config/byTypeAndTitle",
            &[
                ("configurationType", kind.to_string()),
                ("title", title.to_string()),
            ],
        )?;
        if !response.is_success() {
            return Err(Error::Request {
                context: format!("find a configuration by type [{}] and title [{}]", kind, title),
                status: response.status,
                body: response.body,
            });
        }
        let entries: Vec<Value> =
            serde_json::from_str(&response.body).map_err(|e| Error::InvalidResponse {
                context: format!("configuration search [{}/{}]", kind, title),
                message: e.to_string(),
            })?;
        Ok(entries
            .iter()
            .filter_map(|entry| entry.get("id").and_then(Value::as_str))
            .map(str::to_string)
            .collect())
    }

    fn list_folder_templates(
        &self,
        folder_id: &str,
        page: usize,
        page_size: usize,
    ) -> Result<Vec<TemplateSummary>> {
        let response = self.connection.get(
            &format!("api/v1/folders/{}/templates", folder_id),
            &[
                ("page", page.to_string()),
                ("resultsPerPage", page_size.to_string()),
                ("depth", "1".to_string()),
            ],
        )?;
        if !response.is_success() {
            return Err(Error::Request {
                context: format!("get page {} of templates of folder [{}]", page, folder_id),
                status: response.status,
                body: response.body,
            });
        }
        serde_json::from_str(&response.body).map_err(|e| Error::InvalidResponse {
            context: format!("template listing of folder [{}]", folder_id),
            message: e.to_string(),
        })
    }

    fn import_template(&self, folder_id: Option<&str>, body: &str) -> Result<ImportOutcome> {
        let archive = build_import_archive(body)?;
        // The root folder is implied by an absent folderId parameter.
        let query = match folder_id {
            Some(folder_id) => vec![("folderId", folder_id.to_string())],
            None => Vec::new(),
        };
        let response = self
            .connection
            .post_import("api/v1/templates/import", &query, archive)?;
        if !response.is_success() {
            return Err(Error::Request {
                context: format!(
                    "import a template into folder [{}]",
                    folder_id.unwrap_or(ROOT_FOLDER_ID)
                ),
                status: response.status,
                body: response.body,
            });
        }
        parse_import_result(&response.body)
    }
}

/// Wrap a template document in the import archive format.
///
/// The archive holds the data-model manifest and the template document
/// itself, under the entry names the import endpoint expects.
pub fn build_import_archive(template_json: &str) -> Result<Vec<u8>> {
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default();

    writer
        .start_file("manifest.json", options)
        .map_err(archive_error)?;
    writer.write_all(IMPORT_MANIFEST.as_bytes())?;

    writer
        .start_file("release-template.json", options)
        .map_err(archive_error)?;
    writer.write_all(template_json.as_bytes())?;

    let cursor = writer.finish().map_err(archive_error)?;
    Ok(cursor.into_inner())
}

fn archive_error(error: zip::result::ZipError) -> Error {
    Error::Archive {
        message: error.to_string(),
    }
}

/// Interpret an import response body.
///
/// The endpoint answers with an array holding exactly one result per
/// uploaded archive.
fn parse_import_result(body: &str) -> Result<ImportOutcome> {
    let results: Vec<ImportOutcome> =
        serde_json::from_str(body).map_err(|e| Error::InvalidResponse {
            context: "the template import".to_string(),
            message: e.to_string(),
        })?;
    results
        .into_iter()
        .next()
        .ok_or_else(|| Error::InvalidResponse {
            context: "the template import".to_string(),
            message: "empty import result".to_string(),
        })
}
