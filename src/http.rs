//! # Release Server Connections
//!
//! Thin HTTP layer shared by the local catalog and the remote client. A
//! [`ServerConnection`] owns a blocking `reqwest` client configured with a
//! request timeout and basic authentication, and exposes the few request
//! shapes the release server API needs: JSON `GET`s, the XML server-info
//! endpoint and the multipart template import.
//!
//! Responses are returned as status plus body without interpretation;
//! whether a `404` means "absent" or "broken" depends on the endpoint, so
//! that decision stays with the callers.

use std::time::Duration;

use reqwest::blocking::multipart::{Form, Part};
use reqwest::blocking::Client;
use reqwest::header::ACCEPT;
use url::Url;

use crate::error::{Error, Result};
use crate::model::ServerInfo;

/// Timeout applied to every request against a release server.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Address and credentials of one release server instance.
#[derive(Debug, Clone)]
pub struct ConnectionDetails {
    pub url: String,
    pub username: String,
    pub password: String,
}

/// A raw API response: HTTP status and body text.
#[derive(Debug, Clone)]
pub struct ApiResponse {
    pub status: u16,
    pub body: String,
}

impl ApiResponse {
    /// Whether the status is in the 2xx range.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Whether the server answered with 404.
    pub fn is_not_found(&self) -> bool {
        self.status == 404
    }
}

/// An authenticated connection to one release server.
#[derive(Debug)]
pub struct ServerConnection {
    base: Url,
    username: String,
    password: String,
    client: Client,
}

impl ServerConnection {
    /// Open a connection to the given server.
    ///
    /// No request is made yet; the URL is parsed and the HTTP client is
    /// configured with the standard timeout.
    pub fn open(details: &ConnectionDetails) -> Result<Self> {
        let base = Url::parse(&details.url)?;
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| Error::Network {
                url: details.url.clone(),
                message: e.to_string(),
            })?;

        Ok(Self {
            base,
            username: details.username.clone(),
            password: details.password.clone(),
            client,
        })
    }

    /// The base URL of the instance, without a trailing slash.
    pub fn base_url(&self) -> &str {
        self.base.as_str().trim_end_matches('/')
    }

    /// Perform a JSON `GET` against an API path.
    ///
    /// The path may embed identifiers containing slashes; each segment is
    /// percent-encoded individually.
    pub fn get(&self, path: &str, query: &[(&str, String)]) -> Result<ApiResponse> {
        let url = self.endpoint(path, query)?;
        self.send(self.client.get(url.clone()).header(ACCEPT, "application/json"), &url)
    }

    /// Perform an XML `GET` against an API path.
    pub fn get_xml(&self, path: &str) -> Result<ApiResponse> {
        let url = self.endpoint(path, &[])?;
        self.send(self.client.get(url.clone()).header(ACCEPT, "application/xml"), &url)
    }

    /// Upload an import archive as a multipart form.
    pub fn post_import(
        &self,
        path: &str,
        query: &[(&str, String)],
        archive: Vec<u8>,
    ) -> Result<ApiResponse> {
        let url = self.endpoint(path, query)?;
        let form = Form::new().part("file", Part::bytes(archive).file_name("template.xlr"));
        self.send(self.client.post(url.clone()).multipart(form), &url)
    }

    /// Ask the instance for its server version.
    pub fn server_info(&self) -> Result<ServerInfo> {
        let response = self.get_xml("server/info")?;
        if !response.is_success() {
            return Err(Error::Request {
                context: "read the server version from /server/info".to_string(),
                status: response.status,
                body: response.body,
            });
        }
        let version =
            extract_xml_version(&response.body).ok_or_else(|| Error::InvalidResponse {
                context: "/server/info".to_string(),
                message: "no version element in the response".to_string(),
            })?;
        Ok(ServerInfo {
            url: self.base_url().to_string(),
            version,
        })
    }

    fn endpoint(&self, path: &str, query: &[(&str, String)]) -> Result<Url> {
        let mut url = self.base.clone();
        {
            let mut segments = url.path_segments_mut().map_err(|_| Error::Network {
                url: self.base.to_string(),
                message: "base URL cannot carry path segments".to_string(),
            })?;
            segments.pop_if_empty();
            for segment in path.split('/').filter(|s| !s.is_empty()) {
                segments.push(segment);
            }
        }
        for (name, value) in query {
            url.query_pairs_mut().append_pair(name, value);
        }
        Ok(url)
    }

    fn send(&self, request: reqwest::blocking::RequestBuilder, url: &Url) -> Result<ApiResponse> {
        let response = request
            .basic_auth(&self.username, Some(&self.password))
            .send()
            .map_err(|e| Error::Network {
                url: url.to_string(),
                message: e.to_string(),
            })?;
        let status = response.status().as_u16();
        let body = response.text().map_err(|e| Error::Network {
            url: url.to_string(),
            message: e.to_string(),
        })?;
        Ok(ApiResponse { status, body })
    }
}

/// Pull the text of the first `<version>` element out of a server-info body.
fn extract_xml_version(body: &str) -> Option<String> {
    let start = body.find("<version>")? + "<version>".len();
    let end = body[start..].find("</version>")? + start;
    let version = body[start..end].trim();
    if version.is_empty() {
        None
    } else {
        Some(version.to_string())
    }
}
