//! HTTP calls against the Fedora REST API.
//!
//! Every request carries HTTP Basic authentication with the credentials the
//! client was built with. Responses with a 4xx/5xx status are logged with
//! their body and returned as [`FedoraError::Repository`]. Response bodies
//! are read up to `max_body_bytes`.
//!
//! | Call | Request |
//! |------|---------|
//! | [`create`](FedoraClient::create) | `POST {base}` (Turtle) |
//! | [`create_version`](FedoraClient::create_version) | `POST {resource}/fcr:versions` |
//! | [`replace`](FedoraClient::replace) | `PUT {resource}` (Turtle) |
//! | [`fetch_turtle`](FedoraClient::fetch_turtle) | `GET {resource}`, `Accept: text/turtle` |
//! | [`delete`](FedoraClient::delete) | `DELETE {uri}` |
//! | [`put_binary`](FedoraClient::put_binary) | `PUT {uri}` with raw bytes |

use reqwest::header::{ACCEPT, CONTENT_TYPE, LOCATION};
use reqwest::{Client, Method, RequestBuilder, Response};
use tracing::{debug, error};

use crate::credentials::Credentials;
use crate::error::FedoraError;

pub const TURTLE: &str = "text/turtle";

/// A Fedora client bound to one set of credentials.
///
/// Cheap to build per deposit: the inner [`reqwest::Client`] is shared and
/// pools connections.
pub struct FedoraClient {
    http: Client,
    credentials: Credentials,
    max_body_bytes: usize,
}

impl FedoraClient {
    pub fn new(http: Client, credentials: Credentials, max_body_bytes: usize) -> Self {
        Self {
            http,
            credentials,
            max_body_bytes,
        }
    }

    /// Create a resource under `base_url` and return its handle.
    ///
    /// The handle is the response body, or the `Location` header when the
    /// body is blank.
    pub async fn create(&self, base_url: &str, turtle: String) -> Result<String, FedoraError> {
        let request = self
            .http
            .post(base_url)
            .header(CONTENT_TYPE, TURTLE)
            .body(turtle);
        let response = self.send(request, Method::POST, base_url).await?;

        let location = response
            .headers()
            .get(LOCATION)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let body = self.read_body(response).await?;

        if body.trim().is_empty() {
            Ok(location.unwrap_or_default())
        } else {
            Ok(body)
        }
    }

    /// Snapshot the current state of `resource_uri` as a new version.
    pub async fn create_version(&self, resource_uri: &str) -> Result<(), FedoraError> {
        let url = format!("{resource_uri}/fcr:versions");
        let request = self.http.post(&url).header(CONTENT_TYPE, TURTLE);
        self.send(request, Method::POST, &url).await?;
        Ok(())
    }

    /// Overwrite the metadata of `resource_uri`.
    pub async fn replace(&self, resource_uri: &str, turtle: String) -> Result<(), FedoraError> {
        let request = self
            .http
            .put(resource_uri)
            .header(CONTENT_TYPE, TURTLE)
            .body(turtle);
        self.send(request, Method::PUT, resource_uri).await?;
        Ok(())
    }

    /// The Turtle representation of `resource_uri`.
    pub async fn fetch_turtle(&self, resource_uri: &str) -> Result<String, FedoraError> {
        let request = self.http.get(resource_uri).header(ACCEPT, TURTLE);
        let response = self.send(request, Method::GET, resource_uri).await?;
        self.read_body(response).await
    }

    pub async fn delete(&self, uri: &str) -> Result<(), FedoraError> {
        let request = self.http.delete(uri);
        self.send(request, Method::DELETE, uri).await?;
        Ok(())
    }

    /// Store `content` as a binary resource at `url`.
    pub async fn put_binary(
        &self,
        url: &str,
        content_type: &str,
        content: Vec<u8>,
    ) -> Result<(), FedoraError> {
        let request = self
            .http
            .put(url)
            .header(CONTENT_TYPE, content_type)
            .body(content);
        self.send(request, Method::PUT, url).await?;
        Ok(())
    }

    // --- helpers -------------------------------------------------------------

    async fn send(
        &self,
        request: RequestBuilder,
        method: Method,
        url: &str,
    ) -> Result<Response, FedoraError> {
        debug!(%method, url, "fedora request");

        let response = request
            .basic_auth(&self.credentials.username, Some(&self.credentials.password))
            .send()
            .await?;

        let status = response.status();
        if status.is_client_error() || status.is_server_error() {
            let body = self.read_body(response).await.unwrap_or_default();
            error!(%method, url, status = status.as_u16(), %body, "fedora error response");
            return Err(FedoraError::Repository {
                status: status.as_u16(),
                body,
            });
        }

        Ok(response)
    }

    async fn read_body(&self, mut response: Response) -> Result<String, FedoraError> {
        let limit = self.max_body_bytes;
        if response.content_length().is_some_and(|len| len as usize > limit) {
            return Err(FedoraError::ResponseTooLarge { limit });
        }

        let mut buf = Vec::new();
        while let Some(chunk) = response.chunk().await? {
            if buf.len() + chunk.len() > limit {
                return Err(FedoraError::ResponseTooLarge { limit });
            }
            buf.extend_from_slice(&chunk);
        }

        Ok(String::from_utf8_lossy(&buf).into_owned())
    }
}
