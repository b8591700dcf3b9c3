//! Registry HTTP API v2 client
//!
//! Implements the three requests the tool needs:
//! - Tag listing (GET /v2/{name}/tags/list)
//! - Manifest download (GET /v2/{name}/manifests/{reference})
//! - Manifest upload (PUT /v2/{name}/manifests/{reference})
//!
//! Requests are sent one at a time; every response body is read completely
//! before the call returns.

use crate::digest::DigestUtils;
use crate::error::handlers::{HttpErrorHandler, NetworkErrorHandler};
use crate::error::Result;
use crate::image::{ImageReference, MANIFEST_V2_MEDIA_TYPE, TagList};
use crate::logging::Logger;
use crate::registry::auth::Credentials;
use reqwest::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, RequestBuilder, StatusCode};

const USER_AGENT: &str = concat!("regtag/", env!("CARGO_PKG_VERSION"));
const DOCKER_CONTENT_DIGEST: &str = "Docker-Content-Digest";

pub struct RegistryClientBuilder {
    reference: ImageReference,
    credentials: Credentials,
    logger: Logger,
}

impl RegistryClientBuilder {
    pub fn new(reference: ImageReference) -> Self {
        Self {
            reference,
            credentials: Credentials::anonymous(),
            logger: Logger::default(),
        }
    }

    pub fn with_credentials(mut self, credentials: Credentials) -> Self {
        self.credentials = credentials;
        self
    }

    pub fn with_logger(mut self, logger: Logger) -> Self {
        self.logger = logger;
        self
    }

    pub fn build(self) -> Result<RegistryClient> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| NetworkErrorHandler::handle_network_error(&e, "client setup"))?;

        Ok(RegistryClient {
            client,
            reference: self.reference,
            credentials: self.credentials,
            logger: self.logger,
        })
    }
}

/// Client bound to one repository on one registry
pub struct RegistryClient {
    client: Client,
    reference: ImageReference,
    credentials: Credentials,
    logger: Logger,
}

impl RegistryClient {
    pub fn builder(reference: ImageReference) -> RegistryClientBuilder {
        RegistryClientBuilder::new(reference)
    }

    pub fn reference(&self) -> &ImageReference {
        &self.reference
    }

    pub fn logger(&self) -> &Logger {
        &self.logger
    }

    /// List all tags of the repository, in the order the registry returns them
    pub async fn list_tags(&self) -> Result<Vec<String>> {
        let url = self.reference.tags_url();
        self.logger.verbose(&format!("GET {}", url));

        let response = self
            .authorize(self.client.get(&url))
            .send()
            .await
            .map_err(|e| NetworkErrorHandler::handle_network_error(&e, "tag listing"))?;

        if response.status() != StatusCode::OK {
            return Err(HttpErrorHandler::unexpected_status(response, "listing tags").await);
        }

        let body = response
            .text()
            .await
            .map_err(|e| NetworkErrorHandler::handle_network_error(&e, "tag listing"))?;
        let tag_list = TagList::from_json(&body)?;

        self.logger.detail(&format!(
            "Found {} tags for {}",
            tag_list.tags.len(),
            tag_list.name
        ));

        Ok(tag_list.tags)
    }

    /// Fetch the raw v2 manifest of `tag`
    pub async fn get_manifest(&self, tag: &str) -> Result<String> {
        let url = self.reference.manifest_url(tag);
        self.logger.verbose(&format!("GET {}", url));

        let response = self
            .authorize(self.client.get(&url).header(ACCEPT, MANIFEST_V2_MEDIA_TYPE))
            .send()
            .await
            .map_err(|e| NetworkErrorHandler::handle_network_error(&e, "manifest download"))?;

        if response.status() != StatusCode::OK {
            return Err(HttpErrorHandler::unexpected_status(response, "getting manifest").await);
        }

        response
            .text()
            .await
            .map_err(|e| NetworkErrorHandler::handle_network_error(&e, "manifest download"))
    }

    /// Store `manifest` under `tag`. Only `201 Created` counts as success.
    pub async fn put_manifest(&self, tag: &str, manifest: &str) -> Result<()> {
        let url = self.reference.manifest_url(tag);
        self.logger.verbose(&format!("PUT {}", url));

        let response = self
            .authorize(
                self.client
                    .put(&url)
                    .header(CONTENT_TYPE, MANIFEST_V2_MEDIA_TYPE)
                    .body(manifest.to_string()),
            )
            .send()
            .await
            .map_err(|e| NetworkErrorHandler::handle_network_error(&e, "manifest upload"))?;

        if response.status() != StatusCode::CREATED {
            return Err(HttpErrorHandler::unexpected_status(response, "tagging").await);
        }

        let local = DigestUtils::compute_docker_digest(manifest.as_bytes());
        let remote = response
            .headers()
            .get(DOCKER_CONTENT_DIGEST)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("-")
            .to_string();
        self.logger.summary_kv(
            "Manifest stored",
            &[
                ("tag", tag.to_string()),
                ("manifest digest", local),
                ("registry digest", remote),
            ],
        );

        Ok(())
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match self.credentials.authorization_header() {
            Some(header) => request.header(AUTHORIZATION, header),
            None => request,
        }
    }
}

