//! Shared wiremock setup for registry tests
//!
//! In a test file:
//! ```ignore
//! mod common;
//! use common::*;
//! ```

#![allow(dead_code)]

use regtag::image::MANIFEST_V2_MEDIA_TYPE;
use regtag::{Credentials, ImageReference, Logger, RegistryClient};
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const REPO: &str = "team/app";

/// A v2 manifest whose config has `config_digest`
pub fn manifest_json(config_digest: &str) -> String {
    serde_json::json!({
        "schemaVersion": 2,
        "mediaType": MANIFEST_V2_MEDIA_TYPE,
        "config": {
            "mediaType": "application/vnd.docker.container.image.v1+json",
            "size": 1469,
            "digest": config_digest
        },
        "layers": [{
            "mediaType": "application/vnd.docker.image.rootfs.diff.tar.gzip",
            "size": 2811478,
            "digest": "sha256:4f4fb700ef54461cfa02571ae0db9a0dc1e0cdb5577484a6d75e68dc38e8acc1"
        }]
    })
    .to_string()
}

/// `{server}/{REPO}:{tag}` as typed on the command line
pub fn image_for(server: &MockServer, tag: &str) -> String {
    format!("{}/{}:{}", server.uri(), REPO, tag)
}

pub fn reference_for(server: &MockServer, tag: &str) -> ImageReference {
    ImageReference::parse(&image_for(server, tag)).unwrap()
}

pub fn client_for(server: &MockServer, credentials: Credentials) -> RegistryClient {
    RegistryClient::builder(reference_for(server, "latest"))
        .with_credentials(credentials)
        .with_logger(Logger::new_quiet())
        .build()
        .unwrap()
}

pub fn tags_path() -> String {
    format!("/v2/{}/tags/list", REPO)
}

pub fn manifest_path(tag: &str) -> String {
    format!("/v2/{}/manifests/{}", REPO, tag)
}

pub async fn mock_tag_list(server: &MockServer, tags: &[&str]) {
    Mock::given(method("GET"))
        .and(path(tags_path()))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "name": REPO,
                "tags": tags
            })),
        )
        .mount(server)
        .await;
}

/// Manifest for `tag` that must be fetched exactly once
pub async fn mock_manifest(server: &MockServer, tag: &str, config_digest: &str) {
    Mock::given(method("GET"))
        .and(path(manifest_path(tag)))
        .and(header("accept", MANIFEST_V2_MEDIA_TYPE))
        .respond_with(ResponseTemplate::new(200).set_body_string(manifest_json(config_digest)))
        .expect(1)
        .mount(server)
        .await;
}

pub async fn mock_manifest_status(server: &MockServer, tag: &str, status: u16, body: &str) {
    Mock::given(method("GET"))
        .and(path(manifest_path(tag)))
        .respond_with(ResponseTemplate::new(status).set_body_string(body))
        .mount(server)
        .await;
}

pub async fn mock_put_manifest(server: &MockServer, tag: &str, status: u16) {
    Mock::given(method("PUT"))
        .and(path(manifest_path(tag)))
        .and(header("content-type", MANIFEST_V2_MEDIA_TYPE))
        .respond_with(ResponseTemplate::new(status))
        .mount(server)
        .await;
}
