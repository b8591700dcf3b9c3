use crate::digest::DigestUtils;
use crate::error::{Result, ResultExt};
use crate::image::ImageManifest;
use crate::output::TagTable;
use crate::registry::RegistryClient;

/// Fetch `tag`'s manifest and return its config digest.
async fn config_digest(client: &RegistryClient, tag: &str) -> Result<String> {
    let url = client.reference().manifest_url(tag);
    let body = client
        .get_manifest(tag)
        .await
        .with_context(|| format!("failed to get manifest on {}", url))?;
    let manifest = ImageManifest::from_json(&body)
        .with_context(|| format!("unmarshal of manifest {} failed", url))?;

    Ok(manifest.config.digest)
}

/// Build the table of tags whose config digest equals `base_tag`'s.
///
/// The base tag is always the first row; the remaining rows follow the order
/// of the registry's tag list. A failed fetch or decode of any tag aborts.
pub async fn find_equivalent_tags(client: &RegistryClient, base_tag: &str) -> Result<TagTable> {
    let tags = client.list_tags().await.context("listTags failed")?;

    let base_digest = config_digest(client, base_tag).await?;
    if !DigestUtils::is_well_formed(&base_digest) {
        warn_malformed_digest(client, &base_digest);
    }

    let mut table = TagTable::new();
    table.push(base_tag, base_digest.as_str());

    for tag in tags.iter().filter(|t| t.as_str() != base_tag) {
        let digest = config_digest(client, tag).await?;
        if digest == base_digest {
            table.push(tag.as_str(), digest);
        }
    }

    Ok(table)
}

/// Store `base_tag`'s manifest under `new_tag` in the same repository.
pub async fn copy_tag(client: &RegistryClient, base_tag: &str, new_tag: &str) -> Result<()> {
    let reference = client.reference();
    let manifest = client
        .get_manifest(base_tag)
        .await
        .with_context(|| format!("failed to get manifest on {}", reference.manifest_url(base_tag)))?;

    client
        .put_manifest(new_tag, &manifest)
        .await
        .with_context(|| format!("failed to set tag on {}", reference.manifest_url(new_tag)))
}

fn warn_malformed_digest(client: &RegistryClient, digest: &str) {
    client.logger().warning(&format!(
        "config digest {} of {} is not in algorithm:hex form",
        DigestUtils::format_digest_short(digest),
        client.reference()
    ));
}
