//! Remote location handling
//!
//! Every metadata document of a collection is assumed to live next to the
//! configured sample document, named either `{edition}.json` or `{edition}`.
//! Images are referenced from metadata by a content locator of the form
//! `<scheme>://<contentId>/<originalFileName>` and are re-addressed against
//! a gateway using the edition number as the file name.

mod naming;

pub use naming::{image_extension, image_file_name, metadata_file_name};

/// Derives remote URLs for editions of a single collection
#[derive(Debug, Clone)]
pub struct AssetLocator {
    /// Sample URL with its trailing path segment removed
    metadata_base: String,
    /// Whether sibling documents carry a `.json` suffix
    json_suffix: bool,
    /// Gateway that content identifiers are resolved against
    gateway_base: String,
}

impl AssetLocator {
    /// Creates a locator from the sample metadata URL and the gateway base
    ///
    /// # Example
    ///
    /// ```
    /// use edition_harvester::locator::AssetLocator;
    ///
    /// let locator = AssetLocator::new("https://ipfs.io/ipfs/QmMeta/0.json", "https://ipfs.io/ipfs");
    /// assert_eq!(locator.metadata_url(42), "https://ipfs.io/ipfs/QmMeta/42.json");
    /// ```
    pub fn new(sample_metadata_url: &str, gateway_base: &str) -> Self {
        let metadata_base = match sample_metadata_url.rfind('/') {
            Some(idx) => sample_metadata_url[..idx].to_string(),
            None => sample_metadata_url.to_string(),
        };

        Self {
            metadata_base,
            json_suffix: sample_metadata_url.ends_with(".json"),
            gateway_base: gateway_base.trim_end_matches('/').to_string(),
        }
    }

    /// Returns the remote metadata URL for an edition
    pub fn metadata_url(&self, edition: u64) -> String {
        if self.json_suffix {
            format!("{}/{}.json", self.metadata_base, edition)
        } else {
            format!("{}/{}", self.metadata_base, edition)
        }
    }

    /// Returns the gateway URL of an edition's image
    ///
    /// The content identifier is the third `/`-separated segment of the
    /// locator. When a file name segment follows it, the image is addressed
    /// as `{gateway}/{cid}/{edition}.{ext}`; otherwise the content
    /// identifier itself is the image.
    ///
    /// Returns `None` when the locator has no content identifier.
    pub fn image_url(&self, edition: u64, image_locator: &str) -> Option<String> {
        let segments: Vec<&str> = image_locator.split('/').collect();
        let cid = segments.get(2).filter(|cid| !cid.is_empty())?;

        let extension = segments.get(3).and_then(|file_name| {
            file_name
                .rfind('.')
                .map(|idx| &file_name[idx + 1..])
                .filter(|ext| !ext.is_empty())
        });

        Some(match extension {
            Some(ext) => format!("{}/{}/{}.{}", self.gateway_base, cid, edition, ext),
            None => format!("{}/{}", self.gateway_base, cid),
        })
    }

    pub fn gateway_base(&self) -> &str {
        &self.gateway_base
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const GATEWAY: &str = "https://ipfs.io/ipfs";

    #[test]
    fn test_metadata_url_with_json_suffix() {
        let locator = AssetLocator::new("https://ipfs.io/ipfs/QmDir/0.json", GATEWAY);
        assert_eq!(locator.metadata_url(42), "https://ipfs.io/ipfs/QmDir/42.json");
    }

    #[test]
    fn test_metadata_url_without_extension() {
        let locator = AssetLocator::new("https://ipfs.io/ipfs/QmDir/meta", GATEWAY);
        assert_eq!(locator.metadata_url(7), "https://ipfs.io/ipfs/QmDir/7");
    }

    #[test]
    fn test_image_url_renames_to_edition() {
        let locator = AssetLocator::new("https://ipfs.io/ipfs/QmDir/0.json", GATEWAY);
        assert_eq!(
            locator.image_url(9, "ipfs://CIDXYZ/1.png").as_deref(),
            Some("https://ipfs.io/ipfs/CIDXYZ/9.png")
        );
    }

    #[test]
    fn test_image_url_without_file_segment() {
        let locator = AssetLocator::new("https://ipfs.io/ipfs/QmDir/0.json", GATEWAY);
        assert_eq!(
            locator.image_url(9, "ipfs://CIDXYZ").as_deref(),
            Some("https://ipfs.io/ipfs/CIDXYZ")
        );
        assert_eq!(
            locator.image_url(123, "ipfs://CIDXYZ").as_deref(),
            Some("https://ipfs.io/ipfs/CIDXYZ")
        );
    }

    #[test]
    fn test_image_url_file_segment_without_extension() {
        let locator = AssetLocator::new("https://ipfs.io/ipfs/QmDir/0.json", GATEWAY);
        assert_eq!(
            locator.image_url(3, "ipfs://CIDXYZ/artwork").as_deref(),
            Some("https://ipfs.io/ipfs/CIDXYZ")
        );
    }

    #[test]
    fn test_image_url_uses_last_dot() {
        let locator = AssetLocator::new("https://ipfs.io/ipfs/QmDir/0.json", GATEWAY);
        assert_eq!(
            locator.image_url(5, "ipfs://CIDXYZ/my.image.jpeg").as_deref(),
            Some("https://ipfs.io/ipfs/CIDXYZ/5.jpeg")
        );
    }

    #[test]
    fn test_image_url_rejects_locator_without_cid() {
        let locator = AssetLocator::new("https://ipfs.io/ipfs/QmDir/0.json", GATEWAY);
        assert_eq!(locator.image_url(1, "CIDXYZ"), None);
        assert_eq!(locator.image_url(1, "ipfs://"), None);
    }

    #[test]
    fn test_gateway_trailing_slash_is_trimmed() {
        let locator = AssetLocator::new("https://x.io/QmDir/0.json", "https://gw.example.com/ipfs/");
        assert_eq!(locator.gateway_base(), "https://gw.example.com/ipfs");
        assert_eq!(
            locator.image_url(2, "ipfs://Qm/1.gif").as_deref(),
            Some("https://gw.example.com/ipfs/Qm/2.gif")
        );
    }
}
