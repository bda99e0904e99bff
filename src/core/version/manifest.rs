// ─── Version Manifest ───
// Fetching and parsing the upstream Mojang version manifest.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use tracing::info;

use crate::core::error::LauncherResult;

const VERSION_MANIFEST_URL: &str =
    "https://launchermeta.mojang.com/mc/game/version_manifest.json";

/// Top-level Mojang version manifest.
#[derive(Debug, Deserialize)]
pub struct VersionManifest {
    pub versions: Vec<VersionEntry>,
}

/// A single entry in the manifest.
#[derive(Debug, Clone, Deserialize)]
pub struct VersionEntry {
    pub id: String,
    #[serde(rename = "type")]
    pub version_type: String,
    pub url: String,
    #[serde(rename = "releaseTime")]
    #[serde(default)]
    pub release_time: Option<DateTime<Utc>>,
}

impl VersionManifest {
    /// Fetch the manifest using a shared HTTP client.
    pub async fn fetch(client: &reqwest::Client) -> LauncherResult<Self> {
        let manifest: VersionManifest = client
            .get(VERSION_MANIFEST_URL)
            .send()
            .await?
            .json()
            .await?;

        info!("Loaded {} versions from the upstream manifest", manifest.versions.len());
        Ok(manifest)
    }

    /// Find a specific version entry by id (e.g. "1.20.4").
    pub fn find_version(&self, id: &str) -> Option<&VersionEntry> {
        self.versions.iter().find(|v| v.id == id)
    }

    /// All stable releases.
    pub fn releases(&self) -> Vec<&VersionEntry> {
        self.versions
            .iter()
            .filter(|v| v.version_type == "release")
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserialize_manifest_entry() {
        let json = r#"{
            "id": "1.20.4",
            "type": "release",
            "url": "https://example.com/1.20.4.json",
            "releaseTime": "2023-12-07T08:00:00+00:00"
        }"#;
        let entry: VersionEntry = serde_json::from_str(json).unwrap();
        assert_eq!(entry.id, "1.20.4");
        assert_eq!(entry.version_type, "release");
        assert!(entry.release_time.is_some());
    }

    #[test]
    fn find_and_filter() {
        let manifest: VersionManifest = serde_json::from_value(serde_json::json!({
            "versions": [
                {"id": "1.20.4", "type": "release", "url": "https://example.com/a.json"},
                {"id": "24w09a", "type": "snapshot", "url": "https://example.com/b.json"}
            ]
        }))
        .unwrap();

        assert!(manifest.find_version("1.20.4").is_some());
        assert!(manifest.find_version("nope").is_none());
        assert_eq!(manifest.releases().len(), 1);
    }
}
