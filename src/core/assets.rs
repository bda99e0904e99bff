use std::collections::HashMap;

use serde::Deserialize;

/// Host serving content-addressed asset objects.
pub const RESOURCES_URL: &str = "https://resources.download.minecraft.net";

/// Parsed asset index: asset name → object metadata.
#[derive(Debug, Deserialize)]
pub struct AssetIndex {
    pub objects: HashMap<String, AssetObject>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AssetObject {
    pub hash: String,
    pub size: u64,
}

impl AssetObject {
    /// Download URL on the content-addressed host. A malformed index entry
    /// with a short hash yields a harmless short prefix instead of a panic.
    pub fn url(&self) -> String {
        let prefix = &self.hash[..2.min(self.hash.len())];
        format!("{}/{}/{}", RESOURCES_URL, prefix, self.hash)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn object_url_uses_hash_prefix() {
        let object = AssetObject {
            hash: "abcdef1234567890".into(),
            size: 42,
        };
        assert_eq!(
            object.url(),
            "https://resources.download.minecraft.net/ab/abcdef1234567890"
        );
    }

    #[test]
    fn short_hash_yields_short_prefix() {
        let object = AssetObject {
            hash: "a".into(),
            size: 1,
        };
        assert_eq!(object.url(), "https://resources.download.minecraft.net/a/a");
    }

    #[test]
    fn index_deserializes() {
        let index: AssetIndex = serde_json::from_value(serde_json::json!({
            "objects": {
                "minecraft/sounds/ambient/cave/cave1.ogg": {
                    "hash": "c0cb2242ef2a40d1f9a5f1e7a3e6e2f1e3f4a5b6",
                    "size": 3625
                }
            }
        }))
        .unwrap();
        assert_eq!(index.objects.len(), 1);
    }
}
