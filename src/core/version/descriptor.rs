// ─── Version Descriptor ───
// Typed model of a version JSON, covering both manifest generations:
// legacy `minecraftArguments` strings and modern rule-gated `arguments`.

use std::collections::HashMap;

use serde::Deserialize;
use tracing::debug;

use crate::core::error::{LauncherError, LauncherResult};
use crate::core::maven::MavenArtifact;
use crate::core::rules::{current_os_name, Rule};

/// One launchable version as described by `<versions>/<id>/<id>.json`.
/// Immutable once loaded.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VersionDescriptor {
    pub id: Option<String>,
    #[serde(default)]
    pub inherits_from: Option<String>,
    pub main_class: Option<String>,
    #[serde(rename = "type")]
    pub release_type: Option<String>,
    #[serde(default)]
    pub asset_index: Option<AssetIndexRef>,
    #[serde(default)]
    pub libraries: Vec<LibraryEntry>,
    pub downloads: Option<VersionDownloads>,
    /// Legacy flat template (pre-1.13).
    #[serde(default)]
    pub minecraft_arguments: Option<String>,
    /// Modern rule-gated argument arrays (1.13+).
    #[serde(default)]
    pub arguments: Option<ModernArguments>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AssetIndexRef {
    pub id: String,
    pub url: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct VersionDownloads {
    pub client: Option<DownloadArtifact>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DownloadArtifact {
    pub url: String,
    #[serde(default)]
    pub sha1: Option<String>,
    #[serde(default)]
    pub size: Option<u64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ModernArguments {
    #[serde(default)]
    pub jvm: Vec<ArgumentEntry>,
    #[serde(default)]
    pub game: Vec<ArgumentEntry>,
}

/// A modern argument entry: a bare token or a rule-gated value.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ArgumentEntry {
    Plain(String),
    Conditional {
        #[serde(default)]
        rules: Vec<Rule>,
        value: ArgumentValue,
    },
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ArgumentValue {
    Single(String),
    List(Vec<String>),
}

impl ArgumentValue {
    pub fn tokens(&self) -> &[String] {
        match self {
            ArgumentValue::Single(s) => std::slice::from_ref(s),
            ArgumentValue::List(list) => list,
        }
    }
}

/// The two argument dialects as one tagged union, consumed by a single
/// synthesis entry point.
#[derive(Debug)]
pub enum ArgumentDialect<'a> {
    Legacy(&'a str),
    Modern(&'a ModernArguments),
}

impl VersionDescriptor {
    /// Select the argument dialect, legacy winning when both exist
    /// (a descriptor carrying `minecraftArguments` targets the old parser).
    pub fn dialect(&self) -> LauncherResult<ArgumentDialect<'_>> {
        if let Some(template) = &self.minecraft_arguments {
            return Ok(ArgumentDialect::Legacy(template));
        }
        if let Some(arguments) = &self.arguments {
            return Ok(ArgumentDialect::Modern(arguments));
        }
        Err(LauncherError::UnsupportedManifest(
            self.id.clone().unwrap_or_else(|| "<unknown>".into()),
        ))
    }

    /// URL of the client jar, when the descriptor carries one.
    pub fn client_url(&self) -> Option<&str> {
        self.downloads
            .as_ref()
            .and_then(|d| d.client.as_ref())
            .map(|c| c.url.as_str())
    }

    /// Merge a child descriptor over its parent: the child overrides every
    /// scalar field, libraries are concatenated parent-then-child.
    pub fn merged(parent: &VersionDescriptor, child: &VersionDescriptor) -> VersionDescriptor {
        let mut libraries = parent.libraries.clone();
        libraries.extend(child.libraries.iter().cloned());

        VersionDescriptor {
            id: child.id.clone().or_else(|| parent.id.clone()),
            inherits_from: child.inherits_from.clone(),
            main_class: child.main_class.clone().or_else(|| parent.main_class.clone()),
            release_type: child
                .release_type
                .clone()
                .or_else(|| parent.release_type.clone()),
            asset_index: child
                .asset_index
                .clone()
                .or_else(|| parent.asset_index.clone()),
            libraries,
            downloads: child.downloads.clone().or_else(|| parent.downloads.clone()),
            minecraft_arguments: child
                .minecraft_arguments
                .clone()
                .or_else(|| parent.minecraft_arguments.clone()),
            arguments: child.arguments.clone().or_else(|| parent.arguments.clone()),
        }
    }

    /// Asset index id, defaulting to Mojang's pre-index era name.
    pub fn asset_index_id(&self) -> &str {
        self.asset_index.as_ref().map(|a| a.id.as_str()).unwrap_or("legacy")
    }
}

// ─── Library Entries ───

#[derive(Debug, Clone, Deserialize)]
pub struct LibraryEntry {
    pub name: String,
    #[serde(default)]
    pub rules: Option<Vec<Rule>>,
    /// Per-OS native classifier names (`{"linux": "natives-linux"}`).
    #[serde(default)]
    pub natives: Option<HashMap<String, String>>,
    #[serde(default)]
    pub downloads: Option<LibraryDownloads>,
    /// Custom repository base URL (Fabric/legacy Forge metadata).
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub extract: Option<ExtractRules>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LibraryDownloads {
    pub artifact: Option<LibraryArtifact>,
    #[serde(default)]
    pub classifiers: Option<HashMap<String, LibraryArtifact>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LibraryArtifact {
    pub path: String,
    pub url: String,
    #[serde(default)]
    pub sha1: Option<String>,
    #[serde(default)]
    pub size: Option<u64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ExtractRules {
    #[serde(default)]
    pub exclude: Vec<String>,
}

impl LibraryEntry {
    pub fn rules(&self) -> &[Rule] {
        self.rules.as_deref().unwrap_or(&[])
    }

    fn explicit_artifact(&self) -> Option<&LibraryArtifact> {
        self.downloads.as_ref().and_then(|d| d.artifact.as_ref())
    }

    fn classifiers(&self) -> Option<&HashMap<String, LibraryArtifact>> {
        self.downloads.as_ref().and_then(|d| d.classifiers.as_ref())
    }

    /// Whether this entry ships a platform-specific native component.
    pub fn has_native_component(&self) -> bool {
        self.natives.is_some() || self.classifiers().is_some()
    }

    /// Relative path of the main artifact under the libraries root.
    ///
    /// Explicit download metadata wins; otherwise a Maven layout path is
    /// synthesized from the coordinate. Classifier-only entries have no
    /// main artifact.
    pub fn artifact_rel_path(&self) -> Option<String> {
        if let Some(artifact) = self.explicit_artifact() {
            return Some(artifact.path.clone());
        }

        if self.classifiers().is_some() || self.natives.is_some() {
            return None;
        }

        match MavenArtifact::parse(&self.name) {
            Ok(artifact) => Some(artifact.relative_path()),
            Err(_) => {
                debug!("Cannot derive a path for library '{}'", self.name);
                None
            }
        }
    }

    /// Source URL for the main artifact.
    ///
    /// Precedence: custom repository base + path > explicit artifact URL >
    /// default host chosen by group.
    pub fn artifact_url(&self, rel_path: &str) -> Option<String> {
        if let Some(repo) = &self.url {
            return Some(format!("{}/{}", repo.trim_end_matches('/'), rel_path));
        }
        if let Some(artifact) = self.explicit_artifact() {
            return Some(artifact.url.clone());
        }
        MavenArtifact::parse(&self.name)
            .ok()
            .map(|a| a.url(a.default_repository()))
    }

    /// SHA-1 of the main artifact, when explicit metadata carries one.
    pub fn artifact_sha1(&self) -> Option<String> {
        self.explicit_artifact().and_then(|a| a.sha1.clone())
    }

    /// Classifier key for the current platform: the OS map entry when
    /// declared, else the `natives-<os>` convention. `${arch}` resolves to
    /// the pointer width as in the historical manifests.
    pub fn native_classifier_key(&self) -> String {
        let os = current_os_name();
        self.natives
            .as_ref()
            .and_then(|map| map.get(os))
            .map(|key| key.replace("${arch}", if cfg!(target_pointer_width = "64") { "64" } else { "32" }))
            .unwrap_or_else(|| format!("natives-{os}"))
    }

    /// The native classifier artifact matching the current platform.
    pub fn native_artifact(&self) -> Option<&LibraryArtifact> {
        self.classifiers()?.get(&self.native_classifier_key())
    }

    /// Entry-name prefixes skipped during native extraction.
    pub fn extract_excludes(&self) -> &[String] {
        self.extract.as_ref().map(|e| e.exclude.as_slice()).unwrap_or(&[])
    }
}
