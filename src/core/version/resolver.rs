// ─── Version Graph Resolver ───
// Loads a descriptor and its optional parent, merging both into one
// effective descriptor and deriving the loader flavor exactly once.

use tracing::{debug, info};

use crate::core::error::{LauncherError, LauncherResult};
use crate::core::paths::GamePaths;
use crate::core::version::descriptor::VersionDescriptor;
use crate::core::version::manifest::VersionManifest;

pub const VANILLA_MAIN_CLASS: &str = "net.minecraft.client.main.Main";
pub const FORGE_BOOTSTRAP_MAIN_CLASS: &str = "cpw.mods.bootstraplauncher.BootstrapLauncher";
pub const FABRIC_KNOT_MAIN_CLASS: &str = "net.fabricmc.loader.impl.launch.knot.KnotClient";

/// Which bootstrap the merged descriptor targets. Computed once during
/// resolution and threaded through later stages; nothing downstream
/// re-derives it from strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoaderFlavor {
    Vanilla,
    ForgeModern,
    FabricModern,
    Other,
}

impl LoaderFlavor {
    pub fn from_main_class(main_class: Option<&str>) -> Self {
        match main_class {
            Some(FORGE_BOOTSTRAP_MAIN_CLASS) => LoaderFlavor::ForgeModern,
            Some(FABRIC_KNOT_MAIN_CLASS) => LoaderFlavor::FabricModern,
            Some(VANILLA_MAIN_CLASS) | None => LoaderFlavor::Vanilla,
            Some(_) => LoaderFlavor::Other,
        }
    }
}

/// The effective descriptor plus everything resolution learned about it.
#[derive(Debug, Clone)]
pub struct ResolvedVersion {
    pub id: String,
    pub parent_id: Option<String>,
    /// Child merged over parent.
    pub descriptor: VersionDescriptor,
    /// The unmerged child, kept for its own client jar metadata.
    pub child: VersionDescriptor,
    /// The unmerged parent, kept for the parent jar metadata.
    pub parent: Option<VersionDescriptor>,
    pub flavor: LoaderFlavor,
}

impl ResolvedVersion {
    pub fn main_class(&self) -> LauncherResult<&str> {
        self.descriptor
            .main_class
            .as_deref()
            .ok_or_else(|| LauncherError::Other(format!("No mainClass in descriptor '{}'", self.id)))
    }

    pub fn asset_index_id(&self) -> &str {
        self.descriptor.asset_index_id()
    }
}

pub struct VersionResolver<'a> {
    client: &'a reqwest::Client,
    paths: &'a GamePaths,
}

impl<'a> VersionResolver<'a> {
    pub fn new(client: &'a reqwest::Client, paths: &'a GamePaths) -> Self {
        Self { client, paths }
    }

    /// Resolve `id` into an effective descriptor, fetching what is missing.
    ///
    /// Parents named by `inheritsFrom` are always treated as vanilla and
    /// ensured before merging.
    pub async fn resolve(&self, id: &str) -> LauncherResult<ResolvedVersion> {
        let child = self.ensure_descriptor(id, false).await?;

        let parent_id = child.inherits_from.clone();
        let (descriptor, parent) = match &parent_id {
            Some(parent_id) => {
                debug!("'{}' inherits from '{}'", id, parent_id);
                let parent = self.ensure_descriptor(parent_id, true).await?;
                (VersionDescriptor::merged(&parent, &child), Some(parent))
            }
            None => (child.clone(), None),
        };

        let flavor = LoaderFlavor::from_main_class(descriptor.main_class.as_deref());
        info!("Resolved '{}' as {:?}", id, flavor);

        Ok(ResolvedVersion {
            id: id.to_string(),
            parent_id,
            descriptor,
            child,
            parent,
            flavor,
        })
    }

    /// Load the on-disk descriptor, downloading it from the upstream
    /// manifest when absent and the id is downloadable.
    async fn ensure_descriptor(
        &self,
        id: &str,
        treat_as_vanilla: bool,
    ) -> LauncherResult<VersionDescriptor> {
        let path = self.paths.descriptor_path(id);

        if !path.exists() {
            if !treat_as_vanilla && has_loader_marker(id) {
                // Loader descriptors are produced by their installers; we
                // cannot synthesize one.
                return Err(LauncherError::MissingInstallation(id.to_string()));
            }
            self.fetch_vanilla_descriptor(id).await?;
        }

        let raw = tokio::fs::read_to_string(&path)
            .await
            .map_err(|source| LauncherError::Io { path, source })?;
        Ok(serde_json::from_str(&raw)?)
    }

    async fn fetch_vanilla_descriptor(&self, id: &str) -> LauncherResult<()> {
        info!("Descriptor '{}' missing locally, fetching from upstream", id);

        let manifest = VersionManifest::fetch(self.client).await?;
        let entry = manifest
            .find_version(id)
            .ok_or_else(|| LauncherError::VersionNotFound(id.to_string()))?;

        let raw = self.client.get(&entry.url).send().await?.text().await?;
        // Validate before persisting a possibly truncated body.
        let _: VersionDescriptor = serde_json::from_str(&raw)?;

        let path = self.paths.descriptor_path(id);
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|source| LauncherError::Io {
                    path: parent.to_path_buf(),
                    source,
                })?;
        }
        tokio::fs::write(&path, &raw)
            .await
            .map_err(|source| LauncherError::Io { path, source })?;
        Ok(())
    }
}

/// A branded id (installed out-of-band by a loader installer) must not be
/// fetched from the vanilla manifest.
fn has_loader_marker(id: &str) -> bool {
    let lowered = id.to_lowercase();
    ["forge", "fabric", "optifine"]
        .iter()
        .any(|marker| lowered.contains(marker))
}
