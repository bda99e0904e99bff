// ─── Dependency Planner ───
// Computes the minimal set of missing artifacts as download tasks.
// A task is only created when its destination is absent, so planning the
// same version twice in a row yields an empty second plan.

use tracing::{debug, warn};

use crate::core::assets::AssetIndex;
use crate::core::downloader::{Downloader, DownloadTask};
use crate::core::error::{LauncherError, LauncherResult};
use crate::core::paths::GamePaths;
use crate::core::rules::{decide, FeatureSet};
use crate::core::version::{LoaderFlavor, ResolvedVersion};

pub struct DependencyPlanner<'a> {
    paths: &'a GamePaths,
}

impl<'a> DependencyPlanner<'a> {
    pub fn new(paths: &'a GamePaths) -> Self {
        Self { paths }
    }

    /// Plan every missing artifact for `resolved`. Task order is irrelevant
    /// to correctness; the orchestrator runs them unordered anyway.
    ///
    /// The asset index itself is fetched eagerly here when missing, because
    /// its contents determine the rest of the asset plan.
    pub async fn plan(
        &self,
        resolved: &ResolvedVersion,
        downloader: &Downloader,
    ) -> LauncherResult<Vec<DownloadTask>> {
        let mut tasks = Vec::new();

        self.plan_version_jars(resolved, &mut tasks);
        self.plan_libraries(resolved, &mut tasks);
        self.plan_assets(resolved, downloader, &mut tasks).await?;

        // Duplicate library entries (per-OS rule variants) must not race two
        // writers on one destination.
        let mut seen = std::collections::HashSet::new();
        tasks.retain(|task| seen.insert(task.dest.clone()));

        debug!("Planned {} download tasks for '{}'", tasks.len(), resolved.id);
        Ok(tasks)
    }

    fn plan_version_jars(&self, resolved: &ResolvedVersion, tasks: &mut Vec<DownloadTask>) {
        let main_jar = self.paths.version_jar(&resolved.id);
        if !main_jar.exists() {
            if let Some(url) = resolved.child.client_url() {
                tasks.push(DownloadTask::new(url, main_jar, format!("{}.jar", resolved.id)));
            }
        }

        // Modern Forge assembles its own jar hierarchy; its parent jar is
        // not ours to stage.
        if resolved.flavor == LoaderFlavor::ForgeModern {
            return;
        }

        if let (Some(parent_id), Some(parent)) = (&resolved.parent_id, &resolved.parent) {
            let parent_jar = self.paths.version_jar(parent_id);
            if !parent_jar.exists() {
                if let Some(url) = parent.client_url() {
                    tasks.push(DownloadTask::new(url, parent_jar, format!("{parent_id}.jar")));
                }
            }
        }
    }

    fn plan_libraries(&self, resolved: &ResolvedVersion, tasks: &mut Vec<DownloadTask>) {
        // Library inclusion is OS-conditional only; no features apply.
        let features = FeatureSet::new();

        for lib in &resolved.descriptor.libraries {
            if !decide(lib.rules(), &features) {
                debug!("Skipping library (rules): {}", lib.name);
                continue;
            }

            if let Some(rel_path) = lib.artifact_rel_path() {
                let dest = self.paths.library_path(&rel_path);
                if !dest.exists() {
                    match lib.artifact_url(&rel_path) {
                        Some(url) => {
                            let mut task = DownloadTask::new(url, dest, lib.name.clone());
                            if let Some(sha1) = lib.artifact_sha1() {
                                task = task.with_sha1(sha1);
                            }
                            tasks.push(task);
                        }
                        None => {
                            warn!("No URL derivable for library '{}', skipping", lib.name);
                        }
                    }
                }
            }

            if lib.has_native_component() {
                if let Some(native) = lib.native_artifact() {
                    let dest = self.paths.library_path(&native.path);
                    if !dest.exists() {
                        let mut task = DownloadTask::new(
                            native.url.clone(),
                            dest,
                            format!("{} (natives)", lib.name),
                        );
                        if let Some(sha1) = &native.sha1 {
                            task = task.with_sha1(sha1.clone());
                        }
                        tasks.push(task);
                    }
                }
            }
        }
    }

    async fn plan_assets(
        &self,
        resolved: &ResolvedVersion,
        downloader: &Downloader,
        tasks: &mut Vec<DownloadTask>,
    ) -> LauncherResult<()> {
        let Some(index_ref) = &resolved.descriptor.asset_index else {
            return Ok(());
        };

        let index_path = self.paths.asset_index_path(&index_ref.id);
        if !index_path.exists() {
            match &index_ref.url {
                Some(url) => downloader.download_file(url, &index_path, None).await?,
                None => {
                    warn!("Asset index '{}' has no URL and is not cached", index_ref.id);
                    return Ok(());
                }
            }
        }

        let raw = tokio::fs::read_to_string(&index_path)
            .await
            .map_err(|source| LauncherError::Io {
                path: index_path,
                source,
            })?;
        let index: AssetIndex = serde_json::from_str(&raw)?;

        for object in index.objects.values() {
            let dest = self.paths.asset_object_path(&object.hash);
            if !dest.exists() {
                tasks.push(
                    DownloadTask::new(object.url(), dest, object.hash[..10.min(object.hash.len())].to_string())
                        .with_sha1(object.hash.clone()),
                );
            }
        }

        Ok(())
    }
}
