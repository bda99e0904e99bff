// ─── Native Library Extraction ───

use std::io::Read;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::core::error::{LauncherError, LauncherResult};
use crate::core::maven::MavenArtifact;
use crate::core::paths::GamePaths;
use crate::core::rules::{decide, FeatureSet};
use crate::core::version::{LibraryEntry, ResolvedVersion};

/// Unpack every platform-matching native jar into the per-version natives
/// directory and return it. A native jar missing from disk is logged and
/// skipped; many versions run fine without optional natives.
pub async fn extract_natives(
    resolved: &ResolvedVersion,
    paths: &GamePaths,
) -> LauncherResult<PathBuf> {
    let natives_dir = paths.natives_dir(&resolved.id);
    tokio::fs::create_dir_all(&natives_dir)
        .await
        .map_err(|source| LauncherError::Io {
            path: natives_dir.clone(),
            source,
        })?;

    let features = FeatureSet::new();

    for lib in &resolved.descriptor.libraries {
        if !lib.has_native_component() || !decide(lib.rules(), &features) {
            continue;
        }

        let Some(rel_path) = native_rel_path(lib) else {
            continue;
        };
        let jar_path = paths.library_path(&rel_path);
        if !jar_path.exists() {
            warn!("Native jar missing, skipping: {:?}", jar_path);
            continue;
        }

        // Best effort: a corrupt archive must not abort the launch attempt.
        match unpack_jar(&jar_path, &natives_dir, lib.extract_excludes().to_vec()).await {
            Ok(()) => debug!("Extracted natives from {}", lib.name),
            Err(error) => warn!("Failed to extract natives from {}: {}", lib.name, error),
        }
    }

    Ok(natives_dir)
}

/// Relative library path of the platform's native jar: explicit classifier
/// metadata when present, else a Maven path synthesized with the
/// platform classifier.
fn native_rel_path(lib: &LibraryEntry) -> Option<String> {
    if let Some(artifact) = lib.native_artifact() {
        return Some(artifact.path.clone());
    }
    let mut artifact = MavenArtifact::parse(&lib.name).ok()?;
    artifact.classifier = Some(lib.native_classifier_key());
    Some(artifact.relative_path())
}

/// Unpack one zip archive on the blocking pool. Directory entries, excluded
/// prefixes (META-INF/ and friends) and entries that would escape the
/// destination are skipped.
async fn unpack_jar(
    jar_path: &Path,
    dest_dir: &Path,
    excludes: Vec<String>,
) -> LauncherResult<()> {
    let jar_path = jar_path.to_path_buf();
    let dest_dir = dest_dir.to_path_buf();

    tokio::task::spawn_blocking(move || -> LauncherResult<()> {
        let file = std::fs::File::open(&jar_path).map_err(|source| LauncherError::Io {
            path: jar_path.clone(),
            source,
        })?;
        let mut archive = zip::ZipArchive::new(file)?;

        for i in 0..archive.len() {
            let mut entry = archive.by_index(i)?;
            if entry.is_dir() {
                continue;
            }
            let name = entry.name().to_string();
            if excludes.iter().any(|prefix| name.starts_with(prefix.as_str())) {
                continue;
            }
            // Reject entries that traverse outside the natives directory.
            let Some(enclosed) = entry.enclosed_name() else {
                warn!("Skipping unsafe archive entry: {}", name);
                continue;
            };

            let out_path = dest_dir.join(enclosed);
            if let Some(parent) = out_path.parent() {
                std::fs::create_dir_all(parent).map_err(|source| LauncherError::Io {
                    path: parent.to_path_buf(),
                    source,
                })?;
            }

            let mut contents = Vec::with_capacity(entry.size() as usize);
            entry
                .read_to_end(&mut contents)
                .map_err(|source| LauncherError::Io {
                    path: out_path.clone(),
                    source,
                })?;
            std::fs::write(&out_path, contents).map_err(|source| LauncherError::Io {
                path: out_path.clone(),
                source,
            })?;
        }

        Ok(())
    })
    .await
    .map_err(|join_error| LauncherError::Other(format!("extraction task failed: {join_error}")))?
}
