// ─── Managed Directory Layout ───
// Every stage receives an explicit `GamePaths` value instead of reading
// ambient globals, so parallel test fixtures can use distinct roots.

use std::path::{Path, PathBuf};

const APP_DIR_NAME: &str = "RedstoneLauncher";

/// Root layout of the managed game directory.
///
/// ```text
/// <root>/
///   versions/<id>/<id>.json     - version descriptors
///   versions/<id>/<id>.jar      - version client jars
///   libraries/<maven path>      - library artifacts
///   assets/indexes/<index>.json - asset indexes
///   assets/objects/<hh>/<hash>  - content-addressed asset objects
///   natives/<id>/               - extracted natives, per version
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GamePaths {
    pub game_dir: PathBuf,
    pub versions_dir: PathBuf,
    pub libraries_dir: PathBuf,
    pub assets_dir: PathBuf,
    pub natives_root: PathBuf,
}

impl GamePaths {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        Self {
            versions_dir: root.join("versions"),
            libraries_dir: root.join("libraries"),
            assets_dir: root.join("assets"),
            natives_root: root.join("natives"),
            game_dir: root,
        }
    }

    /// Default root under the platform data directory.
    pub fn default_root() -> PathBuf {
        dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(APP_DIR_NAME)
            .join("game")
    }

    pub fn version_dir(&self, id: &str) -> PathBuf {
        self.versions_dir.join(id)
    }

    /// `<versions>/<id>/<id>.json`
    pub fn descriptor_path(&self, id: &str) -> PathBuf {
        self.version_dir(id).join(format!("{id}.json"))
    }

    /// `<versions>/<id>/<id>.jar`
    pub fn version_jar(&self, id: &str) -> PathBuf {
        self.version_dir(id).join(format!("{id}.jar"))
    }

    pub fn library_path(&self, relative: impl AsRef<Path>) -> PathBuf {
        self.libraries_dir.join(relative)
    }

    /// `<assets>/indexes/<index_id>.json`
    pub fn asset_index_path(&self, index_id: &str) -> PathBuf {
        self.assets_dir.join("indexes").join(format!("{index_id}.json"))
    }

    /// Content-addressed object path: `<assets>/objects/<hash[0:2]>/<hash>`.
    pub fn asset_object_path(&self, hash: &str) -> PathBuf {
        let prefix = &hash[..2.min(hash.len())];
        self.assets_dir.join("objects").join(prefix).join(hash)
    }

    /// Per-version natives directory, isolated from other versions.
    pub fn natives_dir(&self, version_id: &str) -> PathBuf {
        self.natives_root.join(version_id)
    }

    /// Whether `path` lies under one of the managed roots.
    pub fn contains(&self, path: &Path) -> bool {
        path.starts_with(&self.game_dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layout_is_derived_from_one_root() {
        let paths = GamePaths::new("/tmp/game");
        assert_eq!(
            paths.descriptor_path("1.20.1"),
            PathBuf::from("/tmp/game/versions/1.20.1/1.20.1.json")
        );
        assert_eq!(
            paths.version_jar("1.20.1"),
            PathBuf::from("/tmp/game/versions/1.20.1/1.20.1.jar")
        );
        assert_eq!(
            paths.natives_dir("1.20.1"),
            PathBuf::from("/tmp/game/natives/1.20.1")
        );
    }

    #[test]
    fn default_root_lives_under_the_app_directory() {
        let root = GamePaths::default_root();
        assert!(root.ends_with(Path::new(APP_DIR_NAME).join("game")));
    }

    #[test]
    fn asset_objects_are_content_addressed() {
        let paths = GamePaths::new("/tmp/game");
        let object = paths.asset_object_path("abcdef1234567890");
        assert!(object.ends_with("objects/ab/abcdef1234567890"));
    }

    #[test]
    fn managed_root_containment() {
        let paths = GamePaths::new("/tmp/game");
        assert!(paths.contains(Path::new("/tmp/game/libraries/org/x/x.jar")));
        assert!(!paths.contains(Path::new("/etc/passwd")));
    }
}
