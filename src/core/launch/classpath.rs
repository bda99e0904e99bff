// ─── Classpath Assembly ───

use std::collections::HashSet;

use tracing::debug;

use crate::core::paths::GamePaths;
use crate::core::rules::{decide, FeatureSet};
use crate::core::version::{LoaderFlavor, ResolvedVersion};

/// Platform classpath separator.
pub fn classpath_separator() -> &'static str {
    if cfg!(windows) {
        ";"
    } else {
        ":"
    }
}

/// Build the launch classpath as a single separator-joined string.
///
/// Entries, in order: the version's own jar, the inherited vanilla jar
/// (except under modern Forge, which bootstraps its own module path), then
/// every rule-allowed library that actually exists on disk. Duplicate
/// coordinates keep their first occurrence only, so the child's override of
/// an inherited library wins after a parent merge.
pub fn build_classpath(resolved: &ResolvedVersion, paths: &GamePaths) -> String {
    let mut entries: Vec<String> = Vec::new();

    let main_jar = paths.version_jar(&resolved.id);
    if main_jar.exists() {
        entries.push(main_jar.to_string_lossy().into_owned());
    }

    if resolved.flavor != LoaderFlavor::ForgeModern {
        if let Some(parent_id) = &resolved.parent_id {
            let parent_jar = paths.version_jar(parent_id);
            if parent_jar.exists() {
                entries.push(parent_jar.to_string_lossy().into_owned());
            }
        }
    }

    let features = FeatureSet::new();
    let mut seen: HashSet<&str> = HashSet::new();

    for lib in &resolved.descriptor.libraries {
        // Rules first: old manifests list one coordinate several times with
        // different OS rules, and only allowed entries count for dedup.
        if !decide(lib.rules(), &features) {
            continue;
        }
        if !seen.insert(lib.name.as_str()) {
            debug!("Duplicate classpath coordinate '{}', keeping first", lib.name);
            continue;
        }
        let Some(rel_path) = lib.artifact_rel_path() else {
            continue;
        };
        let jar = paths.library_path(&rel_path);
        if jar.exists() {
            entries.push(jar.to_string_lossy().into_owned());
        }
    }

    entries.join(classpath_separator())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::version::VersionDescriptor;

    fn fixture_paths(tag: &str) -> GamePaths {
        let root =
            std::env::temp_dir().join(format!("classpath-test-{tag}-{}", std::process::id()));
        let _ = std::fs::remove_dir_all(&root);
        std::fs::create_dir_all(&root).unwrap();
        GamePaths::new(root)
    }

    fn touch(path: &std::path::Path) {
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, b"jar").unwrap();
    }

    fn resolved(id: &str, body: serde_json::Value) -> ResolvedVersion {
        let child: VersionDescriptor = serde_json::from_value(body).unwrap();
        ResolvedVersion {
            id: id.to_string(),
            parent_id: None,
            descriptor: child.clone(),
            child,
            parent: None,
            flavor: LoaderFlavor::Vanilla,
        }
    }

    #[test]
    fn duplicate_coordinates_collapse_to_first_occurrence() {
        let paths = fixture_paths("dedup");
        let resolved = resolved(
            "1.20.1",
            serde_json::json!({
                "id": "1.20.1",
                "libraries": [
                    {"name": "com.mojang:brigadier:1.0.18"},
                    {"name": "com.mojang:brigadier:1.0.18"}
                ]
            }),
        );

        touch(&paths.version_jar("1.20.1"));
        touch(&paths.library_path("com/mojang/brigadier/1.0.18/brigadier-1.0.18.jar"));

        let classpath = build_classpath(&resolved, &paths);
        let hits = classpath.matches("brigadier-1.0.18.jar").count();
        assert_eq!(hits, 1);

        let _ = std::fs::remove_dir_all(&paths.game_dir);
    }

    #[test]
    fn missing_jars_are_omitted() {
        let paths = fixture_paths("missing");
        let resolved = resolved(
            "1.20.1",
            serde_json::json!({
                "id": "1.20.1",
                "libraries": [{"name": "com.mojang:brigadier:1.0.18"}]
            }),
        );

        // Nothing on disk at all.
        assert!(build_classpath(&resolved, &paths).is_empty());

        let _ = std::fs::remove_dir_all(&paths.game_dir);
    }

    #[test]
    fn rebuilding_yields_the_same_classpath() {
        let paths = fixture_paths("stable");
        let resolved = resolved(
            "1.20.1",
            serde_json::json!({
                "id": "1.20.1",
                "libraries": [
                    {"name": "com.mojang:brigadier:1.0.18"},
                    {"name": "net.sf.jopt-simple:jopt-simple:5.0.4"}
                ]
            }),
        );

        touch(&paths.version_jar("1.20.1"));
        touch(&paths.library_path("com/mojang/brigadier/1.0.18/brigadier-1.0.18.jar"));
        touch(&paths.library_path("net/sf/jopt-simple/jopt-simple/5.0.4/jopt-simple-5.0.4.jar"));

        let first = build_classpath(&resolved, &paths);
        let second = build_classpath(&resolved, &paths);
        assert_eq!(first, second);
        assert_eq!(first.split(classpath_separator()).count(), 3);

        let _ = std::fs::remove_dir_all(&paths.game_dir);
    }

    #[test]
    fn parent_jar_joins_for_non_forge_children() {
        let paths = fixture_paths("parent");
        let child: VersionDescriptor = serde_json::from_value(serde_json::json!({
            "id": "fabric-1.20.1", "inheritsFrom": "1.20.1"
        }))
        .unwrap();
        let resolved = ResolvedVersion {
            id: "fabric-1.20.1".into(),
            parent_id: Some("1.20.1".into()),
            descriptor: child.clone(),
            child,
            parent: None,
            flavor: LoaderFlavor::FabricModern,
        };

        touch(&paths.version_jar("fabric-1.20.1"));
        touch(&paths.version_jar("1.20.1"));

        let classpath = build_classpath(&resolved, &paths);
        assert!(classpath.contains("fabric-1.20.1.jar"));
        assert!(classpath.contains(&format!("1.20.1{}1.20.1.jar", std::path::MAIN_SEPARATOR)));

        let _ = std::fs::remove_dir_all(&paths.game_dir);
    }
}
