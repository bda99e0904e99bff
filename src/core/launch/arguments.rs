// ─── Argument Synthesis ───
// Turns a resolved version plus an identity into concrete JVM and game
// argument vectors, covering both the legacy flat template and the modern
// rule-gated arrays.

use std::collections::HashMap;
use std::path::Path;

use tracing::debug;

use crate::core::auth::{OfflineProfile, OFFLINE_ACCESS_TOKEN, OFFLINE_USER_TYPE};
use crate::core::error::LauncherResult;
use crate::core::paths::GamePaths;
use crate::core::rules::{decide, FeatureSet};
use crate::core::version::{
    ArgumentDialect, ArgumentEntry, LoaderFlavor, ModernArguments, ResolvedVersion,
};

use super::classpath::classpath_separator;

pub const LAUNCHER_NAME: &str = "redstone-launcher";

/// Everything needed to spawn the game: main class plus fully substituted
/// argument vectors. Process spawning assembles
/// `java <jvm> <main_class> <game>` from this.
#[derive(Debug, Clone)]
pub struct LaunchSpec {
    pub main_class: String,
    pub jvm_args: Vec<String>,
    pub game_args: Vec<String>,
}

/// Inputs for one synthesis run.
pub struct ArgumentContext<'a> {
    pub resolved: &'a ResolvedVersion,
    pub paths: &'a GamePaths,
    pub profile: &'a OfflineProfile,
    pub classpath: &'a str,
    pub natives_dir: &'a Path,
    /// JVM heap size suffix-notated, e.g. "4G" or "2048M".
    pub allocated_ram: &'a str,
}

/// Synthesize the final launch arguments for `ctx`.
pub fn synthesize(ctx: &ArgumentContext<'_>) -> LauncherResult<LaunchSpec> {
    let main_class = ctx.resolved.main_class()?.to_string();
    let vars = substitution_vars(ctx);

    let (jvm_args, game_args) = match ctx.resolved.descriptor.dialect()? {
        ArgumentDialect::Legacy(template) => synthesize_legacy(ctx, template, &vars),
        ArgumentDialect::Modern(arguments) => synthesize_modern(ctx, arguments, &vars),
    };

    debug!(
        "Synthesized {} jvm + {} game arguments for '{}'",
        jvm_args.len(),
        game_args.len(),
        ctx.resolved.id
    );

    Ok(LaunchSpec {
        main_class,
        jvm_args,
        game_args,
    })
}

// ── Substitution ────────────────────────────────────

fn substitution_vars(ctx: &ArgumentContext<'_>) -> HashMap<&'static str, String> {
    let game_dir = ctx.paths.game_dir.to_string_lossy().into_owned();
    let assets_dir = ctx.paths.assets_dir.to_string_lossy().into_owned();
    let uuid = ctx.profile.effective_uuid().to_string();
    let version_type = ctx
        .resolved
        .descriptor
        .release_type
        .clone()
        .unwrap_or_else(|| "release".into());

    let mut vars: HashMap<&'static str, String> = HashMap::new();
    vars.insert("auth_player_name", ctx.profile.username.clone());
    vars.insert("auth_uuid", uuid);
    vars.insert("auth_access_token", OFFLINE_ACCESS_TOKEN.into());
    vars.insert("auth_session", OFFLINE_ACCESS_TOKEN.into());
    vars.insert("user_type", OFFLINE_USER_TYPE.into());
    vars.insert("user_properties", "{}".into());
    vars.insert("version_name", ctx.resolved.id.clone());
    vars.insert("version_type", version_type);
    vars.insert("game_directory", game_dir);
    vars.insert("assets_root", assets_dir.clone());
    vars.insert("game_assets", assets_dir);
    vars.insert("assets_index_name", ctx.resolved.asset_index_id().to_string());
    vars.insert(
        "natives_directory",
        ctx.natives_dir.to_string_lossy().into_owned(),
    );
    vars.insert("classpath", ctx.classpath.to_string());
    vars.insert("classpath_separator", classpath_separator().to_string());
    vars.insert(
        "library_directory",
        ctx.paths.libraries_dir.to_string_lossy().into_owned(),
    );
    vars.insert("launcher_name", LAUNCHER_NAME.into());
    vars.insert("launcher_version", env!("CARGO_PKG_VERSION").into());
    vars
}

fn substitute(token: &str, vars: &HashMap<&'static str, String>) -> String {
    let mut out = token.to_string();
    for (key, value) in vars {
        let placeholder = format!("${{{key}}}");
        if out.contains(&placeholder) {
            out = out.replace(&placeholder, value);
        }
    }
    out
}

/// Drop tokens still carrying an unresolved `${...}` placeholder. When the
/// dropped token was the value of a preceding `--flag`, the flag goes too,
/// so no option is left dangling.
fn drop_unresolved(tokens: Vec<String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for token in tokens {
        if token.contains("${") {
            debug!("Dropping unresolved argument token: {}", token);
            if out.last().is_some_and(|prev| prev.starts_with("--")) {
                out.pop();
            }
            continue;
        }
        out.push(token);
    }
    out
}

// ── Legacy dialect (pre-1.13) ───────────────────────

fn synthesize_legacy(
    ctx: &ArgumentContext<'_>,
    template: &str,
    vars: &HashMap<&'static str, String>,
) -> (Vec<String>, Vec<String>) {
    let substituted = substitute(template, vars);
    let game_args = drop_unresolved(
        substituted
            .split_whitespace()
            .map(str::to_string)
            .collect(),
    );

    let mut jvm_args = memory_args(ctx.allocated_ram);
    if cfg!(target_os = "macos") {
        jvm_args.push("-XstartOnFirstThread".into());
    }
    jvm_args.push(format!(
        "-Djava.library.path={}",
        ctx.natives_dir.to_string_lossy()
    ));
    jvm_args.push("-cp".into());
    jvm_args.push(ctx.classpath.to_string());

    (jvm_args, game_args)
}

// ── Modern dialect (1.13+) ──────────────────────────

/// Feature flags evaluated against modern argument rules. All off: no demo
/// mode, no custom resolution, no quick play.
fn default_features() -> FeatureSet {
    [
        "is_demo_user",
        "has_custom_resolution",
        "has_quick_plays_support",
        "is_quick_play_singleplayer",
        "is_quick_play_multiplayer",
        "is_quick_play_realms",
    ]
    .into_iter()
    .map(|name| (name.to_string(), false))
    .collect()
}

fn expand_entries(
    entries: &[ArgumentEntry],
    features: &FeatureSet,
    vars: &HashMap<&'static str, String>,
) -> Vec<String> {
    let mut out = Vec::new();
    for entry in entries {
        match entry {
            ArgumentEntry::Plain(token) => out.push(substitute(token, vars)),
            ArgumentEntry::Conditional { rules, value } => {
                if decide(rules, features) {
                    out.extend(value.tokens().iter().map(|t| substitute(t, vars)));
                }
            }
        }
    }
    out
}

fn synthesize_modern(
    ctx: &ArgumentContext<'_>,
    arguments: &ModernArguments,
    vars: &HashMap<&'static str, String>,
) -> (Vec<String>, Vec<String>) {
    let features = default_features();

    let mut jvm_args = memory_args(ctx.allocated_ram);
    jvm_args.extend(
        drop_unresolved(expand_entries(&arguments.jvm, &features, vars))
            .into_iter()
            // Some loader manifests smuggle the vanilla entry point into the
            // JVM list; it must not appear before the real main class.
            .filter(|token| !token.contains("net.minecraft.client.main.Main")),
    );

    // Vanilla descriptors add this through an osx rule; loader descriptors
    // that replaced the JVM array tend to lose it.
    if cfg!(target_os = "macos") && !jvm_args.iter().any(|a| a == "-XstartOnFirstThread") {
        jvm_args.insert(2, "-XstartOnFirstThread".into());
    }

    // Loader descriptors replace the vanilla argument arrays wholesale and
    // often lose the classpath entry in the process.
    let needs_classpath = matches!(
        ctx.resolved.flavor,
        LoaderFlavor::ForgeModern | LoaderFlavor::FabricModern
    ) && !jvm_args.iter().any(|a| a == "-cp" || a == "-classpath");
    if needs_classpath {
        jvm_args.push("-cp".into());
        jvm_args.push(ctx.classpath.to_string());
    }

    let mut game_args = drop_unresolved(expand_entries(&arguments.game, &features, vars));
    augment_loader_game_args(ctx, vars, &mut game_args);

    (jvm_args, game_args)
}

/// Re-add the standard game options a loader's argument list omits after it
/// replaced the vanilla arrays. Existing flags are never duplicated.
fn augment_loader_game_args(
    ctx: &ArgumentContext<'_>,
    vars: &HashMap<&'static str, String>,
    game_args: &mut Vec<String>,
) {
    let required: &[(&str, &str)] = match ctx.resolved.flavor {
        LoaderFlavor::ForgeModern => &[
            ("--username", "auth_player_name"),
            ("--uuid", "auth_uuid"),
            ("--accessToken", "auth_access_token"),
            ("--version", "version_name"),
            ("--gameDir", "game_directory"),
            ("--assetsDir", "assets_root"),
            ("--assetIndex", "assets_index_name"),
            ("--userType", "user_type"),
        ],
        LoaderFlavor::FabricModern => &[
            ("--assetsDir", "assets_root"),
            ("--assetIndex", "assets_index_name"),
        ],
        _ => return,
    };

    for (flag, var) in required {
        if game_args.iter().any(|a| a == flag) {
            continue;
        }
        if let Some(value) = vars.get(var) {
            game_args.push((*flag).to_string());
            game_args.push(value.clone());
        }
    }
}

fn memory_args(allocated_ram: &str) -> Vec<String> {
    vec![
        format!("-Xmx{allocated_ram}"),
        format!("-Xms{allocated_ram}"),
    ]
}
