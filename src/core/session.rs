// ─── Launch Session ───
// Drives the whole pipeline: resolve, plan, download, stage, synthesize,
// spawn. Emits events on a channel so an embedding frontend can follow
// along without being part of the pipeline.

use std::path::PathBuf;

use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};
use tracing::{info, warn};

use crate::core::auth::OfflineProfile;
use crate::core::downloader::{Downloader, ProgressSink, Stage};
use crate::core::error::LauncherResult;
use crate::core::http::build_http_client;
use crate::core::launch::{
    build_classpath, extract_natives, spawn_game, synthesize, ArgumentContext, GameProcessHandle,
};
use crate::core::paths::GamePaths;
use crate::core::planner::DependencyPlanner;
use crate::core::version::VersionResolver;

/// Events emitted while a launch is in flight.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    Status(String),
    Progress {
        stage: Stage,
        completed: usize,
        total: usize,
    },
    /// The frontend should hide itself; the game is about to take over.
    Hide,
    /// The supervised game exited; the frontend may reappear.
    Show,
    Launched {
        pid: Option<u32>,
    },
    Exited {
        code: Option<i32>,
    },
}

/// Bridges downloader progress onto the session's event channel.
struct ChannelSink {
    events: UnboundedSender<SessionEvent>,
}

impl ProgressSink for ChannelSink {
    fn on_progress(&self, stage: Stage, completed: usize, total: usize) {
        let _ = self.events.send(SessionEvent::Progress {
            stage,
            completed,
            total,
        });
    }

    fn on_status(&self, message: &str) {
        let _ = self.events.send(SessionEvent::Status(message.to_string()));
    }
}

/// Per-launch knobs.
#[derive(Debug, Clone)]
pub struct LaunchOptions {
    /// Heap size suffix-notated, e.g. "4G" or "2048M".
    pub allocated_ram: String,
    pub java_executable: PathBuf,
    pub show_terminal: bool,
    /// Supervise the game: hide the frontend while it runs and report its
    /// exit. When off, the handle is returned fire-and-forget.
    pub close_after_launch: bool,
}

impl Default for LaunchOptions {
    fn default() -> Self {
        Self {
            allocated_ram: "2G".into(),
            java_executable: PathBuf::from("java"),
            show_terminal: false,
            close_after_launch: false,
        }
    }
}

pub struct LaunchSession {
    paths: GamePaths,
    client: reqwest::Client,
    downloader: Downloader,
    events: UnboundedSender<SessionEvent>,
}

impl LaunchSession {
    /// Create a session rooted at `paths`, returning the receiving end of
    /// its event channel.
    pub fn new(paths: GamePaths) -> LauncherResult<(Self, UnboundedReceiver<SessionEvent>)> {
        let client = build_http_client()?;
        let downloader = Downloader::new(client.clone());
        let (events, receiver) = unbounded_channel();

        Ok((
            Self {
                paths,
                client,
                downloader,
                events,
            },
            receiver,
        ))
    }

    /// Launch `version_id` as `profile`.
    ///
    /// Returns the running process handle, or `None` when the session
    /// supervised the game to completion itself (`close_after_launch`).
    pub async fn launch(
        &self,
        version_id: &str,
        profile: &OfflineProfile,
        options: &LaunchOptions,
    ) -> LauncherResult<Option<GameProcessHandle>> {
        self.status(format!("Resolving version {version_id}"));
        self.progress(Stage::Resolving, 0, 1);
        let resolver = VersionResolver::new(&self.client, &self.paths);
        let resolved = resolver.resolve(version_id).await?;
        self.progress(Stage::Resolving, 1, 1);

        self.status("Checking files".into());
        let planner = DependencyPlanner::new(&self.paths);
        let tasks = planner.plan(&resolved, &self.downloader).await?;

        let sink = ChannelSink {
            events: self.events.clone(),
        };
        let report = self.downloader.run(tasks, &sink).await;
        if !report.all_succeeded() {
            // Missing optional files are tolerated; launch proceeds with
            // whatever landed.
            warn!(
                "{} download(s) failed; continuing launch",
                report.failures.len()
            );
        }

        self.status("Extracting natives".into());
        self.progress(Stage::Extracting, 0, 1);
        let natives_dir = extract_natives(&resolved, &self.paths).await?;
        self.progress(Stage::Extracting, 1, 1);

        let classpath = build_classpath(&resolved, &self.paths);
        let spec = synthesize(&ArgumentContext {
            resolved: &resolved,
            paths: &self.paths,
            profile,
            classpath: &classpath,
            natives_dir: &natives_dir,
            allocated_ram: &options.allocated_ram,
        })?;

        self.status(format!("Launching {version_id}"));
        self.progress(Stage::Launching, 0, 1);
        let mut handle = spawn_game(
            &spec,
            &options.java_executable,
            &self.paths.game_dir,
            options.show_terminal,
        )?;
        let _ = self.events.send(SessionEvent::Launched { pid: handle.pid() });

        if !options.close_after_launch {
            return Ok(Some(handle));
        }

        // Supervised mode: the frontend hides for the lifetime of the game.
        let _ = self.events.send(SessionEvent::Hide);
        let status = handle.wait().await?;
        info!("Game exited with {:?}", status.code());
        let _ = self.events.send(SessionEvent::Exited {
            code: status.code(),
        });
        let _ = self.events.send(SessionEvent::Show);
        Ok(None)
    }

    fn status(&self, message: String) {
        info!("{}", message);
        let _ = self.events.send(SessionEvent::Status(message));
    }

    fn progress(&self, stage: Stage, completed: usize, total: usize) {
        let _ = self.events.send(SessionEvent::Progress {
            stage,
            completed,
            total,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::launch::build_command_line;
    use std::path::Path;

    fn fixture_paths(tag: &str) -> GamePaths {
        let root = std::env::temp_dir().join(format!("session-test-{tag}-{}", std::process::id()));
        let _ = std::fs::remove_dir_all(&root);
        std::fs::create_dir_all(&root).unwrap();
        GamePaths::new(root)
    }

    fn write_file(path: &Path, contents: &[u8]) {
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, contents).unwrap();
    }

    #[test]
    fn channel_sink_forwards_progress() {
        let (sender, mut receiver) = unbounded_channel();
        let sink = ChannelSink { events: sender };

        sink.on_progress(Stage::Downloading, 3, 10);
        sink.on_status("hello");

        assert_eq!(
            receiver.try_recv().unwrap(),
            SessionEvent::Progress {
                stage: Stage::Downloading,
                completed: 3,
                total: 10
            }
        );
        assert_eq!(
            receiver.try_recv().unwrap(),
            SessionEvent::Status("hello".into())
        );
    }

    // Full pipeline up to the spawn boundary, entirely offline: a legacy
    // descriptor and its jar already on disk mean the plan is empty, and
    // the synthesized command line is fully inspectable.
    #[tokio::test]
    async fn offline_pipeline_produces_a_runnable_command_line() {
        let paths = fixture_paths("pipeline");
        write_file(
            &paths.descriptor_path("1.7.10"),
            serde_json::json!({
                "id": "1.7.10",
                "mainClass": "net.minecraft.client.main.Main",
                "minecraftArguments": "--username ${auth_player_name} --version ${version_name} \
                 --accessToken ${auth_access_token}",
                "libraries": []
            })
            .to_string()
            .as_bytes(),
        );
        write_file(&paths.version_jar("1.7.10"), b"fake jar");

        let client = build_http_client().unwrap();
        let downloader = Downloader::new(client.clone());

        let resolver = VersionResolver::new(&client, &paths);
        let resolved = resolver.resolve("1.7.10").await.unwrap();

        let planner = DependencyPlanner::new(&paths);
        let tasks = planner.plan(&resolved, &downloader).await.unwrap();
        assert!(tasks.is_empty(), "everything staged, nothing to download");

        let natives_dir = extract_natives(&resolved, &paths).await.unwrap();
        let classpath = build_classpath(&resolved, &paths);
        assert!(classpath.contains("1.7.10.jar"));

        let profile = OfflineProfile::new("Steve");
        let spec = synthesize(&ArgumentContext {
            resolved: &resolved,
            paths: &paths,
            profile: &profile,
            classpath: &classpath,
            natives_dir: &natives_dir,
            allocated_ram: "2G",
        })
        .unwrap();

        let argv = build_command_line(&spec, Path::new("java"));
        assert_eq!(argv[0], "java");
        assert!(argv.contains(&"net.minecraft.client.main.Main".to_string()));
        assert!(argv.contains(&"Steve".to_string()));
        assert!(argv.contains(&"-Xmx2G".to_string()));

        let _ = std::fs::remove_dir_all(&paths.game_dir);
    }
}
