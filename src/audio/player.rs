use anyhow::Context;
use std::path::Path;
use std::process::{Command, Stdio};
use std::thread;

use crate::config::PlayerConfig;

pub trait Player {
    fn play(&self, path: &Path) -> anyhow::Result<()>;
}

/// Launches an external program per sound and does not wait for it to finish.
#[derive(Debug, Clone)]
pub struct ExternalPlayer {
    program: String,
    args: Vec<String>,
}

impl ExternalPlayer {
    pub fn new(program: &str, args: Vec<String>) -> Self {
        Self {
            program: program.to_string(),
            args,
        }
    }

    pub fn from_config(config: &PlayerConfig) -> Self {
        Self::new(&config.program, config.command_args())
    }

    pub fn command(&self, path: &Path) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args)
            .arg(path)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null());
        cmd
    }
}

impl Player for ExternalPlayer {
    fn play(&self, path: &Path) -> anyhow::Result<()> {
        let mut child = self
            .command(path)
            .spawn()
            .with_context(|| format!("play audio with {}: {}", self.program, path.display()))?;

        // reap in the background so finished players do not linger as zombies
        thread::spawn(move || {
            if let Err(err) = child.wait() {
                tracing::debug!(error = ?err, "wait for player");
            }
        });
        Ok(())
    }
}

/// Logs what would be played.
#[derive(Debug, Clone, Copy, Default)]
pub struct DryRunPlayer;

impl Player for DryRunPlayer {
    fn play(&self, path: &Path) -> anyhow::Result<()> {
        tracing::info!(path = %path.display(), "dry run; not playing");
        Ok(())
    }
}
