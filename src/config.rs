use crate::sounds::TagMatch;
use anyhow::{anyhow, bail, Context};
use directories::BaseDirs;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

static CHANNEL_PATTERN: OnceLock<Result<Regex, regex::Error>> = OnceLock::new();

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_channel")]
    pub channel: String,
    #[serde(default = "default_sounds_dir")]
    pub sounds_dir: PathBuf,
    #[serde(default)]
    pub tag_matching: TagMatch,
    #[serde(default)]
    pub player: PlayerConfig,
    #[serde(default)]
    pub twitch: TwitchConfig,
    #[serde(default)]
    pub rewards: Vec<RewardConfig>,
    #[serde(default)]
    pub commands: Vec<CommandConfig>,
    #[serde(default)]
    pub category_commands: Vec<CategoryCommandConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerConfig {
    #[serde(default = "default_player_program")]
    pub program: String,
    /// VLC waveout device, e.g. a virtual audio cable input.
    #[serde(default)]
    pub audio_device: Option<String>,
    #[serde(default = "default_player_args")]
    pub args: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TwitchConfig {
    /// `host:port` of the chat server. The connection is plain TCP on 6667;
    /// the TLS port 6697 is not supported. Only public chat is read.
    #[serde(default = "default_twitch_server")]
    pub server: String,
}

/// Channel point reward id to sound category.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RewardConfig {
    pub category: String,
    pub id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommandConfig {
    pub trigger: String,
    #[serde(default = "CommandSound::unbound")]
    pub sound: CommandSound,
}

/// A single file, a list to pick from, or `""` to be filled from a category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CommandSound {
    One(String),
    Many(Vec<String>),
}

impl CommandSound {
    pub fn unbound() -> Self {
        CommandSound::One(String::new())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryCommandConfig {
    pub command: String,
    pub category: String,
    #[serde(default)]
    pub aliases: Vec<String>,
}

impl Config {
    pub fn load() -> anyhow::Result<Self> {
        if let Some(path) = Self::project_path() {
            if path.exists() {
                return Self::load_from_path(&path);
            }
        }

        if let Ok(path) = Self::default_path() {
            if path.exists() {
                return Self::load_from_path(&path);
            }
        }

        Ok(Self::default())
    }

    pub fn load_from_path(path: &Path) -> anyhow::Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("read config at {}", path.display()))?;
        let config: Config = serde_json::from_str(&raw)
            .with_context(|| format!("parse config at {}", path.display()))?;
        Ok(config)
    }

    pub fn init_default() -> anyhow::Result<PathBuf> {
        let path = Self::default_path()?;
        Self::init_at(&path)?;
        Ok(path)
    }

    pub fn init_at(path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let config = Self::default();
        fs::write(path, serde_json::to_string_pretty(&config)?)
            .with_context(|| format!("write config at {}", path.display()))?;
        Ok(())
    }

    pub fn default_path() -> anyhow::Result<PathBuf> {
        let base = BaseDirs::new().context("unable to resolve home directory")?;
        Ok(base.config_dir().join("chat-soundboard").join("config.json"))
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        validate_channel(&self.channel)?;

        if self.player.program.trim().is_empty() {
            bail!("player.program must not be empty");
        }

        if self.twitch.server.trim().is_empty() {
            bail!("twitch.server must not be empty");
        }

        for command in &self.commands {
            if command.trigger.is_empty() {
                bail!("command triggers must not be empty");
            }
            if let CommandSound::Many(files) = &command.sound {
                if files.is_empty() {
                    bail!("command {} has an empty sound list", command.trigger);
                }
            }
        }

        for binding in &self.category_commands {
            if binding.command.is_empty() {
                bail!("category command must name a command");
            }
            if binding.category.trim_start_matches('!').is_empty() {
                bail!("category command {} must name a category", binding.command);
            }
            if binding.aliases.iter().any(String::is_empty) {
                bail!("category command {} has an empty alias", binding.command);
            }
        }

        for reward in &self.rewards {
            if reward.id.is_empty() {
                bail!("reward {} has an empty id", reward.category);
            }
            if reward.category.trim_start_matches('!').is_empty() {
                bail!("reward {} must name a category", reward.id);
            }
        }

        Ok(())
    }

    fn project_path() -> Option<PathBuf> {
        Some(PathBuf::from("chat-soundboard.json"))
    }
}

pub fn validate_channel(channel: &str) -> anyhow::Result<()> {
    let pattern = CHANNEL_PATTERN
        .get_or_init(|| Regex::new(r"^#?[A-Za-z0-9_]{1,25}$"))
        .as_ref()
        .map_err(|err| anyhow!("compile channel pattern: {err}"))?;
    if !pattern.is_match(channel) {
        bail!("invalid twitch channel name: {channel:?}");
    }
    Ok(())
}

impl PlayerConfig {
    /// Arguments placed before the sound path.
    pub fn command_args(&self) -> Vec<String> {
        let mut args = Vec::new();
        if let Some(device) = self.audio_device.as_deref().filter(|d| !d.is_empty()) {
            args.push("--aout=waveout".to_string());
            args.push(format!("--waveout-audio-device={device}"));
        }
        args.extend(self.args.iter().cloned());
        args
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            channel: default_channel(),
            sounds_dir: default_sounds_dir(),
            tag_matching: TagMatch::default(),
            player: PlayerConfig::default(),
            twitch: TwitchConfig::default(),
            rewards: Vec::new(),
            commands: Vec::new(),
            category_commands: Vec::new(),
        }
    }
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            program: default_player_program(),
            audio_device: None,
            args: default_player_args(),
        }
    }
}

impl Default for TwitchConfig {
    fn default() -> Self {
        Self {
            server: default_twitch_server(),
        }
    }
}

fn default_channel() -> String {
    "squishydough".to_string()
}

fn default_sounds_dir() -> PathBuf {
    PathBuf::from("sounds")
}

fn default_player_program() -> String {
    "vlc".to_string()
}

fn default_player_args() -> Vec<String> {
    vec![
        "--play-and-exit".to_string(),
        "--qt-start-minimized".to_string(),
        "--qt-system-tray".to_string(),
    ]
}

fn default_twitch_server() -> String {
    "irc.chat.twitch.tv:6667".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "channel": "squishydough",
        "sounds_dir": "/tmp/sounds",
        "player": { "program": "vlc", "audio_device": "CABLE Input" },
        "rewards": [
            { "category": "insult", "id": "8288e094-4fdc-4bf5-a177-178fa27ca137" },
            { "category": "cheer", "id": "1bc17c01-802b-488b-8d26-da42ad23fc5e" }
        ],
        "commands": [
            { "trigger": "!angel", "sound": "yeah that's what you get [i killed].mp3" },
            { "trigger": "!pair", "sound": ["a.mp3", "b.mp3"] },
            { "trigger": "!hello", "sound": "" },
            { "trigger": "!bye" }
        ],
        "category_commands": [
            { "command": "!hello", "category": "hello", "aliases": ["!hi"] }
        ]
    }"#;

    #[test]
    fn parses_sample_config_in_order() {
        let config: Config = serde_json::from_str(SAMPLE).unwrap();
        config.validate().unwrap();

        let triggers: Vec<_> = config.commands.iter().map(|c| c.trigger.as_str()).collect();
        assert_eq!(triggers, vec!["!angel", "!pair", "!hello", "!bye"]);
        assert_eq!(
            config.commands[1].sound,
            CommandSound::Many(vec!["a.mp3".into(), "b.mp3".into()])
        );
        assert_eq!(config.commands[2].sound, CommandSound::unbound());
        assert_eq!(config.commands[3].sound, CommandSound::unbound());
        assert_eq!(config.rewards[0].category, "insult");
        assert_eq!(config.category_commands[0].aliases, vec!["!hi"]);
        assert_eq!(config.tag_matching, TagMatch::Substring);
    }

    #[test]
    fn audio_device_adds_waveout_args() {
        let config: Config = serde_json::from_str(SAMPLE).unwrap();
        let args = config.player.command_args();
        assert_eq!(args[0], "--aout=waveout");
        assert_eq!(args[1], "--waveout-audio-device=CABLE Input");
        assert_eq!(args[2], "--play-and-exit");
    }

    #[test]
    fn default_config_is_valid() {
        Config::default().validate().unwrap();
        assert!(Config::default().player.command_args()[0].starts_with("--play"));
    }

    #[test]
    fn rejects_empty_sound_list() {
        let mut config = Config::default();
        config.commands.push(CommandConfig {
            trigger: "!x".into(),
            sound: CommandSound::Many(Vec::new()),
        });
        assert!(config.validate().is_err());
    }

    #[test]
    fn init_at_writes_loadable_default() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.json");
        Config::init_at(&path).unwrap();
        let config = Config::load_from_path(&path).unwrap();
        config.validate().unwrap();
        assert_eq!(config.twitch.server, "irc.chat.twitch.tv:6667");
    }

    #[test]
    fn rejects_bad_channel() {
        assert!(validate_channel("not a channel").is_err());
        assert!(validate_channel("#squishydough").is_ok());
        assert!(validate_channel("squishy_dough").is_ok());
        assert!(validate_channel("").is_err());
    }

    #[test]
    fn exact_tag_matching_is_configurable() {
        let config: Config = serde_json::from_str(r#"{ "tag_matching": "exact" }"#).unwrap();
        assert_eq!(config.tag_matching, TagMatch::Exact);
    }
}
