use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};

use anyhow::Context;
use rand::rngs::StdRng;
use rand::Rng;

use crate::audio::player::Player;
use crate::chat::TwitchChat;
use crate::config::Config;
use crate::events::ChatEvent;
use crate::rewards::{RegistryBuilder, Resolution, Resolver, RewardRegistry};
use crate::sounds::SoundIndex;

/// Indexes the sounds directory and binds every configured trigger against it.
pub fn load(config: &Config) -> anyhow::Result<(SoundIndex, RewardRegistry)> {
    let builder = RegistryBuilder::from_config(config);
    let index = SoundIndex::build(
        &config.sounds_dir,
        builder.requested_categories(),
        config.tag_matching,
    )
    .context("build sound index")?;
    let registry = builder.build(&index);
    Ok((index, registry))
}

pub fn resolver(config: &Config, seed: Option<u64>) -> anyhow::Result<Resolver> {
    let (index, registry) = load(config)?;
    Ok(match seed {
        Some(seed) => Resolver::seeded(registry, index, seed),
        None => Resolver::from_entropy(registry, index),
    })
}

/// Resolves chat events and hands the chosen file to a player.
pub struct Dispatcher<P, R = StdRng> {
    resolver: Resolver<R>,
    player: P,
    sounds_dir: PathBuf,
}

impl<P: Player, R: Rng> Dispatcher<P, R> {
    pub fn new(resolver: Resolver<R>, player: P, sounds_dir: &Path) -> Self {
        Self {
            resolver,
            player,
            sounds_dir: sounds_dir.to_path_buf(),
        }
    }

    /// Plays the sound for `event`, if any. Player failures are logged, not returned.
    pub fn handle(&mut self, event: &ChatEvent) -> Option<PathBuf> {
        let Resolution { file, trigger } = self.resolver.resolve(event)?;
        let path = self.sounds_dir.join(&file);
        tracing::info!(user = %event.user, trigger = ?trigger, file = %file, "playing sound");
        if let Err(err) = self.player.play(&path) {
            tracing::warn!(error = ?err, "player failed");
        }
        Some(path)
    }

    /// Dispatches chat events until the connection closes.
    pub fn listen<CR: BufRead, CW: Write>(
        &mut self,
        chat: &mut TwitchChat<CR, CW>,
    ) -> anyhow::Result<()> {
        while let Some(event) = chat.next_event()? {
            tracing::debug!(user = %event.user, message = %event.message, "chat message");
            self.handle(&event);
        }
        tracing::info!(channel = chat.channel(), "chat connection closed");
        Ok(())
    }
}
