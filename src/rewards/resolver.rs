use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use serde::Serialize;

use super::{CommandTarget, RewardRegistry};
use crate::events::ChatEvent;
use crate::sounds::SoundIndex;

/// Which trigger produced a [`Resolution`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Trigger {
    Command { trigger: String },
    Reward { identifier: String, category: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Resolution {
    pub file: String,
    pub trigger: Trigger,
}

/// Turns chat events into a single sound file.
pub struct Resolver<R = StdRng> {
    registry: RewardRegistry,
    index: SoundIndex,
    rng: R,
}

impl Resolver<StdRng> {
    pub fn from_entropy(registry: RewardRegistry, index: SoundIndex) -> Self {
        Self::new(registry, index, StdRng::from_entropy())
    }

    pub fn seeded(registry: RewardRegistry, index: SoundIndex, seed: u64) -> Self {
        Self::new(registry, index, StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> Resolver<R> {
    pub fn new(registry: RewardRegistry, index: SoundIndex, rng: R) -> Self {
        Self {
            registry,
            index,
            rng,
        }
    }

    /// Chat commands are checked first; the reward id only if no command fired.
    pub fn resolve(&mut self, event: &ChatEvent) -> Option<Resolution> {
        if let Some(resolution) = self.resolve_command(&event.message) {
            return Some(resolution);
        }
        let reward_id = event.reward_id.as_deref()?;
        self.resolve_reward(reward_id)
    }

    pub fn resolve_command(&mut self, message: &str) -> Option<Resolution> {
        let (trigger, target) = self.registry.find_command(message)?;
        let file = match target {
            CommandTarget::Single(file) => file.clone(),
            CommandTarget::Multiple(files) => files.choose(&mut self.rng)?.clone(),
            CommandTarget::Unbound => {
                tracing::debug!(command = %trigger, "command has no sounds");
                return None;
            }
        };
        Some(Resolution {
            file,
            trigger: Trigger::Command {
                trigger: trigger.to_string(),
            },
        })
    }

    pub fn resolve_reward(&mut self, identifier: &str) -> Option<Resolution> {
        let reward = self.registry.find_reward(identifier)?;
        let Some(files) = self.index.category_sounds(&reward.category) else {
            tracing::debug!(category = %reward.category, "reward category has no sounds");
            return None;
        };
        let file = files.choose(&mut self.rng)?.clone();
        Some(Resolution {
            file,
            trigger: Trigger::Reward {
                identifier: reward.identifier.clone(),
                category: reward.category.clone(),
            },
        })
    }
}
