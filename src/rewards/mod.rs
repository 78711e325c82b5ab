pub mod resolver;

use std::collections::BTreeSet;

use crate::config::{CommandSound, Config};
use crate::sounds::{strip_marker, SoundIndex};

pub use resolver::{Resolution, Resolver, Trigger};

/// What a chat command plays.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandTarget {
    /// Waiting for a category binding; never resolves on its own.
    Unbound,
    Single(String),
    Multiple(Vec<String>),
}

impl From<&CommandSound> for CommandTarget {
    fn from(sound: &CommandSound) -> Self {
        match sound {
            CommandSound::One(file) if file.is_empty() => CommandTarget::Unbound,
            CommandSound::One(file) => CommandTarget::Single(file.clone()),
            CommandSound::Many(files) if files.is_empty() => CommandTarget::Unbound,
            CommandSound::Many(files) => CommandTarget::Multiple(files.clone()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RewardTrigger {
    pub identifier: String,
    pub category: String,
}

#[derive(Debug, Clone)]
struct CategoryBinding {
    command: String,
    category: String,
    aliases: Vec<String>,
}

#[derive(Debug, Clone)]
enum CommandOp {
    Register(String, CommandTarget),
    Bind(CategoryBinding),
}

/// Collects triggers before the sound index exists.
///
/// Command registrations and category bindings are recorded in call order and
/// replayed when [`RegistryBuilder::build`] is given the index, so a
/// [`RewardRegistry`] is always fully bound and later calls win.
#[derive(Debug, Clone, Default)]
pub struct RegistryBuilder {
    commands: Vec<CommandOp>,
    rewards: Vec<RewardTrigger>,
}

impl RegistryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(config: &Config) -> Self {
        let mut builder = Self::new();
        for command in &config.commands {
            builder.register_command(&command.trigger, CommandTarget::from(&command.sound));
        }
        for binding in &config.category_commands {
            builder.bind_category_to_command(&binding.command, &binding.category, &binding.aliases);
        }
        for reward in &config.rewards {
            builder.register_reward(&reward.id, &reward.category);
        }
        builder
    }

    /// Inserts a command, or replaces the target of an existing one in place.
    pub fn register_command(&mut self, trigger: &str, target: CommandTarget) -> &mut Self {
        self.commands
            .push(CommandOp::Register(trigger.to_string(), target));
        self
    }

    /// Loads every sound of `category` into `command` and each alias at build time.
    pub fn bind_category_to_command<S: AsRef<str>>(
        &mut self,
        command: &str,
        category: &str,
        aliases: &[S],
    ) -> &mut Self {
        self.commands.push(CommandOp::Bind(CategoryBinding {
            command: command.to_string(),
            category: category.to_string(),
            aliases: aliases.iter().map(|a| a.as_ref().to_string()).collect(),
        }));
        self
    }

    pub fn register_reward(&mut self, identifier: &str, category: &str) -> &mut Self {
        match self.rewards.iter_mut().find(|r| r.identifier == identifier) {
            Some(existing) => existing.category = category.to_string(),
            None => self.rewards.push(RewardTrigger {
                identifier: identifier.to_string(),
                category: category.to_string(),
            }),
        }
        self
    }

    /// Every category the sound index needs to know about.
    ///
    /// Includes reward categories, bound categories, and the marker-stripped
    /// names of commands registered as waiting for a binding.
    pub fn requested_categories(&self) -> BTreeSet<String> {
        let rewards = self.rewards.iter().map(|r| r.category.as_str());
        let commands = self.commands.iter().filter_map(|op| match op {
            CommandOp::Bind(binding) => Some(binding.category.as_str()),
            CommandOp::Register(trigger, CommandTarget::Unbound) => Some(trigger.as_str()),
            CommandOp::Register(..) => None,
        });

        rewards
            .chain(commands)
            .map(strip_marker)
            .filter(|c| !c.is_empty())
            .map(str::to_string)
            .collect()
    }

    pub fn build(&self, index: &SoundIndex) -> RewardRegistry {
        let mut commands = Vec::new();

        for op in &self.commands {
            let binding = match op {
                CommandOp::Register(trigger, target) => {
                    upsert(&mut commands, trigger, target.clone());
                    continue;
                }
                CommandOp::Bind(binding) => binding,
            };
            let target = match index.category_sounds(&binding.category) {
                Some(files) => CommandTarget::Multiple(files.to_vec()),
                None => {
                    tracing::info!(
                        command = %binding.command,
                        category = %binding.category,
                        "category has no sounds; command will not play"
                    );
                    CommandTarget::Unbound
                }
            };
            for name in std::iter::once(&binding.command).chain(&binding.aliases) {
                upsert(&mut commands, name, target.clone());
            }
        }

        for (trigger, target) in &commands {
            if *target == CommandTarget::Unbound {
                tracing::debug!(command = %trigger, "command is unbound");
            }
        }

        RewardRegistry {
            commands,
            rewards: self.rewards.clone(),
        }
    }
}

fn upsert(commands: &mut Vec<(String, CommandTarget)>, trigger: &str, target: CommandTarget) {
    match commands.iter_mut().find(|(key, _)| key == trigger) {
        Some((_, existing)) => *existing = target,
        None => commands.push((trigger.to_string(), target)),
    }
}

/// Fully bound trigger tables. Read-only once built.
#[derive(Debug, Clone, Default)]
pub struct RewardRegistry {
    commands: Vec<(String, CommandTarget)>,
    rewards: Vec<RewardTrigger>,
}

impl RewardRegistry {
    /// First command, in registration order, whose trigger occurs in `message`.
    pub fn find_command(&self, message: &str) -> Option<(&str, &CommandTarget)> {
        self.commands
            .iter()
            .find(|(trigger, _)| !trigger.is_empty() && message.contains(trigger.as_str()))
            .map(|(trigger, target)| (trigger.as_str(), target))
    }

    pub fn find_reward(&self, identifier: &str) -> Option<&RewardTrigger> {
        self.rewards.iter().find(|r| r.identifier == identifier)
    }

    pub fn command(&self, trigger: &str) -> Option<&CommandTarget> {
        self.commands
            .iter()
            .find(|(key, _)| key == trigger)
            .map(|(_, target)| target)
    }

    pub fn commands(&self) -> impl Iterator<Item = (&str, &CommandTarget)> {
        self.commands.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn rewards(&self) -> &[RewardTrigger] {
        &self.rewards
    }
}
