pub mod audio;
pub mod chat;
pub mod cli;
pub mod config;
pub mod dispatch;
pub mod events;
pub mod rewards;
pub mod sounds;

use anyhow::Context;
use audio::player::{DryRunPlayer, ExternalPlayer, Player};
use chat::TwitchChat;
use cli::{Cli, Commands};
use config::Config;
use dispatch::Dispatcher;
use events::ChatEvent;

pub fn run(cli: Cli) -> anyhow::Result<()> {
    setup_tracing(cli.verbose);

    let config_path = cli.config;
    match cli.command {
        Commands::Listen(args) => listen(args, load_config(config_path.as_deref())?),
        Commands::Resolve(args) => resolve(args, load_config(config_path.as_deref())?),
        Commands::Index(args) => index(args, load_config(config_path.as_deref())?),
        Commands::Config(args) => config_cmd(args, config_path.as_deref()),
    }
}

fn setup_tracing(verbose: bool) {
    let filter = if verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(path: Option<&std::path::Path>) -> anyhow::Result<Config> {
    let config = match path {
        Some(path) => Config::load_from_path(path)?,
        None => Config::load().context("load config")?,
    };
    config.validate().context("invalid config")?;
    Ok(config)
}

fn listen(args: cli::ListenArgs, mut config: Config) -> anyhow::Result<()> {
    if let Some(channel) = args.channel {
        config::validate_channel(&channel)?;
        config.channel = channel;
    }

    let resolver = dispatch::resolver(&config, None)?;
    let mut chat = TwitchChat::connect(&config.twitch.server, &config.channel)?;

    if args.dry_run {
        Dispatcher::new(resolver, DryRunPlayer, &config.sounds_dir).listen(&mut chat)
    } else {
        let player = ExternalPlayer::from_config(&config.player);
        Dispatcher::new(resolver, player, &config.sounds_dir).listen(&mut chat)
    }
}

fn resolve(args: cli::ResolveArgs, config: Config) -> anyhow::Result<()> {
    if args.message.is_none() && args.reward_id.is_none() {
        anyhow::bail!("provide a MESSAGE, --reward-id, or both");
    }

    let mut resolver = dispatch::resolver(&config, args.seed)?;
    let mut event = ChatEvent::new(&config.channel, "cli", args.message.as_deref().unwrap_or(""));
    if let Some(reward_id) = args.reward_id.as_deref() {
        event = event.with_reward_id(reward_id);
    }

    let resolution = match resolver.resolve(&event) {
        Some(resolution) => resolution,
        None => {
            tracing::info!("no sound matched");
            return Ok(());
        }
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&resolution)?);
    } else {
        println!("{}", resolution.file);
    }

    if args.play {
        let player = ExternalPlayer::from_config(&config.player);
        player.play(&config.sounds_dir.join(&resolution.file))?;
    }

    Ok(())
}

fn index(args: cli::IndexArgs, config: Config) -> anyhow::Result<()> {
    let (index, registry) = dispatch::load(&config)?;
    if args.json {
        println!("{}", serde_json::to_string_pretty(&index)?);
        return Ok(());
    }

    for category in index.categories() {
        let files = index.category_sounds(category).unwrap_or_default();
        println!("{} ({})", category, files.len());
        for file in files {
            println!("  {}", file);
        }
    }

    let unbound: Vec<_> = registry
        .commands()
        .filter(|(_, target)| **target == rewards::CommandTarget::Unbound)
        .map(|(trigger, _)| trigger)
        .collect();
    if !unbound.is_empty() {
        println!("Commands without sounds: {}", unbound.join(", "));
    }

    Ok(())
}

fn config_cmd(args: cli::ConfigArgs, path: Option<&std::path::Path>) -> anyhow::Result<()> {
    if args.init {
        let path = match path {
            Some(path) => {
                Config::init_at(path)?;
                path.to_path_buf()
            }
            None => Config::init_default()?,
        };
        println!("Initialized config at {}", path.display());
        return Ok(());
    }

    let load = || match path {
        Some(path) => Config::load_from_path(path),
        None => Config::load(),
    };

    if args.show {
        let config = load()?;
        println!("{}", serde_json::to_string_pretty(&config)?);
        return Ok(());
    }

    if args.validate {
        let config = load()?;
        config.validate()?;
        println!("Config OK");
        return Ok(());
    }

    match path {
        Some(path) => println!("{}", path.display()),
        None => println!("{}", Config::default_path()?.display()),
    }
    Ok(())
}
