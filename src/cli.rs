use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "chat-soundboard", version, about = "Play tagged sounds when Twitch chat triggers them")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(short, long, global = true, help = "Enable verbose logging")]
    pub verbose: bool,

    #[arg(long, global = true, value_name = "PATH", help = "Config file to use instead of the default lookup")]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    Listen(ListenArgs),
    Resolve(ResolveArgs),
    Index(IndexArgs),
    Config(ConfigArgs),
}

#[derive(Args, Debug)]
pub struct ListenArgs {
    #[arg(long, help = "Override the twitch channel")]
    pub channel: Option<String>,

    #[arg(long, help = "Log matches instead of launching the player")]
    pub dry_run: bool,
}

#[derive(Args, Debug)]
pub struct ResolveArgs {
    #[arg(value_name = "MESSAGE", help = "Chat message text")]
    pub message: Option<String>,

    #[arg(long, help = "Channel point reward id")]
    pub reward_id: Option<String>,

    #[arg(long, help = "Seed for the random pick")]
    pub seed: Option<u64>,

    #[arg(long, help = "Play the resolved sound")]
    pub play: bool,

    #[arg(long, help = "Output as JSON")]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct IndexArgs {
    #[arg(long, help = "Output as JSON")]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[arg(long, help = "Show current config as JSON")]
    pub show: bool,

    #[arg(long, help = "Create default config file")]
    pub init: bool,

    #[arg(long, help = "Validate configuration")]
    pub validate: bool,
}
