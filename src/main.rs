use clap::Parser;

fn main() -> anyhow::Result<()> {
    let cli = chat_soundboard::cli::Cli::parse();
    chat_soundboard::run(cli)
}
