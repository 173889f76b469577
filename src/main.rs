//! stepwise - CLI entry point

mod commands;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use stepwise::cli::{Cli, Commands, ConfigCommands};
use stepwise::Config;

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config_path = cli.config.clone().unwrap_or_else(Config::default_path);

    // Completions must work even with a broken config file
    if let Commands::Completions { shell } = cli.command {
        return commands::completions::handle::<Cli>(shell);
    }

    let config = Config::load_from(&config_path)?;
    init_tracing(cli.log_level.as_deref(), &config.logging.level);

    match cli.command {
        Commands::New { name } => commands::new::handle(&config, &name),
        Commands::List => commands::list::handle(&config),
        Commands::Config(cmd) => match cmd {
            ConfigCommands::Show => commands::config::handle_show(&config),
            ConfigCommands::Init => commands::config::handle_init(&config_path),
        },
        Commands::Completions { .. } => Ok(()),
    }
}

/// Install the stderr subscriber. `--log-level` wins over `RUST_LOG`, which
/// wins over `[logging].level`.
fn init_tracing(cli_level: Option<&str>, config_level: &str) {
    let env_filter = match cli_level {
        Some(level) => EnvFilter::try_new(level).unwrap_or_else(|_| {
            eprintln!("Invalid log level '{}', falling back to 'info'", level);
            EnvFilter::new("info")
        }),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::try_new(config_level).unwrap_or_else(|_| {
                eprintln!(
                    "Invalid [logging].level '{}', falling back to 'info'",
                    config_level
                );
                EnvFilter::new("info")
            })
        }),
    };

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
