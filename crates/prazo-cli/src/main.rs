use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "prazo", version, about = "Prazo deadline tracker CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Interactive tracking session (tasks live until the session ends)
    Session(commands::session::SessionArgs),
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Session(args) => commands::session::run(args),
        Commands::Config { action } => commands::config::run(action).map_err(Into::into),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use prazo_core::FilterMode;

    #[test]
    fn parses_session_flags() {
        let cli = Cli::try_parse_from([
            "prazo",
            "session",
            "--interval-secs",
            "5",
            "--filter",
            "overdue",
        ])
        .unwrap();
        match cli.command {
            Commands::Session(args) => {
                assert_eq!(args.interval_secs, Some(5));
                assert_eq!(args.filter, Some(FilterMode::Overdue));
                assert!(!args.no_monitor);
            }
            _ => panic!("expected session"),
        }
    }

    #[test]
    fn rejects_unknown_filter() {
        assert!(Cli::try_parse_from(["prazo", "session", "--filter", "late"]).is_err());
    }

    #[test]
    fn parses_config_set() {
        let cli = Cli::try_parse_from(["prazo", "config", "set", "monitor.enabled", "false"]);
        assert!(cli.is_ok());
    }
}
