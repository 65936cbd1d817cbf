use anyhow::Result;
use clap::Parser;
use log_relay::config::Config;
use log_relay::{collector, logger};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Parser, Debug, PartialEq)]
enum Command {
    /// Run the logging host (reads lines from stdin)
    Logger {
        /// Sink target: file path or "socket:<host>:<port>"
        target: Option<String>,
        /// Initial minimum level word (Low, Mid, High)
        level: Option<String>,
        /// JSON5 config file supplying defaults for omitted arguments
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// Run the stats collector (accepts a single client)
    Collector {
        /// Listening port
        port: Option<u16>,
        /// Report after every N-th message
        batch_size: Option<u64>,
        /// Report interval in seconds
        interval: Option<u64>,
        /// JSON5 config file supplying defaults for omitted arguments
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

fn load_config(path: Option<&PathBuf>) -> Result<Config> {
    match path {
        Some(path) => Ok(Config::load_from_file(path)?),
        None => Ok(Config::default()),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    match args.command {
        Command::Logger {
            target,
            level,
            config,
        } => {
            let mut cfg = load_config(config.as_ref())?.logger;
            if let Some(target) = target {
                cfg.target = target;
            }
            if let Some(level) = level {
                cfg.level = level;
            }
            cfg.validate()?;
            logger::run(cfg).await?;
        }
        Command::Collector {
            port,
            batch_size,
            interval,
            config,
        } => {
            let mut cfg = load_config(config.as_ref())?.collector;
            if let Some(port) = port {
                cfg.port = port;
            }
            if let Some(batch_size) = batch_size {
                cfg.batch_size = batch_size;
            }
            if let Some(interval) = interval {
                cfg.report_interval = interval;
            }
            cfg.validate()?;
            collector::run(cfg).await?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_arg_parsing() {
        let args = Args::parse_from(["logrelay", "logger", "relay.log", "Mid"]);
        assert_eq!(
            args.command,
            Command::Logger {
                target: Some("relay.log".to_string()),
                level: Some("Mid".to_string()),
                config: None,
            }
        );

        let args = Args::parse_from(["logrelay", "collector", "9000", "3", "60"]);
        assert_eq!(
            args.command,
            Command::Collector {
                port: Some(9000),
                batch_size: Some(3),
                interval: Some(60),
                config: None,
            }
        );
    }

    #[test]
    fn test_args_are_optional_with_config() {
        let args = Args::parse_from(["logrelay", "collector", "--config", "relay.json5"]);
        assert_eq!(
            args.command,
            Command::Collector {
                port: None,
                batch_size: None,
                interval: None,
                config: Some(PathBuf::from("relay.json5")),
            }
        );
    }
}
