use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use tracing::Level;

#[derive(Parser)]
#[command(author, version, about, long_about = None)] // Read from `Cargo.toml`
#[command(propagate_version = true)]
pub struct Cli {
    /// log level
    #[arg(long, global = true)]
    pub log: Option<Level>,

    /// Defaults to `lambda`, which is what the Lambda bootstrap runs.
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Serve invocations from the Lambda runtime API
    Lambda,
    /// Run a single invalidation from the shell
    Invoke(InvokeCmdOpts),
}

/// Override config
#[derive(Args, Debug, Default)]
pub struct InvokeCmdOpts {
    /// config path (toml)
    #[arg(long)]
    pub config: Option<PathBuf>,
    /// invocation event (json file)
    #[arg(long)]
    pub event: Option<PathBuf>,
    /// distribution id
    #[arg(long)]
    pub distribution_id: Option<String>,
    /// caller reference, random when omitted
    #[arg(long)]
    pub request_id: Option<String>,
    /// aws region
    #[arg(long)]
    pub region: Option<String>,
    /// json log output
    #[arg(long)]
    pub json_log: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn no_subcommand_means_lambda() {
        let cli = Cli::try_parse_from(["cdn-invalidator"]).unwrap();
        assert!(cli.command.is_none());
        assert!(cli.log.is_none());
    }

    #[test]
    fn parses_invoke_overrides() {
        let cli = Cli::try_parse_from([
            "cdn-invalidator",
            "invoke",
            "--distribution-id",
            "E123ABC",
            "--request-id",
            "req-1",
            "--log",
            "debug",
        ])
        .unwrap();
        assert_eq!(cli.log, Some(Level::DEBUG));
        match cli.command {
            Some(Commands::Invoke(opts)) => {
                assert_eq!(opts.distribution_id.as_deref(), Some("E123ABC"));
                assert_eq!(opts.request_id.as_deref(), Some("req-1"));
                assert!(opts.event.is_none());
            }
            _ => panic!("expected invoke"),
        }
    }
}
