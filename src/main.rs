use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use ip6_what::config::Config;
use ip6_what::network::prefix::CategoryGroup;
use ip6_what::{analyze, search_known_prefixes, web};

/// Explain what an IPv6 address or prefix is.
#[derive(Debug, Parser)]
#[command(name = "ip6-what", author, version, about, long_about = None)]
struct Cli {
    #[command(flatten)]
    log_args: LogArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Args)]
struct LogArgs {
    /// Only show errors
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Verbose mode (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbosity: u8,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Classify an address, CIDR block or bracketed address with port
    Classify {
        /// e.g. `2001:db8::1`, `fe80::1%eth0`, `2001:db8::/48`, `[::1]:8080`
        input: String,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },
    /// List known prefixes, optionally filtered by name, prefix or description
    Search {
        filter: Option<String>,

        /// Print the groups as JSON
        #[arg(long)]
        json: bool,
    },
    /// Serve the JSON HTTP API
    Serve {
        /// Address to listen on
        #[arg(long, env = "IP6_WHAT_BIND_ADDR")]
        bind: Option<String>,
    },
}

fn init_logging(args: &LogArgs) {
    let filter = if args.quiet {
        EnvFilter::new("error")
    } else {
        let base_level = match args.verbosity {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        };
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(base_level))
    };

    // stdout carries reports; logs go to stderr
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .without_time()
        .init();
}

fn print_groups(groups: &[CategoryGroup]) {
    if groups.is_empty() {
        println!("No matching prefixes.");
        return;
    }
    for (i, group) in groups.iter().enumerate() {
        if i > 0 {
            println!();
        }
        println!("{}", group.category);
        for entry in &group.entries {
            println!("  {:<28} {}", entry.display_address(), entry.name);
            if entry.has_reference() {
                println!("  {:<28} {}", "", entry.rfc_reference);
            }
        }
    }
}

fn run(command: Commands) -> anyhow::Result<()> {
    match command {
        Commands::Classify { input, json } => {
            let report = analyze(&input)?;
            if json {
                let text = serde_json::to_string_pretty(&report)
                    .context("failed to serialize report")?;
                println!("{}", text);
            } else {
                print!("{}", report);
            }
        }
        Commands::Search { filter, json } => {
            let groups = search_known_prefixes(filter.as_deref().unwrap_or(""));
            if json {
                let text = serde_json::to_string_pretty(&groups)
                    .context("failed to serialize search results")?;
                println!("{}", text);
            } else {
                print_groups(&groups);
            }
        }
        Commands::Serve { bind } => {
            let config = Config::from_env()?.with_bind_addr(bind);
            web::start(&config)?;
        }
    }

    Ok(())
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(&cli.log_args);
    run(cli.command)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use ip6_what::AddressError;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_classify() {
        let cli = Cli::try_parse_from(["ip6-what", "-vv", "classify", "::1", "--json"]).unwrap();
        assert_eq!(cli.log_args.verbosity, 2);
        match cli.command {
            Commands::Classify { input, json } => {
                assert_eq!(input, "::1");
                assert!(json);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_parse_search_without_filter() {
        let cli = Cli::try_parse_from(["ip6-what", "search", "-q"]).unwrap();
        assert!(cli.log_args.quiet);
        assert!(matches!(cli.command, Commands::Search { filter: None, json: false }));
    }

    #[test]
    fn test_invalid_input_is_returned_as_error() {
        let err = run(Commands::Classify {
            input: "2001::db8::1".to_string(),
            json: false,
        })
        .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<AddressError>(),
            Some(AddressError::InvalidAddressFormat(_))
        ));
    }
}
