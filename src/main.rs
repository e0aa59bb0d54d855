//! `staging-cli`: redirect production hostnames to Akamai staging in the
//! local hosts file.

use clap::{Parser, Subcommand, ValueEnum};
use staging_hosts::util::is_root;
use staging_hosts::{
    DigLookup, HostsManager, ShortLookup, StagingConfig, StagingError, StagingResolver,
    SystemLookup,
};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "staging-cli", version, about, long_about = None)]
struct Cli {
    /// Directory holding the hostname list and generated files (default: CWD)
    #[arg(long, global = true)]
    base_dir: Option<PathBuf>,

    /// Hostname list (default: staging-hostnames-list.txt in the base directory)
    #[arg(long, global = true)]
    hostnames_list: Option<PathBuf>,

    /// Hosts file to manage
    #[arg(long, global = true, default_value = staging_hosts::config::SYSTEM_HOSTS_FILE)]
    hosts_file: PathBuf,

    /// How DNS lookups are performed
    #[arg(long, global = true, value_enum, default_value_t = Backend::Dig)]
    backend: Backend,

    /// Nameserver to query with the dig backend
    #[arg(long, global = true)]
    dig_server: Option<String>,

    /// Log raw chains and classifications
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum Backend {
    /// Run `dig +short`
    Dig,
    /// Resolve in-process with the system resolver configuration
    System,
}

#[derive(Subcommand)]
enum Commands {
    /// Reset the hosts file, then append the static and built entries
    Apply,
    /// Resolve every listed hostname into the built hosts file
    Build,
    /// Save the current hosts file as the default and clear built entries
    Init,
    /// Clear the built hosts file
    Clean,
    /// Restore the default hosts file
    Reset,
}

fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn lookup(cli: &Cli) -> staging_hosts::Result<Box<dyn ShortLookup>> {
    match cli.backend {
        Backend::Dig => {
            let dig = cli
                .dig_server
                .as_deref()
                .map_or_else(DigLookup::new, |server| DigLookup::new().server(server));
            Ok(Box::new(dig))
        }
        Backend::System => {
            if cli.dig_server.is_some() {
                return Err(StagingError::InvalidConfig(
                    "--dig-server requires --backend dig".to_string(),
                ));
            }
            Ok(Box::new(SystemLookup::from_system_conf()?))
        }
    }
}

fn run(cli: &Cli) -> staging_hosts::Result<()> {
    let mut config = match &cli.base_dir {
        Some(dir) if !dir.is_dir() => {
            return Err(StagingError::InvalidConfig(format!(
                "base directory does not exist: {}",
                dir.display()
            )));
        }
        Some(dir) => StagingConfig::new(dir),
        None => StagingConfig::from_current_dir()?,
    }
    .with_system_hosts(&cli.hosts_file);
    if let Some(list) = &cli.hostnames_list {
        config = config.with_hostnames_list(list);
    }
    let manager = HostsManager::new(config);

    match cli.command {
        Commands::Apply => manager.apply(),
        Commands::Clean => manager.clean(),
        Commands::Init => manager.init(),
        Commands::Reset => manager.reset(),
        Commands::Build => {
            let resolver = StagingResolver::new(lookup(cli)?);
            let report = manager.build(&resolver)?;
            for failure in &report.failures {
                eprintln!("warning: {failure}");
            }
            println!(
                "{} mapped, {} skipped, {} failed -> {}",
                report.mappings.len(),
                report.skipped.len(),
                report.failures.len(),
                manager.config().built_hosts.display()
            );
            Ok(())
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            if e.is_permission_denied() && !is_root() {
                eprintln!("permission denied, are you running this as root?");
            }
            ExitCode::FAILURE
        }
    }
}
