use anyhow::{Context, Result};
use clap::Parser;
use sshhandler_core::dialog::AutoConfirm;
use sshhandler_core::{
    handle_url, ConfirmDialog, Configuration, HandlerError, Invocation, LaunchOptions, Launcher,
    Registrar, RegistrationOutcome, RegistrationRecord, Scope,
};
use sshhandler_platform::{default_notifier, ConsoleDialog, ProcessLauncher, RegistryStore, SystemPrivileges};
use std::env;

#[derive(Parser)]
#[command(
    name = "ssh-handler",
    version,
    about = "Open ssh:// links with the system SSH client",
    long_about = "Open ssh:// links with the system SSH client.\n\n\
                  Run without a URL to register this program as the ssh:// handler."
)]
struct Cli {
    /// The ssh:// URL to open
    url: Option<String>,

    /// Remove the handler registration instead of writing it
    #[arg(long, conflicts_with = "url")]
    unregister: bool,

    /// Register for the current user only (no administrator rights needed)
    #[arg(long)]
    user: bool,

    /// Do not ask for confirmation
    #[arg(short = 'y', long)]
    yes: bool,

    /// Print what would be done without doing it
    #[arg(long)]
    dry_run: bool,

    /// SSH client executable
    #[arg(long)]
    client: Option<String>,

    /// Pre-select legacy algorithm compatibility
    #[arg(long)]
    legacy: bool,

    #[arg(short, long)]
    verbose: bool,
}

/// Prints the command line instead of starting the client.
struct PrintLauncher;

impl Launcher for PrintLauncher {
    fn launch(&mut self, client: &str, options: &LaunchOptions) -> Result<(), HandlerError> {
        options.validate()?;
        println!("{client} {}", options.arguments());
        Ok(())
    }
}

fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .init();
}

fn open_url(cli: &Cli, config: &Configuration, url: &str) -> Result<()> {
    let mut dialog: Box<dyn ConfirmDialog> = if cli.yes {
        Box::new(AutoConfirm)
    } else {
        Box::new(ConsoleDialog::new()?)
    };
    let mut launcher: Box<dyn Launcher> = if cli.dry_run {
        Box::new(PrintLauncher)
    } else {
        Box::new(ProcessLauncher)
    };

    match handle_url(url, config, dialog.as_mut(), launcher.as_mut())
        .with_context(|| format!("failed to open {url}"))?
    {
        Invocation::Launched(options) => log::debug!("handed '{}' to {}", options.target, config.client),
        Invocation::Cancelled => log::debug!("nothing launched"),
    }
    Ok(())
}

fn setup(cli: &Cli, config: &Configuration) -> Result<()> {
    let scope = if cli.user { Scope::User } else { Scope::System };
    let exe = env::current_exe().context("unable to locate this executable")?;
    let record = RegistrationRecord::new(&config.scheme, &exe);

    if cli.dry_run {
        if cli.unregister {
            println!("remove {}\\{}", scope.root(), record.scheme);
        } else {
            for entry in record.entries() {
                let name = if entry.name.is_empty() { "(Default)" } else { entry.name.as_str() };
                println!("{}\\{}\t{name}\t{}", scope.root(), entry.key, entry.value);
            }
        }
        return Ok(());
    }

    let mut store = RegistryStore::new(scope);
    let privileges = SystemPrivileges;
    let mut notifier = default_notifier();
    let mut registrar = Registrar::new(&mut store, &privileges, notifier.as_mut())
        .scope(scope)
        .assume_yes(cli.yes);

    let outcome = if cli.unregister {
        registrar.unregister(&record.scheme)
    } else {
        registrar.register(&record)
    };

    // Failures were already shown to the user.
    match outcome {
        RegistrationOutcome::Failed(message) => log::debug!("registration failed: {message}"),
        other => log::debug!("registration finished: {other:?}"),
    }
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let mut config = Configuration::load(&Configuration::default_paths()).unwrap_or_default();
    if let Some(client) = &cli.client {
        config.client = client.clone();
    }
    if cli.legacy {
        config.legacy_by_default = true;
    }

    match &cli.url {
        Some(url) => open_url(&cli, &config, url),
        None => setup(&cli, &config),
    }
}
