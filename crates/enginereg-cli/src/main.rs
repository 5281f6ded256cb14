//! Engine registration helper.
//!
//! Registers the current (or given) engine directory under a UUID in the
//! per-user engine registry, or cleans out registrations whose directories no
//! longer hold an engine. Outcomes are printed and, on interactive Windows
//! runs, shown in a message box.

mod args;

use anyhow::{Context, Result};
use args::{is_uuid_shaped, resolve_identifier, Args};
use clap::Parser;
use enginereg_core::{
    default_notifier, open_platform_store, AppConfig, EngineRegError, EngineRegistrar, Notifier,
    RegistryStore, SqliteStore,
};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{debug, info, warn, Level};
use tracing_subscriber::FmtSubscriber;

fn main() -> ExitCode {
    // Usage errors exit with EXIT_OTHER so that status 2 stays reserved for
    // an invalid engine path. Help and version still exit 0.
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(err) if err.use_stderr() => {
            let _ = err.print();
            return ExitCode::from(EngineRegError::EXIT_OTHER);
        }
        Err(err) => err.exit(),
    };

    // Set up logging
    let log_level = if args.debug { Level::DEBUG } else { Level::INFO };
    FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .with_thread_ids(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();

    debug!(
        "{} {} ({})",
        AppConfig::APP_NAME,
        AppConfig::VERSION,
        enginereg_core::platform::current_platform()
    );

    let notifier = default_notifier(!args.no_dialog);
    ExitCode::from(report(run(&args), &*notifier))
}

/// Tell the user how the run went and pick the exit status.
fn report(outcome: Result<Option<String>>, notifier: &dyn Notifier) -> u8 {
    match outcome {
        Ok(Some(message)) => {
            notifier.notify("Done", &message);
            0
        }
        Ok(None) => 0,
        Err(err) => {
            debug!("{:?}", err);
            eprintln!("ERROR: {:#}", err);
            let (message, code) = match err.downcast_ref::<EngineRegError>() {
                Some(reg_err) => (reg_err.to_string(), reg_err.exit_code()),
                None => (err.to_string(), EngineRegError::EXIT_OTHER),
            };
            notifier.notify("Error", &message);
            code
        }
    }
}

/// Run the selected command. Returns the message to report, if any.
fn run(args: &Args) -> Result<Option<String>> {
    let store_file = args.store.clone();
    let registrar = EngineRegistrar::new(move || open_store(store_file.as_deref()));

    if args.list {
        let entries = registrar.list()?;
        if args.json {
            println!("{}", serde_json::to_string_pretty(&entries)?);
        } else {
            for entry in &entries {
                println!("{} {}", entry.name, entry.value);
            }
        }
        return Ok(None);
    }

    if args.cleanup {
        if args.uuid.is_some() || args.path.is_some() {
            debug!("Ignoring --uuid/--path during cleanup");
        }
        let report = registrar.cleanup()?;
        info!(
            "Examined {} registrations, removed {}",
            report.examined,
            report.removed.len()
        );
        return Ok(Some("Engine registry cleaned up!".to_string()));
    }

    let cwd = std::env::current_dir().context("Failed to read current directory")?;
    let id = resolve_identifier(args.uuid.as_deref(), &cwd)?;
    if !is_uuid_shaped(&id) {
        warn!("Identifier {} is not a UUID; registering it anyway", id);
    }
    let path: PathBuf = args.path.clone().unwrap_or(cwd);
    let force = args.force();
    debug!("Registering {} at {} (force: {})", id, path.display(), force);

    let registration = registrar
        .register(&id, &path, force)
        .with_context(|| format!("Failed to register {}", path.display()))?;

    if let Some(previous) = registration.previous.as_ref().filter(|p| **p != registration.path) {
        info!("Replaced previous registration of {} ({})", id, previous);
    }
    for displaced in &registration.displaced {
        info!("Dropped {} which pointed at the same path", displaced);
    }

    Ok(Some("Engine has been registered".to_string()))
}

/// Open the store selected on the command line.
fn open_store(store_file: Option<&Path>) -> enginereg_core::Result<Box<dyn RegistryStore>> {
    match store_file {
        Some(db_path) => Ok(Box::new(SqliteStore::open_at(db_path)?)),
        None => open_platform_store(),
    }
}
