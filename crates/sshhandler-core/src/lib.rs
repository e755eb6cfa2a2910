//! Core logic for the `ssh://` link handler.
//!
//! Everything in this crate is free of OS side effects: the registry, the
//! privilege check, dialogs and process spawning are reached through the
//! capability traits defined here and implemented in `sshhandler-platform`.

pub mod config;
pub mod dialog;
pub mod invoke;
pub mod launch;
pub mod register;
pub mod target;

use thiserror::Error;

pub use config::Configuration;
pub use dialog::{ConfirmDialog, DialogResponse, Outcome};
pub use invoke::{handle_url, Invocation};
pub use launch::{LaunchOptions, Launcher};
pub use register::{
    AssociationEntry, MemoryStore, Notifier, PrivilegeChecker, Registrar, RegistrationOutcome,
    RegistrationRecord, Scope, StoreError, SystemAssociationStore,
};
pub use target::ConnectionTarget;

/// URL scheme handled when the configuration does not name another one.
pub const DEFAULT_SCHEME: &str = "ssh";

#[derive(Error, Debug)]
pub enum HandlerError {
    #[error("connection target is empty")]
    EmptyTarget,
    #[error("failed to launch {client}: {source}")]
    Spawn {
        client: String,
        #[source]
        source: std::io::Error,
    },
    #[error("dialog error: {0}")]
    Dialog(String),
}
