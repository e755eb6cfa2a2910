//! OS capabilities for the `ssh://` handler: the registry association
//! store, the elevation check, message boxes, the console dialog and the
//! process launcher.

pub mod console;
pub mod elevation;
pub mod launcher;
pub mod notify;
pub mod store;

pub use console::ConsoleDialog;
pub use elevation::SystemPrivileges;
pub use launcher::ProcessLauncher;
pub use notify::default_notifier;
pub use store::RegistryStore;
