use std::collections::BTreeMap;
use std::io;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("{0}")]
    Io(#[from] io::Error),
    #[error("URL associations cannot be stored on this platform")]
    Unsupported,
}

/// Where an association is written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Scope {
    /// The machine-wide classes root. Needs elevation.
    #[default]
    System,
    /// The current user's classes, no elevation needed.
    User,
}

impl Scope {
    pub fn requires_elevation(self) -> bool {
        matches!(self, Scope::System)
    }

    pub fn root(self) -> &'static str {
        match self {
            Scope::System => "HKEY_CLASSES_ROOT",
            Scope::User => "HKEY_CURRENT_USER\\Software\\Classes",
        }
    }
}

/// A single value below the classes root. An empty `name` is the key's
/// default value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssociationEntry {
    pub key: String,
    pub name: String,
    pub value: String,
}

impl AssociationEntry {
    fn new(key: impl Into<String>, name: impl Into<String>, value: impl Into<String>) -> Self {
        AssociationEntry {
            key: key.into(),
            name: name.into(),
            value: value.into(),
        }
    }
}

/// Maps a URL scheme to "run this executable with the URL as argument one".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistrationRecord {
    pub scheme: String,
    pub executable: String,
}

impl RegistrationRecord {
    pub fn new(scheme: &str, executable: &Path) -> Self {
        // Extended-length prefixes confuse the shell when it expands %1.
        let executable = executable.to_string_lossy().replace(r"\\?\", "");
        RegistrationRecord {
            scheme: scheme.to_string(),
            executable,
        }
    }

    /// The command template registered under `shell\open\command`.
    pub fn command(&self) -> String {
        format!("\"{}\" \"%1\"", self.executable)
    }

    pub fn entries(&self) -> Vec<AssociationEntry> {
        let scheme = &self.scheme;
        vec![
            AssociationEntry::new(scheme.as_str(), "", format!("URL:{scheme} Protocol")),
            AssociationEntry::new(scheme.as_str(), "URL Protocol", ""),
            AssociationEntry::new(format!("{scheme}\\shell\\open\\command"), "", self.command()),
        ]
    }
}

/// The OS store holding scheme associations.
pub trait SystemAssociationStore {
    /// Write entries in order. A failure part-way leaves earlier entries in place.
    fn write(&mut self, entries: &[AssociationEntry]) -> Result<(), StoreError>;
    /// Remove the scheme key and everything below it. A missing key is not an error.
    fn remove(&mut self, scheme: &str) -> Result<(), StoreError>;
}

pub trait PrivilegeChecker {
    fn is_elevated(&self) -> bool;
}

/// Blocking user notifications.
pub trait Notifier {
    fn info(&mut self, title: &str, message: &str);
    fn error(&mut self, title: &str, message: &str);
    /// Ask a yes/no question; `true` means yes.
    fn confirm(&mut self, title: &str, message: &str) -> bool;
}

/// In-memory association store.
#[derive(Debug, Default)]
pub struct MemoryStore {
    pub values: BTreeMap<(String, String), String>,
    pub writes: usize,
    /// Fail with an I/O error once this many values have been written.
    pub fail_after: Option<usize>,
}

impl MemoryStore {
    pub fn get(&self, key: &str, name: &str) -> Option<&str> {
        self.values
            .get(&(key.to_string(), name.to_string()))
            .map(String::as_str)
    }
}

impl SystemAssociationStore for MemoryStore {
    fn write(&mut self, entries: &[AssociationEntry]) -> Result<(), StoreError> {
        for entry in entries {
            if self.fail_after.is_some_and(|limit| self.writes >= limit) {
                return Err(io::Error::new(io::ErrorKind::PermissionDenied, "access is denied").into());
            }
            self.values
                .insert((entry.key.clone(), entry.name.clone()), entry.value.clone());
            self.writes += 1;
        }
        Ok(())
    }

    fn remove(&mut self, scheme: &str) -> Result<(), StoreError> {
        let nested = format!("{scheme}\\");
        self.values
            .retain(|(key, _), _| key != scheme && !key.starts_with(&nested));
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistrationOutcome {
    Registered,
    Removed,
    Declined,
    PrivilegeMissing,
    Failed(String),
}

/// Runs the registration and removal flows against injected capabilities.
pub struct Registrar<'a> {
    store: &'a mut dyn SystemAssociationStore,
    privileges: &'a dyn PrivilegeChecker,
    notifier: &'a mut dyn Notifier,
    scope: Scope,
    assume_yes: bool,
}

impl<'a> Registrar<'a> {
    pub fn new(
        store: &'a mut dyn SystemAssociationStore,
        privileges: &'a dyn PrivilegeChecker,
        notifier: &'a mut dyn Notifier,
    ) -> Self {
        Registrar {
            store,
            privileges,
            notifier,
            scope: Scope::default(),
            assume_yes: false,
        }
    }

    pub fn scope(mut self, scope: Scope) -> Self {
        self.scope = scope;
        self
    }

    /// Skip the confirmation question.
    pub fn assume_yes(mut self, assume_yes: bool) -> Self {
        self.assume_yes = assume_yes;
        self
    }

    fn check_privileges(&mut self, action: &str) -> bool {
        if !self.scope.requires_elevation() || self.privileges.is_elevated() {
            return true;
        }
        log::warn!("refusing to {action} without elevation");
        self.notifier.error(
            "Administrator Privileges Required",
            &format!("Run this application as an administrator to {action} the URL handler."),
        );
        false
    }

    fn confirmed(&mut self, title: &str, message: &str) -> bool {
        self.assume_yes || self.notifier.confirm(title, message)
    }

    pub fn register(&mut self, record: &RegistrationRecord) -> RegistrationOutcome {
        if !self.check_privileges("register") {
            return RegistrationOutcome::PrivilegeMissing;
        }

        let scheme = &record.scheme;
        let question = format!(
            "This will register this application to handle all {scheme}:// links.\n\n\
             Command:\n{}\n\nDo you want to proceed?",
            record.command()
        );
        if !self.confirmed("Register URL Handler", &question) {
            log::info!("registration of {scheme}:// declined");
            return RegistrationOutcome::Declined;
        }

        log::debug!("writing {scheme}:// association under {}", self.scope.root());
        match self.store.write(&record.entries()) {
            Ok(()) => {
                self.notifier.info(
                    "Success",
                    &format!("Registered the {scheme}:// protocol handler."),
                );
                RegistrationOutcome::Registered
            }
            Err(e) => {
                log::error!("failed to register {scheme}://: {e}");
                let message = e.to_string();
                self.notifier
                    .error("Error", &format!("Failed to write to the registry:\n{message}"));
                RegistrationOutcome::Failed(message)
            }
        }
    }

    pub fn unregister(&mut self, scheme: &str) -> RegistrationOutcome {
        if !self.check_privileges("unregister") {
            return RegistrationOutcome::PrivilegeMissing;
        }

        let question = format!(
            "This will remove the {scheme}:// handler from {}.\n\nDo you want to proceed?",
            self.scope.root()
        );
        if !self.confirmed("Unregister URL Handler", &question) {
            log::info!("removal of {scheme}:// declined");
            return RegistrationOutcome::Declined;
        }

        match self.store.remove(scheme) {
            Ok(()) => {
                self.notifier
                    .info("Success", &format!("Removed the {scheme}:// protocol handler."));
                RegistrationOutcome::Removed
            }
            Err(e) => {
                log::error!("failed to remove {scheme}://: {e}");
                let message = e.to_string();
                self.notifier
                    .error("Error", &format!("Failed to update the registry:\n{message}"));
                RegistrationOutcome::Failed(message)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    struct Elevated(bool);

    impl PrivilegeChecker for Elevated {
        fn is_elevated(&self) -> bool {
            self.0
        }
    }

    #[derive(Default)]
    struct RecordingNotifier {
        answer: bool,
        infos: Vec<String>,
        errors: Vec<String>,
        questions: Vec<String>,
    }

    impl Notifier for RecordingNotifier {
        fn info(&mut self, _title: &str, message: &str) {
            self.infos.push(message.to_string());
        }

        fn error(&mut self, _title: &str, message: &str) {
            self.errors.push(message.to_string());
        }

        fn confirm(&mut self, _title: &str, message: &str) -> bool {
            self.questions.push(message.to_string());
            self.answer
        }
    }

    fn record() -> RegistrationRecord {
        RegistrationRecord::new("ssh", &PathBuf::from(r"C:\Tools\ssh-handler.exe"))
    }

    #[test]
    fn test_record_entries() {
        let entries = record().entries();
        assert_eq!(
            entries,
            vec![
                AssociationEntry::new("ssh", "", "URL:ssh Protocol"),
                AssociationEntry::new("ssh", "URL Protocol", ""),
                AssociationEntry::new(
                    "ssh\\shell\\open\\command",
                    "",
                    "\"C:\\Tools\\ssh-handler.exe\" \"%1\""
                ),
            ]
        );
    }

    #[test]
    fn test_record_strips_extended_prefix() {
        let record = RegistrationRecord::new("ssh", &PathBuf::from(r"\\?\C:\a.exe"));
        assert_eq!(record.command(), "\"C:\\a.exe\" \"%1\"");
    }

    #[test]
    fn test_register_without_elevation() {
        let mut store = MemoryStore::default();
        let mut notifier = RecordingNotifier {
            answer: true,
            ..Default::default()
        };

        let outcome = Registrar::new(&mut store, &Elevated(false), &mut notifier).register(&record());

        assert_eq!(outcome, RegistrationOutcome::PrivilegeMissing);
        assert_eq!(store.writes, 0);
        assert_eq!(notifier.errors.len(), 1);
        assert!(notifier.infos.is_empty());
        assert!(notifier.questions.is_empty());
    }

    #[test]
    fn test_register_confirmed() {
        let mut store = MemoryStore::default();
        let mut notifier = RecordingNotifier {
            answer: true,
            ..Default::default()
        };

        let outcome = Registrar::new(&mut store, &Elevated(true), &mut notifier).register(&record());

        assert_eq!(outcome, RegistrationOutcome::Registered);
        assert!(notifier.questions[0].contains("\"C:\\Tools\\ssh-handler.exe\" \"%1\""));
        assert_eq!(store.get("ssh", ""), Some("URL:ssh Protocol"));
        assert_eq!(store.get("ssh", "URL Protocol"), Some(""));
        assert_eq!(
            store.get("ssh\\shell\\open\\command", ""),
            Some("\"C:\\Tools\\ssh-handler.exe\" \"%1\"")
        );
        assert_eq!(notifier.infos.len(), 1);
    }

    #[test]
    fn test_register_is_idempotent() {
        let mut store = MemoryStore::default();
        let mut notifier = RecordingNotifier {
            answer: true,
            ..Default::default()
        };
        let privileges = Elevated(true);

        let mut registrar = Registrar::new(&mut store, &privileges, &mut notifier);
        registrar.register(&record());
        registrar.register(&record());

        assert_eq!(store.values.len(), 3);
    }

    #[test]
    fn test_register_declined() {
        let mut store = MemoryStore::default();
        let mut notifier = RecordingNotifier::default();

        let outcome = Registrar::new(&mut store, &Elevated(true), &mut notifier).register(&record());

        assert_eq!(outcome, RegistrationOutcome::Declined);
        assert_eq!(store.writes, 0);
    }

    #[test]
    fn test_register_failure_keeps_partial_state() {
        let mut store = MemoryStore {
            fail_after: Some(2),
            ..Default::default()
        };
        let mut notifier = RecordingNotifier::default();

        let outcome = Registrar::new(&mut store, &Elevated(true), &mut notifier)
            .assume_yes(true)
            .register(&record());

        assert_eq!(outcome, RegistrationOutcome::Failed("access is denied".to_string()));
        assert_eq!(store.values.len(), 2);
        assert_eq!(notifier.errors.len(), 1);
        assert!(notifier.errors[0].contains("access is denied"));
        assert!(notifier.questions.is_empty());
    }

    #[test]
    fn test_user_scope_skips_privilege_check() {
        let mut store = MemoryStore::default();
        let mut notifier = RecordingNotifier::default();

        let outcome = Registrar::new(&mut store, &Elevated(false), &mut notifier)
            .scope(Scope::User)
            .assume_yes(true)
            .register(&record());

        assert_eq!(outcome, RegistrationOutcome::Registered);
        assert_eq!(store.writes, 3);
    }

    #[test]
    fn test_unregister_removes_nested_keys() {
        let mut store = MemoryStore::default();
        store.write(&record().entries()).unwrap();
        store
            .write(&[AssociationEntry::new("sshfs", "", "other")])
            .unwrap();
        let mut notifier = RecordingNotifier {
            answer: true,
            ..Default::default()
        };

        let outcome = Registrar::new(&mut store, &Elevated(true), &mut notifier).unregister("ssh");

        assert_eq!(outcome, RegistrationOutcome::Removed);
        assert_eq!(store.values.len(), 1);
        assert_eq!(store.get("sshfs", ""), Some("other"));
    }

    #[test]
    fn test_unregister_without_elevation() {
        let mut store = MemoryStore::default();
        store.write(&record().entries()).unwrap();
        let mut notifier = RecordingNotifier::default();

        let outcome = Registrar::new(&mut store, &Elevated(false), &mut notifier).unregister("ssh");

        assert_eq!(outcome, RegistrationOutcome::PrivilegeMissing);
        assert_eq!(store.values.len(), 3);
        assert_eq!(notifier.errors.len(), 1);
    }
}
