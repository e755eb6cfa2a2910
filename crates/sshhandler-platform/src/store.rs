use sshhandler_core::{AssociationEntry, Scope, StoreError, SystemAssociationStore};

/// Scheme associations in the Windows registry.
#[derive(Debug, Clone, Copy)]
pub struct RegistryStore {
    scope: Scope,
}

impl RegistryStore {
    pub fn new(scope: Scope) -> Self {
        RegistryStore { scope }
    }
}

#[cfg(windows)]
mod imp {
    use super::*;
    use std::io;
    use winreg::enums::{HKEY_CLASSES_ROOT, HKEY_CURRENT_USER};
    use winreg::RegKey;

    fn classes_root(scope: Scope) -> io::Result<RegKey> {
        match scope {
            Scope::System => Ok(RegKey::predef(HKEY_CLASSES_ROOT)),
            Scope::User => {
                let hkcu = RegKey::predef(HKEY_CURRENT_USER);
                Ok(hkcu.create_subkey("Software\\Classes")?.0)
            }
        }
    }

    impl SystemAssociationStore for RegistryStore {
        fn write(&mut self, entries: &[AssociationEntry]) -> Result<(), StoreError> {
            let root = classes_root(self.scope)?;
            for entry in entries {
                let (key, _) = root.create_subkey(&entry.key)?;
                key.set_value(&entry.name, &entry.value)?;
                log::debug!("set {}\\{}[{}]", self.scope.root(), entry.key, entry.name);
            }
            Ok(())
        }

        fn remove(&mut self, scheme: &str) -> Result<(), StoreError> {
            let root = classes_root(self.scope)?;
            match root.delete_subkey_all(scheme) {
                Ok(()) => Ok(()),
                Err(e) if e.kind() == io::ErrorKind::NotFound => {
                    log::debug!("{}\\{scheme} does not exist", self.scope.root());
                    Ok(())
                }
                Err(e) => Err(e.into()),
            }
        }
    }
}

#[cfg(not(windows))]
impl SystemAssociationStore for RegistryStore {
    fn write(&mut self, _entries: &[AssociationEntry]) -> Result<(), StoreError> {
        log::debug!("no registry for {} on this platform", self.scope.root());
        Err(StoreError::Unsupported)
    }

    fn remove(&mut self, _scheme: &str) -> Result<(), StoreError> {
        Err(StoreError::Unsupported)
    }
}
