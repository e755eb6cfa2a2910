use crate::config::Configuration;
use crate::dialog::{self, ConfirmDialog, Outcome};
use crate::launch::{LaunchOptions, Launcher};
use crate::target::{self, ConnectionTarget};
use crate::HandlerError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Invocation {
    Launched(LaunchOptions),
    Cancelled,
}

/// Handle one incoming URL: parse, confirm, launch. The launcher is only
/// reached after the dialog confirmed a non-empty target.
pub fn handle_url(
    url: &str,
    config: &Configuration,
    dialog: &mut dyn ConfirmDialog,
    launcher: &mut dyn Launcher,
) -> Result<Invocation, HandlerError> {
    let user = config.default_user.clone().or_else(target::current_user);
    let target = ConnectionTarget::parse_with_scheme(&config.scheme, url, user.as_deref());

    let response = dialog.show(&target, config.legacy_by_default)?;
    let options = match dialog::resolve(response) {
        Outcome::Confirmed(options) => options,
        Outcome::Cancelled => {
            log::info!("connection to '{target}' cancelled");
            return Ok(Invocation::Cancelled);
        }
    };

    options.validate()?;
    log::info!("launching {} {}", config.client, options.arguments());
    launcher.launch(&config.client, &options)?;
    Ok(Invocation::Launched(options))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialog::DialogResponse;

    struct ScriptedDialog {
        edit: Option<String>,
        legacy: Option<bool>,
        confirm: bool,
        shown: Vec<(String, bool)>,
    }

    impl ScriptedDialog {
        fn confirm() -> Self {
            ScriptedDialog {
                edit: None,
                legacy: None,
                confirm: true,
                shown: Vec::new(),
            }
        }
    }

    impl ConfirmDialog for ScriptedDialog {
        fn show(
            &mut self,
            initial: &ConnectionTarget,
            legacy: bool,
        ) -> Result<DialogResponse, HandlerError> {
            self.shown.push((initial.to_string(), legacy));
            Ok(DialogResponse {
                target: self.edit.clone().unwrap_or_else(|| initial.to_string()),
                legacy: self.legacy.unwrap_or(legacy),
                confirmed: self.confirm,
            })
        }
    }

    #[derive(Default)]
    struct RecordingLauncher {
        launches: Vec<(String, String)>,
    }

    impl Launcher for RecordingLauncher {
        fn launch(&mut self, client: &str, options: &LaunchOptions) -> Result<(), HandlerError> {
            self.launches.push((client.to_string(), options.arguments()));
            Ok(())
        }
    }

    fn config() -> Configuration {
        Configuration {
            client: "ssh.exe".to_string(),
            default_user: Some("bob".to_string()),
            ..Configuration::default()
        }
    }

    #[test]
    fn test_confirm_launches_client() {
        let mut dialog = ScriptedDialog::confirm();
        let mut launcher = RecordingLauncher::default();

        let result = handle_url("ssh://alice@box1/", &config(), &mut dialog, &mut launcher).unwrap();

        assert_eq!(result, Invocation::Launched(LaunchOptions::new("alice@box1", false)));
        assert_eq!(dialog.shown, vec![("alice@box1".to_string(), false)]);
        assert_eq!(
            launcher.launches,
            vec![("ssh.exe".to_string(), "-A -C  alice@box1".to_string())]
        );
    }

    #[test]
    fn test_default_user_is_injected() {
        let mut dialog = ScriptedDialog::confirm();
        let mut launcher = RecordingLauncher::default();

        handle_url("ssh://box1/", &config(), &mut dialog, &mut launcher).unwrap();
        assert_eq!(dialog.shown[0].0, "bob@box1");
    }

    #[test]
    fn test_cancel_never_launches() {
        let mut dialog = ScriptedDialog {
            confirm: false,
            ..ScriptedDialog::confirm()
        };
        let mut launcher = RecordingLauncher::default();

        let result = handle_url("ssh://box1/", &config(), &mut dialog, &mut launcher).unwrap();
        assert_eq!(result, Invocation::Cancelled);
        assert!(launcher.launches.is_empty());
    }

    #[test]
    fn test_edits_and_legacy_toggle_are_used() {
        let mut dialog = ScriptedDialog {
            edit: Some("root@other".to_string()),
            legacy: Some(true),
            ..ScriptedDialog::confirm()
        };
        let mut launcher = RecordingLauncher::default();

        handle_url("ssh://box1/", &config(), &mut dialog, &mut launcher).unwrap();
        let (_, arguments) = &launcher.launches[0];
        assert!(arguments.starts_with("-A -C -o KexAlgorithms="));
        assert!(arguments.ends_with(" root@other"));
    }

    #[test]
    fn test_legacy_default_prefills_toggle() {
        let config = Configuration {
            legacy_by_default: true,
            ..config()
        };
        let mut dialog = ScriptedDialog::confirm();
        let mut launcher = RecordingLauncher::default();

        handle_url("ssh://box1/", &config, &mut dialog, &mut launcher).unwrap();
        assert!(dialog.shown[0].1);
    }

    #[test]
    fn test_empty_target_is_refused() {
        let mut dialog = ScriptedDialog {
            edit: Some(String::new()),
            ..ScriptedDialog::confirm()
        };
        let mut launcher = RecordingLauncher::default();

        let result = handle_url("ssh://box1/", &config(), &mut dialog, &mut launcher);
        assert!(matches!(result, Err(HandlerError::EmptyTarget)));
        assert!(launcher.launches.is_empty());
    }
}
