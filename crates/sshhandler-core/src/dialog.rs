use crate::launch::LaunchOptions;
use crate::target::ConnectionTarget;
use crate::HandlerError;

/// Raw state of the confirmation dialog when the user closed it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DialogResponse {
    pub target: String,
    pub legacy: bool,
    pub confirmed: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Confirmed(LaunchOptions),
    Cancelled,
}

impl Outcome {
    /// The client argument string, if the user confirmed.
    pub fn arguments(&self) -> Option<String> {
        match self {
            Outcome::Confirmed(options) => Some(options.arguments()),
            Outcome::Cancelled => None,
        }
    }
}

/// Turn what the user left in the dialog into an outcome.
pub fn resolve(response: DialogResponse) -> Outcome {
    if !response.confirmed {
        return Outcome::Cancelled;
    }
    Outcome::Confirmed(LaunchOptions::new(response.target, response.legacy))
}

/// Shows the editable target and the legacy toggle, and blocks until the
/// user either confirms or cancels.
pub trait ConfirmDialog {
    fn show(
        &mut self,
        initial: &ConnectionTarget,
        legacy: bool,
    ) -> Result<DialogResponse, HandlerError>;
}

/// Confirms the parsed target unchanged, used for `--yes`.
#[derive(Debug, Default)]
pub struct AutoConfirm;

impl ConfirmDialog for AutoConfirm {
    fn show(
        &mut self,
        initial: &ConnectionTarget,
        legacy: bool,
    ) -> Result<DialogResponse, HandlerError> {
        Ok(DialogResponse {
            target: initial.to_string(),
            legacy,
            confirmed: true,
        })
    }
}

/// Interpret a yes/no answer. Blank input picks `default`; anything
/// unrecognised counts as "no".
pub fn parse_answer(input: &str, default: bool) -> bool {
    match input.trim().to_ascii_lowercase().as_str() {
        "" => default,
        "y" | "yes" => true,
        _ => false,
    }
}
