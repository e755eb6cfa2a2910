use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use sshhandler_core::dialog::{parse_answer, ConfirmDialog, DialogResponse};
use sshhandler_core::{ConnectionTarget, HandlerError};

/// Terminal rendition of the connection dialog. The target line comes
/// pre-filled and editable; Ctrl-C or Ctrl-D at any prompt cancels.
pub struct ConsoleDialog {
    editor: DefaultEditor,
}

impl ConsoleDialog {
    pub fn new() -> Result<Self, HandlerError> {
        let editor = DefaultEditor::new().map_err(|e| HandlerError::Dialog(e.to_string()))?;
        Ok(ConsoleDialog { editor })
    }
}

/// `None` when the user aborted the prompt.
fn answered(line: rustyline::Result<String>) -> Result<Option<String>, HandlerError> {
    match line {
        Ok(line) => Ok(Some(line)),
        Err(ReadlineError::Interrupted | ReadlineError::Eof) => Ok(None),
        Err(e) => Err(HandlerError::Dialog(e.to_string())),
    }
}

fn legacy_prompt(default: bool) -> &'static str {
    if default {
        "Legacy algorithm compatibility? [Y/n] "
    } else {
        "Legacy algorithm compatibility? [y/N] "
    }
}

impl ConfirmDialog for ConsoleDialog {
    fn show(
        &mut self,
        initial: &ConnectionTarget,
        legacy: bool,
    ) -> Result<DialogResponse, HandlerError> {
        let cancelled = DialogResponse {
            target: initial.to_string(),
            legacy,
            confirmed: false,
        };

        println!("Connect with SSH");
        let Some(target) =
            answered(self.editor.readline_with_initial("Target: ", (initial.as_str(), "")))?
        else {
            return Ok(cancelled);
        };
        let target = target.trim().to_string();

        let Some(answer) = answered(self.editor.readline(legacy_prompt(legacy)))? else {
            return Ok(cancelled);
        };
        let legacy = parse_answer(&answer, legacy);

        let confirmed = answered(self.editor.readline(&format!("Connect to {target}? [Y/n] ")))?
            .is_some_and(|answer| parse_answer(&answer, true));

        Ok(DialogResponse {
            target,
            legacy,
            confirmed,
        })
    }
}
