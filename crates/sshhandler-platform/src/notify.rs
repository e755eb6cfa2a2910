use rustyline::DefaultEditor;
use sshhandler_core::dialog::parse_answer;
use sshhandler_core::Notifier;

/// The notifier for this platform: message boxes on Windows, the
/// terminal elsewhere.
pub fn default_notifier() -> Box<dyn Notifier> {
    #[cfg(windows)]
    {
        Box::new(MessageBoxNotifier)
    }
    #[cfg(not(windows))]
    {
        Box::new(ConsoleNotifier)
    }
}

/// Prints to stderr and asks questions on the terminal.
#[derive(Debug, Default)]
pub struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn info(&mut self, title: &str, message: &str) {
        eprintln!("{title}: {message}");
    }

    fn error(&mut self, title: &str, message: &str) {
        eprintln!("error: {title}: {message}");
    }

    fn confirm(&mut self, title: &str, message: &str) -> bool {
        eprintln!("{title}\n\n{message}\n");
        let mut editor = match DefaultEditor::new() {
            Ok(editor) => editor,
            Err(e) => {
                log::warn!("cannot prompt on this terminal: {e}");
                return false;
            }
        };
        editor
            .readline("[y/N] ")
            .map(|answer| parse_answer(&answer, false))
            .unwrap_or(false)
    }
}

#[cfg(windows)]
pub use self::message_box::MessageBoxNotifier;

#[cfg(windows)]
mod message_box {
    use std::ffi::OsStr;
    use std::os::windows::ffi::OsStrExt;
    use std::ptr;

    use sshhandler_core::Notifier;
    use windows_sys::Win32::UI::WindowsAndMessaging::{
        MessageBoxW, IDYES, MB_ICONERROR, MB_ICONINFORMATION, MB_ICONQUESTION, MB_OK, MB_YESNO,
        MESSAGEBOX_RESULT, MESSAGEBOX_STYLE,
    };

    /// Modal Win32 message boxes.
    #[derive(Debug, Default)]
    pub struct MessageBoxNotifier;

    fn wide(s: &str) -> Vec<u16> {
        OsStr::new(s).encode_wide().chain(std::iter::once(0)).collect()
    }

    fn show(title: &str, message: &str, style: MESSAGEBOX_STYLE) -> MESSAGEBOX_RESULT {
        let text = wide(message);
        let caption = wide(title);
        unsafe { MessageBoxW(ptr::null_mut(), text.as_ptr(), caption.as_ptr(), style) }
    }

    impl Notifier for MessageBoxNotifier {
        fn info(&mut self, title: &str, message: &str) {
            show(title, message, MB_OK | MB_ICONINFORMATION);
        }

        fn error(&mut self, title: &str, message: &str) {
            show(title, message, MB_OK | MB_ICONERROR);
        }

        fn confirm(&mut self, title: &str, message: &str) -> bool {
            show(title, message, MB_YESNO | MB_ICONQUESTION) == IDYES
        }
    }
}
