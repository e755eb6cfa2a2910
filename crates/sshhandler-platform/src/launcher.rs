use std::process::Command;

use sshhandler_core::{HandlerError, LaunchOptions, Launcher};

/// Spawns the client in its own console and forgets about it.
#[derive(Debug, Default)]
pub struct ProcessLauncher;

impl ProcessLauncher {
    #[cfg(windows)]
    fn command(client: &str, options: &LaunchOptions) -> Command {
        use std::os::windows::process::CommandExt;

        const CREATE_NEW_CONSOLE: u32 = 0x0000_0010;

        let mut command = Command::new(client);
        // Passed through untouched, the client's runtime does the splitting.
        command
            .raw_arg(options.arguments())
            .creation_flags(CREATE_NEW_CONSOLE);
        command
    }

    #[cfg(not(windows))]
    fn command(client: &str, options: &LaunchOptions) -> Command {
        let mut command = Command::new(client);
        command.args(options.argv());
        command
    }
}

impl Launcher for ProcessLauncher {
    fn launch(&mut self, client: &str, options: &LaunchOptions) -> Result<(), HandlerError> {
        options.validate()?;
        let child = Self::command(client, options)
            .spawn()
            .map_err(|source| HandlerError::Spawn {
                client: client.to_string(),
                source,
            })?;
        log::debug!("started {client} as pid {}", child.id());
        Ok(())
    }
}
