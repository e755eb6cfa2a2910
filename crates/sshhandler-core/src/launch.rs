use crate::HandlerError;

/// Flags passed on every connection: agent forwarding and compression.
const BASE_FLAGS: &str = "-A -C";

/// Options re-enabling key exchange, host key and MAC algorithms that
/// current OpenSSH releases disable by default.
pub const LEGACY_OPTIONS: [&str; 6] = [
    "-o",
    "KexAlgorithms=+diffie-hellman-group1-sha1,diffie-hellman-group14-sha1",
    "-o",
    "HostKeyAlgorithms=+ssh-rsa",
    "-o",
    "MACs=+hmac-sha1,hmac-sha1-96",
];

/// What the confirmation dialog hands back: the final target and whether
/// legacy algorithm compatibility was requested.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchOptions {
    pub target: String,
    pub legacy: bool,
}

impl LaunchOptions {
    pub fn new(target: impl Into<String>, legacy: bool) -> Self {
        LaunchOptions {
            target: target.into(),
            legacy,
        }
    }

    fn legacy_block(&self) -> String {
        if self.legacy {
            LEGACY_OPTIONS.join(" ")
        } else {
            String::new()
        }
    }

    /// The client command line. The legacy slot is always present, so with
    /// legacy mode off the flags and target are separated by two spaces.
    pub fn arguments(&self) -> String {
        format!("{BASE_FLAGS} {} {}", self.legacy_block(), self.target)
    }

    /// The command line split the way the client's runtime splits it.
    pub fn argv(&self) -> Vec<String> {
        self.arguments()
            .split_whitespace()
            .map(str::to_string)
            .collect()
    }

    pub fn validate(&self) -> Result<(), HandlerError> {
        if self.target.trim().is_empty() {
            return Err(HandlerError::EmptyTarget);
        }
        Ok(())
    }
}

/// Starts the external client. Implementations must not wait for it.
pub trait Launcher {
    fn launch(&mut self, client: &str, options: &LaunchOptions) -> Result<(), HandlerError>;
}
