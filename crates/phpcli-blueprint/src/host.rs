use std::path::PathBuf;

/// Abstraction over the process environment for testability.
///
/// Production code uses [`RealHost`], tests use mockall-generated mocks.
pub trait HostEnvironment: Send + Sync {
    /// Process environment variable; empty values count as unset.
    fn var(&self, name: &str) -> Option<String>;

    fn user_id(&self) -> u32;

    fn group_id(&self) -> u32;

    fn hostname(&self) -> Option<String>;

    fn current_dir(&self) -> std::io::Result<PathBuf>;
}

/// Reads the real process environment.
pub struct RealHost;

impl HostEnvironment for RealHost {
    fn var(&self, name: &str) -> Option<String> {
        std::env::var(name)
            // arch-lint: allow(no-silent-result-drop) reason="unset and non-unicode variables are both treated as absent"
            .ok()
            .filter(|v| !v.is_empty())
    }

    fn user_id(&self) -> u32 {
        nix::unistd::getuid().as_raw()
    }

    fn group_id(&self) -> u32 {
        nix::unistd::getgid().as_raw()
    }

    fn hostname(&self) -> Option<String> {
        nix::unistd::gethostname()
            // arch-lint: allow(no-silent-result-drop) reason="hostname is only a fallback for the debug listener"
            .ok()
            .and_then(|name| name.to_str().map(str::to_owned))
    }

    fn current_dir(&self) -> std::io::Result<PathBuf> {
        std::env::current_dir()
    }
}
