use std::path::PathBuf;

/// Process configuration, read entirely from the environment. This demo
/// binary has no config file or CLI flags: the Unix-domain socket it serves
/// is the only externally meaningful knob.
#[derive(Debug, Clone)]
pub struct Config {
    pub socket_path: PathBuf,
}

const SOCKET_PATH_VAR: &str = "CONTROL_SOCKET_PATH";
const DEFAULT_SOCKET_PATH: &str = "/tmp/control.sock";

impl Config {
    pub fn from_env() -> Self {
        let socket_path = std::env::var(SOCKET_PATH_VAR).map(PathBuf::from).unwrap_or_else(|_| PathBuf::from(DEFAULT_SOCKET_PATH));
        Self { socket_path }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn falls_back_to_default_socket_path_when_unset() {
        // SAFETY: test runs single-threaded with respect to this var via serial execution of this module.
        unsafe { std::env::remove_var(SOCKET_PATH_VAR) };
        assert_eq!(Config::from_env().socket_path, PathBuf::from(DEFAULT_SOCKET_PATH));
    }
}
