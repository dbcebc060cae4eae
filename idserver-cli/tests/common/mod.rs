//! Common test utilities for CLI integration tests.
//!
//! Every command runs with `IDSERVER_CONFIG` pointing at a file inside a
//! temporary directory and with the other `IDSERVER_*` variables removed,
//! so the developer's own configuration never leaks into a test.

use assert_cmd::cargo::cargo_bin;
use assert_cmd::Command;
use std::net::{TcpListener, UdpSocket};
use std::path::PathBuf;
use std::process::{Child, Stdio};
use std::thread;
use std::time::Duration;
use tempfile::TempDir;

const ENV_VARS: &[&str] = &[
    "IDSERVER_HOST",
    "IDSERVER_PORT",
    "IDSERVER_TRANSPORT",
    "IDSERVER_IDS",
    "IDSERVER_ID_PREFIX",
    "IDSERVER_ID_COUNT",
    "IDSERVER_TIMEOUT_SECONDS",
    "IDSERVER_IDLE_TIMEOUT_SECONDS",
    "IDSERVER_LOG_MODE",
];

/// Isolated environment with its own configuration file.
pub struct TestEnv {
    #[allow(dead_code)]
    temp_dir: TempDir,
    /// Configuration file passed to every command.
    pub config_path: PathBuf,
}

#[allow(dead_code)]
impl TestEnv {
    /// Create an environment with an empty configuration file.
    pub fn new() -> Self {
        Self::with_config("")
    }

    /// Create an environment whose configuration file holds `contents`.
    pub fn with_config(contents: &str) -> Self {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
        let config_path = temp_dir.path().join("config.yaml");
        std::fs::write(&config_path, contents).expect("Failed to write config");
        Self {
            temp_dir,
            config_path,
        }
    }

    /// A command for the idserver binary with the isolated configuration.
    pub fn command(&self) -> Command {
        let mut cmd = Command::cargo_bin("idserver").expect("Failed to find idserver binary");
        for var in ENV_VARS {
            cmd.env_remove(var);
        }
        cmd.env("IDSERVER_CONFIG", &self.config_path);
        cmd
    }

    /// Start `idserver serve` with `args` in the background.
    ///
    /// Waits until the server answers on `port` over `transport`.
    pub fn spawn_server(&self, port: u16, transport: &str, args: &[&str]) -> ServerGuard {
        let port = port.to_string();
        let mut cmd = std::process::Command::new(cargo_bin("idserver"));
        for var in ENV_VARS {
            cmd.env_remove(var);
        }
        let child = cmd
            .env("IDSERVER_CONFIG", &self.config_path)
            .args(["serve", "--port", port.as_str(), "--transport", transport])
            .args(args)
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .expect("Failed to start server");
        let guard = ServerGuard { child };

        let probe = if transport == "tcp" { "tcp" } else { "udp" };
        for _ in 0..50 {
            let ready = self
                .command()
                .args(["release", "--owner", "readiness-probe"])
                .args(["--port", port.as_str(), "--transport", probe, "--timeout", "1"])
                .output()
                .expect("Failed to run probe")
                .status
                .success();
            if ready {
                return guard;
            }
            thread::sleep(Duration::from_millis(100));
        }
        panic!("server on port {port} did not become ready");
    }
}

/// Kills the background server when dropped.
pub struct ServerGuard {
    child: Child,
}

impl Drop for ServerGuard {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}

/// A loopback port that is currently free for both UDP and TCP.
#[allow(dead_code)]
pub fn free_port() -> u16 {
    loop {
        let tcp = TcpListener::bind("127.0.0.1:0").expect("Failed to bind probe listener");
        let port = tcp.local_addr().unwrap().port();
        if UdpSocket::bind(("127.0.0.1", port)).is_ok() {
            return port;
        }
    }
}
