//! Integration tests for `serve`, `acquire` and `release`.
//!
//! Each test runs a real `idserver serve` process on a free loopback port
//! and drives it with separate CLI invocations.

mod common;

use assert_cmd::assert::Assert;
use common::{free_port, TestEnv};
use predicates::prelude::*;

fn acquire(env: &TestEnv, port: u16, transport: &str, owner: &str) -> Assert {
    env.command()
        .args(["acquire", "--owner", owner, "--expire", "60"])
        .args(["--port", port.to_string().as_str(), "--transport", transport])
        .assert()
}

fn release(env: &TestEnv, port: u16, transport: &str, owner: &str) -> Assert {
    env.command()
        .args(["release", "--owner", owner])
        .args(["--port", port.to_string().as_str(), "--transport", transport])
        .assert()
}

#[test]
fn test_help_lists_commands() {
    let env = TestEnv::new();
    env.command()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("serve"))
        .stdout(predicate::str::contains("acquire"))
        .stdout(predicate::str::contains("release"));
}

#[test]
fn test_udp_lease_cycle() {
    let env = TestEnv::new();
    let port = free_port();
    let _server = env.spawn_server(port, "udp", &["--ids", "a,b"]);

    acquire(&env, port, "udp", "x").success().stdout("a\n");
    acquire(&env, port, "udp", "x").success().stdout("a\n");
    acquire(&env, port, "udp", "y").success().stdout("b\n");
    acquire(&env, port, "udp", "z")
        .code(1)
        .stdout("")
        .stderr(predicate::str::contains("id exhausted"));

    release(&env, port, "udp", "x").success().stdout("");
    acquire(&env, port, "udp", "z").success().stdout("a\n");
}

#[test]
fn test_tcp_lease_cycle() {
    let env = TestEnv::new();
    let port = free_port();
    let _server = env.spawn_server(port, "tcp", &["--id-prefix", "slot-", "--id-count", "1"]);

    acquire(&env, port, "tcp", "x").success().stdout("slot-0\n");
    acquire(&env, port, "tcp", "y").code(1);
    release(&env, port, "tcp", "x").success();
    acquire(&env, port, "tcp", "y").success().stdout("slot-0\n");
}

#[test]
fn test_both_transports_share_one_pool() {
    let env = TestEnv::new();
    let port = free_port();
    let _server = env.spawn_server(port, "both", &["--ids", "a,b"]);

    acquire(&env, port, "udp", "x").success().stdout("a\n");
    acquire(&env, port, "tcp", "y").success().stdout("b\n");
    acquire(&env, port, "tcp", "x").success().stdout("a\n");
    acquire(&env, port, "udp", "z").code(1);
}

#[test]
fn test_server_settings_from_config_file() {
    let port = free_port();
    let env = TestEnv::with_config(&format!(
        "port: {port}\ntransport: tcp\nids: [from-file]\n"
    ));
    let _server = env.spawn_server(port, "tcp", &[]);

    // No --port/--transport: the client reads the same file.
    env.command()
        .args(["acquire", "--owner", "w1", "--expire", "30"])
        .assert()
        .success()
        .stdout("from-file\n");
}

#[test]
fn test_idle_timeout_stops_server() {
    let env = TestEnv::new();
    let port = free_port();
    env.command()
        .args(["serve", "--idle-timeout", "1", "--port"])
        .arg(port.to_string())
        .timeout(std::time::Duration::from_secs(20))
        .assert()
        .success();
}
