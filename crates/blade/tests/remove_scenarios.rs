use std::collections::HashMap;
use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::sync::Arc;

use anyhow::Result;
use libblade::exec;
use libblade::test_utils::{MockConnector, RuntimeCall};
use libblade::{ErrorCategory, ErrorCode, ExecutionContext, Registry};
use serial_test::serial;

fn registry(connector: &MockConnector) -> Registry {
    let mut registry = Registry::new();
    for command in exec::commands_with(Arc::new(connector.clone())) {
        registry.register_command(command).unwrap();
    }
    registry
}

fn raw(pairs: &[(&str, &str)]) -> HashMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

#[test]
fn test_remove_existing_container() {
    let connector = MockConnector::new().with_container("abc123");
    let resp = registry(&connector).execute(
        "container",
        "remove",
        &raw(&[("endpoint", "valid"), ("container-id", "abc123")]),
        &ExecutionContext::with_uid("9c1f"),
    );
    assert!(resp.is_success(), "{resp}");
    assert_eq!(resp.to_json().unwrap(), r#"{"code":200,"success":true,"result":"9c1f"}"#);
    assert!(connector.containers().is_empty());
    assert_eq!(
        connector.calls().last(),
        Some(&RuntimeCall::ForceRemove("abc123".to_owned()))
    );
}

#[test]
fn test_remove_without_container_id() {
    let connector = MockConnector::new().with_container("abc123");
    let resp = registry(&connector).execute(
        "container",
        "rm",
        &raw(&[("endpoint", "valid"), ("container-id", "")]),
        &ExecutionContext::new(),
    );
    assert!(!resp.is_success());
    assert_eq!(
        resp.error_code().map(|c| c.category()),
        Some(ErrorCategory::Parameter)
    );
    assert!(resp.message().contains("container-id"));
    assert!(connector.calls().is_empty());
}

#[test]
fn test_remove_unreachable_runtime() {
    let connector = MockConnector::new()
        .with_container("abc123")
        .with_unreachable("unreachable");
    let resp = registry(&connector).execute(
        "container",
        "remove",
        &raw(&[("endpoint", "unreachable"), ("container-id", "abc123")]),
        &ExecutionContext::new(),
    );
    assert_eq!(resp.error_code(), Some(ErrorCode::RuntimeConnectFailed));
    assert_eq!(
        resp.error_code().map(|c| c.category()),
        Some(ErrorCategory::Connect)
    );
    assert_eq!(connector.containers(), vec!["abc123".to_owned()]);
}

#[test]
fn test_destroy_never_touches_runtime() {
    let connector = MockConnector::new().with_unreachable("unreachable");
    let resp = registry(&connector).execute(
        "container",
        "remove",
        &raw(&[("endpoint", "unreachable"), ("container-id", "abc123")]),
        &ExecutionContext::with_uid("77aa").destroying(),
    );
    assert!(resp.is_success(), "{resp}");
    assert!(connector.calls().is_empty());
}

#[test]
fn test_remove_with_force_flag_stops_first() {
    let connector = MockConnector::new().with_container("abc123");
    let resp = registry(&connector).execute(
        "container",
        "remove",
        &raw(&[("container-id", "abc123"), ("force", "")]),
        &ExecutionContext::new(),
    );
    assert!(resp.is_success(), "{resp}");
    let calls = connector.calls();
    assert_eq!(
        &calls[2..],
        &[
            RuntimeCall::Stop("abc123".to_owned(), std::time::Duration::from_secs(1)),
            RuntimeCall::Remove("abc123".to_owned()),
        ]
    );
}

// Runs the blade binary against a scripted docker command.

const FAKE_DOCKER: &str = r#"#!/bin/sh
if [ "$1" = "-H" ]; then
  if [ "$2" = "unreachable" ]; then
    echo "Cannot connect to the Docker daemon at $2" >&2
    exit 1
  fi
  shift 2
fi
case "$1" in
  version) echo "24.0.7" ;;
  inspect)
    if [ "$4" = "abc123" ]; then
      echo '[{"Id":"abc123","Name":"/web","State":{"Status":"running","Running":true}}]'
    else
      echo "Error: No such container: $4" >&2
      exit 1
    fi ;;
  stop) echo "$4" ;;
  rm) echo "$2" ;;
esac
"#;

fn fake_docker(dir: &Path) -> Result<PathBuf> {
    let path = dir.join("docker");
    fs::write(&path, FAKE_DOCKER)?;
    fs::set_permissions(&path, fs::Permissions::from_mode(0o755))?;
    Ok(path)
}

fn blade(docker: &Path, args: &[&str]) -> Result<(bool, serde_json::Value)> {
    let output = Command::new(env!("CARGO_BIN_EXE_blade"))
        .arg("--log-level")
        .arg("error")
        .arg("--docker")
        .arg(docker)
        .args(args)
        .output()?;
    let value = serde_json::from_slice(&output.stdout)?;
    Ok((output.status.success(), value))
}

#[test]
#[serial]
fn test_binary_create_and_destroy() -> Result<()> {
    let tmp = tempfile::tempdir()?;
    let docker = fake_docker(tmp.path())?;

    let (ok, value) = blade(
        &docker,
        &[
            "create",
            "container",
            "remove",
            "--uid",
            "5e2d",
            "--container-id",
            "abc123",
        ],
    )?;
    assert!(ok);
    assert_eq!(value["code"], 200);
    assert_eq!(value["result"], "5e2d");

    let (ok, value) = blade(
        &docker,
        &["destroy", "container", "rm", "--container-id", "whatever"],
    )?;
    assert!(ok);
    assert_eq!(value["success"], true);
    Ok(())
}

#[test]
#[serial]
fn test_binary_failures() -> Result<()> {
    let tmp = tempfile::tempdir()?;
    let docker = fake_docker(tmp.path())?;

    let (ok, value) = blade(&docker, &["create", "container", "remove"])?;
    assert!(!ok);
    assert_eq!(value["code"], ErrorCode::ParameterLess.code());
    assert!(value["err"].as_str().unwrap_or_default().contains("container-id"));

    let (ok, value) = blade(
        &docker,
        &[
            "create",
            "container",
            "remove",
            "--endpoint",
            "unreachable",
            "--container-id",
            "abc123",
        ],
    )?;
    assert!(!ok);
    assert_eq!(value["code"], ErrorCode::RuntimeConnectFailed.code());

    let (ok, value) = blade(
        &docker,
        &["create", "container", "remove", "--container-id", "gone"],
    )?;
    assert!(!ok);
    assert_eq!(value["code"], ErrorCode::ContainerNotFound.code());
    assert_eq!(value["err"], "container not found: gone");
    Ok(())
}
