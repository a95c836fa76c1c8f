mod common;
mod utils;

use anyhow::Result;
use common::TestEnvironment;

#[test]
fn test_missing_credentials_file_exits_with_2() -> Result<()> {
    let env = TestEnvironment::new()?;
    let path = env.path().join("does-not-exist.json");

    let output = utils::run_fireadmin(&[path.to_str().unwrap()])?;

    assert_eq!(output.exit_code, 2, "stderr: {}", output.stderr);
    assert!(output.stderr.contains("not found"), "stderr: {}", output.stderr);
    assert!(!output.showed_menu());
    Ok(())
}

#[test]
fn test_missing_private_key_exits_with_3() -> Result<()> {
    let fixture = TestEnvironment::fixture("missing_private_key.json");

    let output = utils::run_fireadmin(&[fixture.to_str().unwrap()])?;

    assert_eq!(output.exit_code, 3, "stderr: {}", output.stderr);
    assert!(output.stderr.contains("private_key"), "stderr: {}", output.stderr);
    assert!(!output.showed_menu());
    Ok(())
}

#[test]
fn test_non_object_credentials_exit_with_3() -> Result<()> {
    let env = TestEnvironment::new()?;
    let path = env.write_credentials("list.json", "[1, 2, 3]")?;

    let output = utils::run_fireadmin(&[path.to_str().unwrap()])?;

    assert_eq!(output.exit_code, 3, "stderr: {}", output.stderr);
    assert!(!output.showed_menu());
    Ok(())
}

#[test]
fn test_garbled_private_key_exits_with_3() -> Result<()> {
    let env = TestEnvironment::new()?;
    let contents = std::fs::read_to_string(TestEnvironment::fixture("service_account.json"))?;
    let mut json: serde_json::Value = serde_json::from_str(&contents)?;
    json["private_key"] = serde_json::Value::String("not a pem".into());
    let path = env.write_credentials("garbled.json", &json.to_string())?;

    let output = utils::run_fireadmin(&[path.to_str().unwrap()])?;

    assert_eq!(output.exit_code, 3, "stderr: {}", output.stderr);
    Ok(())
}

#[test]
fn test_valid_credentials_without_terminal_exit_with_1() -> Result<()> {
    let env = TestEnvironment::new()?;
    let path = env.valid_credentials()?;

    let output = utils::run_fireadmin(&[path.to_str().unwrap()])?;

    assert_eq!(output.exit_code, 1, "stderr: {}", output.stderr);
    assert!(
        output.stderr.contains("interactive terminal"),
        "stderr: {}",
        output.stderr
    );
    assert!(!output.showed_menu());
    Ok(())
}

#[test]
fn test_no_arguments_prints_usage() -> Result<()> {
    let output = utils::run_fireadmin(&[])?;

    assert_eq!(output.exit_code, 2);
    assert!(output.stderr.contains("Usage"), "stderr: {}", output.stderr);
    Ok(())
}
