//! Tests for the `native` command

use crate::helpers::*;
use anyhow::Result;

#[test]
fn test_native_produces_version_and_branch_archives() -> Result<()> {
  let project = TestProject::native("1.2.0", "1.2.0")?;
  project.write_file("CHANGELOG.md", "1.2.0\n")?;
  let sha = project.commit("Release 1.2.0")?;

  let output = ship_ok(&project, &["native", "--name", "demo", "--os", "linux"])?;
  let stdout = String::from_utf8_lossy(&output.stdout);
  assert!(stdout.contains("demo-linux-x86_64-v1.2.0.zip"));
  assert!(stdout.contains("demo-linux-x86_64-main.zip"));

  let version = read_zip(&project.path.join("uploads/demo-linux-x86_64-v1.2.0.zip"))?;
  let names: Vec<_> = version.keys().cloned().collect();
  assert_eq!(
    names,
    [
      "demo-linux-x86_64-v1.2.0/LICENSE.txt",
      "demo-linux-x86_64-v1.2.0/README.txt",
      "demo-linux-x86_64-v1.2.0/REVISION.txt",
      "demo-linux-x86_64-v1.2.0/demo-graphical",
      "demo-linux-x86_64-v1.2.0/demo-terminal",
    ]
  );
  assert_eq!(version["demo-linux-x86_64-v1.2.0/demo-terminal"], b"binary of demo_unix");
  assert_eq!(version["demo-linux-x86_64-v1.2.0/demo-graphical"], b"binary of demo_glutin");
  assert_eq!(version["demo-linux-x86_64-v1.2.0/LICENSE.txt"], b"MIT License\n");
  assert_eq!(
    version["demo-linux-x86_64-v1.2.0/REVISION.txt"],
    format!("{}\n", sha).into_bytes()
  );

  // Same contents under a different top-level folder
  let branch = read_zip(&project.path.join("uploads/demo-linux-x86_64-main.zip"))?;
  let strip = |files: std::collections::BTreeMap<String, Vec<u8>>| {
    files
      .into_iter()
      .map(|(name, bytes)| (name.split_once('/').map(|(_, rest)| rest.to_string()), bytes))
      .collect::<Vec<_>>()
  };
  assert_eq!(strip(version), strip(branch));

  Ok(())
}

#[test]
fn test_native_explicit_branch_and_output_dir() -> Result<()> {
  let project = TestProject::native("0.4.1", "0.4.1")?;

  ship_ok(
    &project,
    &[
      "native",
      "--name",
      "demo",
      "--os",
      "macos",
      "--branch",
      "nightly",
      "--output-dir",
      "dist",
      "--release",
    ],
  )?;

  assert!(project.file_exists("dist/demo-macos-x86_64-v0.4.1.zip"));
  assert!(project.file_exists("dist/demo-macos-x86_64-nightly.zip"));
  assert!(project.file_exists("target/release/demo_unix"));
  assert!(!project.file_exists("uploads"));
  Ok(())
}

#[test]
fn test_native_version_mismatch_fails_before_building() -> Result<()> {
  let project = TestProject::native("1.2.0", "1.3.0")?;

  let output = project.ship(&["native", "--name", "demo", "--os", "linux"])?;
  assert_eq!(output.status.code(), Some(1));

  let stderr = String::from_utf8_lossy(&output.stderr);
  assert!(stderr.contains("1.2.0"), "stderr: {stderr}");
  assert!(stderr.contains("1.3.0"), "stderr: {stderr}");
  assert!(!project.file_exists("target"), "no build ran");
  assert!(!project.file_exists("uploads"));
  Ok(())
}

#[test]
fn test_native_build_failure_propagates_exit_code() -> Result<()> {
  let project = TestProject::native("1.2.0", "1.2.0")?;

  let output = project.ship_with_env(
    &["native", "--name", "demo", "--os", "linux"],
    &[("STUB_CARGO_FAIL", "1")],
  )?;
  assert_eq!(output.status.code(), Some(101));
  assert!(!project.file_exists("uploads"));
  Ok(())
}

#[test]
fn test_native_rejects_unknown_os() -> Result<()> {
  let project = TestProject::native("1.2.0", "1.2.0")?;

  let output = project.ship(&["native", "--name", "demo", "--os", "windows"])?;
  assert!(!output.status.success());
  assert!(String::from_utf8_lossy(&output.stderr).contains("windows"));
  assert!(!project.file_exists("uploads"));
  Ok(())
}

#[test]
fn test_native_macos_disk_images() -> Result<()> {
  let project = TestProject::native("2.0.0", "2.0.0")?;
  let args = [
    "native",
    "--name",
    "demo",
    "--os",
    "macos",
    "--macos-app-name",
    "Demo",
  ];

  ship_ok(&project, &args)?;
  assert!(project.file_exists("uploads/Demo-v2.0.0.dmg"));
  assert!(project.file_exists("uploads/Demo-main.dmg"));

  // The stub image lists the source folder handed to hdiutil
  let listing = project.read_file("uploads/Demo-v2.0.0.dmg")?;
  for entry in ["Applications", "Demo.app", "LICENSE.txt", "README.txt", "REVISION.txt"] {
    assert!(listing.lines().any(|l| l == entry), "{entry} missing from {listing}");
  }

  // Existing images are replaced rather than tripping hdiutil
  ship_ok(&project, &args)?;
  assert!(project.file_exists("uploads/Demo-main.dmg"));
  Ok(())
}

#[test]
fn test_native_keep_stage_reports_directory() -> Result<()> {
  let project = TestProject::native("1.0.0", "1.0.0")?;

  let output = ship_ok(&project, &["native", "--name", "demo", "--os", "linux", "--keep-stage"])?;
  let stdout = String::from_utf8_lossy(&output.stdout);
  let kept = stdout
    .lines()
    .find_map(|l| l.split_once("Stage directory kept at ").map(|(_, p)| p.trim().to_string()))
    .expect("stage directory reported");

  let kept = std::path::Path::new(&kept);
  assert!(kept.join("demo-terminal").is_file());
  assert!(kept.join("REVISION.txt").is_file());
  std::fs::remove_dir_all(kept)?;
  Ok(())
}

#[test]
fn test_native_outside_git_repository_fails() -> Result<()> {
  let project = TestProject::native("1.0.0", "1.0.0")?;
  std::fs::remove_dir_all(project.path.join(".git"))?;

  let output = project.ship(&["native", "--name", "demo", "--os", "linux", "--branch", "main"])?;
  let git_status = std::process::Command::new("git")
    .current_dir(&project.path)
    .args(["rev-parse", "HEAD"])
    .output()?
    .status;
  assert_eq!(output.status.code(), git_status.code(), "git's exit code is propagated");
  assert_eq!(output.status.code(), Some(128));
  assert!(String::from_utf8_lossy(&output.stderr).contains("--root-dir"));
  assert!(!project.file_exists("uploads"));
  Ok(())
}

#[test]
fn test_native_rejects_branch_with_slash() -> Result<()> {
  let project = TestProject::native("1.2.0", "1.2.0")?;

  let output = project.ship(&["native", "--name", "demo", "--os", "linux", "--branch", "feature/x"])?;
  assert_eq!(output.status.code(), Some(1));
  assert!(String::from_utf8_lossy(&output.stderr).contains("feature/x"));
  assert!(!project.file_exists("target"), "no build ran");
  assert!(!project.file_exists("uploads"));
  Ok(())
}
