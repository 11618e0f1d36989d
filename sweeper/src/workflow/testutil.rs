//! Shared scaffolding for workflow tests.

use crate::workflow::config::ToolchainConfig;
use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::PathBuf;
use tempfile::TempDir;

/// Temporary build/ and data/ directories with a stub measurement tool,
/// alive for as long as the fixture is held.
pub struct ToolFixture {
    pub toolchain: ToolchainConfig,
    _root: TempDir,
}

/// Lays out the directory pair and installs `stub_body` as an executable
/// `#!/bin/sh` script under the tool's well-known name. The stub runs
/// with the build directory as its working directory, so it reaches the
/// data directory as `../data`.
pub fn tool_fixture(stub_body: &str) -> ToolFixture {
    let root = tempfile::tempdir().unwrap();
    let build = root.path().join("build");
    let data = root.path().join("data");
    fs::create_dir(&build).unwrap();
    fs::create_dir(&data).unwrap();

    let stub = build.join("data_processing");
    fs::write(&stub, format!("#!/bin/sh\n{}\n", stub_body)).unwrap();
    let mut perms = fs::metadata(&stub).unwrap().permissions();
    perms.set_mode(0o755);
    fs::set_permissions(&stub, perms).unwrap();

    ToolFixture {
        toolchain: ToolchainConfig {
            build_dir: build,
            data_dir: data,
            executable: PathBuf::from("./data_processing"),
            timeout_ms: 10_000,
        },
        _root: root,
    }
}
