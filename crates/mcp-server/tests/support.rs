use anyhow::{Context, Result};
use std::path::PathBuf;
use tokio::process::Command;

pub fn locate_moodle_mcp_bin() -> Result<PathBuf> {
    if let Some(path) = option_env!("CARGO_BIN_EXE_moodle-mcp") {
        return Ok(PathBuf::from(path));
    }

    // Cargo doesn't always expose CARGO_BIN_EXE_* at runtime. Derive it from
    // the test exe path: `.../target/{debug|release}/deps/<test>` →
    // `.../target/{debug|release}/moodle-mcp`
    if let Ok(exe) = std::env::current_exe() {
        if let Some(target_profile_dir) = exe.parent().and_then(|p| p.parent()) {
            let candidate = target_profile_dir.join("moodle-mcp");
            if candidate.exists() {
                return Ok(candidate);
            }
        }
    }

    let manifest_dir = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    let repo_root = manifest_dir
        .ancestors()
        .nth(2)
        .context("failed to resolve repo root from CARGO_MANIFEST_DIR")?;
    for rel in ["target/debug/moodle-mcp", "target/release/moodle-mcp"] {
        let candidate = repo_root.join(rel);
        if candidate.exists() {
            return Ok(candidate);
        }
    }

    anyhow::bail!("failed to locate moodle-mcp binary; build with: cargo build -p moodle-mcp")
}

/// Command for a server pointed at an unreachable Moodle instance. Good
/// enough for protocol-level assertions; any tool that actually reaches for
/// the network gets a transport failure.
pub fn server_command() -> Result<Command> {
    let bin = locate_moodle_mcp_bin()?;
    let mut cmd = Command::new(bin);
    cmd.env("MOODLE_API_URL", "http://127.0.0.1:9");
    cmd.env("MOODLE_API_TOKEN", "test-token");
    cmd.env("MOODLE_COURSE_ID", "2");
    cmd.env("RUST_LOG", "warn");
    Ok(cmd)
}
