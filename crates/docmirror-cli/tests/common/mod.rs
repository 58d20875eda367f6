#![allow(clippy::expect_used, clippy::unwrap_used)]

use assert_cmd::Command;
use std::path::Path;
use std::sync::OnceLock;
use std::time::Duration;
use tempfile::TempDir;

#[allow(dead_code)]
pub const CMD_TIMEOUT: Duration = Duration::from_secs(15);

fn isolated_dir() -> &'static Path {
    static DIR: OnceLock<TempDir> = OnceLock::new();
    DIR.get_or_init(|| tempfile::tempdir().expect("failed to create isolated dir for tests"))
        .path()
}

/// Create a `docmirror` command isolated from the user's config and documents.
///
/// The config path points at a file that does not exist, so defaults apply.
#[allow(dead_code)]
pub fn docmirror_cmd() -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("docmirror"));
    cmd.timeout(CMD_TIMEOUT);
    let dir = isolated_dir();
    cmd.env("DOCMIRROR_CONFIG", dir.join("missing-config.toml"));
    cmd.env("DOCMIRROR_DOCS_DIR", dir.join("docs"));
    cmd.env("NO_COLOR", "1");
    cmd
}

/// Write a mirrored page the way the crawler does.
#[allow(dead_code)]
pub fn write_doc(dir: &Path, filename: &str, url: &str, title: &str, body: &str) {
    std::fs::write(
        dir.join(filename),
        format!("---\nurl: {url}\ntitle: {title}\n---\n\n{body}"),
    )
    .unwrap();
}
