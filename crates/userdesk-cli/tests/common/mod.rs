use std::path::{Path, PathBuf};
use std::process::Output;

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use tempfile::TempDir;
use wiremock::MockServer;

/// An isolated home directory for one CLI session.
pub struct TestHome {
    _dir: TempDir,
    home: PathBuf,
}

impl TestHome {
    pub fn new() -> Self {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let home = dir.path().join("home");
        std::fs::create_dir_all(&home).expect("Failed to create home");
        Self { _dir: dir, home }
    }

    pub fn path(&self) -> &Path {
        &self.home
    }

    /// Where the CLI keeps its session on Linux.
    pub fn session_file(&self) -> PathBuf {
        self.home.join("data").join("userdesk").join("session.json")
    }

    /// Save a session as if `auth login` had run.
    pub fn sign_in_as(&self, token: &str) {
        let path = self.session_file();
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        let stored = serde_json::json!({"credential": token});
        std::fs::write(&path, stored.to_string()).unwrap();
    }

    pub fn stored_session(&self) -> Option<serde_json::Value> {
        let json = std::fs::read_to_string(self.session_file()).ok()?;
        serde_json::from_str(&json).ok()
    }
}

/// Run the CLI binary against `server` with an isolated HOME.
pub async fn run_cli(args: &[&str], home: &TestHome, server: &MockServer) -> Output {
    let mut cmd = tokio::process::Command::new(env!("CARGO_BIN_EXE_userdesk"));
    cmd.args(args);
    cmd.env("HOME", home.path());
    cmd.env("XDG_DATA_HOME", home.path().join("data"));
    cmd.env("USERDESK_API", server.uri());
    cmd.env_remove("USERDESK_TIMEOUT");
    cmd.env_remove("RUST_LOG");
    cmd.env("NO_COLOR", "1");
    cmd.output().await.expect("Failed to execute CLI")
}

/// Run the CLI and expect success, returning stdout.
pub async fn run_cli_success(args: &[&str], home: &TestHome, server: &MockServer) -> String {
    let output = run_cli(args, home, server).await;
    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        panic!("CLI command failed: {:?}\nstderr: {}", args, stderr);
    }
    String::from_utf8_lossy(&output.stdout).to_string()
}

/// Run the CLI and expect failure, returning stderr.
pub async fn run_cli_failure(args: &[&str], home: &TestHome, server: &MockServer) -> String {
    let output = run_cli(args, home, server).await;
    if output.status.success() {
        let stdout = String::from_utf8_lossy(&output.stdout);
        panic!("CLI command unexpectedly succeeded: {:?}\nstdout: {}", args, stdout);
    }
    String::from_utf8_lossy(&output.stderr).to_string()
}

/// Build an unsigned token for `sub` with `role`.
pub fn token(sub: i64, role: &str) -> String {
    let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
    let claims = serde_json::json!({"sub": sub, "role": role, "exp": 1_900_000_000, "iat": 1_700_000_000});
    let body = URL_SAFE_NO_PAD.encode(claims.to_string());
    format!("{}.{}.sig", header, body)
}
