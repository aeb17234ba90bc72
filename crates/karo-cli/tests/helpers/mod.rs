#![allow(dead_code)]

use assert_cmd::Command;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

// Nothing listens on the discard port, so every request fails fast.
pub const UNREACHABLE_URL: &str = "http://127.0.0.1:9";

/// Test harness running `karo` in a scratch directory with its own session file
pub struct CliTestHarness {
    temp_dir: TempDir,
    session_path: PathBuf,
}

impl CliTestHarness {
    pub fn new() -> Self {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp directory");
        let session_path = temp_dir.path().join("session.json");
        Self {
            temp_dir,
            session_path,
        }
    }

    /// A `karo` command pointed at an unreachable backend
    pub fn command(&self) -> Command {
        let mut cmd = self.bare_command();
        cmd.env("KARO_SUPABASE_URL", UNREACHABLE_URL)
            .env("KARO_SUPABASE_ANON_KEY", "test-anon-key")
            .env("KARO_SESSION_FILE", &self.session_path)
            .env("KARO_REQUEST_TIMEOUT_SECS", "5");
        cmd
    }

    /// A `karo` command with no configuration at all
    pub fn bare_command(&self) -> Command {
        let mut cmd = Command::cargo_bin("karo").expect("Failed to find karo binary");
        cmd.current_dir(self.temp_dir.path())
            .env_remove("RUST_LOG")
            .env_remove("KARO_SUPABASE_URL")
            .env_remove("KARO_SUPABASE_ANON_KEY")
            .env_remove("KARO_SESSION_FILE");
        cmd
    }

    pub fn session_path(&self) -> &Path {
        &self.session_path
    }

    /// Stores a session that stays valid for an hour
    pub fn store_session(&self, email: &str) {
        let expires_at = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .expect("clock before epoch")
            .as_secs()
            + 3600;
        let session = serde_json::json!({
            "access_token": "stored-token",
            "refresh_token": "stored-refresh",
            "token_type": "bearer",
            "expires_in": 3600,
            "expires_at": expires_at,
            "user": {
                "id": "8f14e45f-ceea-467f-a8f5-1b1e3c6f3d11",
                "email": email,
                "user_metadata": { "username": "asha" }
            }
        });
        std::fs::write(&self.session_path, session.to_string())
            .expect("Failed to write session file");
    }

    pub fn run_success(&self, args: &[&str]) -> assert_cmd::assert::Assert {
        self.command().args(args).assert().success()
    }

    pub fn run_failure(&self, args: &[&str]) -> assert_cmd::assert::Assert {
        self.command().args(args).assert().failure()
    }
}

pub mod assertions {
    use predicates::prelude::*;

    pub fn not_signed_in() -> impl Predicate<str> {
        predicate::str::contains("Not signed in").and(predicate::str::contains("karo login"))
    }

    pub fn has_error() -> impl Predicate<str> {
        predicate::str::contains("Error")
            .or(predicate::str::contains("error"))
    }
}
