#![allow(dead_code)]

use std::path::Path;

use assert_cmd::Command;
use pms::App;
use tempfile::TempDir;

/// A throwaway data directory
pub struct TestData {
    dir: TempDir,
}

impl TestData {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("failed to create tempdir");
        Self { dir }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Open a fresh `App` over the directory, as a new process would
    pub fn app(&self) -> App {
        App::open(self.dir.path()).expect("open app")
    }

    pub fn read(&self, file: &str) -> String {
        std::fs::read_to_string(self.dir.path().join(file)).expect("read data file")
    }

    /// `pms` bound to this data directory with no ambient credentials
    pub fn pms(&self) -> Command {
        let mut cmd = Command::cargo_bin("pms").expect("binary");
        cmd.env_remove("PMS_USER")
            .env_remove("PMS_PASSWORD")
            .env_remove("RUST_LOG")
            .env("PMS_DATA_DIR", self.dir.path());
        cmd
    }

    /// `pms` acting as `user`
    pub fn pms_as(&self, user: &str, password: &str) -> Command {
        let mut cmd = self.pms();
        cmd.env("PMS_USER", user).env("PMS_PASSWORD", password);
        cmd
    }
}
