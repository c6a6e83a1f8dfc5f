#![allow(dead_code)]

use addt::config::env::RECOGNIZED_VARS;
use assert_cmd::Command;
use std::fs;
use std::path::PathBuf;
use tempfile::{TempDir, tempdir};

/// Temp directory holding an isolated global and project config.
pub struct Workspace {
    dir: TempDir,
}

impl Workspace {
    pub fn new() -> Self {
        Self {
            dir: tempdir().unwrap(),
        }
    }

    pub fn global_path(&self) -> PathBuf {
        self.dir.path().join("home").join("config.toml")
    }

    pub fn project_path(&self) -> PathBuf {
        self.dir.path().join(".addt.toml")
    }

    pub fn write_global(&self, contents: &str) {
        fs::create_dir_all(self.dir.path().join("home")).unwrap();
        fs::write(self.global_path(), contents).unwrap();
    }

    pub fn write_project(&self, contents: &str) {
        fs::write(self.project_path(), contents).unwrap();
    }

    pub fn read_global(&self) -> String {
        fs::read_to_string(self.global_path()).unwrap()
    }

    pub fn cmd(&self) -> Command {
        let mut cmd = Command::cargo_bin("addt").unwrap();
        cmd.current_dir(self.dir.path())
            .arg("--global-config")
            .arg(self.global_path())
            .arg("--project-config")
            .arg(self.project_path());
        // Keep the developer's environment out of the run.
        for var in RECOGNIZED_VARS {
            cmd.env_remove(var);
        }
        cmd
    }
}
