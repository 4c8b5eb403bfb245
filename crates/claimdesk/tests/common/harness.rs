//! Isolated claim desk for integration tests.

#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::{Duration, TimeZone, Utc};
use tempfile::TempDir;

use claimdesk::clock::{Clock, SteppingClock};
use claimdesk::config::{Config, StorageBackend};
use claimdesk::{AssessmentGenerator, ClaimDesk, Stores};

use super::builders::ConfigBuilder;

pub struct TestHarness {
    temp_dir: TempDir,
    /// Storage data directory inside the temp dir.
    pub data_dir: PathBuf,
    /// Where test input files are written.
    pub input_dir: PathBuf,
}

impl TestHarness {
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let data_dir = temp_dir.path().join("data");
        let input_dir = temp_dir.path().join("input");
        std::fs::create_dir_all(&input_dir).expect("Failed to create input dir");

        Self {
            temp_dir,
            data_dir,
            input_dir,
        }
    }

    pub fn temp_path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Config for `backend` rooted at this harness' data directory.
    pub fn config(&self, backend: StorageBackend) -> Config {
        ConfigBuilder::new()
            .backend(backend)
            .data_dir(&self.data_dir)
            .build()
    }

    /// Opens a desk over `backend` with the mock assessment provider and a
    /// deterministic clock. Reopening with the same backend sees the same data.
    pub fn desk(&self, backend: StorageBackend) -> ClaimDesk {
        let config = self.config(backend);
        let start = Utc.with_ymd_and_hms(2026, 3, 2, 9, 0, 0).unwrap();
        let clock: Arc<dyn Clock> = Arc::new(SteppingClock::new(start, Duration::seconds(30)));
        let stores =
            Stores::open_with_clock(&config.storage, clock.clone()).expect("Failed to open stores");

        ClaimDesk::new(stores, AssessmentGenerator::default())
            .with_media_config(config.media)
            .with_clock(clock)
    }

    pub fn write_input(&self, filename: &str, content: &[u8]) -> PathBuf {
        let path = self.input_dir.join(filename);
        std::fs::write(&path, content).expect("Failed to write input file");
        path
    }

    /// Writes `config` as JSON and returns its path.
    pub fn write_config(&self, config: &Config) -> PathBuf {
        let path = self.temp_path().join("config.json");
        let json = serde_json::to_string_pretty(config).expect("Failed to serialize config");
        std::fs::write(&path, json).expect("Failed to write config file");
        path
    }

    pub fn write_raw_config(&self, content: &str) -> PathBuf {
        let path = self.temp_path().join("config.json");
        std::fs::write(&path, content).expect("Failed to write config file");
        path
    }

    /// Payload files currently in the file backend's media directory.
    pub fn stored_payload_count(&self) -> usize {
        match std::fs::read_dir(self.data_dir.join("media")) {
            Ok(entries) => entries
                .filter_map(|e| e.ok())
                .filter(|e| e.path().extension().is_some_and(|ext| ext == "uri"))
                .count(),
            Err(_) => 0,
        }
    }
}
