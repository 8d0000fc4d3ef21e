// src/config/accounts.rs
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::file::ensure_directory;

/// One entry of `users_config.json`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackedAccount {
    pub uid: u64,
    /// Filled with `user<uid>` on load when missing or empty
    #[serde(default)]
    pub name: String,
    #[serde(default = "enabled_by_default")]
    pub enabled: bool,
    /// Seconds, 0 when missing. Stored per account; the collection schedule itself is global.
    #[serde(default)]
    pub interval: u64,
    #[serde(default)]
    pub last_check: Option<String>,
}

fn enabled_by_default() -> bool {
    true
}

impl TrackedAccount {
    pub fn with_defaults(uid: u64, interval: u64) -> Self {
        Self {
            uid,
            name: format!("user{uid}"),
            enabled: true,
            interval,
            last_check: None,
        }
    }

    /// Give a hand-written entry (only `uid` is required) its default name and interval.
    pub fn fill_missing(&mut self, interval: u64) {
        if self.name.trim().is_empty() {
            self.name = format!("user{}", self.uid);
        }
        if self.interval == 0 {
            self.interval = interval;
        }
    }
}

/// Persisted account list, merged with a built-in default list.
pub struct ConfigStore {
    path: PathBuf,
    defaults: Vec<u64>,
    default_interval: u64,
}

impl ConfigStore {
    pub fn new(path: impl Into<PathBuf>, defaults: &[u64], default_interval: u64) -> Self {
        Self { path: path.into(), defaults: defaults.to_vec(), default_interval }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn default_list(&self) -> Vec<TrackedAccount> {
        self.defaults
            .iter()
            .map(|&uid| TrackedAccount::with_defaults(uid, self.default_interval))
            .collect()
    }

    /// Read the list. Missing file: synthesize the defaults and persist them.
    /// Present file: append any default UID it lacks. Unreadable or corrupt
    /// file: log and return an empty list.
    pub fn load(&self) -> Vec<TrackedAccount> {
        if !self.path.exists() {
            let list = self.default_list();
            self.save(&list);
            return list;
        }

        let mut list = match self.read_file() {
            Ok(list) => list,
            Err(e) => {
                loge!("failed to load {}: {}", self.path.display(), e);
                return Vec::new();
            }
        };

        for account in &mut list {
            account.fill_missing(self.default_interval);
        }
        for &uid in &self.defaults {
            if !list.iter().any(|a| a.uid == uid) {
                list.push(TrackedAccount::with_defaults(uid, self.default_interval));
            }
        }
        list
    }

    fn read_file(&self) -> io::Result<Vec<TrackedAccount>> {
        let text = fs::read_to_string(&self.path)?;
        serde_json::from_str(&text).map_err(io::Error::from)
    }

    /// Overwrite the file with `list`. Failures are logged, never returned.
    pub fn save(&self, list: &[TrackedAccount]) {
        if let Err(e) = self.write_file(list) {
            loge!("failed to save {}: {}", self.path.display(), e);
        }
    }

    fn write_file(&self, list: &[TrackedAccount]) -> io::Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                ensure_directory(parent)?;
            }
        }
        let text = serde_json::to_string_pretty(list).map_err(io::Error::from)?;
        fs::write(&self.path, text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_enabled_and_last_check_take_defaults() {
        let json = r#"[{"uid": 7, "name": "seven", "interval": 300}]"#;
        let list: Vec<TrackedAccount> = serde_json::from_str(json).unwrap();
        assert!(list[0].enabled);
        assert_eq!(list[0].last_check, None);
    }

    #[test]
    fn uid_only_entry_gets_defaults() {
        let mut list: Vec<TrackedAccount> = serde_json::from_str(r#"[{"uid": 5}]"#).unwrap();
        list[0].fill_missing(300);
        assert_eq!(list[0], TrackedAccount::with_defaults(5, 300));
    }

    #[test]
    fn serializes_null_last_check() {
        let a = TrackedAccount::with_defaults(9, 300);
        let text = serde_json::to_string(&a).unwrap();
        assert!(text.contains(r#""last_check":null"#));
        assert!(text.contains(r#""uid":9"#));
    }
}
