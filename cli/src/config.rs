use serde::Deserialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::discover::DEFAULT_EXTENSIONS;

#[derive(Debug, Deserialize, Default)]
pub struct ConfigFile {
    pub default: Option<Profile>,
    pub profiles: Option<HashMap<String, Profile>>,
}

#[derive(Debug, Deserialize, Clone, Default, PartialEq)]
pub struct Profile {
    pub include_dirs: Option<Vec<PathBuf>>,
    pub log_level: Option<String>,
    pub image_extension: Option<String>,
    /// Extensions picked up when a directory is given.
    pub extensions: Option<Vec<String>>,
}

impl Profile {
    /// Merge another profile into this one (other takes priority for set fields).
    pub fn merge(&mut self, other: &Profile) {
        if other.include_dirs.is_some() {
            self.include_dirs = other.include_dirs.clone();
        }
        if other.log_level.is_some() {
            self.log_level = other.log_level.clone();
        }
        if other.image_extension.is_some() {
            self.image_extension = other.image_extension.clone();
        }
        if other.extensions.is_some() {
            self.extensions = other.extensions.clone();
        }
    }

    pub fn extensions(&self) -> Vec<String> {
        self.extensions.clone().unwrap_or_else(|| {
            DEFAULT_EXTENSIONS.iter().map(|e| e.to_string()).collect()
        })
    }
}

/// Walk up from `start` looking for `.thtml2doxy/config.toml`.
pub fn find_project_config(start: &Path) -> Option<PathBuf> {
    let mut dir = start.to_path_buf();
    loop {
        let candidate = dir.join(".thtml2doxy").join("config.toml");
        if candidate.is_file() {
            return Some(candidate);
        }
        if !dir.pop() {
            return None;
        }
    }
}

/// Global config path: `~/.config/thtml2doxy/config.toml`.
pub fn global_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("thtml2doxy").join("config.toml"))
}

fn load_file(path: &Path) -> Option<ConfigFile> {
    let content = std::fs::read_to_string(path).ok()?;
    match toml::from_str(&content) {
        Ok(cfg) => Some(cfg),
        Err(e) => {
            // Logging is not up yet: the log level may come from this very file
            eprintln!("warning: ignoring invalid config {}: {e}", path.display());
            None
        }
    }
}

fn apply(result: &mut Profile, cfg: &ConfigFile, profile_name: &str) {
    if let Some(default) = &cfg.default {
        result.merge(default);
    }
    if profile_name != "default" {
        if let Some(named) = cfg.profiles.as_ref().and_then(|p| p.get(profile_name)) {
            result.merge(named);
        }
    }
}

/// Resolve a profile from explicit config files, global first.
pub fn load_from(paths: &[PathBuf], profile_name: &str) -> Profile {
    let mut result = Profile::default();
    for path in paths {
        if let Some(cfg) = load_file(path) {
            apply(&mut result, &cfg, profile_name);
        }
    }
    result
}

/// Resolve a profile by name, merging global defaults → project defaults → named profile.
pub fn load_config(profile_name: &str) -> Profile {
    let mut paths = Vec::new();
    if let Some(path) = global_config_path() {
        paths.push(path);
    }
    // Project config (higher priority)
    if let Some(path) = std::env::current_dir()
        .ok()
        .and_then(|cwd| find_project_config(&cwd))
    {
        paths.push(path);
    }
    load_from(&paths, profile_name)
}
