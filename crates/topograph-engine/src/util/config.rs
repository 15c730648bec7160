use anyhow::Context;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::graph::layout::{Direction, LayoutOptions, LayoutStrategy};

/// Engine defaults persisted as TOML. Missing or unparsable files fall
/// back to defaults; only saving can fail.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub strategy: LayoutStrategy,
    pub direction: Direction,
    pub node_spacing: f32,
    pub rank_spacing: f32,
    pub margin: f32,
    pub canvas_width: f32,
    pub canvas_height: f32,
    pub circle_scale: f32,
    pub force_radius: f32,
    pub search_hit_limit: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        let opts = LayoutOptions::default();
        Self {
            strategy: LayoutStrategy::default(),
            direction: opts.direction,
            node_spacing: opts.node_spacing,
            rank_spacing: opts.rank_spacing,
            margin: opts.margin,
            canvas_width: opts.canvas_width,
            canvas_height: opts.canvas_height,
            circle_scale: opts.circle_scale,
            force_radius: opts.force_radius,
            search_hit_limit: 50,
        }
    }
}

impl EngineConfig {
    pub fn layout_options(&self) -> LayoutOptions {
        LayoutOptions {
            direction: self.direction,
            node_spacing: self.node_spacing,
            rank_spacing: self.rank_spacing,
            margin: self.margin,
            canvas_width: self.canvas_width,
            canvas_height: self.canvas_height,
            circle_scale: self.circle_scale,
            force_radius: self.force_radius,
        }
    }
}

fn config_file_path() -> Option<PathBuf> {
    let proj = ProjectDirs::from("", "", "topograph")?;
    Some(proj.config_dir().join("engine.toml"))
}

pub fn load_or_default() -> EngineConfig {
    let Some(path) = config_file_path() else {
        return EngineConfig::default();
    };
    load_or_default_from_path(&path)
}

fn load_or_default_from_path(path: &Path) -> EngineConfig {
    let Ok(contents) = fs::read_to_string(path) else {
        return EngineConfig::default();
    };
    toml::from_str(&contents).unwrap_or_else(|_| EngineConfig::default())
}

pub fn save(cfg: &EngineConfig) -> anyhow::Result<()> {
    let Some(path) = config_file_path() else {
        return Err(anyhow::anyhow!("no config directory available"));
    };
    save_to_path(cfg, &path)
}

fn save_to_path(cfg: &EngineConfig, path: &Path) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create config directory {}", parent.display()))?;
    }
    let data = toml::to_string_pretty(cfg).context("failed to serialize engine config")?;
    fs::write(path, data)
        .with_context(|| format!("failed to write engine config {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn engine_config_roundtrip_save_load() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("engine.toml");
        let cfg = EngineConfig {
            strategy: LayoutStrategy::Circular,
            rank_spacing: 120.0,
            ..Default::default()
        };

        save_to_path(&cfg, &path).expect("save config");
        let loaded = load_or_default_from_path(&path);

        assert_eq!(cfg, loaded);
    }

    #[test]
    fn missing_or_broken_file_falls_back_to_defaults() {
        let dir = tempdir().expect("tempdir");
        let missing = dir.path().join("nope.toml");
        assert_eq!(load_or_default_from_path(&missing), EngineConfig::default());

        let broken = dir.path().join("broken.toml");
        fs::write(&broken, "strategy = 42").expect("write");
        assert_eq!(load_or_default_from_path(&broken), EngineConfig::default());
    }

    #[test]
    fn strategy_tags_are_snake_case() {
        let cfg = EngineConfig {
            strategy: LayoutStrategy::ForcePlacement,
            direction: Direction::LeftRight,
            ..Default::default()
        };
        let encoded = toml::to_string(&cfg).expect("serialize");
        assert!(encoded.contains("strategy = \"force_placement\""));
        assert!(encoded.contains("direction = \"left_right\""));
    }
}
