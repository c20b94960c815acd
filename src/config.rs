use std::env;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Deserialize;

#[derive(Debug, Clone, Deserialize, Default, PartialEq, Eq)]
pub struct Config {
    #[serde(default)]
    pub line_width: Option<usize>,
    #[serde(default)]
    pub format: Option<OutputFormat>,
    #[serde(default)]
    pub standalone: Option<bool>,
    #[serde(default)]
    pub footnotes_title: Option<String>,
}

#[derive(Debug, Clone, Copy, Deserialize, Default, PartialEq, Eq, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum OutputFormat {
    #[default]
    Html,
    Text,
}

pub const DEFAULT_LINE_WIDTH: usize = 80;
pub const DEFAULT_FOOTNOTES_TITLE: &str = "Footnotes";

impl Config {
    pub fn line_width(&self) -> usize {
        self.line_width.unwrap_or(DEFAULT_LINE_WIDTH)
    }

    pub fn format(&self) -> OutputFormat {
        self.format.unwrap_or_default()
    }

    pub fn standalone(&self) -> bool {
        self.standalone.unwrap_or(false)
    }

    pub fn footnotes_title(&self) -> &str {
        self.footnotes_title
            .as_deref()
            .unwrap_or(DEFAULT_FOOTNOTES_TITLE)
    }
}

const CANDIDATE_NAMES: &[&str] = &[".orgmark.toml", "orgmark.toml"];

fn parse_config_str(s: &str, path: &Path) -> io::Result<Config> {
    toml::from_str::<Config>(s).map_err(|e| {
        io::Error::new(
            io::ErrorKind::InvalidData,
            format!("invalid config {}: {e}", path.display()),
        )
    })
}

fn read_config(path: &Path) -> io::Result<Config> {
    let s = fs::read_to_string(path)?;
    parse_config_str(&s, path)
}

fn find_in_tree(start_dir: &Path) -> Option<PathBuf> {
    for dir in start_dir.ancestors() {
        for name in CANDIDATE_NAMES {
            let p = dir.join(name);
            if p.is_file() {
                return Some(p);
            }
        }
    }
    None
}

fn xdg_config_path() -> Option<PathBuf> {
    if let Ok(xdg) = env::var("XDG_CONFIG_HOME") {
        let p = Path::new(&xdg).join("orgmark").join("config.toml");
        if p.is_file() {
            return Some(p);
        }
    }
    if let Ok(home) = env::var("HOME") {
        let p = Path::new(&home)
            .join(".config")
            .join("orgmark")
            .join("config.toml");
        if p.is_file() {
            return Some(p);
        }
    }
    None
}

/// Load configuration with precedence:
/// 1) explicit path (error if unreadable/invalid)
/// 2) walk up from start_dir: .orgmark.toml, orgmark.toml
/// 3) XDG: $XDG_CONFIG_HOME/orgmark/config.toml or ~/.config/orgmark/config.toml
/// 4) default config
pub fn load(explicit: Option<&Path>, start_dir: &Path) -> io::Result<(Config, Option<PathBuf>)> {
    if let Some(path) = explicit {
        let cfg = read_config(path)?;
        return Ok((cfg, Some(path.to_path_buf())));
    }

    if let Some(p) = find_in_tree(start_dir) {
        match read_config(&p) {
            Ok(cfg) => return Ok((cfg, Some(p))),
            Err(e) => log::warn!("Ignoring {}: {e}", p.display()),
        }
    }

    if let Some(p) = xdg_config_path() {
        match read_config(&p) {
            Ok(cfg) => return Ok((cfg, Some(p))),
            Err(e) => log::warn!("Ignoring {}: {e}", p.display()),
        }
    }

    Ok((Config::default(), None))
}
