use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

/// Flags that can be stored as defaults in an rc file.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ConfigFlags {
    pub store: Option<PathBuf>,
    pub page: Option<String>,
    pub export_dir: Option<PathBuf>,
    pub debounce_ms: Option<u64>,
    pub log_file: Option<PathBuf>,
}

impl ConfigFlags {
    /// Merge `other` over `self`; values set in `other` win.
    pub fn union(&self, other: &Self) -> Self {
        Self {
            store: other.store.clone().or_else(|| self.store.clone()),
            page: other.page.clone().or_else(|| self.page.clone()),
            export_dir: other.export_dir.clone().or_else(|| self.export_dir.clone()),
            debounce_ms: other.debounce_ms.or(self.debounce_ms),
            log_file: other.log_file.clone().or_else(|| self.log_file.clone()),
        }
    }
}

fn platform_dir(kind: DirKind) -> Option<PathBuf> {
    #[cfg(target_os = "windows")]
    {
        let var = match kind {
            DirKind::Config => "APPDATA",
            DirKind::Data => "LOCALAPPDATA",
        };
        if let Some(base) = std::env::var_os(var) {
            return Some(PathBuf::from(base).join("blocknote"));
        }
    }

    #[cfg(target_os = "macos")]
    {
        let _ = kind;
        if let Some(home) = std::env::var_os("HOME") {
            return Some(
                PathBuf::from(home)
                    .join("Library")
                    .join("Application Support")
                    .join("blocknote"),
            );
        }
    }

    #[cfg(not(any(target_os = "windows", target_os = "macos")))]
    {
        let (var, fallback) = match kind {
            DirKind::Config => ("XDG_CONFIG_HOME", ".config"),
            DirKind::Data => ("XDG_DATA_HOME", ".local/share"),
        };
        if let Some(xdg) = std::env::var_os(var) {
            return Some(PathBuf::from(xdg).join("blocknote"));
        }
        if let Some(home) = std::env::var_os("HOME") {
            return Some(PathBuf::from(home).join(fallback).join("blocknote"));
        }
    }

    None
}

#[derive(Debug, Clone, Copy)]
enum DirKind {
    Config,
    Data,
}

pub fn global_config_path() -> PathBuf {
    platform_dir(DirKind::Config).map_or_else(local_override_path, |dir| dir.join("config"))
}

pub fn local_override_path() -> PathBuf {
    PathBuf::from(".blocknoterc")
}

/// Directory pages are stored in when `--store` is not given.
pub fn default_store_dir() -> PathBuf {
    platform_dir(DirKind::Data).unwrap_or_else(|| PathBuf::from(".blocknote"))
}

pub fn load_config_flags(path: &Path) -> Result<ConfigFlags> {
    if !path.exists() {
        return Ok(ConfigFlags::default());
    }
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config {}", path.display()))?;
    let tokens = content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .flat_map(|line| line.split_whitespace().map(ToOwned::to_owned))
        .collect::<Vec<_>>();
    Ok(parse_flag_tokens(&tokens))
}

pub fn save_config_flags(path: &Path, flags: &ConfigFlags) -> Result<()> {
    let mut lines = Vec::new();
    lines.push("# blocknote defaults (saved with --save)".to_string());
    if let Some(store) = &flags.store {
        lines.push(format!("--store {}", store.display()));
    }
    if let Some(page) = &flags.page {
        lines.push(format!("--page {page}"));
    }
    if let Some(dir) = &flags.export_dir {
        lines.push(format!("--export-dir {}", dir.display()));
    }
    if let Some(ms) = flags.debounce_ms {
        lines.push(format!("--debounce-ms {ms}"));
    }
    if let Some(path) = &flags.log_file {
        lines.push(format!("--log-file {}", path.display()));
    }
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create config dir {}", parent.display()))?;
    }
    fs::write(path, format!("{}\n", lines.join("\n")))
        .with_context(|| format!("Failed to write config {}", path.display()))
}

pub fn clear_config_flags(path: &Path) -> Result<()> {
    if path.exists() {
        fs::remove_file(path).with_context(|| format!("Failed to remove {}", path.display()))?;
    }
    Ok(())
}

/// Pull the stored-default flags out of a token list.
///
/// Accepts both `--flag value` and `--flag=value`. Unknown tokens are
/// skipped so a full command line can be passed as is.
pub fn parse_flag_tokens(tokens: &[String]) -> ConfigFlags {
    let mut flags = ConfigFlags::default();
    let mut i = 0;
    while i < tokens.len() {
        let token = tokens[i].as_str();
        let (name, inline) = match token.split_once('=') {
            Some((name, value)) => (name, Some(value.to_string())),
            None => (token, None),
        };
        let takes_value = matches!(
            name,
            "--store" | "--page" | "--export-dir" | "--debounce-ms" | "--log-file"
        );
        if takes_value {
            let value = match inline {
                Some(value) => Some(value),
                None => {
                    i += 1;
                    tokens.get(i).cloned()
                }
            };
            if let Some(value) = value {
                apply_flag(&mut flags, name, value);
            }
        }
        i += 1;
    }
    flags
}

fn apply_flag(flags: &mut ConfigFlags, name: &str, value: String) {
    match name {
        "--store" => flags.store = Some(PathBuf::from(value)),
        "--page" => flags.page = Some(value),
        "--export-dir" => flags.export_dir = Some(PathBuf::from(value)),
        "--debounce-ms" => match value.parse() {
            Ok(ms) => flags.debounce_ms = Some(ms),
            Err(err) => tracing::warn!(%value, %err, "ignoring bad --debounce-ms"),
        },
        "--log-file" => flags.log_file = Some(PathBuf::from(value)),
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_parse_flag_tokens_extracts_known_flags() {
        let args = vec![
            "blocknote".to_string(),
            "--store".to_string(),
            "/tmp/notes".to_string(),
            "--page=ideas".to_string(),
            "--debounce-ms".to_string(),
            "250".to_string(),
            "--export-markdown".to_string(),
            "--log-file=blocknote.log".to_string(),
        ];
        let flags = parse_flag_tokens(&args);
        assert_eq!(flags.store, Some(PathBuf::from("/tmp/notes")));
        assert_eq!(flags.page.as_deref(), Some("ideas"));
        assert_eq!(flags.debounce_ms, Some(250));
        assert_eq!(flags.log_file, Some(PathBuf::from("blocknote.log")));
        assert_eq!(flags.export_dir, None);
    }

    #[test]
    fn test_bad_debounce_value_is_ignored() {
        let args = vec!["--debounce-ms".to_string(), "soon".to_string()];
        assert_eq!(parse_flag_tokens(&args).debounce_ms, None);
    }

    #[test]
    fn test_config_union_prefers_cli_values() {
        let file = ConfigFlags {
            store: Some(PathBuf::from("file-store")),
            debounce_ms: Some(500),
            ..ConfigFlags::default()
        };
        let cli = ConfigFlags {
            page: Some("notes".into()),
            debounce_ms: Some(2000),
            ..ConfigFlags::default()
        };
        let merged = file.union(&cli);
        assert_eq!(merged.store, Some(PathBuf::from("file-store")));
        assert_eq!(merged.page.as_deref(), Some("notes"));
        assert_eq!(merged.debounce_ms, Some(2000));
    }

    #[test]
    fn test_save_load_and_clear_config() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(".blocknoterc");
        let flags = ConfigFlags {
            store: Some(PathBuf::from("pages")),
            page: Some("tasks".into()),
            export_dir: Some(PathBuf::from("out")),
            debounce_ms: Some(750),
            log_file: Some(PathBuf::from("blocknote.log")),
        };

        save_config_flags(&path, &flags).unwrap();
        let loaded = load_config_flags(&path).unwrap();
        assert_eq!(loaded, flags);

        clear_config_flags(&path).unwrap();
        assert!(!path.exists());
        assert_eq!(load_config_flags(&path).unwrap(), ConfigFlags::default());
    }

    #[test]
    fn test_local_override_is_dotfile() {
        assert_eq!(local_override_path(), PathBuf::from(".blocknoterc"));
    }
}
