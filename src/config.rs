use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ConfigFlags {
    pub no_preview: bool,
    pub history_depth: Option<usize>,
    pub group_delay_ms: Option<u64>,
    pub log_file: Option<PathBuf>,
}

impl ConfigFlags {
    pub fn union(&self, other: &Self) -> Self {
        Self {
            no_preview: self.no_preview || other.no_preview,
            history_depth: other.history_depth.or(self.history_depth),
            group_delay_ms: other.group_delay_ms.or(self.group_delay_ms),
            log_file: other.log_file.clone().or_else(|| self.log_file.clone()),
        }
    }
}

pub fn global_config_path() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        if let Some(appdata) = std::env::var_os("APPDATA") {
            return PathBuf::from(appdata).join("richpad").join("config");
        }
    }

    #[cfg(target_os = "macos")]
    {
        if let Some(home) = std::env::var_os("HOME") {
            return PathBuf::from(home)
                .join("Library")
                .join("Application Support")
                .join("richpad")
                .join("config");
        }
    }

    #[cfg(not(any(target_os = "windows", target_os = "macos")))]
    {
        if let Some(xdg) = std::env::var_os("XDG_CONFIG_HOME") {
            return PathBuf::from(xdg).join("richpad").join("config");
        }
        if let Some(home) = std::env::var_os("HOME") {
            return PathBuf::from(home)
                .join(".config")
                .join("richpad")
                .join("config");
        }
    }

    local_override_path()
}

pub fn local_override_path() -> PathBuf {
    PathBuf::from(".richpadrc")
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
    lines.push("# richpad defaults (saved with --save)".to_string());
    if flags.no_preview {
        lines.push("--no-preview".to_string());
    }
    if let Some(depth) = flags.history_depth {
        lines.push(format!("--history-depth {depth}"));
    }
    if let Some(delay) = flags.group_delay_ms {
        lines.push(format!("--group-delay {delay}"));
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

/// Pick known flags out of a token list (CLI args or config file words).
/// Unknown tokens and unparsable values are skipped.
pub fn parse_flag_tokens(tokens: &[String]) -> ConfigFlags {
    let mut flags = ConfigFlags::default();
    let mut i = 0;
    while i < tokens.len() {
        let token = tokens[i].as_str();
        let (name, inline_value) = match token.split_once('=') {
            Some((name, value)) if name.starts_with("--") => (name, Some(value)),
            _ => (token, None),
        };
        let mut value = || {
            inline_value.map(ToOwned::to_owned).or_else(|| {
                let next = tokens.get(i + 1).cloned();
                if next.is_some() {
                    i += 1;
                }
                next
            })
        };
        match name {
            "--no-preview" => flags.no_preview = true,
            "--history-depth" => {
                flags.history_depth = value().and_then(|v| v.parse().ok());
            }
            "--group-delay" => {
                flags.group_delay_ms = value().and_then(|v| v.parse().ok());
            }
            "--log-file" => flags.log_file = value().map(PathBuf::from),
            _ => {}
        }
        i += 1;
    }
    flags
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_parse_flag_tokens_extracts_known_flags() {
        let args = vec![
            "richpad".to_string(),
            "--no-preview".to_string(),
            "--history-depth".to_string(),
            "20".to_string(),
            "--group-delay=250".to_string(),
            "--log-file=richpad.log".to_string(),
            "Hello there".to_string(),
        ];
        let flags = parse_flag_tokens(&args);
        assert!(flags.no_preview);
        assert_eq!(flags.history_depth, Some(20));
        assert_eq!(flags.group_delay_ms, Some(250));
        assert_eq!(flags.log_file, Some(PathBuf::from("richpad.log")));
    }

    #[test]
    fn test_parse_flag_tokens_skips_bad_numbers() {
        let args = vec!["--history-depth".to_string(), "lots".to_string()];
        assert_eq!(parse_flag_tokens(&args).history_depth, None);
    }

    #[test]
    fn test_config_union_merges_cli_over_file_for_options() {
        let file = ConfigFlags {
            no_preview: true,
            history_depth: Some(10),
            group_delay_ms: Some(100),
            ..ConfigFlags::default()
        };
        let cli = ConfigFlags {
            history_depth: Some(50),
            ..ConfigFlags::default()
        };
        let merged = file.union(&cli);
        assert!(merged.no_preview);
        assert_eq!(merged.history_depth, Some(50));
        assert_eq!(merged.group_delay_ms, Some(100));
    }

    #[test]
    fn test_save_load_and_clear_config() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join(".richpadrc");
        let flags = ConfigFlags {
            no_preview: true,
            history_depth: Some(42),
            group_delay_ms: Some(0),
            log_file: Some(PathBuf::from("richpad.log")),
        };

        save_config_flags(&path, &flags).unwrap();
        let loaded = load_config_flags(&path).unwrap();
        assert_eq!(loaded, flags);

        clear_config_flags(&path).unwrap();
        assert!(!path.exists());
    }

    #[test]
    fn test_missing_config_is_default() {
        let dir = tempdir().unwrap();
        let loaded = load_config_flags(&dir.path().join("absent")).unwrap();
        assert_eq!(loaded, ConfigFlags::default());
    }
}
