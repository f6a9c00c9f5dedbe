use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

/// Flags that can be saved as defaults and merged with the command line.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ConfigFlags {
    pub watch: bool,
    pub perf: bool,
    pub export_html: bool,
    pub render_limit: Option<usize>,
}

impl ConfigFlags {
    /// Merge two flag sets. Switches are OR-ed; `other` wins for values.
    #[must_use]
    pub fn union(&self, other: &Self) -> Self {
        Self {
            watch: self.watch || other.watch,
            perf: self.perf || other.perf,
            export_html: self.export_html || other.export_html,
            render_limit: other.render_limit.or(self.render_limit),
        }
    }
}

pub fn global_config_path() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        if let Some(appdata) = std::env::var_os("APPDATA") {
            return PathBuf::from(appdata).join("marksync").join("config");
        }
    }

    #[cfg(target_os = "macos")]
    {
        if let Some(home) = std::env::var_os("HOME") {
            return PathBuf::from(home)
                .join("Library")
                .join("Application Support")
                .join("marksync")
                .join("config");
        }
    }

    #[cfg(not(any(target_os = "windows", target_os = "macos")))]
    {
        if let Some(xdg) = std::env::var_os("XDG_CONFIG_HOME") {
            return PathBuf::from(xdg).join("marksync").join("config");
        }
        if let Some(home) = std::env::var_os("HOME") {
            return PathBuf::from(home)
                .join(".config")
                .join("marksync")
                .join("config");
        }
    }

    local_override_path()
}

pub fn local_override_path() -> PathBuf {
    PathBuf::from(".marksyncrc")
}

/// Read saved flags. A missing file yields the defaults.
///
/// # Errors
/// Returns an error if the file exists but cannot be read.
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

/// Write flags as one token line each.
///
/// # Errors
/// Returns an error if the config directory or file cannot be written.
pub fn save_config_flags(path: &Path, flags: &ConfigFlags) -> Result<()> {
    let mut lines = vec!["# marksync defaults (saved with --save)".to_string()];
    if flags.watch {
        lines.push("--watch".to_string());
    }
    if flags.perf {
        lines.push("--perf".to_string());
    }
    if flags.export_html {
        lines.push("--export-html".to_string());
    }
    if let Some(limit) = flags.render_limit {
        lines.push(format!("--render-limit {limit}"));
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

/// Remove saved flags if present.
///
/// # Errors
/// Returns an error if the file exists but cannot be removed.
pub fn clear_config_flags(path: &Path) -> Result<()> {
    if path.exists() {
        fs::remove_file(path).with_context(|| format!("Failed to remove {}", path.display()))?;
    }
    Ok(())
}

/// Pick the saveable flags out of raw argument tokens, ignoring the rest.
pub fn parse_flag_tokens(tokens: &[String]) -> ConfigFlags {
    let mut flags = ConfigFlags::default();
    let mut i = 0;
    while i < tokens.len() {
        let token = tokens[i].as_str();
        match token {
            "--watch" | "-w" => flags.watch = true,
            "--perf" => flags.perf = true,
            "--export-html" => flags.export_html = true,
            "--render-limit" => {
                if let Some(next) = tokens.get(i + 1) {
                    flags.render_limit = next.parse().ok();
                    i += 1;
                }
            }
            _ => {
                if let Some(value) = token.strip_prefix("--render-limit=") {
                    flags.render_limit = value.parse().ok();
                }
            }
        }
        i += 1;
    }
    flags
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn tokens(args: &[&str]) -> Vec<String> {
        args.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn test_parse_flag_tokens_extracts_known_flags() {
        let flags = parse_flag_tokens(&tokens(&[
            "marksync",
            "--watch",
            "--export-html",
            "--render-limit",
            "4096",
            "-o",
            "out.md",
            "README.md",
        ]));
        assert!(flags.watch);
        assert!(flags.export_html);
        assert!(!flags.perf);
        assert_eq!(flags.render_limit, Some(4096));
    }

    #[test]
    fn test_parse_flag_tokens_equals_form() {
        let flags = parse_flag_tokens(&tokens(&["--render-limit=512", "-w"]));
        assert_eq!(flags.render_limit, Some(512));
        assert!(flags.watch);
    }

    #[test]
    fn test_parse_flag_tokens_ignores_bad_limit() {
        let flags = parse_flag_tokens(&tokens(&["--render-limit", "lots"]));
        assert_eq!(flags.render_limit, None);
    }

    #[test]
    fn test_config_union_merges_cli_over_file_for_options() {
        let file = ConfigFlags {
            watch: true,
            render_limit: Some(100),
            ..ConfigFlags::default()
        };
        let cli = ConfigFlags {
            perf: true,
            render_limit: Some(200),
            ..ConfigFlags::default()
        };
        let merged = file.union(&cli);
        assert!(merged.watch);
        assert!(merged.perf);
        assert_eq!(merged.render_limit, Some(200));
    }

    #[test]
    fn test_config_union_keeps_file_value_when_cli_silent() {
        let file = ConfigFlags {
            render_limit: Some(100),
            ..ConfigFlags::default()
        };
        assert_eq!(
            file.union(&ConfigFlags::default()).render_limit,
            Some(100)
        );
    }

    #[test]
    fn test_save_load_and_clear_config() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(".marksyncrc");
        let flags = ConfigFlags {
            watch: true,
            perf: true,
            export_html: true,
            render_limit: Some(65_536),
        };

        save_config_flags(&path, &flags).unwrap();
        let loaded = load_config_flags(&path).unwrap();
        assert_eq!(loaded, flags);

        clear_config_flags(&path).unwrap();
        assert!(!path.exists());
    }

    #[test]
    fn test_load_missing_config_is_default() {
        let dir = tempdir().unwrap();
        let loaded = load_config_flags(&dir.path().join("absent")).unwrap();
        assert_eq!(loaded, ConfigFlags::default());
    }
}
