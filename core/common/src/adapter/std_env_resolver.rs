//! 標準環境変数解決実装（std::env を委譲）

use crate::domain::Dirs;
use crate::error::Error;
use crate::ports::outbound::EnvResolver;
use std::env;
use std::path::PathBuf;

const APP_DIR: &str = "conversai";

/// 標準環境変数解決実装
#[derive(Debug, Clone, Default)]
pub struct StdEnvResolver;

impl EnvResolver for StdEnvResolver {
    fn var(&self, name: &str) -> Option<String> {
        env::var(name).ok().filter(|s| !s.is_empty())
    }

    fn resolve_dirs(&self) -> Result<Dirs, Error> {
        resolve_dirs_with(|name| self.var(name))
    }
}

/// 変数参照関数からディレクトリを解決する（テストでは環境変数を汚さずに使う）
pub fn resolve_dirs_with(lookup: impl Fn(&str) -> Option<String>) -> Result<Dirs, Error> {
    if let Some(home) = lookup("CONVERSAI_HOME") {
        let root = PathBuf::from(home);
        return Ok(Dirs {
            config_dir: root.clone(),
            state_dir: root,
        });
    }

    let home = lookup("HOME").map(PathBuf::from);
    let config_base = lookup("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .or_else(|| home.as_ref().map(|h| h.join(".config")))
        .ok_or_else(|| Error::env("HOME is not set"))?;
    let state_base = lookup("XDG_STATE_HOME")
        .map(PathBuf::from)
        .or_else(|| home.as_ref().map(|h| h.join(".local").join("state")))
        .ok_or_else(|| Error::env("HOME is not set"))?;

    Ok(Dirs {
        config_dir: config_base.join(APP_DIR),
        state_dir: state_base.join(APP_DIR),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_conversai_home_wins() {
        let dirs = resolve_dirs_with(lookup_from(&[
            ("CONVERSAI_HOME", "/opt/conversai"),
            ("HOME", "/home/u"),
            ("XDG_CONFIG_HOME", "/xdg/config"),
        ]))
        .unwrap();
        assert_eq!(dirs.config_dir, PathBuf::from("/opt/conversai"));
        assert_eq!(dirs.state_dir, PathBuf::from("/opt/conversai"));
    }

    #[test]
    fn test_xdg_dirs() {
        let dirs = resolve_dirs_with(lookup_from(&[
            ("HOME", "/home/u"),
            ("XDG_CONFIG_HOME", "/xdg/config"),
            ("XDG_STATE_HOME", "/xdg/state"),
        ]))
        .unwrap();
        assert_eq!(dirs.config_dir, PathBuf::from("/xdg/config/conversai"));
        assert_eq!(dirs.state_dir, PathBuf::from("/xdg/state/conversai"));
    }

    #[test]
    fn test_home_fallback() {
        let dirs = resolve_dirs_with(lookup_from(&[("HOME", "/home/u")])).unwrap();
        assert_eq!(dirs.config_dir, PathBuf::from("/home/u/.config/conversai"));
        assert_eq!(dirs.state_dir, PathBuf::from("/home/u/.local/state/conversai"));
    }

    #[test]
    fn test_no_home_is_env_error() {
        let err = resolve_dirs_with(lookup_from(&[])).unwrap_err();
        assert!(matches!(err, Error::Env(_)));
    }
}
