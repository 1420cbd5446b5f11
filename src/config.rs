//! 設定ファイル
//!
//! `~/.config/composer/config.json`（プラットフォームの設定ディレクトリ）から
//! 初期メロディとログ設定を読み込む。未指定の項目は既定値になる

use crate::error::config::Result;
use crate::error::ConfigError;
use crate::logging::LogLevel;
use crate::options::RunOptions;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// 起動時のメロディ（きらきら星の冒頭）
pub const DEFAULT_MELODY: [&str; 14] = [
    "C", "C", "G", "G", "A", "A", "G", "F", "F", "E", "E", "D", "D", "C",
];

const CONFIG_DIR_NAME: &str = "composer";
const CONFIG_FILE_NAME: &str = "config.json";

/// アプリケーション設定
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ComposerConfig {
    /// 起動時のフレーズ列
    pub melody: Vec<String>,
    /// ログレベル
    pub log_level: LogLevel,
    /// ログ出力先（`~` と環境変数を展開する）
    pub log_file: Option<String>,
    /// 一覧表示にインデックス行を付けるか
    pub show_indices: bool,
}

impl Default for ComposerConfig {
    fn default() -> Self {
        Self {
            melody: DEFAULT_MELODY.iter().map(|p| p.to_string()).collect(),
            log_level: LogLevel::default(),
            log_file: None,
            show_indices: true,
        }
    }
}

impl ComposerConfig {
    /// 既定の設定ファイルパス
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
    }

    /// 設定を読み込む
    ///
    /// パス指定時はファイルが必須。未指定時は既定パスにファイルが無ければ既定値
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => match Self::default_path() {
                Some(path) if path.is_file() => Self::from_file(&path),
                _ => Ok(Self::default()),
            },
        }
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|_| ConfigError::InvalidFile {
            path: path.display().to_string(),
        })?;
        Self::from_json(&text)
    }

    pub fn from_json(text: &str) -> Result<Self> {
        serde_json::from_str(text).map_err(|e| ConfigError::Parse {
            message: e.to_string(),
        })
    }

    /// ログ出力先を展開して返す
    pub fn resolve_log_path(&self) -> Result<Option<PathBuf>> {
        self.resolve_log_path_with(dirs::home_dir, |var| std::env::var(var).map(Some))
    }

    /// ホームディレクトリと変数の参照先を指定して展開
    fn resolve_log_path_with<H, C, E>(&self, home_dir: H, lookup: C) -> Result<Option<PathBuf>>
    where
        H: FnOnce() -> Option<PathBuf>,
        C: FnMut(&str) -> std::result::Result<Option<String>, E>,
        E: std::fmt::Display,
    {
        let Some(raw) = &self.log_file else {
            return Ok(None);
        };
        shellexpand::path::full_with_context(raw, home_dir, lookup)
            .map(|expanded| Some(PathBuf::from(expanded.as_ref())))
            .map_err(|e| ConfigError::InvalidValue {
                key: "log_file".to_string(),
                value: e.to_string(),
            })
    }

    /// コマンドライン指定で上書き
    pub fn apply_options(&mut self, options: &RunOptions) {
        if let Some(level) = options.log_level {
            self.log_level = level;
        }
        if let Some(path) = &options.log_file {
            self.log_file = Some(path.clone());
        }
        if let Some(show) = options.show_indices {
            self.show_indices = show;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_keeps_defaults() {
        let config = ComposerConfig::from_json(r#"{ "melody": ["E", "D"] }"#).unwrap();
        assert_eq!(config.melody, vec!["E", "D"]);
        assert_eq!(config.log_level, LogLevel::Warning);
        assert!(config.show_indices);
        assert!(config.log_file.is_none());
    }

    #[test]
    fn malformed_json_is_parse_error() {
        let err = ComposerConfig::from_json("{ melody: ").unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn unknown_log_level_is_rejected() {
        let err = ComposerConfig::from_json(r#"{ "log_level": "loud" }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn missing_explicit_file_is_invalid() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.json");
        let err = ComposerConfig::load(Some(&path)).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidFile { .. }));
    }

    fn with_log_file(raw: &str) -> ComposerConfig {
        ComposerConfig {
            log_file: Some(raw.to_string()),
            ..ComposerConfig::default()
        }
    }

    fn lookup(var: &str) -> std::result::Result<Option<String>, std::env::VarError> {
        match var {
            "LOG_ROOT" => Ok(Some("/tmp/composer-logs".to_string())),
            _ => Err(std::env::VarError::NotPresent),
        }
    }

    fn home() -> Option<PathBuf> {
        Some(PathBuf::from("/home/player"))
    }

    #[test]
    fn log_path_expands_variables_and_home() {
        assert_eq!(
            with_log_file("$LOG_ROOT/session.log")
                .resolve_log_path_with(home, lookup)
                .unwrap(),
            Some(PathBuf::from("/tmp/composer-logs/session.log"))
        );
        assert_eq!(
            with_log_file("~/composer.log")
                .resolve_log_path_with(home, lookup)
                .unwrap(),
            Some(PathBuf::from("/home/player/composer.log"))
        );
    }

    #[test]
    fn undefined_variable_in_log_path_is_invalid() {
        let err = with_log_file("${NO_SUCH_DIR}/session.log")
            .resolve_log_path_with(home, lookup)
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { ref key, .. } if key == "log_file"));
    }

    #[test]
    fn missing_log_file_resolves_to_none() {
        let config = ComposerConfig::default();
        assert_eq!(config.resolve_log_path().unwrap(), None);
    }

    #[test]
    fn options_override_file_values() {
        let mut config = ComposerConfig::default();
        let options = RunOptions {
            log_level: Some(LogLevel::Debug),
            show_indices: Some(false),
            ..RunOptions::default()
        };
        config.apply_options(&options);

        assert_eq!(config.log_level, LogLevel::Debug);
        assert!(!config.show_indices);
        assert_eq!(config.melody.len(), DEFAULT_MELODY.len());
    }
}
