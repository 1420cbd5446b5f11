//! ロギングシステム
//!
//! 開発者向けの詳細ログ出力。`log` クレートのバックエンドとして登録し、
//! ライブラリ側は `log::debug!` などのマクロで出力する

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::Path;
use std::str::FromStr;
use std::sync::Mutex;

/// ログレベル
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Debug,
    Info,
    #[default]
    Warning,
    Error,
    Fatal,
}

impl LogLevel {
    fn tag(self) -> &'static str {
        match self {
            LogLevel::Debug => "DEBUG",
            LogLevel::Info => "INFO",
            LogLevel::Warning => "WARNING",
            LogLevel::Error => "ERROR",
            LogLevel::Fatal => "FATAL",
        }
    }

    fn filter(self) -> log::LevelFilter {
        match self {
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Warning => log::LevelFilter::Warn,
            LogLevel::Error | LogLevel::Fatal => log::LevelFilter::Error,
        }
    }

    fn from_record_level(level: log::Level) -> Self {
        match level {
            log::Level::Error => LogLevel::Error,
            log::Level::Warn => LogLevel::Warning,
            log::Level::Info => LogLevel::Info,
            log::Level::Debug | log::Level::Trace => LogLevel::Debug,
        }
    }
}

impl FromStr for LogLevel {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "debug" | "trace" => Ok(LogLevel::Debug),
            "info" => Ok(LogLevel::Info),
            "warn" | "warning" => Ok(LogLevel::Warning),
            "error" => Ok(LogLevel::Error),
            "fatal" => Ok(LogLevel::Fatal),
            other => Err(ConfigError::InvalidValue {
                key: "log_level".to_string(),
                value: other.to_string(),
            }),
        }
    }
}

/// ロガー
///
/// * 既定では stderr へ出力
/// * ファイル出力を設定すると追記モードで書き込む（ファイルは一度だけ開く）
#[derive(Debug)]
pub struct Logger {
    level: LogLevel,
    output_stderr: bool,
    output_file: Option<Mutex<File>>,
}

impl Logger {
    /// デフォルト構築
    pub fn new(level: LogLevel) -> Self {
        Self {
            level,
            output_stderr: true,
            output_file: None,
        }
    }

    /// ファイル出力を設定
    ///
    /// ファイル出力時は対話画面を乱さないよう stderr への出力を止める
    pub fn with_file_output(mut self, path: impl AsRef<Path>) -> io::Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        self.output_file = Some(Mutex::new(file));
        self.output_stderr = false;
        Ok(self)
    }

    /// `log` クレートのグローバルロガーとして登録
    pub fn install(self) -> Result<(), log::SetLoggerError> {
        let filter = self.level.filter();
        log::set_boxed_logger(Box::new(self))?;
        log::set_max_level(filter);
        Ok(())
    }

    fn should_log(&self, level: LogLevel) -> bool {
        level >= self.level
    }

    fn write_line(&self, message: &str) {
        if self.output_stderr {
            eprintln!("{}", message);
        }

        if let Some(file) = &self.output_file {
            if let Ok(mut file) = file.lock() {
                let _ = writeln!(file, "{}", message);
            }
        }
    }

    /// 任意のログレベルでメッセージを出力
    fn log(&self, level: LogLevel, message: impl AsRef<str>) {
        if self.should_log(level) {
            self.write_line(&format!("{}: {}", level.tag(), message.as_ref()));
        }
    }

    /// コンテキスト付きでログを出力
    fn log_with_context(&self, level: LogLevel, context: Option<&str>, message: impl AsRef<str>) {
        let context_info = context.unwrap_or("unknown");
        self.log(level, format!("{} in {}", message.as_ref(), context_info));
    }
}

impl log::Log for Logger {
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        self.should_log(LogLevel::from_record_level(metadata.level()))
    }

    fn log(&self, record: &log::Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let level = LogLevel::from_record_level(record.level());
        self.log_with_context(level, Some(record.target()), record.args().to_string());
    }

    fn flush(&self) {
        if let Some(file) = &self.output_file {
            if let Ok(mut file) = file.lock() {
                let _ = file.flush();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use log::Log;

    #[test]
    fn logger_respects_log_level() {
        let logger = Logger::new(LogLevel::Debug);
        assert!(logger.should_log(LogLevel::Debug));
        assert!(logger.should_log(LogLevel::Error));

        let info_logger = Logger::new(LogLevel::Info);
        assert!(!info_logger.should_log(LogLevel::Debug));
        assert!(info_logger.should_log(LogLevel::Warning));
        assert!(!info_logger.enabled(
            &log::Metadata::builder().level(log::Level::Debug).build()
        ));
    }

    #[test]
    fn log_level_parses_aliases() {
        assert_eq!("warn".parse::<LogLevel>().unwrap(), LogLevel::Warning);
        assert_eq!(" DEBUG ".parse::<LogLevel>().unwrap(), LogLevel::Debug);
        assert!(matches!(
            "loud".parse::<LogLevel>(),
            Err(ConfigError::InvalidValue { .. })
        ));
    }

    #[test]
    fn file_output_appends_records() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("logs").join("composer.log");
        let logger = Logger::new(LogLevel::Info).with_file_output(&path).unwrap();

        logger.log_with_context(LogLevel::Info, Some("main"), "session started");
        logger.log(LogLevel::Debug, "filtered out");
        Log::log(
            &logger,
            &log::Record::builder()
                .level(log::Level::Warn)
                .target("composer::composer")
                .args(format_args!("index 9 rejected"))
                .build(),
        );

        let contents = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<_> = contents.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0], "INFO: session started in main");
        assert_eq!(lines[1], "WARNING: index 9 rejected in composer::composer");
    }

    #[test]
    fn file_output_keeps_handle_after_path_is_removed() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("composer.log");
        let logger = Logger::new(LogLevel::Info).with_file_output(&path).unwrap();

        logger.log(LogLevel::Info, "first");
        let moved = dir.path().join("rotated.log");
        std::fs::rename(&path, &moved).unwrap();
        logger.log(LogLevel::Info, "second");
        Log::flush(&logger);

        // 開いたままのハンドルへ書き続け、元のパスには作り直さない
        assert!(!path.exists());
        let contents = std::fs::read_to_string(&moved).unwrap();
        assert_eq!(contents, "INFO: first\nINFO: second\n");
    }

    #[test]
    fn file_output_reports_unopenable_path() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("not-a-dir");
        std::fs::write(&blocker, "").unwrap();

        let result = Logger::new(LogLevel::Info).with_file_output(blocker.join("composer.log"));
        assert!(result.is_err());
    }
}
