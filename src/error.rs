//! エラーハンドリングシステム
//!
//! composer 全体で使用される統一されたエラー型とユーティリティを定義
//! シーケンス操作のエラーはすべて非致命的で、呼び出し側へ個別に報告される

use std::fmt;
use thiserror::Error;

/// アプリケーション全体のエラー型
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ComposerError {
    /// シーケンス操作エラー
    #[error("Sequence operation failed: {0}")]
    Sequence(#[from] SequenceError),

    /// 設定エラー
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// 入力処理エラー
    #[error("Input processing failed: {0}")]
    Input(#[from] InputError),

    /// 入出力エラー
    #[error("IO error: {message}")]
    Io { message: String },
}

/// 境界の向き
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Boundary {
    First,
    Last,
}

impl fmt::Display for Boundary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Boundary::First => f.write_str("first"),
            Boundary::Last => f.write_str("last"),
        }
    }
}

/// フレーズシーケンス操作固有のエラー
///
/// どのエラーもシーケンスを呼び出し前の状態のまま残す
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SequenceError {
    #[error("Sequence is empty")]
    EmptySequence,

    #[error("No phrase is selected")]
    EmptySelection,

    #[error("Index {index} is out of range (length {len})")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("Source index {index} does not exist")]
    InvalidSource { index: usize },

    #[error("Already at the {0} phrase")]
    AtBoundary(Boundary),

    #[error("No current phrase to start from")]
    NoCursor,
}

/// 設定固有のエラー
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid configuration file: {path}")]
    InvalidFile { path: String },

    #[error("Malformed configuration: {message}")]
    Parse { message: String },

    #[error("Invalid value for {key}: {value}")]
    InvalidValue { key: String, value: String },
}

/// 入力処理固有のエラー
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InputError {
    #[error("Invalid choice: {choice}")]
    InvalidChoice { choice: String },

    #[error("Invalid argument: {arg}")]
    InvalidArgument { arg: String },
}

/// エラーレベル分類
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorLevel {
    Info,
    Warning,
    Error,
    Fatal,
}

/// エラー表示情報
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorDisplay {
    /// ユーザー向けメッセージ
    pub message: String,
    /// エラーレベル
    pub level: ErrorLevel,
}

impl ErrorDisplay {
    pub fn new(error: &ComposerError) -> Self {
        let (message, level) = Self::format_error(error);
        Self { message, level }
    }

    fn format_error(error: &ComposerError) -> (String, ErrorLevel) {
        match error {
            ComposerError::Sequence(err) => (Self::format_sequence(err), ErrorLevel::Warning),
            ComposerError::Input(InputError::InvalidChoice { .. }) => {
                ("Invalid choice.".to_string(), ErrorLevel::Info)
            }
            ComposerError::Input(InputError::InvalidArgument { arg }) => {
                (format!("Invalid input: {}", arg), ErrorLevel::Warning)
            }
            ComposerError::Config(err) => {
                (format!("Configuration problem: {}", err), ErrorLevel::Error)
            }
            ComposerError::Io { message } => {
                (format!("I/O failure: {}", message), ErrorLevel::Fatal)
            }
        }
    }

    fn format_sequence(error: &SequenceError) -> String {
        match error {
            SequenceError::EmptySequence => "The composition is empty.".to_string(),
            SequenceError::EmptySelection => "No phrase is selected.".to_string(),
            SequenceError::IndexOutOfRange { index, len } => {
                format!("Invalid index {} (the composition has {} phrases).", index, len)
            }
            SequenceError::InvalidSource { index } => {
                format!("Invalid move: source index {} does not exist.", index)
            }
            SequenceError::AtBoundary(boundary) => format!("Already at the {} phrase.", boundary),
            SequenceError::NoCursor => "No current phrase to play from.".to_string(),
        }
    }
}

/// パニック時の報告文
fn panic_report(
    payload: &(dyn std::any::Any + Send),
    location: Option<&std::panic::Location<'_>>,
) -> String {
    let message = payload
        .downcast_ref::<&str>()
        .copied()
        .or_else(|| payload.downcast_ref::<String>().map(String::as_str))
        .unwrap_or("unknown panic payload");

    match location {
        Some(location) => format!(
            "composer crashed at {}:{}: {}",
            location.file(),
            location.line(),
            message
        ),
        None => format!("composer crashed: {}", message),
    }
}

/// パニックハンドラの設定
///
/// 報告はログ（ファイル出力先を含む）と stderr の両方に出し、終了コード 1 で終える
pub fn setup_panic_handler() {
    std::panic::set_hook(Box::new(|panic_info| {
        let report = panic_report(panic_info.payload(), panic_info.location());
        log::error!("{}", report);
        log::logger().flush();

        eprintln!("{}", report);
        if log::log_enabled!(log::Level::Debug) {
            eprintln!("{}", std::backtrace::Backtrace::force_capture());
        }
        std::process::exit(1);
    }));
}

/// プロジェクト標準のResult型
pub type Result<T> = std::result::Result<T, ComposerError>;

/// 各モジュール固有のResult型
pub mod sequence {
    pub type Result<T> = std::result::Result<T, super::SequenceError>;
}

pub mod config {
    pub type Result<T> = std::result::Result<T, super::ConfigError>;
}

// std::io::Error から ComposerError への変換
impl From<std::io::Error> for ComposerError {
    fn from(error: std::io::Error) -> Self {
        ComposerError::Io {
            message: error.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sequence_errors_are_warnings() {
        let error = ComposerError::from(SequenceError::IndexOutOfRange { index: 9, len: 4 });
        let display = ErrorDisplay::new(&error);

        assert_eq!(display.level, ErrorLevel::Warning);
        assert!(display.message.contains("Invalid index 9"));
        assert!(display.message.contains("4 phrases"));
    }

    #[test]
    fn test_boundary_message() {
        let error = ComposerError::from(SequenceError::AtBoundary(Boundary::Last));
        assert_eq!(ErrorDisplay::new(&error).message, "Already at the last phrase.");

        let error = ComposerError::from(SequenceError::AtBoundary(Boundary::First));
        assert_eq!(ErrorDisplay::new(&error).message, "Already at the first phrase.");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_error = std::io::Error::new(std::io::ErrorKind::BrokenPipe, "pipe closed");
        let error: ComposerError = io_error.into();

        match &error {
            ComposerError::Io { message } => assert!(message.contains("pipe closed")),
            _ => panic!("Expected Io error"),
        }
        assert_eq!(ErrorDisplay::new(&error).level, ErrorLevel::Fatal);
    }

    #[test]
    fn test_invalid_choice_is_informational() {
        let error = ComposerError::from(InputError::InvalidChoice {
            choice: "9".to_string(),
        });
        let display = ErrorDisplay::new(&error);
        assert_eq!(display.level, ErrorLevel::Info);
        assert_eq!(display.message, "Invalid choice.");
    }

    #[test]
    fn test_panic_report_names_location_and_payload() {
        let location = std::panic::Location::caller();
        let report = panic_report(&"cursor lost", Some(location));
        assert_eq!(
            report,
            format!("composer crashed at {}:{}: cursor lost", location.file(), location.line())
        );

        let owned: Box<dyn std::any::Any + Send> = Box::new(format!("index {} dangling", 3));
        assert_eq!(panic_report(&*owned, None), "composer crashed: index 3 dangling");

        let opaque: Box<dyn std::any::Any + Send> = Box::new(7_u8);
        assert_eq!(
            panic_report(&*opaque, None),
            "composer crashed: unknown panic payload"
        );
    }
}
