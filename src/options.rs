//! コマンドライン引数

use crate::error::{InputError, Result};
use crate::logging::LogLevel;
use std::path::PathBuf;

pub const USAGE: &str = "\
usage: composer [options]

  --config PATH       read settings from PATH
  --debug-log PATH    append log records to PATH
  --log-level LEVEL   debug | info | warning | error | fatal
  --indices           show an index row under the phrases
  --no-indices        show phrases only
  -h, --help          print this message";

/// 起動オプション（設定ファイルより優先される）
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunOptions {
    pub config_path: Option<PathBuf>,
    pub log_file: Option<String>,
    pub log_level: Option<LogLevel>,
    pub show_indices: Option<bool>,
    pub show_help: bool,
}

impl RunOptions {
    pub fn parse<I, S>(args: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut options = Self::default();
        let mut iter = args.into_iter().map(Into::into);

        while let Some(arg) = iter.next() {
            match arg.as_str() {
                "--config" => {
                    options.config_path = Some(PathBuf::from(Self::value(&arg, iter.next())?));
                }
                "--debug-log" => {
                    options.log_file = Some(Self::value(&arg, iter.next())?);
                }
                "--log-level" => {
                    options.log_level = Some(Self::value(&arg, iter.next())?.parse::<LogLevel>()?);
                }
                "--indices" => options.show_indices = Some(true),
                "--no-indices" => options.show_indices = Some(false),
                "-h" | "--help" => options.show_help = true,
                _ => return Err(InputError::InvalidArgument { arg }.into()),
            }
        }

        Ok(options)
    }

    fn value(flag: &str, next: Option<String>) -> Result<String> {
        match next {
            Some(value) if !value.starts_with("--") => Ok(value),
            _ => Err(InputError::InvalidArgument {
                arg: format!("{} requires a value", flag),
            }
            .into()),
        }
    }
}
