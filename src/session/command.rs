//! コマンドシステム
//!
//! メニューから組み立てられる操作と、その実行結果

/// シーケンスに対する一回分の操作
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    AddAtEnd(String),
    AddAtBeginning(String),
    AddAtCurrent(String),
    AddAt { phrase: String, index: usize },
    RemoveCurrent,
    RemoveAt(usize),
    Repeat(usize),
    /// カーソルを指定インデックスへ移す
    Select(usize),
    MoveForward,
    MoveBackward,
    /// `to` は取り外し後のインデックス
    Move { from: usize, to: usize },
    PlayAll,
    PlayFromCurrent,
    PlaySingle(usize),
    Exit,
}

impl Command {
    /// 失敗時にエラーメッセージへ添える一文
    pub fn failure_note(&self) -> Option<&'static str> {
        match self {
            Command::AddAtEnd(_)
            | Command::AddAtBeginning(_)
            | Command::AddAtCurrent(_)
            | Command::AddAt { .. } => Some("No phrase added."),
            Command::RemoveCurrent | Command::RemoveAt(_) => Some("No phrase removed."),
            Command::Repeat(_) => Some("No phrase copied."),
            Command::Select(_) => Some("Current remains unchanged."),
            Command::Move { .. } => Some("No phrase moved."),
            Command::PlayAll | Command::PlayFromCurrent | Command::PlaySingle(_) => {
                Some("No phrase played.")
            }
            Command::MoveForward | Command::MoveBackward | Command::Exit => None,
        }
    }
}

/// コマンド実行の結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandResult {
    /// 実行が成功したか
    pub success: bool,
    /// 結果メッセージ
    pub message: Option<String>,
    /// 一覧の再表示が必要か
    pub needs_refresh: bool,
    /// セッションを終了するか
    pub should_quit: bool,
}

impl CommandResult {
    /// 成功結果を作成
    pub fn success() -> Self {
        Self {
            success: true,
            message: None,
            needs_refresh: true,
            should_quit: false,
        }
    }

    /// メッセージ付き成功結果を作成
    pub fn success_with_message(message: String) -> Self {
        Self {
            message: Some(message),
            ..Self::success()
        }
    }

    /// 一覧を再表示しない成功結果を作成
    pub fn success_no_refresh() -> Self {
        Self {
            needs_refresh: false,
            ..Self::success()
        }
    }

    /// メッセージのみの成功結果を作成
    pub fn notice(message: String) -> Self {
        Self {
            message: Some(message),
            ..Self::success_no_refresh()
        }
    }

    /// エラー結果を作成
    pub fn error(message: String) -> Self {
        Self {
            success: false,
            message: Some(message),
            needs_refresh: false,
            should_quit: false,
        }
    }

    /// 終了結果を作成
    pub fn quit() -> Self {
        Self {
            success: true,
            message: Some("Exiting.".to_string()),
            needs_refresh: false,
            should_quit: true,
        }
    }
}
