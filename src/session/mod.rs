//! 対話セッション
//!
//! メニューから受け取ったコマンドをシーケンスに適用し、結果を表示用に返す

pub mod command;
pub mod menu;
pub mod render;

pub use command::{Command, CommandResult};
pub use menu::MenuSession;

use crate::error::{ComposerError, ErrorDisplay, SequenceError};
use crate::playback::{Playback, Player};
use crate::sequence::PhraseSequence;

/// シーケンスと再生先を束ねる作曲セッション
#[derive(Debug)]
pub struct Composer<P: Player> {
    sequence: PhraseSequence,
    player: P,
    show_indices: bool,
}

impl<P: Player> Composer<P> {
    pub fn new(sequence: PhraseSequence, player: P) -> Self {
        Self {
            sequence,
            player,
            show_indices: true,
        }
    }

    /// 一覧表示にインデックス行を付けるか
    pub fn with_indices(mut self, show: bool) -> Self {
        self.show_indices = show;
        self
    }

    pub fn player(&self) -> &P {
        &self.player
    }

    pub fn into_parts(self) -> (PhraseSequence, P) {
        (self.sequence, self.player)
    }

    /// 現在の一覧
    pub fn render_listing(&self) -> String {
        if self.show_indices {
            render::render_with_indices(&self.sequence)
        } else {
            render::render_phrases(&self.sequence)
        }
    }

    pub fn render_current(&self) -> String {
        render::render_current(&self.sequence)
    }

    /// コマンドを実行
    ///
    /// 失敗してもシーケンスは実行前の状態のまま
    pub fn execute(&mut self, command: Command) -> CommandResult {
        log::debug!("executing {:?}", command);
        let note = command.failure_note();

        match self.apply(command) {
            Ok(result) => {
                if result.needs_refresh {
                    self.log_state();
                }
                result
            }
            Err(err) => {
                let error = ComposerError::from(err);
                log::warn!("command rejected: {}", error);
                let display = ErrorDisplay::new(&error);
                let message = match note {
                    Some(note) => format!("{} {}", display.message, note),
                    None => display.message,
                };
                CommandResult::error(message)
            }
        }
    }

    fn apply(&mut self, command: Command) -> Result<CommandResult, SequenceError> {
        let result = match command {
            Command::AddAtEnd(phrase) => {
                self.sequence.add_at_end(phrase);
                CommandResult::success()
            }
            Command::AddAtBeginning(phrase) => {
                self.sequence.add_at_beginning(phrase);
                CommandResult::success()
            }
            Command::AddAtCurrent(phrase) => {
                self.sequence.add_at_current(phrase);
                CommandResult::success()
            }
            Command::AddAt { phrase, index } => {
                self.sequence.add_at(phrase, index)?;
                CommandResult::success()
            }
            Command::RemoveCurrent => {
                let node = self.sequence.remove_current()?;
                CommandResult::success_with_message(format!("Removed: {}", node.phrase()))
            }
            Command::RemoveAt(index) => {
                let node = self.sequence.remove_at(index)?;
                CommandResult::success_with_message(format!("Removed: {}", node.phrase()))
            }
            Command::Repeat(index) => {
                self.sequence.repeat_to_end(index)?;
                CommandResult::success()
            }
            Command::Select(index) => {
                self.sequence.set_current(index)?;
                CommandResult::success_with_message(self.render_current())
            }
            Command::MoveForward => {
                self.sequence.move_forward()?;
                CommandResult::notice(self.render_current())
            }
            Command::MoveBackward => {
                self.sequence.move_backward()?;
                CommandResult::notice(self.render_current())
            }
            Command::Move { from, to } => {
                self.sequence.move_phrase(from, to)?;
                CommandResult::success()
            }
            Command::PlayAll => {
                Playback::new(&mut self.player).composition(&self.sequence)?;
                CommandResult::success_no_refresh()
            }
            Command::PlayFromCurrent => {
                Playback::new(&mut self.player).from_current(&self.sequence)?;
                CommandResult::success_no_refresh()
            }
            Command::PlaySingle(index) => {
                Playback::new(&mut self.player).single(&self.sequence, index)?;
                CommandResult::success_no_refresh()
            }
            Command::Exit => CommandResult::quit(),
        };
        Ok(result)
    }

    fn log_state(&self) {
        if !log::log_enabled!(log::Level::Debug) {
            return;
        }
        match serde_json::to_string(&self.sequence.snapshot()) {
            Ok(json) => log::debug!("state: {}", json),
            Err(err) => log::warn!("failed to serialise state: {}", err),
        }
    }
}
