//! 対話メニュー
//!
//! 行単位の入力から `Command` を組み立て、`Composer` で実行して結果を書き出す。
//! 入力が尽きた時点でセッションを終える

use super::{Command, CommandResult, Composer};
use crate::error::{ComposerError, ErrorDisplay, InputError, Result};
use crate::playback::Player;
use std::io::{BufRead, Write};

pub const MAIN_MENU: &str = "\n1. Add phrase\n2. Remove phrase\n3. Repeat phrase\n4. Navigate\n5. Change position\n6. Playback\n7. Exit";

const ADD_MENU: &str = "1. At the end\n2. At the beginning\n3. At current location\n4. At specific index";
const REMOVE_MENU: &str = "1. Remove current phrase\n2. Remove phrase at specific index";
const NAVIGATE_MENU: &str = "1. Move forward\n2. Move backward\n3. Jump to index";
const PLAYBACK_MENU: &str = "1. Play entire composition\n2. Play from current\n3. Play single phrase";

/// 標準入出力（またはテスト用のバッファ）上のメニューセッション
pub struct MenuSession<R, W, P: Player> {
    composer: Composer<P>,
    input: R,
    output: W,
}

impl<R: BufRead, W: Write, P: Player> MenuSession<R, W, P> {
    pub fn new(composer: Composer<P>, input: R, output: W) -> Self {
        Self {
            composer,
            input,
            output,
        }
    }

    pub fn into_composer(self) -> Composer<P> {
        self.composer
    }

    /// 終了を選ぶか入力が尽きるまでメニューを繰り返す
    pub fn run(&mut self) -> Result<()> {
        loop {
            writeln!(self.output, "{}", MAIN_MENU)?;
            let Some(choice) = self.prompt("Enter choice: ")? else {
                break;
            };

            let command = match self.read_command(&choice) {
                Ok(Some(command)) => command,
                Ok(None) => break,
                Err(ComposerError::Input(err)) => {
                    self.report(&ComposerError::Input(err))?;
                    continue;
                }
                Err(err) => return Err(err),
            };

            let result = self.composer.execute(command);
            self.show_result(&result)?;
            if result.should_quit {
                break;
            }
        }
        self.output.flush()?;
        Ok(())
    }

    fn read_command(&mut self, choice: &str) -> Result<Option<Command>> {
        match choice {
            "1" => self.add_dialog(),
            "2" => self.remove_dialog(),
            "3" => {
                self.show_listing()?;
                Ok(self
                    .prompt_index("\nEnter the index of the phrase to copy: ")?
                    .map(Command::Repeat))
            }
            "4" => self.navigate_dialog(),
            "5" => self.move_dialog(),
            "6" => self.playback_dialog(),
            "7" => Ok(Some(Command::Exit)),
            other => Err(invalid_choice(other)),
        }
    }

    fn add_dialog(&mut self) -> Result<Option<Command>> {
        let Some(phrase) = self.prompt("Enter a musical phrase: ")? else {
            return Ok(None);
        };
        if phrase.is_empty() {
            return Err(InputError::InvalidArgument {
                arg: "empty phrase".to_string(),
            }
            .into());
        }

        writeln!(self.output, "Where would you like to add the phrase?")?;
        self.show_listing()?;
        self.show_current()?;
        writeln!(self.output, "{}", ADD_MENU)?;
        let Some(choice) = self.prompt("Enter choice: ")? else {
            return Ok(None);
        };

        let command = match choice.as_str() {
            "1" => Command::AddAtEnd(phrase),
            "2" => Command::AddAtBeginning(phrase),
            "3" => Command::AddAtCurrent(phrase),
            "4" => match self.prompt_index("Enter index: ")? {
                Some(index) => Command::AddAt { phrase, index },
                None => return Ok(None),
            },
            other => return Err(invalid_choice(other)),
        };
        Ok(Some(command))
    }

    fn remove_dialog(&mut self) -> Result<Option<Command>> {
        writeln!(self.output, "Where would you like to remove the phrase?")?;
        self.show_listing()?;
        self.show_current()?;
        writeln!(self.output, "{}", REMOVE_MENU)?;
        let Some(choice) = self.prompt("Enter choice: ")? else {
            return Ok(None);
        };

        match choice.as_str() {
            "1" => Ok(Some(Command::RemoveCurrent)),
            "2" => Ok(self.prompt_index("Enter index: ")?.map(Command::RemoveAt)),
            other => Err(invalid_choice(other)),
        }
    }

    fn navigate_dialog(&mut self) -> Result<Option<Command>> {
        self.show_listing()?;
        self.show_current()?;
        writeln!(self.output, "{}", NAVIGATE_MENU)?;
        let Some(choice) = self.prompt("Enter choice: ")? else {
            return Ok(None);
        };

        match choice.as_str() {
            "1" => Ok(Some(Command::MoveForward)),
            "2" => Ok(Some(Command::MoveBackward)),
            "3" => Ok(self.prompt_index("Enter index: ")?.map(Command::Select)),
            other => Err(invalid_choice(other)),
        }
    }

    fn move_dialog(&mut self) -> Result<Option<Command>> {
        self.show_listing()?;
        let Some(from) = self.prompt_index("\nEnter the index of the phrase to change: ")? else {
            return Ok(None);
        };
        // 新しい位置は取り外した後の並びで数える
        let Some(to) = self.prompt_index("Enter the new index position (counted after removal): ")? else {
            return Ok(None);
        };
        Ok(Some(Command::Move { from, to }))
    }

    fn playback_dialog(&mut self) -> Result<Option<Command>> {
        self.show_listing()?;
        self.show_current()?;
        writeln!(self.output, "{}", PLAYBACK_MENU)?;
        let Some(choice) = self.prompt("Enter choice: ")? else {
            return Ok(None);
        };

        match choice.as_str() {
            "1" => Ok(Some(Command::PlayAll)),
            "2" => Ok(Some(Command::PlayFromCurrent)),
            "3" => Ok(self.prompt_index("Enter index: ")?.map(Command::PlaySingle)),
            other => Err(invalid_choice(other)),
        }
    }

    fn prompt(&mut self, label: &str) -> Result<Option<String>> {
        write!(self.output, "{}", label)?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    fn prompt_index(&mut self, label: &str) -> Result<Option<usize>> {
        let Some(text) = self.prompt(label)? else {
            return Ok(None);
        };
        text.parse::<usize>()
            .map(Some)
            .map_err(|_| InputError::InvalidArgument { arg: text }.into())
    }

    fn show_listing(&mut self) -> Result<()> {
        writeln!(self.output, "{}", self.composer.render_listing())?;
        Ok(())
    }

    fn show_current(&mut self) -> Result<()> {
        writeln!(self.output, "\n{}", self.composer.render_current())?;
        Ok(())
    }

    fn show_result(&mut self, result: &CommandResult) -> Result<()> {
        if let Some(message) = &result.message {
            writeln!(self.output, "{}", message)?;
        }
        if result.needs_refresh {
            self.show_listing()?;
        }
        Ok(())
    }

    fn report(&mut self, error: &ComposerError) -> Result<()> {
        log::warn!("input rejected: {}", error);
        writeln!(self.output, "{}", ErrorDisplay::new(error).message)?;
        Ok(())
    }
}

fn invalid_choice(choice: &str) -> ComposerError {
    InputError::InvalidChoice {
        choice: choice.to_string(),
    }
    .into()
}
