//! 再生
//!
//! フレーズを順に `Player` へ渡す。音への変換は `Player` 実装側の責務

use crate::error::sequence::Result;
use crate::sequence::{PhraseSequence, TraversalStart};
use std::io::{self, Write};

/// フレーズを一つずつ受け取る再生先
pub trait Player {
    fn play(&mut self, phrase: &str);
}

impl<F> Player for F
where
    F: FnMut(&str),
{
    fn play(&mut self, phrase: &str) {
        self(phrase)
    }
}

/// `Playing: <phrase>` を書き出すだけの再生先
#[derive(Debug)]
pub struct ConsolePlayer<W: Write> {
    out: W,
}

impl ConsolePlayer<io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> ConsolePlayer<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Player for ConsolePlayer<W> {
    fn play(&mut self, phrase: &str) {
        if let Err(err) = writeln!(self.out, "Playing: {}", phrase) {
            log::warn!("failed to write playback output: {}", err);
        }
    }
}

/// 再生されたフレーズを記録する
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordingPlayer {
    played: Vec<String>,
}

impl RecordingPlayer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn played(&self) -> &[String] {
        &self.played
    }
}

impl Player for RecordingPlayer {
    fn play(&mut self, phrase: &str) {
        self.played.push(phrase.to_string());
    }
}

/// シーケンスを再生先へ流す
pub struct Playback<'p, P: Player + ?Sized> {
    player: &'p mut P,
}

impl<'p, P: Player + ?Sized> Playback<'p, P> {
    pub fn new(player: &'p mut P) -> Self {
        Self { player }
    }

    /// 先頭から最後まで再生
    pub fn composition(&mut self, sequence: &PhraseSequence) -> Result<usize> {
        let count = sequence.for_each_from(TraversalStart::Head, |phrase| self.player.play(phrase))?;
        log::info!("played {} phrases from the beginning", count);
        Ok(count)
    }

    /// カーソル位置から最後まで再生
    pub fn from_current(&mut self, sequence: &PhraseSequence) -> Result<usize> {
        let count =
            sequence.for_each_from(TraversalStart::Current, |phrase| self.player.play(phrase))?;
        log::info!("played {} phrases from the cursor", count);
        Ok(count)
    }

    /// 指定インデックスのフレーズだけを再生
    pub fn single(&mut self, sequence: &PhraseSequence, index: usize) -> Result<usize> {
        sequence.visit_at(index, |phrase| self.player.play(phrase))?;
        Ok(1)
    }
}
