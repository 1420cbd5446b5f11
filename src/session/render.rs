//! 一覧表示
//!
//! 表示幅は `unicode-width` で数える（全角のフレーズでもインデックス行がずれない）

use crate::sequence::{Node, PhraseSequence};
use unicode_width::UnicodeWidthStr;

pub const EMPTY_LISTING: &str = "(empty composition)";

/// フレーズを空白区切りで並べる
pub fn render_phrases(sequence: &PhraseSequence) -> String {
    match sequence.all() {
        Ok(phrases) => phrases.join(" "),
        Err(_) => EMPTY_LISTING.to_string(),
    }
}

/// フレーズ行とインデックス行の二行で表示する。カーソルは `[ ]` で囲む
pub fn render_with_indices(sequence: &PhraseSequence) -> String {
    if sequence.is_empty() {
        return EMPTY_LISTING.to_string();
    }

    let current = sequence.current_index();
    let mut phrase_row = String::new();
    let mut index_row = String::new();

    for (index, phrase) in sequence.iter().enumerate() {
        let label = index.to_string();
        let phrase_width = phrase.width();
        let cell = phrase_width.max(label.len());
        let (open, close) = if current == Some(index) {
            ('[', ']')
        } else {
            (' ', ' ')
        };

        phrase_row.push(open);
        phrase_row.push_str(phrase);
        pad(&mut phrase_row, cell - phrase_width);
        phrase_row.push(close);

        index_row.push(' ');
        index_row.push_str(&label);
        pad(&mut index_row, cell - label.len());
        index_row.push(' ');
    }

    format!("{}\n{}", phrase_row.trim_end(), index_row.trim_end())
}

pub fn render_current(sequence: &PhraseSequence) -> String {
    match sequence.current().map(Node::phrase) {
        Some(phrase) => format!("Current phrase: {}", phrase),
        None => "Current phrase: None".to_string(),
    }
}

fn pad(row: &mut String, spaces: usize) {
    row.extend(std::iter::repeat(' ').take(spaces));
}
