//! フレーズの順方向走査

use super::{NodeId, PhraseSequence};
use std::iter::FusedIterator;

/// フレーズを先頭側から順に返すイテレータ
///
/// 末尾側からも取り出せる。`remaining` が 0 になった時点で両端が交差したとみなす
#[derive(Debug, Clone)]
pub struct Iter<'a> {
    sequence: &'a PhraseSequence,
    front: Option<NodeId>,
    back: Option<NodeId>,
    remaining: usize,
}

impl<'a> Iter<'a> {
    pub(crate) fn new(
        sequence: &'a PhraseSequence,
        front: Option<NodeId>,
        back: Option<NodeId>,
        remaining: usize,
    ) -> Self {
        Self {
            sequence,
            front,
            back,
            remaining,
        }
    }
}

impl<'a> Iterator for Iter<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let node = self.sequence.node(self.front?)?;
        self.front = node.next();
        self.remaining -= 1;
        Some(node.phrase())
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl DoubleEndedIterator for Iter<'_> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let node = self.sequence.node(self.back?)?;
        self.back = node.prev();
        self.remaining -= 1;
        Some(node.phrase())
    }
}

impl ExactSizeIterator for Iter<'_> {}

impl FusedIterator for Iter<'_> {}
