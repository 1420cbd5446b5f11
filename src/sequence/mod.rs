//! フレーズシーケンス
//!
//! カーソル付きの双方向連結リスト。ノードはシーケンスが所有するアリーナに
//! 格納し、前後のリンクは世代付きハンドルで表現する。
//!
//! 位置（インデックス）はノードに保持せず、操作のたびに先頭から数え直す。
//! 単一の呼び出し元からの逐次アクセスを前提とし、内部で同期は行わない。

pub mod iter;
pub mod node;

pub use iter::Iter;
pub use node::{Node, NodeId};

use crate::error::sequence::Result;
use crate::error::{Boundary, SequenceError};
use serde::{Deserialize, Serialize};
use std::fmt;

/// 走査の開始位置
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TraversalStart {
    /// 先頭から
    Head,
    /// カーソル位置から
    Current,
}

/// シーケンスの内容とカーソル位置の写し（ログ出力・検証用）
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SequenceSnapshot {
    pub phrases: Vec<String>,
    pub current: Option<usize>,
}

#[derive(Debug, Clone)]
struct Slot {
    generation: u32,
    node: Option<Node>,
}

/// カーソル付きフレーズ列
#[derive(Clone, Default)]
pub struct PhraseSequence {
    slots: Vec<Slot>,
    free: Vec<usize>,
    head: Option<NodeId>,
    tail: Option<NodeId>,
    current: Option<NodeId>,
    len: usize,
}

impl PhraseSequence {
    /// 空のシーケンスを作成
    pub fn new() -> Self {
        Self::default()
    }

    /// フレーズを順に末尾へ追加して作成（カーソルは最後のフレーズ）
    pub fn from_phrases<I, S>(phrases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut sequence = Self::new();
        sequence.extend(phrases);
        sequence
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.head.is_none()
    }

    pub fn head(&self) -> Option<&Node> {
        self.head.and_then(|id| self.node(id))
    }

    pub fn tail(&self) -> Option<&Node> {
        self.tail.and_then(|id| self.node(id))
    }

    /// カーソル位置のノード
    pub fn current(&self) -> Option<&Node> {
        self.current.and_then(|id| self.node(id))
    }

    /// カーソル位置のノード（フレーズの置き換え用）
    pub fn current_mut(&mut self) -> Option<&mut Node> {
        let id = self.current?;
        self.node_mut(id)
    }

    pub fn head_id(&self) -> Option<NodeId> {
        self.head
    }

    pub fn tail_id(&self) -> Option<NodeId> {
        self.tail
    }

    pub fn current_id(&self) -> Option<NodeId> {
        self.current
    }

    /// ハンドルを解決する。削除済みノードのハンドルは `None`
    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.slots
            .get(id.slot)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.node.as_ref())
    }

    /// カーソルのインデックス（先頭から数え直す）
    pub fn current_index(&self) -> Option<usize> {
        let current = self.current?;
        self.ids().position(|id| id == current)
    }

    /// 指定インデックスのノードをカーソルにする
    ///
    /// 該当ノードが無ければカーソルは変更しない
    pub fn set_current(&mut self, index: usize) -> Result<()> {
        let id = self.resolve(index)?;
        self.current = Some(id);
        Ok(())
    }

    /// カーソルを次のノードへ進める
    pub fn move_forward(&mut self) -> Result<()> {
        let next = self.current().and_then(Node::next);
        match next {
            Some(id) => {
                self.current = Some(id);
                Ok(())
            }
            None => Err(SequenceError::AtBoundary(Boundary::Last)),
        }
    }

    /// カーソルを前のノードへ戻す
    pub fn move_backward(&mut self) -> Result<()> {
        let prev = self.current().and_then(Node::prev);
        match prev {
            Some(id) => {
                self.current = Some(id);
                Ok(())
            }
            None => Err(SequenceError::AtBoundary(Boundary::First)),
        }
    }

    /// 末尾に追加
    pub fn add_at_end(&mut self, phrase: impl Into<String>) -> NodeId {
        let id = self.alloc(Node::new(phrase.into(), self.tail, None));
        match self.tail {
            Some(tail) => self.set_next(tail, Some(id)),
            None => self.head = Some(id),
        }
        self.tail = Some(id);
        self.current = Some(id);
        id
    }

    /// 先頭に追加
    pub fn add_at_beginning(&mut self, phrase: impl Into<String>) -> NodeId {
        let id = self.alloc(Node::new(phrase.into(), None, self.head));
        match self.head {
            Some(head) => self.set_prev(head, Some(id)),
            None => self.tail = Some(id),
        }
        self.head = Some(id);
        self.current = Some(id);
        id
    }

    /// カーソルの直前に追加。カーソル未設定なら末尾に追加
    pub fn add_at_current(&mut self, phrase: impl Into<String>) -> NodeId {
        match self.current {
            Some(anchor) => self.insert_before(anchor, phrase.into()),
            None => self.add_at_end(phrase),
        }
    }

    /// 指定インデックスに追加
    ///
    /// `index == len` は末尾への追加。`index > len` は `IndexOutOfRange`
    pub fn add_at(&mut self, phrase: impl Into<String>, index: usize) -> Result<NodeId> {
        if index == self.len {
            return Ok(self.add_at_end(phrase));
        }
        let anchor = self.resolve(index)?;
        self.current = Some(anchor);
        Ok(self.insert_before(anchor, phrase.into()))
    }

    /// 指定インデックスのフレーズの写しを末尾に追加
    pub fn repeat_to_end(&mut self, index: usize) -> Result<NodeId> {
        let phrase = self.phrase_at(index)?.to_string();
        Ok(self.add_at_end(phrase))
    }

    /// カーソル位置のノードを取り外して返す
    ///
    /// カーソルは次のノードへ移る。末尾を削除した場合は新しい末尾へ移る
    pub fn remove_current(&mut self) -> Result<Node> {
        let target = self.current.ok_or(SequenceError::EmptySelection)?;
        let (prev, next) = self
            .node(target)
            .map(|node| (node.prev(), node.next()))
            .ok_or(SequenceError::EmptySelection)?;

        match prev {
            Some(prev) => self.set_next(prev, next),
            None => self.head = next,
        }
        match next {
            Some(next) => self.set_prev(next, prev),
            None => self.tail = prev,
        }
        self.current = next.or(prev);

        self.release(target).ok_or(SequenceError::EmptySelection)
    }

    /// 指定インデックスのノードを取り外して返す
    pub fn remove_at(&mut self, index: usize) -> Result<Node> {
        let id = self.resolve(index)?;
        self.current = Some(id);
        self.remove_current()
    }

    /// フレーズを `from` から `to` へ移動し、新しいノードをカーソルにする
    ///
    /// `to` は取り外した後のシーケンスに対するインデックス。
    /// 4 要素で `move_phrase(0, 3)` は末尾への移動になる。
    /// 両インデックスを先に検証するため、失敗時は何も変更しない
    pub fn move_phrase(&mut self, from: usize, to: usize) -> Result<NodeId> {
        if from >= self.len {
            return Err(SequenceError::InvalidSource { index: from });
        }
        let remaining = self.len - 1;
        if to > remaining {
            return Err(SequenceError::IndexOutOfRange {
                index: to,
                len: remaining,
            });
        }

        let node = self
            .remove_at(from)
            .map_err(|_| SequenceError::InvalidSource { index: from })?;
        log::debug!("moving phrase {:?} from {} to {}", node.phrase(), from, to);
        self.add_at(node.into_phrase(), to)
    }

    /// 先頭からの反復子
    pub fn iter(&self) -> Iter<'_> {
        Iter::new(self, self.head, self.tail, self.len)
    }

    /// カーソル位置からの反復子。カーソル未設定なら `None`
    pub fn iter_from_current(&self) -> Option<Iter<'_>> {
        let current = self.current?;
        let remaining = self.ids_from(current).count();
        Some(Iter::new(self, Some(current), self.tail, remaining))
    }

    /// 開始位置から順にフレーズを渡し、渡した数を返す
    ///
    /// 開始位置が無い場合は `f` を一度も呼ばない
    pub fn for_each_from<F>(&self, start: TraversalStart, mut f: F) -> Result<usize>
    where
        F: FnMut(&str),
    {
        let iter = match start {
            TraversalStart::Head if self.is_empty() => {
                return Err(SequenceError::EmptySequence);
            }
            TraversalStart::Head => self.iter(),
            TraversalStart::Current => self.iter_from_current().ok_or(SequenceError::NoCursor)?,
        };

        let mut count = 0;
        for phrase in iter {
            f(phrase);
            count += 1;
        }
        Ok(count)
    }

    /// 指定インデックスのフレーズを一度だけ渡す
    pub fn visit_at<F>(&self, index: usize, f: F) -> Result<()>
    where
        F: FnOnce(&str),
    {
        f(self.phrase_at(index)?);
        Ok(())
    }

    pub fn phrase_at(&self, index: usize) -> Result<&str> {
        let id = self.resolve(index)?;
        self.node(id)
            .map(Node::phrase)
            .ok_or(SequenceError::IndexOutOfRange {
                index,
                len: self.len,
            })
    }

    /// 表示用に全フレーズを返す。空なら `EmptySequence`
    pub fn all(&self) -> Result<Vec<&str>> {
        if self.is_empty() {
            return Err(SequenceError::EmptySequence);
        }
        Ok(self.iter().collect())
    }

    pub fn snapshot(&self) -> SequenceSnapshot {
        SequenceSnapshot {
            phrases: self.iter().map(str::to_string).collect(),
            current: self.current_index(),
        }
    }

    fn ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        std::iter::successors(self.head, move |id| self.node(*id).and_then(Node::next))
    }

    fn ids_from(&self, start: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        std::iter::successors(Some(start), move |id| self.node(*id).and_then(Node::next))
    }

    fn resolve(&self, index: usize) -> Result<NodeId> {
        let out_of_range = SequenceError::IndexOutOfRange {
            index,
            len: self.len,
        };
        if index >= self.len {
            return Err(out_of_range);
        }
        self.ids().nth(index).ok_or(out_of_range)
    }

    fn insert_before(&mut self, anchor: NodeId, phrase: String) -> NodeId {
        let prev = self.node(anchor).and_then(Node::prev);
        let id = self.alloc(Node::new(phrase, prev, Some(anchor)));
        match prev {
            Some(prev) => self.set_next(prev, Some(id)),
            None => self.head = Some(id),
        }
        self.set_prev(anchor, Some(id));
        self.current = Some(id);
        id
    }

    fn node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.slots
            .get_mut(id.slot)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.node.as_mut())
    }

    fn set_next(&mut self, id: NodeId, next: Option<NodeId>) {
        if let Some(node) = self.node_mut(id) {
            node.next = next;
        }
    }

    fn set_prev(&mut self, id: NodeId, prev: Option<NodeId>) {
        if let Some(node) = self.node_mut(id) {
            node.prev = prev;
        }
    }

    fn alloc(&mut self, node: Node) -> NodeId {
        self.len += 1;
        if let Some(slot) = self.free.pop() {
            let entry = &mut self.slots[slot];
            entry.node = Some(node);
            return NodeId {
                slot,
                generation: entry.generation,
            };
        }
        self.slots.push(Slot {
            generation: 0,
            node: Some(node),
        });
        NodeId {
            slot: self.slots.len() - 1,
            generation: 0,
        }
    }

    fn release(&mut self, id: NodeId) -> Option<Node> {
        let entry = self
            .slots
            .get_mut(id.slot)
            .filter(|slot| slot.generation == id.generation)?;
        let mut node = entry.node.take()?;
        entry.generation = entry.generation.wrapping_add(1);
        self.free.push(id.slot);
        self.len -= 1;
        node.detach();
        Some(node)
    }
}

impl fmt::Debug for PhraseSequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PhraseSequence")
            .field("phrases", &self.iter().collect::<Vec<_>>())
            .field("current", &self.current_index())
            .finish()
    }
}

impl<S: Into<String>> Extend<S> for PhraseSequence {
    fn extend<I: IntoIterator<Item = S>>(&mut self, phrases: I) {
        for phrase in phrases {
            self.add_at_end(phrase);
        }
    }
}

impl<S: Into<String>> FromIterator<S> for PhraseSequence {
    fn from_iter<I: IntoIterator<Item = S>>(phrases: I) -> Self {
        Self::from_phrases(phrases)
    }
}

impl<'a> IntoIterator for &'a PhraseSequence {
    type Item = &'a str;
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
