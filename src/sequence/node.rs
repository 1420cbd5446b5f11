//! フレーズノード
//!
//! シーケンスのアリーナに格納される要素。前後のリンクはアリーナ上の
//! ハンドルで表現し、所有権はシーケンスが一元的に持つ

/// アリーナ内ノードへの世代付きハンドル
///
/// 削除されたノードのハンドルは、スロットが再利用された後も解決されない
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId {
    pub(crate) slot: usize,
    pub(crate) generation: u32,
}

impl NodeId {
    /// デバッグ用のスロット番号
    pub fn as_raw(&self) -> usize {
        self.slot
    }
}

/// 単一のフレーズと前後のリンク
#[derive(Debug, Clone)]
pub struct Node {
    phrase: String,
    pub(crate) prev: Option<NodeId>,
    pub(crate) next: Option<NodeId>,
}

impl Node {
    pub(crate) fn new(phrase: String, prev: Option<NodeId>, next: Option<NodeId>) -> Self {
        Self { phrase, prev, next }
    }

    /// 格納されたフレーズ
    pub fn phrase(&self) -> &str {
        &self.phrase
    }

    /// フレーズを置き換え、以前の値を返す
    pub fn set_phrase(&mut self, phrase: impl Into<String>) -> String {
        std::mem::replace(&mut self.phrase, phrase.into())
    }

    /// ノードを消費してフレーズを取り出す
    pub fn into_phrase(self) -> String {
        self.phrase
    }

    pub fn prev(&self) -> Option<NodeId> {
        self.prev
    }

    pub fn next(&self) -> Option<NodeId> {
        self.next
    }

    /// どちらのリンクも持たないか（シーケンスから切り離されたノード）
    pub fn is_detached(&self) -> bool {
        self.prev.is_none() && self.next.is_none()
    }

    pub(crate) fn detach(&mut self) {
        self.prev = None;
        self.next = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_phrase_returns_previous_payload() {
        let mut node = Node::new("C".to_string(), None, None);
        let old = node.set_phrase("G");
        assert_eq!(old, "C");
        assert_eq!(node.phrase(), "G");
    }

    #[test]
    fn detach_clears_both_links() {
        let id = NodeId { slot: 3, generation: 0 };
        let mut node = Node::new("A".to_string(), Some(id), Some(id));
        assert!(!node.is_detached());

        node.detach();
        assert!(node.is_detached());
        assert_eq!(node.into_phrase(), "A");
    }
}
