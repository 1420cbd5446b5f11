//! 結合テスト共通のリンク検証

use composer::{NodeId, PhraseSequence};

/// 先頭・末尾・カーソルとリンクの整合性を検証する
pub fn assert_links(seq: &PhraseSequence) {
    match (seq.head_id(), seq.tail_id()) {
        (None, None) => {
            assert!(seq.current_id().is_none(), "empty sequence must not have a cursor");
            assert!(seq.is_empty());
            assert_eq!(seq.len(), 0);
        }
        (Some(head), Some(tail)) => {
            assert!(seq.node(head).expect("head resolves").prev().is_none());
            assert!(seq.node(tail).expect("tail resolves").next().is_none());

            let forward = walk(seq, head, seq.len(), |id| seq.node(id).and_then(|n| n.next()));
            let mut backward = walk(seq, tail, seq.len(), |id| seq.node(id).and_then(|n| n.prev()));
            backward.reverse();

            assert_eq!(forward.len(), seq.len());
            assert_eq!(forward.last(), Some(&tail));
            assert_eq!(forward, backward, "forward and backward walks disagree");

            if let Some(current) = seq.current_id() {
                assert!(forward.contains(&current), "cursor points outside the sequence");
            }
        }
        other => panic!("head/tail mismatch: {:?}", other),
    }
}

fn walk<F>(seq: &PhraseSequence, start: NodeId, limit: usize, step: F) -> Vec<NodeId>
where
    F: Fn(NodeId) -> Option<NodeId>,
{
    let mut visited = vec![start];
    let mut id = start;
    while let Some(next) = step(id) {
        visited.push(next);
        id = next;
        assert!(visited.len() <= limit, "walk exceeded length {} of {:?}", limit, seq);
    }
    visited
}

pub fn phrases(seq: &PhraseSequence) -> Vec<&str> {
    seq.iter().collect()
}
