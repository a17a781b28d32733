//! 会話履歴（History）のドメイン型
//!
//! 発言を時系列に保持し、件数が上限を超えたら古いものから捨てる。
//! 捨てる単位は human/assistant の組ではなく、平らな発言列の 1 件ずつ。

use crate::domain::Turn;

/// 保持する発言数のデフォルト上限
pub const MAX_HISTORY: usize = 20;

/// 上限付きの会話履歴
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct History {
    turns: Vec<Turn>,
    limit: usize,
}

impl History {
    /// 空の履歴。limit は 1 以上であること（MemoryConfig で検証済み）。
    pub fn with_limit(limit: usize) -> Self {
        History {
            turns: Vec::new(),
            limit,
        }
    }

    /// 既存の発言列から作る（末尾 limit 件だけ残す）
    pub fn from_turns(turns: Vec<Turn>, limit: usize) -> Self {
        let mut history = Self::with_limit(limit);
        history.extend(turns);
        history
    }

    pub fn push(&mut self, turn: Turn) {
        self.turns.push(turn);
        self.enforce_limit();
    }

    pub fn extend(&mut self, turns: impl IntoIterator<Item = Turn>) {
        self.turns.extend(turns);
        self.enforce_limit();
    }

    pub fn clear(&mut self) {
        self.turns.clear();
    }

    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Turn> {
        self.turns.iter()
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    fn enforce_limit(&mut self) {
        if self.turns.len() > self.limit {
            let excess = self.turns.len() - self.limit;
            self.turns.drain(..excess);
        }
    }
}

impl Default for History {
    fn default() -> Self {
        Self::with_limit(MAX_HISTORY)
    }
}

impl<'a> IntoIterator for &'a History {
    type Item = &'a Turn;
    type IntoIter = std::slice::Iter<'a, Turn>;

    fn into_iter(self) -> Self::IntoIter {
        self.turns.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_evicts_oldest_first() {
        let mut h = History::with_limit(3);
        for t in ["u1", "a1", "u2", "a2"] {
            h.push(Turn::human(t));
        }
        let texts: Vec<&str> = h.iter().map(Turn::text).collect();
        assert_eq!(texts, ["a1", "u2", "a2"]);
    }

    #[test]
    fn test_from_turns_keeps_tail() {
        let turns: Vec<Turn> = (0..25).map(|i| Turn::human(i.to_string())).collect();
        let h = History::from_turns(turns, MAX_HISTORY);
        assert_eq!(h.len(), 20);
        assert_eq!(h.turns()[0].text(), "5");
        assert_eq!(h.turns()[19].text(), "24");
    }

    #[test]
    fn test_extend_under_limit_keeps_everything() {
        let mut h = History::default();
        h.extend(vec![Turn::human("q"), Turn::assistant("a")]);
        assert_eq!(h.len(), 2);
        assert_eq!(h.limit(), MAX_HISTORY);
        h.clear();
        assert!(h.is_empty());
    }

    #[test]
    fn test_bound_holds_after_every_push() {
        let mut h = History::with_limit(4);
        for i in 0..50 {
            h.push(if i % 2 == 0 {
                Turn::human(format!("u{}", i))
            } else {
                Turn::assistant(format!("a{}", i))
            });
            assert!(h.len() <= 4);
        }
        let texts: Vec<&str> = (&h).into_iter().map(Turn::text).collect();
        assert_eq!(texts, ["u46", "a47", "u48", "a49"]);
    }
}
