//! In-memory message log for a single conversation.

use chatrelay_types::chat::Turn;

/// Ordered, append-only sequence of turns.
///
/// Position is the single source of truth for conversational order: no
/// reordering, no gaps, no duplicate suppression. The only way to shrink a
/// log is [`MessageLog::clear`]. No size cap is enforced here; windowing is
/// a caller concern.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MessageLog {
    turns: Vec<Turn>,
}

impl MessageLog {
    /// Create an empty log.
    pub fn new() -> Self {
        Self { turns: Vec::new() }
    }

    /// Append a turn to the end. Returns the new length.
    pub fn append(&mut self, turn: Turn) -> usize {
        self.turns.push(turn);
        self.turns.len()
    }

    /// Owned copy of the full log in insertion order.
    ///
    /// Mutating the returned vector never affects the log.
    pub fn snapshot(&self) -> Vec<Turn> {
        self.turns.clone()
    }

    /// Reset to the empty sequence.
    pub fn clear(&mut self) {
        self.turns.clear();
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }
}

impl From<Vec<Turn>> for MessageLog {
    /// Rebuild a log from a persisted turn sequence, preserving its order.
    fn from(turns: Vec<Turn>) -> Self {
        Self { turns }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chatrelay_types::chat::TurnRole;

    #[test]
    fn test_append_returns_new_length() {
        let mut log = MessageLog::new();
        assert_eq!(log.append(Turn::new(TurnRole::User, "hi")), 1);
        assert_eq!(log.append(Turn::new(TurnRole::Assistant, "hello")), 2);
        assert_eq!(log.len(), 2);
    }

    #[test]
    fn test_snapshot_preserves_insertion_order() {
        let mut log = MessageLog::new();
        for i in 0..5 {
            log.append(Turn::new(TurnRole::User, format!("m{i}")));
        }
        let contents: Vec<String> = log.snapshot().into_iter().map(|t| t.content).collect();
        assert_eq!(contents, vec!["m0", "m1", "m2", "m3", "m4"]);
    }

    #[test]
    fn test_no_duplicate_suppression() {
        let mut log = MessageLog::new();
        let turn = Turn::new(TurnRole::User, "same");
        log.append(turn.clone());
        log.append(turn);
        assert_eq!(log.len(), 2);
    }

    #[test]
    fn test_snapshot_is_not_a_mutable_alias() {
        let mut log = MessageLog::new();
        log.append(Turn::new(TurnRole::User, "original"));

        let mut snap = log.snapshot();
        snap[0].content = "tampered".to_string();
        snap.push(Turn::new(TurnRole::Assistant, "extra"));

        let fresh = log.snapshot();
        assert_eq!(fresh.len(), 1);
        assert_eq!(fresh[0].content, "original");
    }

    #[test]
    fn test_clear_resets_to_empty() {
        let mut log = MessageLog::new();
        log.append(Turn::new(TurnRole::User, "a"));
        log.append(Turn::new(TurnRole::User, "b"));
        log.clear();
        assert!(log.is_empty());
        assert!(log.snapshot().is_empty());

        // Usable again after a clear.
        assert_eq!(log.append(Turn::new(TurnRole::User, "c")), 1);
    }

    #[test]
    fn test_from_persisted_turns_keeps_order() {
        let turns = vec![
            Turn::new(TurnRole::User, "first"),
            Turn::new(TurnRole::Assistant, "second"),
        ];
        let log = MessageLog::from(turns.clone());
        assert_eq!(log.snapshot(), turns);
    }
}
