//! Context window selection.

use chatrelay_types::chat::Turn;
use chatrelay_types::llm::Message;

/// The last `size` turns of `turns` as inference messages, oldest first.
///
/// Timestamps are stripped. Turns beyond the window are dropped from the
/// front; a `size` of zero yields an empty window.
pub fn context_window(turns: &[Turn], size: usize) -> Vec<Message> {
    let start = turns.len().saturating_sub(size);
    turns[start..].iter().map(Turn::to_message).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chatrelay_types::chat::TurnRole;
    use chatrelay_types::llm::MessageRole;

    fn turns(n: usize) -> Vec<Turn> {
        (0..n)
            .map(|i| {
                let role = if i % 2 == 0 {
                    TurnRole::User
                } else {
                    TurnRole::Assistant
                };
                Turn::new(role, format!("t{i}"))
            })
            .collect()
    }

    #[test]
    fn test_window_keeps_last_n_in_order() {
        let window = context_window(&turns(15), 10);
        let contents: Vec<&str> = window.iter().map(|m| m.content.as_str()).collect();
        let expected: Vec<String> = (5..15).map(|i| format!("t{i}")).collect();
        assert_eq!(contents, expected);
        assert_eq!(window[0].role, MessageRole::Assistant);
    }

    #[test]
    fn test_window_shorter_than_size_is_whole_log() {
        assert_eq!(context_window(&turns(3), 10).len(), 3);
        assert!(context_window(&[], 10).is_empty());
    }

    #[test]
    fn test_zero_window_is_empty() {
        assert!(context_window(&turns(4), 0).is_empty());
    }
}
