//! Prompt material built from retrieved passages.

use polyglot_core::types::{Message, Role, ScoredChunk};

/// Fixed reply when the document does not cover the question.
pub const INSUFFICIENT_INFORMATION: &str =
    "I do not have enough information to answer this based on the provided documents.";

const POLICY: &str = "You are an intelligent assistant called PolyGlot RAG. \
Use the context provided below to answer the user's question accurately.\n\
CONSTRAINTS: 1. STRICTLY answer based ONLY on the provided context. \
2. If the user asks in a specific language, answer in that language. \
3. If the answer is not in the context, explicitly state: \"";

const POLICY_TAIL: &str = "\" 4. Do not make up facts. 5. Cite page numbers.\nCONTEXT:\n";

/// Passages rendered as `[Page N]: text`, separated by a blank line.
pub fn context_block(passages: &[ScoredChunk]) -> String {
    passages
        .iter()
        .map(|p| format!("[Page {}]: {}", p.chunk.page, p.chunk.text))
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// The generator's system instruction with the context block appended.
pub fn system_instruction(passages: &[ScoredChunk]) -> String {
    let context = context_block(passages);
    let mut instruction = String::with_capacity(POLICY.len() + INSUFFICIENT_INFORMATION.len() + POLICY_TAIL.len() + context.len());
    instruction.push_str(POLICY);
    instruction.push_str(INSUFFICIENT_INFORMATION);
    instruction.push_str(POLICY_TAIL);
    instruction.push_str(&context);
    instruction
}

/// The last `window` messages, oldest first. Anything not from the
/// assistant is forwarded as a user turn.
pub fn history_window(history: &[Message], window: usize) -> Vec<Message> {
    let skip = history.len().saturating_sub(window);
    history[skip..]
        .iter()
        .map(|m| match m.role {
            Role::Assistant => m.clone(),
            Role::User | Role::System => Message::user(m.content.clone()),
        })
        .collect()
}

/// Distinct page numbers of `passages` in first-seen order.
pub fn citations(passages: &[ScoredChunk]) -> Vec<u32> {
    let mut pages = Vec::new();
    for passage in passages {
        if !pages.contains(&passage.chunk.page) {
            pages.push(passage.chunk.page);
        }
    }
    pages
}

#[cfg(test)]
mod tests {
    use polyglot_core::types::{Chunk, ChunkId};

    use super::*;

    fn passage(id: usize, page: u32, text: &str) -> ScoredChunk {
        ScoredChunk {
            chunk: Chunk {
                id: ChunkId(id),
                page,
                text: text.to_string(),
                start: 0,
                end: text.chars().count(),
                content_hash: String::new(),
            },
            score: 0.5,
        }
    }

    #[test]
    fn context_block_labels_pages() {
        let passages = vec![passage(0, 3, "Water is wet."), passage(1, 1, "The sky is blue.")];
        assert_eq!(context_block(&passages), "[Page 3]: Water is wet.\n\n[Page 1]: The sky is blue.");
        assert_eq!(context_block(&[]), "");
    }

    #[test]
    fn instruction_carries_policy_and_context() {
        let instruction = system_instruction(&[passage(0, 2, "Goats eat hay.")]);
        assert!(instruction.starts_with("You are an intelligent assistant called PolyGlot RAG."));
        assert!(instruction.contains(&format!("explicitly state: \"{INSUFFICIENT_INFORMATION}\"")));
        assert!(instruction.contains("5. Cite page numbers."));
        assert!(instruction.ends_with("CONTEXT:\n[Page 2]: Goats eat hay."));
    }

    #[test]
    fn history_keeps_last_messages_as_user_and_assistant_turns() {
        let mut history: Vec<Message> = (0..8)
            .map(|i| if i % 2 == 0 { Message::user(format!("q{i}")) } else { Message::assistant(format!("a{i}")) })
            .collect();
        history.insert(7, Message { role: Role::System, content: "note".into() });

        let window = history_window(&history, 6);
        let contents: Vec<&str> = window.iter().map(|m| m.content.as_str()).collect();
        assert_eq!(contents, vec!["a3", "q4", "a5", "q6", "note", "a7"]);
        assert_eq!(window[4].role, Role::User);
        assert!(window.iter().all(|m| m.role != Role::System));
        assert!(history_window(&history, 0).is_empty());
        assert_eq!(history_window(&history[..2], 6).len(), 2);
    }

    #[test]
    fn citations_are_distinct_in_order() {
        let passages = vec![passage(4, 5, "e"), passage(0, 1, "a"), passage(5, 5, "f"), passage(2, 3, "c")];
        assert_eq!(citations(&passages), vec![5, 1, 3]);
    }
}
