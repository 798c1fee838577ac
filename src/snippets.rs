const FENCE: &str = "```";

pub(crate) fn is_fence(line: &str) -> bool {
    line.starts_with(FENCE)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FenceState {
    Outside,
    InsideFence,
}

/// What a single line means to the normalizer, given the current state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineEvent {
    FenceOpenWithTag,
    FenceClose,
    Hidden,
    Other,
}

/// Retags code fences that mention the configured language and drops
/// hidden lines (`# ` prefixed helper code) from inside them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnippetNormalizer {
    tag: String,
    tag_lowercase: String,
    hidden_prefix: String,
}

impl Default for SnippetNormalizer {
    fn default() -> Self {
        Self::new("rust", "# ")
    }
}

impl SnippetNormalizer {
    pub fn new(tag: &str, hidden_prefix: &str) -> Self {
        Self {
            tag: tag.to_owned(),
            tag_lowercase: tag.to_lowercase(),
            hidden_prefix: hidden_prefix.to_owned(),
        }
    }

    pub fn classify(&self, state: FenceState, line: &str) -> LineEvent {
        match state {
            FenceState::InsideFence if is_fence(line) => LineEvent::FenceClose,
            FenceState::InsideFence if line.starts_with(self.hidden_prefix.as_str()) => {
                LineEvent::Hidden
            }
            FenceState::Outside
                if is_fence(line) && line.to_lowercase().contains(&self.tag_lowercase) =>
            {
                LineEvent::FenceOpenWithTag
            }
            _ => LineEvent::Other,
        }
    }

    /// Applies one line to the state machine, returning the next state and
    /// the text to emit (if any).
    pub fn step(&self, state: FenceState, line: &str) -> (FenceState, Option<String>) {
        match self.classify(state, line) {
            LineEvent::FenceOpenWithTag => (
                FenceState::InsideFence,
                Some(format!("{FENCE}{}", self.tag)),
            ),
            LineEvent::FenceClose => (FenceState::Outside, Some(line.to_owned())),
            LineEvent::Hidden => (state, None),
            LineEvent::Other => (state, Some(line.to_owned())),
        }
    }

    pub fn normalize(&self, input: &str) -> String {
        let mut out = String::with_capacity(input.len());
        let mut state = FenceState::Outside;

        for piece in input.split_inclusive('\n') {
            let (line, newline) = match piece.strip_suffix('\n') {
                Some(line) => (line, "\n"),
                None => (piece, ""),
            };

            let (next, emitted) = self.step(state, line);
            state = next;
            if let Some(emitted) = emitted {
                out.push_str(&emitted);
                out.push_str(newline);
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fence_with_tag_is_rewritten_to_exact_tag() {
        let normalizer = SnippetNormalizer::default();
        for open in ["```rust", "```{.rust .numberLines}", "``` Rust,ignore", "```norust"] {
            let input = format!("{open}\nlet x = 1;\n```\n");
            assert_eq!(normalizer.normalize(&input), "```rust\nlet x = 1;\n```\n", "{open}");
        }
    }

    #[test]
    fn hidden_lines_dropped_only_inside_tagged_fence() {
        let normalizer = SnippetNormalizer::default();
        let input = "# Heading\n\
```rust\n\
# fn main() {\n\
println!(\"hi\");\n\
# }\n\
```\n\
# Another heading\n";

        assert_eq!(
            normalizer.normalize(input),
            "# Heading\n```rust\nprintln!(\"hi\");\n```\n# Another heading\n"
        );
    }

    #[test]
    fn untagged_fences_pass_through_untouched() {
        let normalizer = SnippetNormalizer::default();
        let input = "```text\n# not hidden\n```\n";
        assert_eq!(normalizer.normalize(input), input);
    }

    #[test]
    fn state_machine_transitions() {
        let normalizer = SnippetNormalizer::default();
        use FenceState::*;

        assert_eq!(normalizer.classify(Outside, "```rust"), LineEvent::FenceOpenWithTag);
        assert_eq!(normalizer.classify(Outside, "```"), LineEvent::Other);
        assert_eq!(normalizer.classify(Outside, "# title"), LineEvent::Other);
        assert_eq!(normalizer.classify(InsideFence, "```"), LineEvent::FenceClose);
        assert_eq!(normalizer.classify(InsideFence, "```rust"), LineEvent::FenceClose);
        assert_eq!(normalizer.classify(InsideFence, "# use std::io;"), LineEvent::Hidden);
        assert_eq!(normalizer.classify(InsideFence, "#[derive(Debug)]"), LineEvent::Other);

        assert_eq!(normalizer.step(InsideFence, "# hidden"), (InsideFence, None));
        assert_eq!(
            normalizer.step(InsideFence, "```"),
            (Outside, Some("```".to_owned()))
        );
    }

    #[test]
    fn input_without_trailing_newline_is_preserved() {
        let normalizer = SnippetNormalizer::default();
        assert_eq!(normalizer.normalize("```rust\nx\n```"), "```rust\nx\n```");
    }
}
