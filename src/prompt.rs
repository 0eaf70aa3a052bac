// Prompt template: the three-slot format the fine-tuned model was trained on.
//
// The template file holds literal text with three placeholders:
//   {question}   the user's question
//   {reasoning}  the chain-of-thought trace (empty at inference)
//   {response}   the answer (empty at inference)
//
// The template is split into segments once at load time and rendered in a
// single pass, so placeholder-looking text inside a question is never
// expanded a second time.

use std::path::Path;

use tracing::info;

use crate::error::ConfigError;

/// Marker separating the prompt echo from the model's answer.
pub const RESPONSE_MARKER: &str = "### Response:";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Slot {
    Question,
    Reasoning,
    Response,
}

impl Slot {
    const ALL: [Slot; 3] = [Slot::Question, Slot::Reasoning, Slot::Response];

    fn placeholder(self) -> &'static str {
        match self {
            Slot::Question => "{question}",
            Slot::Reasoning => "{reasoning}",
            Slot::Response => "{response}",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Slot(Slot),
}

#[derive(Debug, Clone)]
pub struct PromptTemplate {
    segments: Vec<Segment>,
}

impl PromptTemplate {
    /// Parse template text. `origin` is only used in error messages.
    pub fn parse(text: &str, origin: &Path) -> Result<Self, ConfigError> {
        let mut segments = Vec::new();
        let mut rest = text;

        loop {
            // Earliest placeholder in what's left
            let next = Slot::ALL
                .iter()
                .filter_map(|&slot| rest.find(slot.placeholder()).map(|at| (at, slot)))
                .min_by_key(|&(at, _)| at);

            match next {
                Some((at, slot)) => {
                    if at > 0 {
                        segments.push(Segment::Literal(rest[..at].to_string()));
                    }
                    segments.push(Segment::Slot(slot));
                    rest = &rest[at + slot.placeholder().len()..];
                }
                None => {
                    if !rest.is_empty() {
                        segments.push(Segment::Literal(rest.to_string()));
                    }
                    break;
                }
            }
        }

        for slot in Slot::ALL {
            if !segments.contains(&Segment::Slot(slot)) {
                return Err(ConfigError::MissingSlot {
                    path: origin.to_path_buf(),
                    slot: slot.placeholder(),
                });
            }
        }

        Ok(Self { segments })
    }

    /// Load and validate the template file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Unreadable {
            path: path.to_path_buf(),
            source,
        })?;
        let template = Self::parse(&text, path)?;
        info!(path = %path.display(), "Loaded prompt template");
        Ok(template)
    }

    /// Fill all three slots. Used when formatting training examples.
    pub fn render(&self, question: &str, reasoning: &str, response: &str) -> String {
        let mut out = String::new();
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => out.push_str(text),
                Segment::Slot(Slot::Question) => out.push_str(question),
                Segment::Slot(Slot::Reasoning) => out.push_str(reasoning),
                Segment::Slot(Slot::Response) => out.push_str(response),
            }
        }
        out
    }

    /// Inference prompt: question filled, reasoning and response left empty.
    pub fn render_question(&self, question: &str) -> String {
        self.render(question, "", "")
    }
}

/// Keep only what the model wrote after the last response marker, trimmed.
/// Without a marker the raw text is returned untouched.
pub fn extract_response(raw: &str) -> &str {
    match raw.rfind(RESPONSE_MARKER) {
        Some(at) => raw[at + RESPONSE_MARKER.len()..].trim(),
        None => raw,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn origin() -> &'static Path {
        Path::new("test-template")
    }

    #[test]
    fn test_render_question_leaves_other_slots_empty() {
        let t = PromptTemplate::parse("Q: {question}\nT: {reasoning}\nA: {response}", origin())
            .unwrap();
        assert_eq!(t.render_question("why?"), "Q: why?\nT: \nA: ");
    }

    #[test]
    fn test_placeholder_text_in_question_is_not_expanded() {
        let t = PromptTemplate::parse("{question}|{reasoning}|{response}", origin()).unwrap();
        assert_eq!(t.render("{reasoning}", "cot", "ans"), "{reasoning}|cot|ans");
    }

    #[test]
    fn test_missing_slot_is_rejected() {
        let err = PromptTemplate::parse("{question} {response}", origin()).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::MissingSlot {
                slot: "{reasoning}",
                ..
            }
        ));
    }

    #[test]
    fn test_extract_uses_last_marker() {
        let raw = "### Response: echo\n### Response:  final answer \n";
        assert_eq!(extract_response(raw), "final answer");
    }

    #[test]
    fn test_extract_without_marker_is_verbatim() {
        assert_eq!(extract_response("  untouched  "), "  untouched  ");
    }
}
