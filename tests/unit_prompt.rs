// Unit tests for the shipped prompt template.
//
// The model was fine-tuned on this exact layout, so these pin the slot
// positions and the single response marker in config/prompt_template.txt.

use std::path::Path;

use medchat::error::ConfigError;
use medchat::prompt::{extract_response, PromptTemplate, RESPONSE_MARKER};

fn template_path() -> std::path::PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("config/prompt_template.txt")
}

fn shipped_template() -> PromptTemplate {
    PromptTemplate::load(&template_path()).unwrap()
}

// ============================================================
// Shipped template layout
// ============================================================

#[test]
fn shipped_template_has_one_response_marker() {
    let text = std::fs::read_to_string(template_path()).unwrap();
    assert_eq!(text.matches(RESPONSE_MARKER).count(), 1);
}

#[test]
fn shipped_template_fills_all_three_slots() {
    let out = shipped_template().render("Q-TEXT", "R-TEXT", "A-TEXT");

    let q = out.find("Q-TEXT").unwrap();
    let marker = out.find(RESPONSE_MARKER).unwrap();
    let r = out.find("R-TEXT").unwrap();
    let a = out.find("A-TEXT").unwrap();

    assert!(q < marker && marker < r && r < a, "rendered: {out}");
    assert!(out.contains("<think>\nR-TEXT\n</think>\nA-TEXT"));
    assert!(!out.contains("{question}"));
    assert!(!out.contains("{reasoning}"));
    assert!(!out.contains("{response}"));
}

#[test]
fn inference_prompt_ends_with_empty_reasoning_block() {
    let out = shipped_template().render_question("What causes anemia?");
    assert!(out.contains("What causes anemia?"));
    assert!(out.ends_with("### Response:\n<think>\n\n</think>\n\n"), "rendered: {out:?}");
}

// ============================================================
// Prompt echo + completion
// ============================================================

#[test]
fn completion_after_rendered_prompt_is_extracted() {
    let prompt = shipped_template().render_question("What causes anemia?");
    let raw = format!("{prompt}Iron deficiency is the most common cause.\n");
    assert_eq!(
        extract_response(&raw),
        "<think>\n\n</think>\n\nIron deficiency is the most common cause."
    );
}

#[test]
fn marker_inside_question_does_not_shift_the_cut() {
    let prompt = shipped_template().render_question("What does ### Response: mean?");
    let raw = format!("{prompt}It is a heading.");
    assert!(extract_response(&raw).ends_with("It is a heading."));
    assert!(!extract_response(&raw).contains("mean?"));
}

// ============================================================
// Load failures
// ============================================================

#[test]
fn missing_template_file_is_unreadable() {
    let err = PromptTemplate::load(Path::new("/nonexistent/prompt_template.txt")).unwrap_err();
    assert!(matches!(err, ConfigError::Unreadable { .. }));
}
