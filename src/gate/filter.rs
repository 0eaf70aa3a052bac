// Content gate: whole-word, case-insensitive restricted term matching.
//
// Each term is compiled once into `(?i)\bTERM\b` with the term escaped, so
// regex metacharacters in the list are taken literally. The compiled set is
// immutable after construction; share it behind an Arc and call `evaluate`
// from as many tasks as you like.
//
// Boundary semantics come from regex-lite, which is ASCII-only:
//   - a word character is [0-9A-Za-z_]; anything else (including 'é', 'ß',
//     CJK) is a boundary, so "caf" DOES match inside "café";
//   - (?i) folds ASCII letters only.
// A term that begins or ends with a non-word character (e.g. "c++") needs a
// word character on the far side of that edge to match, same as any \b regex.

use std::collections::BTreeSet;

use regex_lite::Regex;

use super::terms::RestrictedTermSet;
use crate::error::ConfigError;

/// Outcome of running a query through the gate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateDecision {
    Allowed,
    /// The terms (as written in the list) that matched.
    Blocked(BTreeSet<String>),
}

impl GateDecision {
    pub fn is_blocked(&self) -> bool {
        matches!(self, GateDecision::Blocked(_))
    }
}

struct CompiledTerm {
    term: String,
    pattern: Regex,
}

/// The compiled restricted term matcher.
pub struct ContentGate {
    compiled: Vec<CompiledTerm>,
}

impl ContentGate {
    /// Compile every term in the set. Fails only if a term can't be turned
    /// into a pattern, which escaping makes practically impossible.
    pub fn new(terms: &RestrictedTermSet) -> Result<Self, ConfigError> {
        let compiled = terms
            .terms()
            .iter()
            .map(|term| {
                let source = format!(r"(?i)\b{}\b", regex_lite::escape(term));
                Regex::new(&source)
                    .map(|pattern| CompiledTerm {
                        term: term.clone(),
                        pattern,
                    })
                    .map_err(|e| ConfigError::InvalidTerm {
                        term: term.clone(),
                        reason: e.to_string(),
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { compiled })
    }

    /// Number of compiled terms.
    pub fn len(&self) -> usize {
        self.compiled.len()
    }

    pub fn is_empty(&self) -> bool {
        self.compiled.is_empty()
    }

    /// Decide whether `query` may reach the model. Total over every input,
    /// including the empty string.
    pub fn evaluate(&self, query: &str) -> GateDecision {
        let matched: BTreeSet<String> = self
            .compiled
            .iter()
            .filter(|c| c.pattern.is_match(query))
            .map(|c| c.term.clone())
            .collect();

        if matched.is_empty() {
            GateDecision::Allowed
        } else {
            GateDecision::Blocked(matched)
        }
    }
}

impl std::fmt::Debug for ContentGate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContentGate")
            .field("terms", &self.compiled.len())
            .finish()
    }
}
