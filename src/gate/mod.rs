// Content gating: the decision point in front of the model.
//
// RestrictedTermSet is the data (loaded from a file at startup); ContentGate
// is the compiled, read-only matcher built from it.

pub mod filter;
pub mod terms;

pub use filter::{ContentGate, GateDecision};
pub use terms::RestrictedTermSet;
