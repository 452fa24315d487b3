//! Deterministic decision rules.
//!
//! Policies take plain values and return plain values. They never touch a
//! collaborator; workflows read state, ask a policy, then act.

pub mod consent;
pub mod frequency;
pub mod layout;
