//! First-order term representation and manipulation
//!
//! Terms, clauses, substitutions, and unification. Everything here is pure:
//! transformations return new values and never mutate their inputs.

pub mod core;
pub mod unification;

// Re-export commonly used types
pub use self::core::clause::{Clause, PredicateKey};
pub use self::core::term::{is_variable_name, Compound, Term, Value, Variable};
pub use self::unification::{
    unify, Substitution, SubstitutionError, UnificationError, UnificationResult,
};
