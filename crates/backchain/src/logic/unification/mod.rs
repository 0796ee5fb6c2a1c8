//! Unification and substitution for first-order terms

pub mod mgu;
pub mod substitution;


pub use mgu::{unify, UnificationError, UnificationResult};
pub use substitution::{Substitution, SubstitutionError};
