//! Most General Unifier (MGU) computation

use super::substitution::{Substitution, SubstitutionError};
use crate::logic::core::clause::PredicateKey;
use crate::logic::core::term::{Term, Value};
use thiserror::Error;

/// Result of a unification attempt
pub type UnificationResult = Result<Substitution, UnificationError>;

/// Reasons two terms fail to unify
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UnificationError {
    /// Compound terms with different functor names or arities
    #[error("functor mismatch: {left} vs {right}")]
    FunctorMismatch {
        left: PredicateKey,
        right: PredicateKey,
    },
    /// An argument pair failed; `index` is zero-based
    #[error("argument {index} mismatch: {source}")]
    ArgumentMismatch {
        index: usize,
        source: Box<UnificationError>,
    },
    /// Two different constants
    #[error("constant mismatch: {left} vs {right}")]
    ConstantMismatch { left: Value, right: Value },
    /// Constant against compound
    #[error("term shape mismatch: {left} vs {right}")]
    TermShapeMismatch { left: Term, right: Term },
    #[error(transparent)]
    Substitution(#[from] SubstitutionError),
}

impl UnificationError {
    /// The innermost cause, looking through `ArgumentMismatch` wrappers
    pub fn root_cause(&self) -> &UnificationError {
        match self {
            UnificationError::ArgumentMismatch { source, .. } => source.root_cause(),
            other => other,
        }
    }
}

/// Unify two terms under an existing substitution.
///
/// On success the returned substitution extends `subst`; `subst` itself is
/// never modified. No occurs check is performed, so a variable may end up
/// bound to a term containing itself; `Substitution::apply` reports such
/// cycles when they are later dereferenced.
pub fn unify(term1: &Term, term2: &Term, subst: &Substitution) -> UnificationResult {
    let mut working = subst.clone();
    unify_with_subst(term1, term2, &mut working)?;
    Ok(working)
}

/// Unify two terms, extending `subst` in place
fn unify_with_subst(
    term1: &Term,
    term2: &Term,
    subst: &mut Substitution,
) -> Result<(), UnificationError> {
    let t1 = subst.apply(term1)?;
    let t2 = subst.apply(term2)?;

    match (&t1, &t2) {
        (Term::Constant(c1), Term::Constant(c2)) => {
            if c1 == c2 {
                Ok(())
            } else {
                Err(UnificationError::ConstantMismatch {
                    left: c1.clone(),
                    right: c2.clone(),
                })
            }
        }

        (Term::Variable(v1), Term::Variable(v2)) if v1 == v2 => Ok(()),

        // Both sides are fully dereferenced, so the variable here is unbound
        (Term::Variable(v), t) | (t, Term::Variable(v)) => {
            subst.insert(v.clone(), t.clone())?;
            Ok(())
        }

        (Term::Compound(c1), Term::Compound(c2)) => {
            if c1.functor != c2.functor || c1.args.len() != c2.args.len() {
                return Err(UnificationError::FunctorMismatch {
                    left: c1.key(),
                    right: c2.key(),
                });
            }

            for (index, (arg1, arg2)) in c1.args.iter().zip(c2.args.iter()).enumerate() {
                match unify_with_subst(arg1, arg2, subst) {
                    Ok(()) => {}
                    Err(e @ UnificationError::Substitution(_)) => return Err(e),
                    Err(e) => {
                        return Err(UnificationError::ArgumentMismatch {
                            index,
                            source: Box::new(e),
                        })
                    }
                }
            }
            Ok(())
        }

        _ => Err(UnificationError::TermShapeMismatch {
            left: t1.clone(),
            right: t2.clone(),
        }),
    }
}
