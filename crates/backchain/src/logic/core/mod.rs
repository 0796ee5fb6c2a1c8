pub mod clause;
pub mod term;
