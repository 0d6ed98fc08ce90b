//! Command implementations.

pub mod check;
pub mod run;

pub use check::run_check;
pub use run::run_reconcile;
