//! The gating stages, in evaluation order.
//!
//! Each stage either lets evaluation continue or settles the request. The
//! login and desktop stages do not settle anything themselves; they only
//! decide whether a redirect is pending, which the selection and target
//! stages then turn into a concrete redirect.

pub mod desktop;
pub mod enablement;
pub mod login;
pub mod mode;
pub mod selection;
pub mod target;

use crate::decision::RedirectDecision;

/// Outcome of a stage that may settle the request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    /// Evaluation moves on to the next stage.
    Continue,
    /// The request is settled.
    Decide(RedirectDecision),
}
