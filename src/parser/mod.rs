//! # Parser
//!
//! A precedence-climbing recursive-descent parser. Small rules (literals,
//! punctuation) are expressed as [`BoxedParser`] combinators; the expression
//! grammar drives them by hand so it can recover from malformed input and
//! attach diagnostics to the nodes it still builds.

mod combinators;
mod grammar;
mod state;

pub use combinators::*;
pub use grammar::*;
pub use state::*;
