//! Transactional domain operations that sit between handlers and
//! repositories.
//!
//! - [`offers`] -- offer create / accept / reject and seller ranking.
//! - [`conversations`] -- chat counterpart lookup and seller threads.

pub mod conversations;
pub mod offers;
