//! Convergence scrolling for Scrollback.
//!
//! Drives a conversation container to its oldest extreme until the surface
//! stops materializing older history.

pub mod lookup;
pub mod scroller;
