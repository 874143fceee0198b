//! Pure component renderers, one module per target format.
//!
//! Every renderer is a function of the component alone: no I/O, no state,
//! and the same component always yields the same output.

pub mod html;
pub mod markdown;
pub mod slack;
