//! The relaxation stencil.
//!
//! [`stencil`] holds the per-cell update and the Jacobi sweep over a
//! padded block; [`reference`] runs the same update over a whole image in
//! one process and is what distributed runs are checked against.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod reference;
pub mod stencil;

pub use reference::relax_serial;
pub use stencil::{relax_interior, relax_point};
