//! Dashboard state
//!
//! Everything the dashboard knows, independent of how it is drawn:
//! the paging and add-vehicle workflow, the form draft, the detail view
//! model and the lightbox.

pub mod controller;
pub mod detail;
pub mod form;
pub mod gallery;

pub use controller::*;
pub use detail::*;
pub use form::*;
pub use gallery::*;
