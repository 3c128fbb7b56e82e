//! Progress reporting module
//!
//! Spinner feedback for one-shot commands while a request to the
//! inventory service is outstanding.

mod reporter;

pub use reporter::*;
