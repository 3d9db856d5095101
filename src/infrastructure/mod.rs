//! Infrastructure layer
//!
//! Owns the scarce resources (HTTP client, throttle slot) and exposes
//! capabilities only. Nothing in here knows about protection numbers,
//! classification or the batch.

pub mod portal;
pub mod throttle;

pub use portal::{Document, FormMethod, HttpPortal, Portal, SearchForm};
pub use throttle::AutoThrottle;
