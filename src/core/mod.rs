//! Icon state logic: contrast classification, asset paths, titles, and the
//! per-tab animation tracker.

mod contrast;
mod icon;
mod titles;
mod tracker;

pub use contrast::*;
pub use icon::*;
pub use titles::*;
pub use tracker::*;
