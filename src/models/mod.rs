//! Data structures shared by the store, the tools, and both transports.

pub mod note;

pub use note::{Note, NoteSummary};
