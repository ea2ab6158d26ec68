//! Request classification subsystem.
//!
//! # Data Flow
//! ```text
//! Request path
//!     → classifier.rs (static / public / protected)
//!     → gate middleware decides what to do with each class
//! ```

pub mod classifier;

pub use classifier::{PathClass, PathClassifier};
