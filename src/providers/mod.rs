//! Classifier backends
//!
//! HTTP implementations of [`crate::traits::Classifier`].

pub mod perspective;

pub use perspective::{PerspectiveClassifier, PerspectiveConfig, PerspectiveConfigBuilder};
