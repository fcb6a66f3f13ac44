//! Capability traits for the engine's external collaborators.

pub mod classifier;
pub mod platform;
pub mod store;

pub use classifier::Classifier;
pub use platform::{Channel, ChatPlatform, MessageHandle, Role};
pub use store::{OffenseStore, SettingsStore};
