// Animation system

pub mod catalog;
pub mod clip;
pub mod set;

pub use catalog::AnimationCatalog;
pub use clip::{AnimationClip, ClipKind};
pub use set::AnimationSet;
