//! Browser platform layer
//!
//! Handles the page's collaborators:
//! - Storage (LocalStorage)
//! - Audio playback (embedded SoundCloud widget)
//! - Guess validation (fetch to the server)
//! - Clipboard

#[cfg(target_arch = "wasm32")]
pub mod clipboard;
#[cfg(target_arch = "wasm32")]
pub mod fetch;
#[cfg(target_arch = "wasm32")]
pub mod storage;
#[cfg(target_arch = "wasm32")]
pub mod widget;
