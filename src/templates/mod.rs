pub mod components;
pub mod layouts;
pub mod pages;

// Re-exports for convenience
pub use components::toast::{error_toast, toast};
pub use layouts::desktop::desktop_layout;
