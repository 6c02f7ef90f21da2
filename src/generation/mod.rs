//! Text generation with a tool loop.

pub mod text;

pub use text::generate_text;
