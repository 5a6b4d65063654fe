pub mod aladin;
pub mod curator;
pub mod gemini;
pub mod templates;

// Re-export public types
pub use aladin::{AladinClient, BookSearch};
pub use curator::{Curation, CuratorService};
pub use gemini::{GeminiClient, Recommender};
