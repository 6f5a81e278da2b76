//! Model-facing side of the classifier: prompts, backend seam, Gemini client

pub mod backend;
pub mod gemini;
pub mod prompts;
