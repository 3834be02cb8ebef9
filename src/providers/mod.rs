//! External capability providers: language model and web search

pub mod gemini;
pub mod llm;
pub mod search;
pub mod serper;

pub use gemini::GeminiClient;
pub use llm::LlmProvider;
pub use search::{SearchHit, SearchProvider};
pub use serper::SerperClient;
