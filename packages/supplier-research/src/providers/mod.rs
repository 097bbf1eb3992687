//! Search provider implementations.

pub mod tavily;

pub use tavily::TavilyClient;
