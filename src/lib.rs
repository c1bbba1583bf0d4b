pub mod api;
pub mod config;
pub mod cover;
pub mod llm;
pub mod pipeline;
pub mod store;
