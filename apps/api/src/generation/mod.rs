// Report generation: input normalization, prompt composition, roadmap sanitizing and
// the orchestrating pipeline.
// All LLM calls go through llm_client; nothing here talks to the Anthropic API directly.

pub mod handlers;
pub mod labels;
pub mod models;
pub mod normalizer;
pub mod pipeline;
pub mod prompts;
pub mod roadmap;
