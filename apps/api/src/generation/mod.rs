// Résumé generation engine.
// Implements: prompt building, provider orchestration with local fallback,
// response normalization, status tracking, and the tracked attempt pipeline.
// All LLM calls go through llm_client, never direct provider calls here.

pub mod handlers;
pub mod normalizer;
pub mod orchestrator;
pub mod pipeline;
pub mod prompt_builder;
pub mod prompts;
pub mod status;
