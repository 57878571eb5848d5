// Detail page generation: prompt templates, the provider client, the two-stage
// outline → fill pipeline and section images.
// All provider calls go through llm_client via ContentGenerationClient.

pub mod client;
pub mod generator;
pub mod handlers;
pub mod images;
pub mod models;
pub mod prompts;
pub mod templates;
pub mod tone;
pub mod workflow;
