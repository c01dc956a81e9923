//! skillmatch-providers — AI backend integrations.
//!
//! Implements the `QuestionSource` and `CareerAdvisor` traits for Gemini
//! and OpenAI-compatible backends. Every payload is decoded into typed
//! structures and validated on receipt; a mismatch rejects the whole
//! response with `FetchError`, never a partially-trusted value.

pub mod config;
pub mod gemini;
pub mod mock;
pub mod openai;
pub mod payload;

pub use config::{create_provider, load_config, Provider, ProviderConfig, SkillmatchConfig};
pub use skillmatch_core::error::FetchError;
