//! AI adapters: LLM-backed classifier and responder plus test mocks.

mod classifier;
mod llm;
mod mock;
mod responder;
mod verdict;

pub use classifier::LlmScamClassifier;
pub use llm::{ChatCall, LlmClient, LlmConfig, LlmError};
pub use mock::{MockPersonaResponder, MockScamClassifier};
pub use responder::LlmPersonaResponder;
pub use verdict::parse_verdict;
