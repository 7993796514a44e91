//! Azure-backed collaborator clients.
//!
//! Concrete implementations of the chat pipeline's generative and speech
//! seams, talking to Azure OpenAI chat completions and Azure Speech TTS.
//! Both degrade to not-ready when credentials are absent rather than
//! failing construction, so the rest of the system wires up the same way
//! with or without Azure access.

pub mod openai;
pub mod speech;

pub use openai::AzureOpenAi;
pub use speech::AzureSpeech;
