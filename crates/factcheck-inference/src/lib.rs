//! # factcheck-inference
//!
//! Hosted text generation for the factcheck pipeline.
//!
//! [`client::HuggingFaceClient`] implements
//! [`factcheck_core::traits::TextGenerator`] against the Hugging Face
//! Inference API. Requests go through an [`transport::InferenceTransport`]
//! (a blocking `reqwest` client in production) and 503 "model loading"
//! answers are retried after a fixed wait.
//!
//! ```rust,ignore
//! use factcheck_inference::HuggingFaceClient;
//!
//! let client = HuggingFaceClient::new(config.inference.clone())?;
//! let text = client.generate_with_retries(&prompt, 3)?;
//! ```

pub mod client;
pub mod transport;

pub use client::HuggingFaceClient;
