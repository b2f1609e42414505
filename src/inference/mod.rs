// Hosted inference API client (HuggingFace Inference API compatible).
//
// One client serves both the zero-shot classification and the abstractive
// summarization capabilities, throttled by a shared client-side rate limiter.

pub mod hf;
pub mod rate_limiter;
