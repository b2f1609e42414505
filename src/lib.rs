// Scamwatch: scam incident labelling, summarization, and trend detection
//
// This is the library root. Each module corresponds to one stage or
// capability of the incident analysis pipeline.

pub mod classify;
pub mod config;
pub mod download;
pub mod encoding;
pub mod inference;
pub mod output;
pub mod patterns;
pub mod pipeline;
pub mod status;
pub mod summarize;
pub mod taxonomy;
pub mod topics;
pub mod trends;
