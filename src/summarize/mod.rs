// Incident summaries: the fallback policy plus its backends.
//
// Summarizer (policy.rs) decides when a backend is consulted at all; the
// AbstractiveSummarizer trait is the swap point for the backend itself.

pub mod lead;
pub mod policy;
pub mod traits;

pub use policy::Summarizer;
