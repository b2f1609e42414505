// Zero-shot classification: trait-based abstraction plus the hierarchical labeler.
//
// ZeroShotClassifier is the capability boundary. OnnxZeroShotClassifier runs a
// local NLI model; the hosted inference client in `crate::inference` is the
// alternative. HierarchicalLabeler applies either one against the taxonomy.

pub mod hierarchical;
pub mod onnx;
pub mod traits;
