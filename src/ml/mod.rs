// ============================================================
// Layer 5 — ML Boundary (Burn)
// ============================================================
// The only layer that imports Burn. The feeder itself works on
// plain ndarray matrices; this layer hands them to a model as
// device tensors.
//
// What's in this layer:
//
//   tensors.rs — TensorBatch, a MultiTaskBatch converted into
//                Burn tensors on a chosen device, shapes intact
//
// How the model consumes the tensors is outside this crate.
//
// Reference: Burn Book §3 (Building Blocks), §4 (Batcher)

/// MultiTaskBatch → Burn tensors
pub mod tensors;
