// ============================================================
// Layer 2 — Application / Use Cases
// ============================================================
// Orchestrates the other layers to accomplish one goal per
// command (validate a split, inspect its batches).
//
// Rules for this layer:
//   - No windowing or masking logic here (that's Layer 4)
//   - No printing here (that's Layer 1)
//   - Only workflow coordination
//
// Reference: Clean Architecture pattern
//            Rust Book §7 (Module System)

/// Config + loaders + iterator wiring shared by the use cases
pub mod session;

/// Alignment and epoch-geometry check
pub mod validate_use_case;

/// Bounded pull of batches with mask statistics
pub mod inspect_use_case;
