/// Identifiers, frame indices and frame rate.
pub mod core;
/// Error taxonomy.
pub mod error;
