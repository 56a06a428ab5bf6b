pub mod prediction;
pub mod symptom;

pub use prediction::*;
pub use symptom::*;
