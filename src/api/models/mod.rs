pub mod report;

pub use report::{ExerciseKind, ExerciseReport};
