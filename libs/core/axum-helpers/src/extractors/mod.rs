//! Extractors whose rejections are reported through [`crate::AppError`].

pub mod id_path;
pub mod validated_json;

pub use id_path::IdPath;
pub use validated_json::{FieldOrder, ValidatedJson};
