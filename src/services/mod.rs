// src/services/mod.rs
pub mod crop_analyzer;
pub mod normalizer;
pub mod response_parser;

pub use crop_analyzer::{CropAnalyzer, DiagnosisProvider};
