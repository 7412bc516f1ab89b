//! Text recognizer backed by the `ocrs` engine, plus a wrapper that
//! serializes access for engines that cannot be shared across threads.

pub mod models;
pub mod ocrs_engine;
pub mod serialized;

pub use models::ModelPaths;
pub use ocrs_engine::OcrsRecognizer;
pub use serialized::SerializedRecognizer;
