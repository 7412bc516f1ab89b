pub mod error;
pub mod traits;
pub mod types;

pub use error::LabelError;
pub use traits::{ScriptedRecognizer, TextRecognizer};
pub use types::{ExtractedFields, ExtractionResponse, Point, RecognitionResult};
