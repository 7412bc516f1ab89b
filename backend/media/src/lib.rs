//! Image side of the label pipeline: normalization, annotation, response
//! assembly, and the [`LabelPipeline`] that wires them around a recognizer.

pub mod annotate;
pub mod assemble;
pub mod normalize;
pub mod pipeline;

pub use annotate::{AnnotationStyle, Annotator};
pub use assemble::{assemble, encode_base64, encode_jpeg, DEFAULT_JPEG_QUALITY};
pub use normalize::{binarize, normalize, NormalizedImage, DEFAULT_THRESHOLD};
pub use pipeline::LabelPipeline;
