//! Config defaults that depend on where the config lives.

use std::path::Path;

use crate::schema::LabelScanConfig;

pub const MODELS_DIR_NAME: &str = "models";
pub const DETECTION_MODEL_FILE: &str = "text-detection.rten";
pub const RECOGNITION_MODEL_FILE: &str = "text-recognition.rten";

/// Apply all path-dependent defaults to a freshly loaded config.
pub fn apply_all_defaults(config: LabelScanConfig, config_dir: &Path) -> LabelScanConfig {
    apply_ocr_defaults(config, config_dir)
}

/// Model paths default to `<config_dir>/models/`.
fn apply_ocr_defaults(mut config: LabelScanConfig, config_dir: &Path) -> LabelScanConfig {
    let models = config_dir.join(MODELS_DIR_NAME);
    config
        .ocr
        .detection_model
        .get_or_insert_with(|| models.join(DETECTION_MODEL_FILE));
    config
        .ocr
        .recognition_model
        .get_or_insert_with(|| models.join(RECOGNITION_MODEL_FILE));
    config
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn fills_model_paths_under_config_dir() {
        let cfg = apply_all_defaults(LabelScanConfig::default(), Path::new("/home/u/.labelscan"));
        assert_eq!(
            cfg.ocr.detection_model,
            Some(PathBuf::from("/home/u/.labelscan/models/text-detection.rten"))
        );
        assert_eq!(
            cfg.ocr.recognition_model,
            Some(PathBuf::from("/home/u/.labelscan/models/text-recognition.rten"))
        );
    }

    #[test]
    fn does_not_override_user_set_model() {
        let mut cfg = LabelScanConfig::default();
        cfg.ocr.detection_model = Some(PathBuf::from("/opt/det.rten"));
        let cfg = apply_all_defaults(cfg, Path::new("/x"));
        assert_eq!(cfg.ocr.detection_model, Some(PathBuf::from("/opt/det.rten")));
        assert!(cfg.ocr.recognition_model.is_some());
    }
}
