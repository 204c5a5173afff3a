mod threshold_analyzer;

pub use threshold_analyzer::{
    MAX_DIMENSION, MIN_CLASS_CONTRAST, ThresholdImageAnalyzer, otsu_threshold,
};
