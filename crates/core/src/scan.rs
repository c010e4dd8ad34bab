//! Decoded scan events from the external barcode source.

/// One decoded barcode delivered by the scanner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanEvent {
    /// Decoded payload text.
    pub data: String,
    /// Symbology label reported by the decoder (e.g. `LABEL-TYPE-EAN13`).
    pub label_type: String,
    /// True when the scan was triggered in software (camera soft scan).
    pub soft_triggered: bool,
}

impl ScanEvent {
    /// Hardware-triggered scan with the given payload.
    pub fn new(data: impl Into<String>, label_type: impl Into<String>) -> Self {
        Self {
            data: data.into(),
            label_type: label_type.into(),
            soft_triggered: false,
        }
    }

    /// Software-triggered (camera) scan with the given payload.
    pub fn soft(data: impl Into<String>, label_type: impl Into<String>) -> Self {
        Self {
            soft_triggered: true,
            ..Self::new(data, label_type)
        }
    }
}
