//! Soil humidity calibration mapping.
//!
//! The resistive probe reads a HIGHER raw ADC value when dry, so the slope
//! is inverted: `CALIBRATION_DRY` maps to 0 % and `CALIBRATION_WET` to
//! 100 %. Both bounds clamp.

/// Raw ADC value with the probe in air (fully dry).
pub const CALIBRATION_DRY: u16 = 2850;
/// Raw ADC value with the probe submerged in water.
pub const CALIBRATION_WET: u16 = 1350;

/// Map a raw ADC sample to a humidity percentage in [0, 100].
pub fn normalize(raw: u16) -> f32 {
    if raw >= CALIBRATION_DRY {
        return 0.0;
    }
    if raw <= CALIBRATION_WET {
        return 100.0;
    }
    let span = (CALIBRATION_DRY - CALIBRATION_WET) as f32;
    let offset = (CALIBRATION_DRY - raw) as f32;
    offset * 100.0 / span
}
