use serde::{Deserialize, Serialize};

use crate::consts::DEFAULT_WHEEL_SENSITIVITY;
use crate::coords::NativeRect;
use crate::crop::constraints::{CropAspect, CropConstraints};
use crate::error::{CropviewError, Result};
use crate::input::PanPolicy;

/// Values supplied by the host shell.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    /// Pan/zoom transform active. When false the legacy native-space
    /// crop path is used and no gesture is claimed.
    pub transform_enabled: bool,
    pub pan_enabled: bool,
    /// Pan only while the modifier key (shift) is held.
    pub pan_requires_modifier: bool,
    pub crop_enabled: bool,
    /// Ignore all input.
    pub disabled: bool,
    /// Crop rectangle cannot be edited.
    pub locked: bool,
    pub aspect: CropAspect,
    pub min_width: f64,
    pub min_height: f64,
    pub max_width: Option<f64>,
    pub max_height: Option<f64>,
    /// Degrees, clockwise-positive, about the image centre (legacy export).
    pub rotation_degrees: f64,
    /// Host zoom multiplier. Mapped onto the zoom range when the transform
    /// is active, applied as a uniform export scale in legacy mode.
    pub scaling: f64,
    /// Clip the export to an inscribed ellipse.
    pub circular: bool,
    /// Initial crop supplied by the host.
    pub default_crop: Option<NativeRect>,
    /// `k` in the wheel zoom factor `exp(-delta_y * k)`.
    pub wheel_sensitivity: f64,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            transform_enabled: true,
            pan_enabled: true,
            pan_requires_modifier: false,
            crop_enabled: true,
            disabled: false,
            locked: false,
            aspect: CropAspect::Free,
            min_width: 0.0,
            min_height: 0.0,
            max_width: None,
            max_height: None,
            rotation_degrees: 0.0,
            scaling: 1.0,
            circular: false,
            default_crop: None,
            wheel_sensitivity: DEFAULT_WHEEL_SENSITIVITY,
        }
    }
}

impl ViewerConfig {
    pub fn pan_policy(&self) -> PanPolicy {
        PanPolicy {
            enabled: self.pan_enabled && self.transform_enabled,
            requires_modifier: self.pan_requires_modifier,
        }
    }

    pub fn constraints(&self) -> CropConstraints {
        CropConstraints {
            aspect: self.aspect,
            min_width: self.min_width,
            min_height: self.min_height,
            max_width: self.max_width,
            max_height: self.max_height,
        }
    }

    /// Reject values the engine cannot work with.
    pub fn validate(&self) -> Result<()> {
        if !(self.scaling > 0.0 && self.scaling.is_finite()) {
            return Err(CropviewError::InvalidConfig(format!(
                "scaling must be positive, got {}",
                self.scaling
            )));
        }
        if !(self.wheel_sensitivity >= 0.0 && self.wheel_sensitivity.is_finite()) {
            return Err(CropviewError::InvalidConfig(format!(
                "wheel_sensitivity must be non-negative, got {}",
                self.wheel_sensitivity
            )));
        }
        if let Some(ratio) = self.aspect.ratio() {
            if !(ratio > 0.0 && ratio.is_finite()) {
                return Err(CropviewError::InvalidConfig(format!(
                    "aspect ratio must be positive, got {ratio}"
                )));
            }
        }
        if self.min_width < 0.0 || self.min_height < 0.0 {
            return Err(CropviewError::InvalidConfig(
                "min crop dimensions must be >= 0".into(),
            ));
        }
        if let Some(max_w) = self.max_width {
            if max_w < self.min_width {
                return Err(CropviewError::InvalidConfig(format!(
                    "max_width {max_w} is below min_width {}",
                    self.min_width
                )));
            }
        }
        if let Some(max_h) = self.max_height {
            if max_h < self.min_height {
                return Err(CropviewError::InvalidConfig(format!(
                    "max_height {max_h} is below min_height {}",
                    self.min_height
                )));
            }
        }
        Ok(())
    }
}
