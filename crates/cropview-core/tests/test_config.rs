use cropview_core::config::ViewerConfig;
use cropview_core::consts::DEFAULT_WHEEL_SENSITIVITY;
use cropview_core::coords::NativeRect;
use cropview_core::crop::CropAspect;
use cropview_core::error::CropviewError;
use cropview_core::geometry::Rect;

// ---------------------------------------------------------------------------
// Defaults
// ---------------------------------------------------------------------------

#[test]
fn test_default_config() {
    let config = ViewerConfig::default();
    assert!(config.transform_enabled);
    assert!(config.pan_enabled);
    assert!(!config.pan_requires_modifier);
    assert!(config.crop_enabled);
    assert_eq!(config.scaling, 1.0);
    assert_eq!(config.aspect, CropAspect::Free);
    assert_eq!(config.wheel_sensitivity, DEFAULT_WHEEL_SENSITIVITY);
    assert!(config.validate().is_ok());
}

#[test]
fn test_pan_policy_requires_transform() {
    let config = ViewerConfig {
        transform_enabled: false,
        ..Default::default()
    };
    assert!(!config.pan_policy().enabled);
}

#[test]
fn test_constraints_mirror_config() {
    let config = ViewerConfig {
        aspect: CropAspect::Square,
        min_width: 10.0,
        max_height: Some(50.0),
        ..Default::default()
    };
    let c = config.constraints();
    assert_eq!(c.aspect, CropAspect::Square);
    assert_eq!(c.min_width, 10.0);
    assert_eq!(c.max_height, Some(50.0));
}

// ---------------------------------------------------------------------------
// Serde
// ---------------------------------------------------------------------------

#[test]
fn test_partial_json_uses_defaults() {
    let config: ViewerConfig =
        serde_json::from_str(r#"{ "circular": true, "aspect": "SixteenByNine" }"#).unwrap();
    assert!(config.circular);
    assert_eq!(config.aspect, CropAspect::SixteenByNine);
    assert!(config.transform_enabled);
    assert_eq!(config.scaling, 1.0);
}

#[test]
fn test_json_roundtrip_with_default_crop() {
    let config = ViewerConfig {
        aspect: CropAspect::Custom(2.5),
        default_crop: Some(NativeRect::Percent(Rect::new(10.0, 10.0, 80.0, 80.0))),
        ..Default::default()
    };
    let json = serde_json::to_string(&config).unwrap();
    let back: ViewerConfig = serde_json::from_str(&json).unwrap();
    assert_eq!(back, config);
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

#[test]
fn test_validate_rejects_bad_scaling() {
    let config = ViewerConfig {
        scaling: 0.0,
        ..Default::default()
    };
    assert!(matches!(
        config.validate(),
        Err(CropviewError::InvalidConfig(_))
    ));
}

#[test]
fn test_validate_rejects_bad_aspect() {
    let config = ViewerConfig {
        aspect: CropAspect::Custom(-1.0),
        ..Default::default()
    };
    assert!(config.validate().is_err());
}

#[test]
fn test_validate_rejects_max_below_min() {
    let config = ViewerConfig {
        min_width: 100.0,
        max_width: Some(50.0),
        ..Default::default()
    };
    assert!(config.validate().is_err());
}
