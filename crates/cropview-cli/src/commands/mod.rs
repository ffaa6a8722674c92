pub mod config;
pub mod export;
pub mod info;

use std::path::Path;

use anyhow::{Context, Result};
use cropview_core::config::ViewerConfig;
use cropview_core::geometry::{Rect, Size};

/// Parse `WxH`, e.g. `800x600`.
pub fn parse_size(s: &str) -> std::result::Result<Size, String> {
    let (w, h) = s
        .split_once(['x', 'X'])
        .ok_or_else(|| format!("expected WxH, got '{s}'"))?;
    let width: f64 = w.trim().parse().map_err(|_| format!("bad width '{w}'"))?;
    let height: f64 = h.trim().parse().map_err(|_| format!("bad height '{h}'"))?;
    if !(width > 0.0 && height > 0.0) {
        return Err(format!("size must be positive, got '{s}'"));
    }
    Ok(Size::new(width, height))
}

/// Parse `dx,dy`.
pub fn parse_offset(s: &str) -> std::result::Result<(f64, f64), String> {
    let values = parse_list(s, 2)?;
    Ok((values[0], values[1]))
}

/// Parse `x,y,w,h`.
pub fn parse_rect(s: &str) -> std::result::Result<Rect, String> {
    let v = parse_list(s, 4)?;
    if v[2] < 0.0 || v[3] < 0.0 {
        return Err(format!("rect extent must be >= 0, got '{s}'"));
    }
    Ok(Rect::new(v[0], v[1], v[2], v[3]))
}

fn parse_list(s: &str, n: usize) -> std::result::Result<Vec<f64>, String> {
    let values = s
        .split(',')
        .map(|part| part.trim().parse::<f64>())
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|e| format!("bad number in '{s}': {e}"))?;
    if values.len() != n {
        return Err(format!("expected {n} comma-separated numbers, got '{s}'"));
    }
    Ok(values)
}

/// Read a `ViewerConfig` from a TOML file and validate it.
pub fn load_config(path: &Path) -> Result<ViewerConfig> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config {}", path.display()))?;
    let config: ViewerConfig = toml::from_str(&text)
        .with_context(|| format!("Failed to parse config {}", path.display()))?;
    config.validate()?;
    Ok(config)
}
