use std::path::Path;

use console::Style;
use cropview_core::geometry::{ScaleLimits, Size};
use cropview_core::viewer::Viewer;

struct Styles {
    title: Style,
    header: Style,
    label: Style,
    value: Style,
    mode: Style,
    disabled: Style,
    path: Style,
}

impl Styles {
    fn new() -> Self {
        Self {
            title: Style::new().cyan().bold(),
            header: Style::new().cyan().bold(),
            label: Style::new().dim(),
            value: Style::new().bold().white(),
            mode: Style::new().green(),
            disabled: Style::new().dim().yellow(),
            path: Style::new().underlined(),
        }
    }
}

fn size_str(size: Size) -> String {
    format!("{}x{}", size.width, size.height)
}

/// Cover fit of an image in a viewport.
pub struct FitSummary {
    pub viewport: Size,
    pub limits: ScaleLimits,
    pub translate_x: f64,
    pub translate_y: f64,
}

pub fn print_fit_summary(path: &Path, natural: Size, fit: Option<&FitSummary>) {
    let s = Styles::new();

    println!();
    println!(
        "  {:<14}{}",
        s.label.apply_to("File"),
        s.path.apply_to(path.display())
    );
    println!(
        "  {:<14}{}",
        s.label.apply_to("Dimensions"),
        s.value.apply_to(size_str(natural))
    );

    let Some(fit) = fit else {
        println!();
        return;
    };

    println!();
    println!("  {}", s.header.apply_to("Cover Fit"));
    println!(
        "    {:<12}{}",
        s.label.apply_to("Viewport"),
        s.value.apply_to(size_str(fit.viewport))
    );
    println!(
        "    {:<12}{}",
        s.label.apply_to("Base scale"),
        s.value.apply_to(format!("{:.4}", fit.limits.base_scale))
    );
    println!(
        "    {:<12}{}",
        s.label.apply_to("Zoom range"),
        s.value.apply_to(format!(
            "{:.4} .. {:.4}",
            fit.limits.min_scale, fit.limits.max_scale
        ))
    );
    println!(
        "    {:<12}{}",
        s.label.apply_to("Translate"),
        s.value.apply_to(format!(
            "({:.1}, {:.1})",
            fit.translate_x, fit.translate_y
        ))
    );
    println!();
}

pub struct ExportSummary<'a> {
    pub input: &'a Path,
    pub output: &'a Path,
    pub natural: Size,
    pub viewer: &'a Viewer,
    pub exported: Size,
}

pub fn print_export_summary(summary: &ExportSummary<'_>) {
    let s = Styles::new();
    let viewer = summary.viewer;
    let config = viewer.config();

    println!();
    println!("  {}", s.title.apply_to("Cropview Export"));
    println!("  {}", s.title.apply_to("\u{2550}".repeat(15)));
    println!();

    println!(
        "  {:<14}{}",
        s.label.apply_to("Input"),
        s.path.apply_to(summary.input.display())
    );
    println!(
        "  {:<14}{}",
        s.label.apply_to("Output"),
        s.path.apply_to(summary.output.display())
    );
    println!(
        "  {:<14}{}",
        s.label.apply_to("Image"),
        s.value.apply_to(size_str(summary.natural))
    );
    println!();

    println!("  {}", s.header.apply_to("View"));
    if config.transform_enabled {
        let t = viewer.transform();
        println!(
            "    {:<12}{}",
            s.label.apply_to("Mode"),
            s.mode.apply_to("pan/zoom")
        );
        println!(
            "    {:<12}{}",
            s.label.apply_to("Viewport"),
            s.value.apply_to(size_str(viewer.viewport_size()))
        );
        println!(
            "    {:<12}{}",
            s.label.apply_to("Zoom"),
            s.value.apply_to(format!("{:.2}x", viewer.zoom_multiplier()))
        );
        println!(
            "    {:<12}{}",
            s.label.apply_to("Transform"),
            s.value.apply_to(format!(
                "scale {:.4}, translate ({:.1}, {:.1})",
                t.scale, t.translate_x, t.translate_y
            ))
        );
    } else {
        println!(
            "    {:<12}{}",
            s.label.apply_to("Mode"),
            s.mode.apply_to("legacy")
        );
        println!(
            "    {:<12}{}",
            s.label.apply_to("Rotation"),
            s.value.apply_to(format!("{}\u{b0}", config.rotation_degrees))
        );
        println!(
            "    {:<12}{}",
            s.label.apply_to("Scale"),
            s.value.apply_to(format!("{:.2}", config.scaling))
        );
    }
    println!();

    println!("  {}", s.header.apply_to("Crop"));
    println!(
        "    {:<12}{}",
        s.label.apply_to("Aspect"),
        s.mode.apply_to(config.aspect)
    );
    if let Some(native) = viewer.native_crop_rect() {
        println!(
            "    {:<12}{}",
            s.label.apply_to("Native"),
            s.value.apply_to(format!(
                "{:.1},{:.1} {:.1}x{:.1}",
                native.x, native.y, native.width, native.height
            ))
        );
    }
    if config.circular {
        println!(
            "    {:<12}{}",
            s.label.apply_to("Shape"),
            s.mode.apply_to("ellipse")
        );
    } else {
        println!(
            "    {:<12}{}",
            s.label.apply_to("Shape"),
            s.disabled.apply_to("rectangle")
        );
    }
    println!(
        "    {:<12}{}",
        s.label.apply_to("Output"),
        s.value.apply_to(size_str(summary.exported))
    );
    println!();
}
