use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{bail, Result};
use clap::{Args, ValueEnum};
use cropview_core::config::ViewerConfig;
use cropview_core::crop::CropAspect;
use cropview_core::geometry::{Rect, Size};
use cropview_core::io::image_io::{load_image, save_png};
use cropview_core::viewer::Viewer;
use tracing::debug;

use crate::summary::{print_export_summary, ExportSummary};

#[derive(Clone, Copy, ValueEnum)]
pub enum AspectArg {
    Free,
    Square,
    #[value(name = "3:4")]
    ThreeByFour,
    #[value(name = "4:3")]
    FourByThree,
    #[value(name = "16:9")]
    SixteenByNine,
}

impl From<AspectArg> for CropAspect {
    fn from(arg: AspectArg) -> Self {
        match arg {
            AspectArg::Free => CropAspect::Free,
            AspectArg::Square => CropAspect::Square,
            AspectArg::ThreeByFour => CropAspect::ThreeByFour,
            AspectArg::FourByThree => CropAspect::FourByThree,
            AspectArg::SixteenByNine => CropAspect::SixteenByNine,
        }
    }
}

#[derive(Args)]
pub struct ExportArgs {
    /// Input image file
    pub file: PathBuf,

    /// Viewport the image is shown in, as WxH
    #[arg(long, value_parser = super::parse_size, required_unless_present = "legacy")]
    pub viewport: Option<Size>,

    /// Viewer config (TOML); flags below override it
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Zoom multiplier relative to the cover fit (export scale with --legacy)
    #[arg(long)]
    pub zoom: Option<f64>,

    /// Pan the image by dx,dy viewport pixels after zooming
    #[arg(long, value_parser = super::parse_offset, allow_hyphen_values = true)]
    pub pan: Option<(f64, f64)>,

    /// Crop rectangle as x,y,w,h (viewport pixels, or native with --legacy)
    #[arg(long, value_parser = super::parse_rect, allow_hyphen_values = true)]
    pub crop: Option<Rect>,

    /// Crop aspect ratio
    #[arg(long, value_enum)]
    pub aspect: Option<AspectArg>,

    /// Clip the export to an ellipse
    #[arg(long)]
    pub circular: bool,

    /// Rotation in degrees, clockwise (legacy export only)
    #[arg(long, allow_hyphen_values = true)]
    pub rotate: Option<f64>,

    /// Crop in native pixels without the pan/zoom transform
    #[arg(long)]
    pub legacy: bool,

    /// Print the PNG data string instead of writing a file
    #[arg(long)]
    pub data_url: bool,

    /// Output PNG (auto-generated if not provided)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

pub fn run(args: &ExportArgs) -> Result<()> {
    let mut config = match args.config {
        Some(ref path) => super::load_config(path)?,
        None => ViewerConfig::default(),
    };
    config.crop_enabled = true;
    if args.legacy {
        config.transform_enabled = false;
    }
    if args.circular {
        config.circular = true;
    }
    if let Some(deg) = args.rotate {
        config.rotation_degrees = deg;
    }
    if let Some(aspect) = args.aspect {
        config.aspect = aspect.into();
    }
    config.validate()?;

    let image = load_image(&args.file)?;
    let natural = Size::from(image.dimensions());
    debug!(path = %args.file.display(), width = natural.width, height = natural.height, "Image loaded");

    let mut viewer = Viewer::new(config);
    if let Some(viewport) = args.viewport {
        viewer.resize(viewport);
    }
    viewer.set_image(Arc::new(image));

    if viewer.config().transform_enabled && !viewer.store().is_fitted() {
        bail!("Viewport is required unless --legacy is given");
    }

    if let Some(zoom) = args.zoom {
        if !(zoom > 0.0 && zoom.is_finite()) {
            bail!("--zoom must be positive, got {zoom}");
        }
        viewer.set_scaling(zoom);
    }
    if let Some((dx, dy)) = args.pan {
        viewer.pan(dx, dy);
    }
    if let Some(rect) = args.crop {
        if viewer.edit_crop(rect).is_none() {
            bail!("Crop is locked by the config");
        }
    }
    viewer.complete_crop();
    debug!(
        transform = ?viewer.transform(),
        crop = ?viewer.native_crop_rect(),
        "Viewer state before export"
    );

    let output = viewer.export_now()?;
    let (w, h) = output.image.dimensions();
    debug!(width = w, height = h, bytes = output.data_url.len(), "Export rendered");

    if args.data_url {
        println!("{}", output.data_url);
        return Ok(());
    }

    let output_path = args
        .output
        .clone()
        .unwrap_or_else(|| export_output_path(&args.file, w, h));
    save_png(&output.image, &output_path)?;

    print_export_summary(&ExportSummary {
        input: &args.file,
        output: &output_path,
        natural,
        viewer: &viewer,
        exported: Size::from(output.image.dimensions()),
    });
    Ok(())
}

fn export_output_path(source: &Path, w: u32, h: u32) -> PathBuf {
    let stem = source
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("output");
    let parent = source.parent().unwrap_or(Path::new("."));
    parent.join(format!("{stem}_crop{w}x{h}.png"))
}
