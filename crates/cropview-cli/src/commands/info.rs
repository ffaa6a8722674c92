use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use cropview_core::geometry::Size;
use cropview_core::io::image_io::load_image;
use cropview_core::viewport::kernel::{center_translation, cover_scale, scale_limits};

use crate::summary::{print_fit_summary, FitSummary};

#[derive(Args)]
pub struct InfoArgs {
    /// Input image file
    pub file: PathBuf,

    /// Viewport to fit the image into, as WxH
    #[arg(long, value_parser = super::parse_size)]
    pub viewport: Option<Size>,
}

pub fn run(args: &InfoArgs) -> Result<()> {
    let image = load_image(&args.file)?;
    let natural = Size::from(image.dimensions());

    let fit = args.viewport.map(|viewport| {
        let scale = cover_scale(viewport, natural);
        let (translate_x, translate_y) = center_translation(viewport, natural, scale);
        FitSummary {
            viewport,
            limits: scale_limits(viewport, natural),
            translate_x,
            translate_y,
        }
    });

    print_fit_summary(&args.file, natural, fit.as_ref());
    Ok(())
}
