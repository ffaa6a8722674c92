use image::RgbaImage;

/// Convert an RGBA8 bitmap to an egui ColorImage.
pub fn rgba_to_color_image(image: &RgbaImage) -> egui::ColorImage {
    let size = [image.width() as usize, image.height() as usize];
    egui::ColorImage::from_rgba_unmultiplied(size, image.as_raw())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    #[test]
    fn test_rgba_to_color_image_size_and_pixels() {
        let mut img = RgbaImage::new(3, 2);
        img.put_pixel(2, 1, Rgba([10, 20, 30, 255]));
        let color = rgba_to_color_image(&img);
        assert_eq!(color.size, [3, 2]);
        assert_eq!(color.pixels[5], egui::Color32::from_rgb(10, 20, 30));
    }
}
