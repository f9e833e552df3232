pub mod image_helper {
    use crate::core_modules::grid::grid::Grid;
    use crate::core_modules::serializer::to_byte;
    use image::{GrayImage, ImageEncoder, Luma};
    use std::path::Path;

    /// Converts a grid to an 8-bit grayscale image, one pixel per cell, using
    /// the same value mapping as the serializer.
    pub fn to_luma_image(grid: &Grid) -> GrayImage {
        let size = grid.size() as u32;
        GrayImage::from_fn(size, size, |x, y| {
            Luma([to_byte(grid.at(x as usize, y as usize))])
        })
    }

    /// Writes `grid` as a PNG, each cell blown up to a `scale` x `scale` block.
    pub fn save(
        path: impl AsRef<Path>,
        grid: &Grid,
        scale: u32,
    ) -> Result<(), image::error::ImageError> {
        let cells = to_luma_image(grid);
        let scale = scale.max(1);
        let side = cells.width() * scale;
        let upscaled = GrayImage::from_fn(side, side, |x, y| *cells.get_pixel(x / scale, y / scale));

        let output = std::fs::File::create(path)?;
        let encoder = image::codecs::png::PngEncoder::new(output);
        encoder.write_image(
            upscaled.as_raw(),
            upscaled.width(),
            upscaled.height(),
            image::ExtendedColorType::L8,
        )?;

        Ok(())
    }
}
