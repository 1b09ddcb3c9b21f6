/* Copyright 2020 @TwoCookingMice */

use crate::math::bitmap::Bitmap;

use exr::prelude::*;

/// Writes the film as a linear RGB OpenEXR image.
pub fn write_exr_to_file(image: &Bitmap, file_path: &str) -> std::result::Result<(), Error> {
    log::info!("Starting writing openexr images: {}.", file_path);

    let pixels = image.raw_copy();
    let width = image.width();
    write_rgb_file(file_path, width, image.height(), |x, y| {
        (
            pixels[y * width + x].0,
            pixels[y * width + x].1,
            pixels[y * width + x].2
        )
    })?;

    log::info!("EXR written to: {}.", file_path);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::constants::{Vector2f, Vector3f};

    #[test]
    fn test_write_exr() {
        let mut image = Bitmap::new(3, 2);
        image.add_color(&Vector2f::new(1.5, 0.5), &Vector3f::new(0.25, 0.5, 1.0));

        let path = std::env::temp_dir().join(format!("lightpath_exr_test_{}.exr", std::process::id()));
        let path_str = path.to_string_lossy().to_string();
        assert!(write_exr_to_file(&image, &path_str).is_ok());

        let metadata = std::fs::metadata(&path).expect("written file");
        assert!(metadata.len() > 0);
        let _ = std::fs::remove_file(&path);
    }
}
