//! Histogram equalization of 8-bit images.
//!
//! Each pixel value `v` is remapped through the cumulative histogram:
//! `round((cdf[v] - cdf_min) / (N - cdf_min) * color_max)`, where `cdf_min` is
//! the count of the darkest value present and `N` the pixel count.

use ndarray::Array2;

/// Equalized copy of `image`, same shape.
///
/// A constant image has no contrast to spread and is returned unchanged.
pub fn equalize(image: &Array2<u8>, color_max: u8) -> Array2<u8> {
    let mut histogram = [0usize; 256];
    for &v in image.iter() {
        histogram[usize::from(v)] += 1;
    }

    let mut cdf = [0usize; 256];
    let mut running = 0usize;
    for (slot, count) in cdf.iter_mut().zip(histogram.iter()) {
        running += count;
        *slot = running;
    }

    let total = image.len();
    let Some(cdf_min) = cdf.iter().copied().find(|&c| c > 0) else {
        return image.clone();
    };
    if total == cdf_min {
        return image.clone();
    }

    let span = (total - cdf_min) as f64;
    let top = f64::from(color_max);
    let lut: Vec<u8> = cdf
        .iter()
        .map(|&c| {
            let level = c.saturating_sub(cdf_min) as f64 / span * top;
            level.round().clamp(0.0, top) as u8
        })
        .collect();
    image.mapv(|v| lut[usize::from(v)])
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn flat_histogram_is_a_fixed_point() {
        let values: Vec<u8> = (0..=255u8).flat_map(|v| [v, v]).collect();
        let image = Array2::from_shape_vec((16, 32), values).unwrap();
        let once = equalize(&image, 255);
        assert_eq!(once, image);
        assert_eq!(equalize(&once, 255), once);
    }

    #[test]
    fn spreads_clustered_values() {
        let image = array![[10, 10], [11, 12]];
        let out = equalize(&image, 255);
        assert_eq!(out, array![[0, 0], [128, 255]]);
    }

    #[test]
    fn constant_and_empty_images_are_unchanged() {
        let constant = Array2::from_elem((4, 5), 7u8);
        assert_eq!(equalize(&constant, 255), constant);
        let empty = Array2::<u8>::zeros((0, 3));
        assert_eq!(equalize(&empty, 255).dim(), (0, 3));
    }

    #[test]
    fn preserves_dimensions_and_range() {
        let image = Array2::from_shape_fn((7, 13), |(r, c)| ((r * c) % 40) as u8);
        let out = equalize(&image, 100);
        assert_eq!(out.dim(), image.dim());
        assert!(out.iter().all(|&v| v <= 100));
        assert_eq!(out.iter().copied().max(), Some(100));
        assert_eq!(out.iter().copied().min(), Some(0));
    }
}
