use image::{imageops::FilterType, DynamicImage};
use ndarray::Array4;

/// Per-channel BGR mean of the training dataset, subtracted from every input
/// pixel after rescaling to [0, 255].
pub const DEFAULT_MEAN_BGR: [f32; 3] = [104.007, 116.669, 122.679];

/// Default model input edge length.
pub const DEFAULT_INPUT_SIZE: (u32, u32) = (227, 227);

/// Fixed preprocessing pipeline turning a decoded image into the tensor
/// layout the model expects:
///
/// 1. resize to the model input size
/// 2. convert to f32 RGB in [0, 1]
/// 3. rescale to [0, 255]
/// 4. swap channels RGB -> BGR
/// 5. subtract the per-channel mean
/// 6. lay out as NCHW `[1, 3, H, W]`
#[derive(Debug, Clone)]
pub struct Preprocessor {
    width: u32,
    height: u32,
    mean_bgr: [f32; 3],
}

impl Default for Preprocessor {
    fn default() -> Self {
        Self::new(DEFAULT_INPUT_SIZE.0, DEFAULT_INPUT_SIZE.1, DEFAULT_MEAN_BGR)
    }
}

impl Preprocessor {
    pub fn new(width: u32, height: u32, mean_bgr: [f32; 3]) -> Self {
        Self {
            width,
            height,
            mean_bgr,
        }
    }

    pub fn input_size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Produces the `[1, 3, H, W]` BGR input tensor for one image.
    pub fn prepare(&self, img: &DynamicImage) -> Array4<f32> {
        let resized = img.resize_exact(self.width, self.height, FilterType::Triangle);
        let rgb = resized.to_rgb32f();

        let h = self.height as usize;
        let w = self.width as usize;

        // HWC RGB [0,1] -> CHW BGR [0,255] minus per-channel mean
        let mut chw = vec![0.0f32; 3 * h * w];
        for y in 0..h {
            for x in 0..w {
                let pixel = rgb.get_pixel(x as u32, y as u32);
                for c in 0..3 {
                    let value = pixel[2 - c] * 255.0 - self.mean_bgr[c];
                    chw[c * h * w + y * w + x] = value;
                }
            }
        }

        Array4::from_shape_vec((1, 3, h, w), chw)
            .expect("tensor shape matches the buffer length by construction")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};

    fn solid_image(width: u32, height: u32, rgb: [u8; 3]) -> DynamicImage {
        let mut img = RgbImage::new(width, height);
        for pixel in img.pixels_mut() {
            *pixel = Rgb(rgb);
        }
        DynamicImage::ImageRgb8(img)
    }

    #[test]
    fn test_output_shape() {
        let pre = Preprocessor::default();
        let tensor = pre.prepare(&solid_image(64, 48, [0, 0, 0]));
        assert_eq!(tensor.shape(), &[1, 3, 227, 227]);
    }

    #[test]
    fn test_channel_swap_and_mean_subtraction() {
        // Pure red input: after RGB -> BGR the red value lands in channel 2.
        let pre = Preprocessor::new(8, 8, [10.0, 20.0, 30.0]);
        let tensor = pre.prepare(&solid_image(8, 8, [255, 0, 0]));

        let blue = tensor[[0, 0, 0, 0]];
        let green = tensor[[0, 1, 0, 0]];
        let red = tensor[[0, 2, 0, 0]];

        assert!((blue - (0.0 - 10.0)).abs() < 1e-3);
        assert!((green - (0.0 - 20.0)).abs() < 1e-3);
        assert!((red - (255.0 - 30.0)).abs() < 1e-3);
    }

    #[test]
    fn test_rescale_to_0_255() {
        let pre = Preprocessor::new(4, 4, [0.0, 0.0, 0.0]);
        let tensor = pre.prepare(&solid_image(4, 4, [255, 255, 255]));
        for &value in tensor.iter() {
            assert!((value - 255.0).abs() < 1e-3);
        }
    }
}
