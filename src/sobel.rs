use crate::bitmap::{Bitmap, CHANNELS};

const SOBEL_X: [[i32; 3]; 3] = [[-1, 0, 1], [-2, 0, 2], [-1, 0, 1]];
const SOBEL_Y: [[i32; 3]; 3] = [[-1, -2, -1], [0, 0, 0], [1, 2, 1]];

/// Apply the Sobel edge-detection filter to `image` and return the filtered copy. Each channel
/// of each interior pixel becomes the clamped gradient magnitude of its 3x3 neighborhood; the
/// one-pixel border keeps the source values since the kernel does not fit there.
pub fn apply_sobel(image: &Bitmap) -> Bitmap {
    let mut output = image.clone();
    let width = image.width() as usize;
    let height = image.height() as usize;
    if width < 3 || height < 3 {
        return output;
    }
    for row in 1..height - 1 {
        for col in 1..width - 1 {
            for channel in 0..CHANNELS {
                let mut gradient_x = 0i32;
                let mut gradient_y = 0i32;
                for ki in 0..3 {
                    for kj in 0..3 {
                        let value = image.channel(row + ki - 1, col + kj - 1, channel) as i32;
                        gradient_x += value * SOBEL_X[ki][kj];
                        gradient_y += value * SOBEL_Y[ki][kj];
                    }
                }
                let magnitude =
                    ((gradient_x * gradient_x + gradient_y * gradient_y) as f64).sqrt() as i32;
                output.set_channel(row, col, channel, magnitude.clamp(0, 255) as u8);
            }
        }
    }
    output
}
