use crate::error::{Error, Result};
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

/// Bytes in the fixed BMP header this codec understands.
const HEADER_SIZE: usize = 54;

/// Color channels per pixel.
pub const CHANNELS: usize = 3;

const OFFSET_WIDTH: usize = 18;
const OFFSET_HEIGHT: usize = 22;
const OFFSET_BPP: usize = 28;

/// The `Bitmap` struct holds a 24-bit uncompressed bitmap image: the 54-byte header exactly as
/// it appeared on disk plus the pixel channels with row padding stripped. Rows are stored in
/// file order and addressed as row 0 first; the trace generator and the edge filter only care
/// about dimensions and channel values, not display orientation.
#[derive(Debug, Clone)]
pub struct Bitmap {
    header: [u8; HEADER_SIZE],
    pixels: Vec<u8>,
    width: u32,
    height: u32,
}

impl Bitmap {
    /// Create a blank image of the given dimensions with a synthesized header. Pixels start
    /// black.
    pub fn build(width: u32, height: u32) -> Self {
        let mut header = [0u8; HEADER_SIZE];
        let row_bytes = width as usize * CHANNELS;
        let padding = Self::row_padding(width);
        let image_size = (row_bytes + padding) * height as usize;
        header[0..2].copy_from_slice(b"BM");
        header[2..6].copy_from_slice(&((HEADER_SIZE + image_size) as u32).to_le_bytes());
        header[10..14].copy_from_slice(&(HEADER_SIZE as u32).to_le_bytes());
        header[14..18].copy_from_slice(&40u32.to_le_bytes());
        header[OFFSET_WIDTH..OFFSET_WIDTH + 4].copy_from_slice(&width.to_le_bytes());
        header[OFFSET_HEIGHT..OFFSET_HEIGHT + 4].copy_from_slice(&height.to_le_bytes());
        header[26..28].copy_from_slice(&1u16.to_le_bytes());
        header[OFFSET_BPP..OFFSET_BPP + 2].copy_from_slice(&24u16.to_le_bytes());
        header[34..38].copy_from_slice(&(image_size as u32).to_le_bytes());
        Self {
            header,
            pixels: vec![0; row_bytes * height as usize],
            width,
            height,
        }
    }

    /// Decode the image at `path`.
    ///
    /// # Errors
    ///
    /// Fails with an I/O error when the file is missing or truncated, and with a bitmap error
    /// when the header is not a 24-bit BM image or declares a zero dimension.
    pub fn read(path: &Path) -> Result<Self> {
        let mut reader = BufReader::new(File::open(path)?);
        let mut header = [0u8; HEADER_SIZE];
        reader.read_exact(&mut header)?;
        if &header[0..2] != b"BM" {
            return Err(Error::Bitmap(String::from("missing BM magic")));
        }
        let bits_per_pixel = u16::from_le_bytes([header[OFFSET_BPP], header[OFFSET_BPP + 1]]);
        if bits_per_pixel != 24 {
            return Err(Error::Bitmap(format!(
                "unsupported bits per pixel: {}",
                bits_per_pixel
            )));
        }
        let width = u32::from_le_bytes([
            header[OFFSET_WIDTH],
            header[OFFSET_WIDTH + 1],
            header[OFFSET_WIDTH + 2],
            header[OFFSET_WIDTH + 3],
        ]);
        let height = u32::from_le_bytes([
            header[OFFSET_HEIGHT],
            header[OFFSET_HEIGHT + 1],
            header[OFFSET_HEIGHT + 2],
            header[OFFSET_HEIGHT + 3],
        ]);
        if width == 0 || height == 0 {
            return Err(Error::Bitmap(format!(
                "image has a zero dimension: {}x{}",
                width, height
            )));
        }

        let row_bytes = width as usize * CHANNELS;
        let padding = Self::row_padding(width);
        let mut pixels = vec![0; row_bytes * height as usize];
        let mut pad = [0u8; 4];
        for row in 0..height as usize {
            reader.read_exact(&mut pixels[row * row_bytes..(row + 1) * row_bytes])?;
            reader.read_exact(&mut pad[..padding])?;
        }
        Ok(Self {
            header,
            pixels,
            width,
            height,
        })
    }

    /// Encode the image at `path`, re-emitting the stored header and re-padding each row.
    pub fn write(&self, path: &Path) -> Result<()> {
        let mut writer = BufWriter::new(File::create(path)?);
        writer.write_all(&self.header)?;
        let row_bytes = self.width as usize * CHANNELS;
        let pad = [0u8; 4];
        let padding = Self::row_padding(self.width);
        for row in 0..self.height as usize {
            writer.write_all(&self.pixels[row * row_bytes..(row + 1) * row_bytes])?;
            writer.write_all(&pad[..padding])?;
        }
        writer.flush()?;
        Ok(())
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// One channel value of one pixel. Channels are indexed 0..3 in stored order.
    pub fn channel(&self, row: usize, col: usize, channel: usize) -> u8 {
        self.pixels[self.index(row, col, channel)]
    }

    pub fn set_channel(&mut self, row: usize, col: usize, channel: usize, value: u8) {
        let index = self.index(row, col, channel);
        self.pixels[index] = value;
    }

    fn index(&self, row: usize, col: usize, channel: usize) -> usize {
        (row * self.width as usize + col) * CHANNELS + channel
    }

    /// Rows are padded out to 4-byte multiples on disk.
    fn row_padding(width: u32) -> usize {
        (4 - (width as usize * CHANNELS) % 4) % 4
    }
}

#[cfg(test)]
mod tests {

    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn patterned(width: u32, height: u32) -> Bitmap {
        let mut image = Bitmap::build(width, height);
        for row in 0..height as usize {
            for col in 0..width as usize {
                for channel in 0..CHANNELS {
                    let value = (row * 31 + col * 7 + channel) as u8;
                    image.set_channel(row, col, channel, value);
                }
            }
        }
        image
    }

    #[cfg(test)]
    mod bitmap_tests {

        use super::*;

        #[test]
        fn build() {
            let image = Bitmap::build(3, 2);
            assert_eq!(image.width(), 3);
            assert_eq!(image.height(), 2);
            assert_eq!(image.channel(1, 2, 1), 0);
        }

        #[test]
        fn channel_round_trip() {
            let mut image = Bitmap::build(2, 2);
            image.set_channel(1, 0, 2, 0xAB);
            assert_eq!(image.channel(1, 0, 2), 0xAB);
            assert_eq!(image.channel(1, 0, 1), 0);
        }

        #[test]
        fn file_round_trip_with_padding() {
            // widths 2, 3, 4 exercise paddings 2, 3, 0
            let dir = TempDir::new().unwrap();
            for width in [2u32, 3, 4] {
                let path = dir.path().join(format!("img{}.bmp", width));
                let image = patterned(width, 3);
                image.write(&path).unwrap();

                let decoded = Bitmap::read(&path).unwrap();
                assert_eq!(decoded.width(), width);
                assert_eq!(decoded.height(), 3);
                assert_eq!(decoded.pixels, image.pixels);
                assert_eq!(decoded.header, image.header);
            }
        }

        #[test]
        fn rejects_missing_magic() {
            let dir = TempDir::new().unwrap();
            let path = dir.path().join("bad.bmp");
            fs::write(&path, vec![0u8; 128]).unwrap();
            assert!(matches!(Bitmap::read(&path), Err(Error::Bitmap(_))));
        }

        #[test]
        fn rejects_unsupported_depth() {
            let dir = TempDir::new().unwrap();
            let path = dir.path().join("deep.bmp");
            patterned(2, 2).write(&path).unwrap();

            let mut bytes = fs::read(&path).unwrap();
            bytes[OFFSET_BPP] = 32;
            fs::write(&path, bytes).unwrap();
            assert!(matches!(Bitmap::read(&path), Err(Error::Bitmap(_))));
        }

        #[test]
        fn rejects_zero_dimension() {
            let dir = TempDir::new().unwrap();
            let path = dir.path().join("flat.bmp");
            patterned(2, 2).write(&path).unwrap();

            let mut bytes = fs::read(&path).unwrap();
            bytes[OFFSET_WIDTH..OFFSET_WIDTH + 4].copy_from_slice(&0u32.to_le_bytes());
            fs::write(&path, bytes).unwrap();
            assert!(matches!(Bitmap::read(&path), Err(Error::Bitmap(_))));
        }

        #[test]
        fn truncated_pixels_is_io_error() {
            let dir = TempDir::new().unwrap();
            let path = dir.path().join("cut.bmp");
            patterned(4, 4).write(&path).unwrap();

            let bytes = fs::read(&path).unwrap();
            fs::write(&path, &bytes[..bytes.len() - 8]).unwrap();
            assert!(matches!(Bitmap::read(&path), Err(Error::Io(_))));
        }

        #[test]
        fn missing_file_is_io_error() {
            let dir = TempDir::new().unwrap();
            assert!(matches!(
                Bitmap::read(&dir.path().join("absent.bmp")),
                Err(Error::Io(_))
            ));
        }
    }
}
