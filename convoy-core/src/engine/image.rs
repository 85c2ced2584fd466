// ============================================================================
// convoy-core/src/engine/image.rs
// ============================================================================
//
// IMAGE ENGINE: Still Image Conversion With the image Crate
//
// Decodes the source, re-encodes it in the target format and writes it to
// the resolved output path. JPEG takes the quality level of the job; every
// other target (WebP included) is encoded losslessly and ignores it. Image jobs have no phases, so no
// progress events are reported; the file bar completes when the job ends.

// ---- Internal crate imports ----
use crate::engine::TranscodeEngine;
use crate::error::{CoreError, CoreResult};
use crate::job::ConversionJob;
use crate::progress::PhaseEvent;

// ---- External crate imports ----
use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, ImageFormat};

// ---- Standard library imports ----
use std::fs::{self, File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::Path;

/// JPEG quality when a job carries none.
const DEFAULT_JPEG_QUALITY: u8 = 90;

#[derive(Debug, Clone, Copy, Default)]
pub struct ImageEngine;

impl ImageEngine {
    pub fn new() -> Self {
        Self
    }

    fn encode(image: &DynamicImage, format: ImageFormat, quality: u8, writer: &mut BufWriter<File>) -> CoreResult<()> {
        match format {
            ImageFormat::Jpeg => {
                let encoder = JpegEncoder::new_with_quality(&mut *writer, quality);
                image.to_rgb8().write_with_encoder(encoder)?;
            }
            ImageFormat::Png => image.write_to(&mut *writer, format)?,
            // The TIFF encoder has no gray+alpha layout.
            ImageFormat::Tiff => match image {
                DynamicImage::ImageLumaA8(_) => {
                    DynamicImage::ImageRgba8(image.to_rgba8()).write_to(&mut *writer, format)?
                }
                DynamicImage::ImageLumaA16(_) => {
                    DynamicImage::ImageRgba16(image.to_rgba16()).write_to(&mut *writer, format)?
                }
                _ => image.write_to(&mut *writer, format)?,
            },
            // These encoders only take 8-bit buffers.
            _ => DynamicImage::ImageRgba8(image.to_rgba8()).write_to(&mut *writer, format)?,
        }
        writer.flush()?;
        Ok(())
    }
}

impl TranscodeEngine for ImageEngine {
    fn transcode(
        &self,
        job: &ConversionJob,
        output: &Path,
        _progress: &mut dyn FnMut(PhaseEvent),
    ) -> CoreResult<()> {
        let format = ImageFormat::from_extension(job.target_format()).ok_or_else(|| {
            CoreError::Engine(format!("no image encoder for '{}'", job.target_format()))
        })?;

        let image = image::open(job.source_path())?;
        log::debug!(
            "Decoded {} ({}x{}), encoding as {:?}",
            job.source_path().display(),
            image.width(),
            image.height(),
            format
        );

        let file = OpenOptions::new().write(true).create_new(true).open(output)?;
        let mut writer = BufWriter::new(file);
        let quality = job.quality().unwrap_or(DEFAULT_JPEG_QUALITY);
        if format != ImageFormat::Jpeg {
            if let Some(level) = job.quality() {
                log::debug!("Quality {level} has no effect on lossless {:?} output", format);
            }
        }

        if let Err(e) = Self::encode(&image, format, quality, &mut writer) {
            drop(writer);
            if let Err(remove_err) = fs::remove_file(output) {
                log::warn!("Failed to remove partial output {}: {}", output.display(), remove_err);
            }
            return Err(e);
        }
        Ok(())
    }
}
