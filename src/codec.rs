//! # 图像文件读写模块
//!
//! 负责把图像文件加载为 [`Raster`]、把结果保存回磁盘，以及读取 PNG 原生文本元数据。
//! 隐写核心不直接接触文件字节，只在这里与文件格式打交道。

use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use image::{ImageFormat, ImageReader, RgbaImage};

use crate::config::CodecOptions;
use crate::constants::METADATA_KEYS;
use crate::error::{Result, StegoError};
use crate::pixels::{PixelBuffer, Raster};

/// 图像文件的加载与保存。
#[derive(Debug, Clone, Copy, Default)]
pub struct ImageCodec {
    options: CodecOptions,
}

impl ImageCodec {
    pub fn new(options: CodecOptions) -> Self {
        Self { options }
    }

    /// 加载图像，归一化为 8 位 RGBA。
    ///
    /// PNG 由 `png` 解码器处理，在 `tolerate_truncated` 打开时可以容忍数据截断；
    /// 其它格式交给 `image` 处理。
    ///
    /// # Errors
    ///
    /// 文件无法读取、格式不受支持或图像数据损坏时返回错误。
    pub fn open(&self, path: &Path) -> Result<Raster> {
        let reader = ImageReader::open(path)?.with_guessed_format()?;
        if reader.format() == Some(ImageFormat::Png) {
            return self.open_png(path);
        }
        Ok(Raster::from_dynamic(reader.decode()?))
    }

    fn open_png(&self, path: &Path) -> Result<Raster> {
        let mut decoder = png::Decoder::new(BufReader::new(File::open(path)?));
        decoder.set_transformations(png::Transformations::EXPAND | png::Transformations::STRIP_16);
        let mut reader = decoder.read_info()?;

        let mut samples = vec![0; reader.output_buffer_size()];
        if let Err(err) = reader.next_frame(&mut samples) {
            if !self.options.tolerate_truncated {
                return Err(err.into());
            }
            tracing::warn!(
                path = %path.display(),
                error = %err,
                "image data is truncated, missing pixels are left blank"
            );
        }

        let (color, _) = reader.output_color_type();
        let info = reader.info();
        raster_from_samples(info.width, info.height, color, &samples)
    }

    /// 保存图像。
    ///
    /// 目标为 PNG 时用 `png` 编码器写入，并可附带一个文本块；
    /// 非 Latin-1 文本会写成 iTXt 块。其它格式由 `image` 按扩展名保存，不带文本。
    pub fn save(&self, raster: &Raster, path: &Path, text: Option<(&str, &str)>) -> Result<()> {
        if ImageFormat::from_path(path).ok() != Some(ImageFormat::Png) {
            if text.is_some() {
                tracing::warn!(path = %path.display(), "text metadata is only written to PNG files");
            }
            raster.to_dynamic().save(path)?;
            return Ok(());
        }

        let file = BufWriter::new(File::create(path)?);
        let mut encoder = png::Encoder::new(file, raster.width(), raster.height());
        encoder.set_color(if raster.has_alpha() {
            png::ColorType::Rgba
        } else {
            png::ColorType::Rgb
        });
        encoder.set_depth(png::BitDepth::Eight);

        if let Some((keyword, value)) = text {
            if value.chars().all(|c| u32::from(c) <= 0xFF) {
                encoder.add_text_chunk(keyword.to_owned(), value.to_owned())?;
            } else {
                encoder.add_itxt_chunk(keyword.to_owned(), value.to_owned())?;
            }
        }

        let mut writer = encoder.write_header()?;
        writer.write_image_data(&raster.samples())?;
        writer.finish()?;
        Ok(())
    }

    /// 读取图像的原生文本元数据。
    ///
    /// 依次尝试 `parameters`、`prompt`、`Comment`，返回第一个存在的值。
    /// 非 PNG 文件、没有文本块或读取失败时都返回 `None`。
    pub fn read_text_metadata(&self, path: &Path) -> Option<String> {
        match read_png_text(path) {
            Ok(value) => value,
            Err(err) => {
                tracing::debug!(path = %path.display(), error = %err, "no readable text metadata");
                None
            }
        }
    }
}

fn read_png_text(path: &Path) -> Result<Option<String>> {
    let mut decoder = png::Decoder::new(BufReader::new(File::open(path)?));
    decoder.set_ignore_text_chunk(false);
    let mut reader = decoder.read_info()?;

    // IDAT 之后的文本块要等像素读完才会出现在 info 里
    let mut samples = vec![0; reader.output_buffer_size()];
    if reader.next_frame(&mut samples).is_ok() {
        if let Err(err) = reader.finish() {
            tracing::debug!(error = %err, "trailing chunks could not be read");
        }
    }

    let info = reader.info();
    let mut entries: Vec<(String, String)> = info
        .uncompressed_latin1_text
        .iter()
        .map(|chunk| (chunk.keyword.clone(), chunk.text.clone()))
        .collect();
    entries.extend(
        info.compressed_latin1_text
            .iter()
            .filter_map(|chunk| Some((chunk.keyword.clone(), chunk.get_text().ok()?))),
    );
    entries.extend(
        info.utf8_text
            .iter()
            .filter_map(|chunk| Some((chunk.keyword.clone(), chunk.get_text().ok()?))),
    );

    Ok(METADATA_KEYS.iter().find_map(|key| {
        entries
            .iter()
            .find(|(keyword, _)| keyword == key)
            .map(|(_, value)| value.clone())
    }))
}

fn raster_from_samples(width: u32, height: u32, color: png::ColorType, samples: &[u8]) -> Result<Raster> {
    let (channels, has_alpha) = match color {
        png::ColorType::Grayscale => (1, false),
        png::ColorType::GrayscaleAlpha => (2, true),
        png::ColorType::Rgb => (3, false),
        png::ColorType::Rgba => (4, true),
        png::ColorType::Indexed => {
            return Err(StegoError::UnsupportedLayout(
                "indexed colour was not expanded".to_string(),
            ));
        }
    };

    let rgba: Vec<u8> = samples
        .chunks_exact(channels)
        .flat_map(|px| match channels {
            1 => [px[0], px[0], px[0], 255],
            2 => [px[0], px[0], px[0], px[1]],
            3 => [px[0], px[1], px[2], 255],
            _ => [px[0], px[1], px[2], px[3]],
        })
        .collect();

    let pixels = RgbaImage::from_raw(width, height, rgba).ok_or_else(|| {
        StegoError::UnsupportedLayout(format!(
            "{} samples do not describe a {width}x{height} {color:?} image",
            samples.len()
        ))
    })?;
    Ok(Raster::new(pixels, has_alpha))
}
