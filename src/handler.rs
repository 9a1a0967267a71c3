//! # 命令处理逻辑模块
//!
//! 协调图像读写、隐写解码、元数据回退和重新隐写。

use crate::cli::Cli;
use crate::codec::ImageCodec;
use crate::config::{CodecOptions, EncodeOptions};
use crate::constants::PARAMETERS_KEY;
use crate::error::StegoError;
use crate::steganography::{read_stealth_text, write_stealth_text};
use anyhow::{Context, Result};
use colored::Colorize;
use std::path::Path;

/// 处理一次命令行调用，返回应当打印的文本 (可能为空)。
///
/// 先尝试从像素中解码隐写文本；为空时回退到 PNG 文本元数据。
/// 回退得到文本且不是只读模式时，把文本以隐写方式写回 PNG 图像。
///
/// # Arguments
///
/// * `args` - 解析后的命令行参数。
///
/// # Errors
///
/// 如果发生以下任一情况，将返回错误：
/// * 无法读取或解码输入图像。
/// * 重新隐写后无法写入目标图像 (容量不足除外，只记录警告)。
pub fn handle_info(args: &Cli) -> Result<String> {
    let codec = ImageCodec::new(CodecOptions {
        tolerate_truncated: !args.strict,
    });

    let raster = codec.open(&args.image).with_context(|| {
        format!(
            "Unable to read image file: {}",
            args.image.to_string_lossy().red().bold()
        )
    })?;

    let text = read_stealth_text(&raster);
    if !text.is_empty() {
        return Ok(text);
    }

    let Some(text) = codec.read_text_metadata(&args.image) else {
        tracing::debug!(path = %args.image.display(), "no stealth payload and no text metadata");
        return Ok(String::new());
    };

    if !args.is_read_only() {
        let dest = args.dest.as_deref().unwrap_or(&args.image);
        let options = EncodeOptions::new(args.scheme, args.compress);
        embed_text(&codec, &args.image, dest, &text, &options)?;
    }

    Ok(text)
}

/// 把文本隐写进 `source` 的像素并保存到 `dest`，同时写入 `parameters` 文本块。
///
/// 只处理 `.png` 目标；容量不足时保持文件不变。
fn embed_text(
    codec: &ImageCodec,
    source: &Path,
    dest: &Path,
    text: &str,
    options: &EncodeOptions,
) -> Result<()> {
    let is_png = dest
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("png"));
    if !is_png {
        tracing::debug!(path = %dest.display(), "stealth text is only written to PNG files");
        return Ok(());
    }

    let mut raster = codec.open(source).with_context(|| {
        format!(
            "Unable to reopen image file: {}",
            source.to_string_lossy().red().bold()
        )
    })?;

    match write_stealth_text(&mut raster, text, options) {
        Ok(_) => {}
        Err(err @ StegoError::CapacityExceeded { .. }) => {
            tracing::warn!(path = %source.display(), error = %err, "image left unchanged");
            return Ok(());
        }
        Err(err) => {
            return Err(err).context("Failed to hide the text in the image.");
        }
    }

    codec
        .save(&raster, dest, Some((PARAMETERS_KEY, text)))
        .with_context(|| {
            format!(
                "Unable to write to target image file: {}",
                dest.to_string_lossy().red().bold()
            )
        })
}
