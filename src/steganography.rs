use crate::config::{EncodeOptions, OverflowPolicy};
use crate::error::{Result, StegoError};
use crate::framing::{Scheme, build_frame, decode_payload};
use crate::pixels::{PixelBuffer, raster_order};
use crate::scan::ScanState;

/// 将文本隐写进像素的最低有效位。
///
/// 帧比特按逐列顺序写入，写完即停止，其余像素保持不变。
/// alpha 方案会先把所有像素的 alpha 置为 255。
///
/// 返回实际写入的比特数。
///
/// # Errors
///
/// * 帧超出图像容量且策略为 [`OverflowPolicy::Reject`] 时返回
///   [`StegoError::CapacityExceeded`]，此时图像未被修改。
/// * 构造帧失败 (压缩失败或载荷过大)。
pub fn write_stealth_text<P>(pixels: &mut P, text: &str, options: &EncodeOptions) -> Result<usize>
where
    P: PixelBuffer + ?Sized,
{
    let frame = build_frame(text, options.compressed, options.scheme)?;
    let available = capacity(pixels, options.scheme);

    if frame.len() > available {
        match options.overflow {
            OverflowPolicy::Reject => {
                return Err(StegoError::CapacityExceeded {
                    required: frame.len(),
                    available,
                });
            }
            OverflowPolicy::Truncate => tracing::warn!(
                required = frame.len(),
                available,
                "payload does not fit, trailing bits are dropped"
            ),
        }
    }

    let (width, height) = (pixels.width(), pixels.height());
    let mut written = 0;
    match options.scheme {
        Scheme::Alpha => {
            pixels.force_opaque();
            for ((x, y), &bit) in raster_order(width, height).zip(frame.iter()) {
                let mut channels = pixels.get(x, y);
                channels[3] = with_lsb(channels[3], bit);
                pixels.set(x, y, channels);
                written += 1;
            }
        }
        Scheme::Rgb => {
            let groups = frame.chunks(Scheme::Rgb.bits_per_pixel());
            for ((x, y), group) in raster_order(width, height).zip(groups) {
                let mut channels = pixels.get(x, y);
                // 最后一个像素可能只剩 1 或 2 bits，G/B 保持原样
                for (channel, &bit) in group.iter().enumerate() {
                    channels[channel] = with_lsb(channels[channel], bit);
                }
                pixels.set(x, y, channels);
                written += group.len();
            }
        }
    }

    tracing::info!(scheme = %options.scheme, compressed = options.compressed, bits = written, "stealth text embedded");
    Ok(written)
}

/// 从像素中读取隐写文本。
///
/// 没有签名、图像在载荷读完前结束、或载荷无法解码时都返回空字符串。
pub fn read_stealth_text<P>(pixels: &P) -> String
where
    P: PixelBuffer + ?Sized,
{
    let mut state = ScanState::new(pixels.has_alpha());
    for (x, y) in raster_order(pixels.width(), pixels.height()) {
        state = state.step(pixels.get(x, y));
        if state.is_terminal() {
            break;
        }
    }

    match state {
        ScanState::Done { signature, bits } => decode_payload(&bits, signature.compressed)
            .unwrap_or_else(|err| {
                tracing::debug!(error = %err, "embedded payload could not be decoded");
                String::new()
            }),
        ScanState::Rejected => String::new(),
        _ => {
            tracing::debug!("image ended before the payload was complete");
            String::new()
        }
    }
}

/// 指定方案下图像可容纳的比特数。
pub fn capacity<P>(pixels: &P, scheme: Scheme) -> usize
where
    P: PixelBuffer + ?Sized,
{
    pixels.width() as usize * pixels.height() as usize * scheme.bits_per_pixel()
}

fn with_lsb(value: u8, bit: bool) -> u8 {
    (value & 0xFE) | u8::from(bit)
}
