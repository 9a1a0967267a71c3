//! # 比特流帧模块
//!
//! 负责帧结构的比特级序列化与解析，与像素映射方式无关。
//!
//! ```text
//! [120 bits] 签名 (15 字节 ASCII，每字节高位在前)
//! [ 32 bits] 载荷长度 (单位为 bit，高位在前)
//! [ N  bits] 载荷 (UTF-8 文本或其 gzip 压缩结果，每字节高位在前)
//! ```

use std::fmt;

use clap::ValueEnum;

use crate::compression::{compress, decompress};
use crate::constants::{
    LENGTH_BITS, SIGNATURE_BITS, TAG_ALPHA_COMP, TAG_ALPHA_INFO, TAG_RGB_COMP, TAG_RGB_INFO,
};
use crate::error::{DecodeError, Result, StegoError};

/// 承载载荷的通道方案。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Scheme {
    /// 每个像素 1 bit，写入 alpha 通道的最低位。
    #[default]
    Alpha,
    /// 每个像素最多 3 bits，依次写入 R、G、B 的最低位。
    Rgb,
}

impl Scheme {
    /// 每个像素可承载的比特数。
    pub fn bits_per_pixel(self) -> usize {
        match self {
            Scheme::Alpha => 1,
            Scheme::Rgb => crate::constants::RGB_BITS_PER_PIXEL,
        }
    }
}

impl fmt::Display for Scheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scheme::Alpha => f.write_str("alpha"),
            Scheme::Rgb => f.write_str("rgb"),
        }
    }
}

/// 签名所标识的 (方案, 是否压缩) 组合。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Signature {
    pub scheme: Scheme,
    pub compressed: bool,
}

impl Signature {
    pub fn new(scheme: Scheme, compressed: bool) -> Self {
        Self { scheme, compressed }
    }

    /// 对应的 15 字节 ASCII 标记。
    pub fn tag(self) -> &'static [u8; 15] {
        match (self.scheme, self.compressed) {
            (Scheme::Alpha, false) => TAG_ALPHA_INFO,
            (Scheme::Alpha, true) => TAG_ALPHA_COMP,
            (Scheme::Rgb, false) => TAG_RGB_INFO,
            (Scheme::Rgb, true) => TAG_RGB_COMP,
        }
    }

    fn all() -> [Signature; 4] {
        [
            Signature::new(Scheme::Alpha, false),
            Signature::new(Scheme::Alpha, true),
            Signature::new(Scheme::Rgb, false),
            Signature::new(Scheme::Rgb, true),
        ]
    }
}

/// 构造完整的帧比特序列：签名 + 长度 + 载荷。
///
/// 长度字段记录的是 (可能经过压缩的) 载荷的比特数。
///
/// # Errors
///
/// * gzip 压缩失败。
/// * 载荷比特数超过 `u32::MAX`。
pub fn build_frame(plaintext: &str, compressed: bool, scheme: Scheme) -> Result<Vec<bool>> {
    let signature = Signature::new(scheme, compressed);
    let payload = if compressed {
        compress(plaintext.as_bytes()).map_err(StegoError::Compression)?
    } else {
        plaintext.as_bytes().to_vec()
    };

    let payload_bits = payload.len() * 8;
    let length = u32::try_from(payload_bits)
        .map_err(|_| StegoError::PayloadTooLarge { bits: payload_bits })?;

    let mut bits = Vec::with_capacity(SIGNATURE_BITS + LENGTH_BITS + payload_bits);
    signature.tag().iter().for_each(|&byte| push_bits(&mut bits, byte.into(), 8));
    push_bits(&mut bits, length, LENGTH_BITS);
    payload.iter().for_each(|&byte| push_bits(&mut bits, byte.into(), 8));

    Ok(bits)
}

/// 将 120 bits 解析为已知签名之一。
///
/// 按 UTF-8 宽松解码后与四个标记比较，无法识别时返回 `None`，从不报错。
pub fn parse_signature(bits: &[bool]) -> Option<Signature> {
    if bits.len() != SIGNATURE_BITS {
        return None;
    }
    let bytes = bits_to_bytes(bits);
    let decoded = String::from_utf8_lossy(&bytes);
    Signature::all()
        .into_iter()
        .find(|signature| decoded.as_bytes() == signature.tag())
}

/// 将 32 bits 按大端序解析为长度。
pub fn parse_length(bits: &[bool]) -> u32 {
    bits.iter()
        .take(LENGTH_BITS)
        .fold(0u32, |acc, &bit| (acc << 1) | u32::from(bit))
}

/// 将载荷比特还原为文本。
///
/// 不足 8 bits 的尾部分组会被丢弃。未压缩时按 UTF-8 宽松解码，
/// 非法序列替换为 U+FFFD；压缩时先 gzip 解压，再严格按 UTF-8 解码。
pub fn decode_payload(bits: &[bool], compressed: bool) -> std::result::Result<String, DecodeError> {
    let bytes = bits_to_bytes(bits);
    if compressed {
        let inflated = decompress(&bytes).map_err(DecodeError::Decompress)?;
        Ok(String::from_utf8(inflated)?)
    } else {
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }
}

fn push_bits(bits: &mut Vec<bool>, value: u32, count: usize) {
    bits.extend((0..count).rev().map(|shift| (value >> shift) & 1 == 1));
}

fn bits_to_bytes(bits: &[bool]) -> Vec<u8> {
    bits.chunks_exact(8)
        .map(|group| group.iter().fold(0u8, |acc, &bit| (acc << 1) | u8::from(bit)))
        .collect()
}
