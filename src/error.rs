//! # 错误类型模块
//!
//! 库内部使用 `thiserror` 定义的结构化错误，二进制入口再用 `anyhow` 附加上下文。

use std::io;
use std::string::FromUtf8Error;

use thiserror::Error;

/// 隐写写入与图像读写过程中可能出现的错误。
#[derive(Debug, Error)]
pub enum StegoError {
    /// 载荷所需的比特数超过了图像可用的 LSB 位置。
    #[error("not enough space in the image: required {required} bits, available {available} bits")]
    CapacityExceeded { required: usize, available: usize },

    /// 载荷的比特长度无法放入 32 位长度字段。
    #[error("payload of {bits} bits does not fit the 32-bit length field")]
    PayloadTooLarge { bits: usize },

    /// gzip 压缩失败。
    #[error("failed to compress payload: {0}")]
    Compression(#[source] io::Error),

    #[error("image I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("PNG decoding error: {0}")]
    PngDecode(#[from] png::DecodingError),

    #[error("PNG encoding error: {0}")]
    PngEncode(#[from] png::EncodingError),

    /// 像素数据与声明的尺寸或颜色类型不一致。
    #[error("unsupported pixel layout: {0}")]
    UnsupportedLayout(String),
}

/// 从比特流还原文本时的错误。
///
/// 调用方把它视为"没有载荷"，不会向上传播。
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("corrupt gzip stream: {0}")]
    Decompress(#[source] io::Error),

    #[error("decompressed payload is not valid UTF-8: {0}")]
    InvalidUtf8(#[from] FromUtf8Error),
}

pub type Result<T> = std::result::Result<T, StegoError>;
