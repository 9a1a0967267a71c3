//! # stealth_pnginfo 库
//!
//! 在图像像素的最低有效位中隐藏和恢复文本 (通常是图像生成参数)。
//!
//! 编码路径：文本 → [`framing::build_frame`] → [`steganography::write_stealth_text`]。
//! 解码路径：[`steganography::read_stealth_text`] 驱动 [`scan::ScanState`] 逐像素识别签名、
//! 长度和载荷，最后由 [`framing::decode_payload`] 还原文本。

// 声明库包含的所有模块。

pub mod cli;
pub mod codec;
pub mod compression;
pub mod config;
pub mod constants;
pub mod error;
pub mod framing;
pub mod handler;
pub mod logging;
pub mod pixels;
pub mod scan;
pub mod steganography;
