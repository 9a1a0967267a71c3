//! # 压缩适配模块
//!
//! `*comp` 签名对应的载荷是 gzip 格式，这里是对 `flate2` 的一层薄封装。

use flate2::Compression;
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use std::io::{self, Read, Write};

/// 将字节压缩为 gzip 流。
///
/// gzip 头部的 mtime 固定为 0，同样的输入总是得到同样的输出。
pub fn compress(data: &[u8]) -> io::Result<Vec<u8>> {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(data)?;
    encoder.finish()
}

/// 解压完整的 gzip 流。
pub fn decompress(data: &[u8]) -> io::Result<Vec<u8>> {
    let mut decoder = GzDecoder::new(data);
    let mut out = Vec::new();
    decoder.read_to_end(&mut out)?;
    Ok(out)
}
