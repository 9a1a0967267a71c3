//! # 配置模块
//!
//! 编码与图像读写的可调选项。

use crate::framing::Scheme;

/// 载荷超出图像容量时的处理方式。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OverflowPolicy {
    /// 在修改任何像素之前返回 `CapacityExceeded`。
    #[default]
    Reject,
    /// 写满为止，丢弃剩余比特。解码时载荷会不完整。
    Truncate,
}

/// 隐写写入选项。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EncodeOptions {
    pub scheme: Scheme,
    pub compressed: bool,
    pub overflow: OverflowPolicy,
}

impl EncodeOptions {
    pub fn new(scheme: Scheme, compressed: bool) -> Self {
        Self {
            scheme,
            compressed,
            overflow: OverflowPolicy::default(),
        }
    }

    pub fn with_overflow(mut self, overflow: OverflowPolicy) -> Self {
        self.overflow = overflow;
        self
    }
}

/// 图像读写选项。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CodecOptions {
    /// 像素数据提前结束的 PNG 也照常加载，缺失部分保持为 0。
    pub tolerate_truncated: bool,
}

impl Default for CodecOptions {
    fn default() -> Self {
        Self {
            tolerate_truncated: true,
        }
    }
}
