/// alpha 通道、未压缩载荷的签名。
pub const TAG_ALPHA_INFO: &[u8; 15] = b"stealth_pnginfo";

/// alpha 通道、gzip 压缩载荷的签名。
pub const TAG_ALPHA_COMP: &[u8; 15] = b"stealth_pngcomp";

/// RGB 通道、未压缩载荷的签名。
pub const TAG_RGB_INFO: &[u8; 15] = b"stealth_rgbinfo";

/// RGB 通道、gzip 压缩载荷的签名。
pub const TAG_RGB_COMP: &[u8; 15] = b"stealth_rgbcomp";

/// 签名占用的比特数。
/// 四个签名都是 15 字节，因此固定为 15 * 8 = 120 bits。
pub const SIGNATURE_BITS: usize = 15 * 8;

/// 长度字段占用的比特数 (大端序 `u32`)。
pub const LENGTH_BITS: usize = 32;

/// RGB 方案中每个像素携带的比特数 (R, G, B 各 1 bit)。
pub const RGB_BITS_PER_PIXEL: usize = 3;

/// 重新写入图像时使用的文本块关键字。
pub const PARAMETERS_KEY: &str = "parameters";

/// 读取原生元数据时依次尝试的关键字。
pub const METADATA_KEYS: [&str; 3] = [PARAMETERS_KEY, "prompt", "Comment"];
