//! # 命令行接口模块
//!
//! 使用 `clap` 定义命令行结构：`stealth_pnginfo <IMAGE> [read]`。

use clap::Parser;
use std::path::PathBuf;

use crate::framing::Scheme;
use crate::logging::LogLevel;

/// 只读模式的关键字。
pub const READ_MODE: &str = "read";

/// 读取图像中隐藏的生成参数 (stealth pnginfo)，找不到时回退到 PNG 文本元数据，
/// 并把回退得到的文本重新隐写进图像。
#[derive(Parser, Debug)]
#[command(
    version,
    about,
    long_about = "读取图像中隐藏的生成参数 (stealth pnginfo)。若像素中没有隐写数据，则读取 PNG 文本元数据 (parameters / prompt / Comment)，并在非只读模式下把它隐写回图像。结果输出到标准输出。"
)]
pub struct Cli {
    /// 要读取的图像文件路径。
    pub image: PathBuf,

    /// 传入 `read` 时只读取，不修改图像。
    pub mode: Option<String>,

    /// 重新隐写时使用的通道方案。
    #[arg(long, value_enum, default_value_t = Scheme::Alpha)]
    pub scheme: Scheme,

    /// 重新隐写时对文本做 gzip 压缩。
    #[arg(long)]
    pub compress: bool,

    /// 不容忍截断的图像数据。
    #[arg(long)]
    pub strict: bool,

    /// 重新隐写后的输出路径，默认覆盖输入图像。
    #[arg(short, long)]
    pub dest: Option<PathBuf>,

    /// 日志级别 (输出到 stderr)。
    #[arg(long, value_enum, default_value_t = LogLevel::Warn)]
    pub log_level: LogLevel,
}

impl Cli {
    pub fn is_read_only(&self) -> bool {
        self.mode.as_deref() == Some(READ_MODE)
    }
}
