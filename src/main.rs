use clap::Parser;

use stealth_pnginfo::{cli::Cli, handler::handle_info, logging::init_logging};

/// 程序的主入口点
///
/// 解析命令行参数、初始化日志，并把恢复出的文本打印到标准输出
fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.log_level);

    let text = handle_info(&cli)?;
    println!("{text}");

    Ok(())
}
