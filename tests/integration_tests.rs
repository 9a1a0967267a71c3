use clap::Parser;
use image::RgbaImage;
use rand::RngCore;
use stealth_pnginfo::{
    cli::Cli,
    codec::ImageCodec,
    config::{CodecOptions, EncodeOptions},
    framing::Scheme,
    handler::handle_info,
    pixels::{PixelBuffer, Raster},
    steganography::{read_stealth_text, write_stealth_text},
};
use std::fs;
use std::path::Path;
use tempfile::tempdir;

const PARAMETERS: &str = "a photo of a lighthouse at dusk\nNegative prompt: blurry\nSteps: 30, Sampler: Euler a, CFG scale: 6.5, Seed: 99, Size: 512x512";

/// 一个辅助函数，用于创建一个带有随机像素的测试图像，可附带一个文本块
fn create_test_image(path: &Path, width: u32, height: u32, has_alpha: bool, text: Option<(&str, &str)>) {
    let mut raw_pixels = vec![0u8; (width * height * 4) as usize];
    rand::rng().fill_bytes(&mut raw_pixels);
    let mut pixels = RgbaImage::from_raw(width, height, raw_pixels).expect("buffer matches dimensions");
    pixels.pixels_mut().for_each(|pixel| pixel[3] = 255);

    ImageCodec::default()
        .save(&Raster::new(pixels, has_alpha), path, text)
        .expect("Failed to create test image.");
}

fn cli(args: &[&str]) -> Cli {
    Cli::try_parse_from(std::iter::once("stealth_pnginfo").chain(args.iter().copied()))
        .expect("valid command line")
}

/// 验证只读模式：回退到 `prompt` 元数据，且不修改图像
#[test]
fn test_read_mode_falls_back_to_prompt_metadata() -> anyhow::Result<()> {
    let dir = tempdir()?;
    let image_path = dir.path().join("plain.png");
    create_test_image(&image_path, 64, 64, true, Some(("prompt", PARAMETERS)));
    let original_bytes = fs::read(&image_path)?;

    let path = image_path.to_string_lossy();
    let text = handle_info(&cli(&[&path, "read"]))?;

    assert_eq!(text, PARAMETERS);
    assert_eq!(fs::read(&image_path)?, original_bytes, "read mode must not touch the image");
    Ok(())
}

/// 验证非只读模式：回退得到的文本被隐写回图像，并写入 `parameters` 文本块
#[test]
fn test_fallback_text_is_embedded_back() -> anyhow::Result<()> {
    let dir = tempdir()?;
    let image_path = dir.path().join("plain.png");
    create_test_image(&image_path, 64, 64, false, Some(("prompt", PARAMETERS)));

    let path = image_path.to_string_lossy();
    assert_eq!(handle_info(&cli(&[&path]))?, PARAMETERS);

    let codec = ImageCodec::default();
    let raster = codec.open(&image_path)?;
    assert!(raster.has_alpha(), "alpha scheme saves an RGBA image");
    assert_eq!(read_stealth_text(&raster), PARAMETERS);
    assert_eq!(codec.read_text_metadata(&image_path).as_deref(), Some(PARAMETERS));

    // 第二次运行直接从像素中读到文本
    assert_eq!(handle_info(&cli(&[&path, "read"]))?, PARAMETERS);
    Ok(())
}

/// 验证 `--scheme rgb --compress` 以及 `--dest` 输出路径
#[test]
fn test_rgb_compressed_reencode_to_dest() -> anyhow::Result<()> {
    let dir = tempdir()?;
    let image_path = dir.path().join("source.png");
    let dest_path = dir.path().join("stealth.png");
    create_test_image(&image_path, 48, 48, false, Some(("parameters", PARAMETERS)));
    let original_bytes = fs::read(&image_path)?;

    let path = image_path.to_string_lossy();
    let dest = dest_path.to_string_lossy();
    let text = handle_info(&cli(&[&path, "--scheme", "rgb", "--compress", "--dest", &dest]))?;
    assert_eq!(text, PARAMETERS);
    assert_eq!(fs::read(&image_path)?, original_bytes);

    let raster = ImageCodec::default().open(&dest_path)?;
    assert!(!raster.has_alpha(), "rgb scheme keeps an RGB image");
    assert_eq!(read_stealth_text(&raster), PARAMETERS);
    Ok(())
}

/// 非 Latin-1 文本写入 iTXt 块后仍可读回
#[test]
fn test_unicode_metadata_roundtrip() -> anyhow::Result<()> {
    let dir = tempdir()?;
    let image_path = dir.path().join("unicode.png");
    let text = "一只在窗边睡觉的猫, Steps: 20";
    create_test_image(&image_path, 32, 32, true, Some(("parameters", text)));

    let codec = ImageCodec::default();
    assert_eq!(codec.read_text_metadata(&image_path).as_deref(), Some(text));
    assert_eq!(handle_info(&cli(&[&image_path.to_string_lossy()]))?, text);
    assert_eq!(read_stealth_text(&codec.open(&image_path)?), text);
    Ok(())
}

/// `parameters` 优先于 `prompt`，没有任何已知关键字时视为没有元数据
#[test]
fn test_metadata_key_priority() -> anyhow::Result<()> {
    let dir = tempdir()?;
    let codec = ImageCodec::default();
    let raster = Raster::new(RgbaImage::new(4, 4), true);

    let both = dir.path().join("both.png");
    let file = fs::File::create(&both)?;
    let mut encoder = png::Encoder::new(std::io::BufWriter::new(file), 4, 4);
    encoder.set_color(png::ColorType::Rgba);
    encoder.set_depth(png::BitDepth::Eight);
    encoder.add_text_chunk("prompt".to_string(), "from prompt".to_string())?;
    encoder.add_text_chunk("parameters".to_string(), "from parameters".to_string())?;
    let mut writer = encoder.write_header()?;
    writer.write_image_data(&raster.samples())?;
    writer.finish()?;
    assert_eq!(codec.read_text_metadata(&both).as_deref(), Some("from parameters"));

    let other = dir.path().join("other.png");
    codec.save(&raster, &other, Some(("Software", "something else")))?;
    assert_eq!(codec.read_text_metadata(&other), None);

    let bmp = dir.path().join("image.bmp");
    codec.save(&raster, &bmp, None)?;
    assert_eq!(codec.read_text_metadata(&bmp), None);
    Ok(())
}

/// 既没有隐写数据也没有元数据时输出空文本，图像保持不变
#[test]
fn test_image_without_any_metadata() -> anyhow::Result<()> {
    let dir = tempdir()?;
    let image_path = dir.path().join("empty.png");
    create_test_image(&image_path, 32, 32, true, None);
    let original_bytes = fs::read(&image_path)?;

    assert_eq!(handle_info(&cli(&[&image_path.to_string_lossy()]))?, "");
    assert_eq!(fs::read(&image_path)?, original_bytes);
    Ok(())
}

/// 图像太小无法容纳文本时，仍然输出文本且不修改图像
#[test]
fn test_reencode_skipped_when_image_too_small() -> anyhow::Result<()> {
    let dir = tempdir()?;
    let image_path = dir.path().join("tiny.png");
    create_test_image(&image_path, 8, 8, true, Some(("parameters", PARAMETERS)));
    let original_bytes = fs::read(&image_path)?;

    assert_eq!(handle_info(&cli(&[&image_path.to_string_lossy()]))?, PARAMETERS);
    assert_eq!(fs::read(&image_path)?, original_bytes);
    Ok(())
}

/// 非 PNG 图像通过 `image` 读取，同样可以解码
#[test]
fn test_bmp_payload_is_read() -> anyhow::Result<()> {
    let dir = tempdir()?;
    let image_path = dir.path().join("cover.bmp");
    let mut raster = Raster::new(RgbaImage::new(40, 40), false);
    write_stealth_text(&mut raster, "bmp payload", &EncodeOptions::new(Scheme::Rgb, false))?;
    ImageCodec::default().save(&raster, &image_path, None)?;

    assert_eq!(handle_info(&cli(&[&image_path.to_string_lossy()]))?, "bmp payload");
    Ok(())
}

/// 验证截断的 PNG：默认容忍，`--strict` 时报错
#[test]
fn test_truncated_png_loading() -> anyhow::Result<()> {
    let dir = tempdir()?;
    let image_path = dir.path().join("whole.png");
    let truncated_path = dir.path().join("truncated.png");
    create_test_image(&image_path, 64, 64, true, None);

    let bytes = fs::read(&image_path)?;
    fs::write(&truncated_path, &bytes[..bytes.len() * 3 / 5])?;

    let tolerant = ImageCodec::new(CodecOptions { tolerate_truncated: true });
    let raster = tolerant.open(&truncated_path)?;
    assert_eq!((raster.width(), raster.height()), (64, 64));

    let strict = ImageCodec::new(CodecOptions { tolerate_truncated: false });
    assert!(strict.open(&truncated_path).is_err());

    let result = handle_info(&cli(&[&truncated_path.to_string_lossy(), "read", "--strict"]));
    assert!(result.is_err());
    if let Err(e) = result {
        assert!(e.to_string().contains("Unable to read image file"));
    }
    Ok(())
}

/// 图像文件不存在时返回错误
#[test]
fn test_missing_image_is_an_error() {
    let dir = tempdir().unwrap();
    let missing = dir.path().join("missing.png");
    assert!(handle_info(&cli(&[&missing.to_string_lossy(), "read"])).is_err());
}

/// 验证命令行约定：第二个参数只有字面量 `read` 才是只读模式
#[test]
fn test_cli_mode_argument() {
    assert!(cli(&["image.png", "read"]).is_read_only());
    assert!(!cli(&["image.png"]).is_read_only());
    assert!(!cli(&["image.png", "write"]).is_read_only());
    assert!(!cli(&["image.png", "READ"]).is_read_only());
    assert_eq!(cli(&["image.png"]).scheme, Scheme::Alpha);
}
