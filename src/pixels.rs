//! # 像素访问模块
//!
//! 隐写核心只通过 [`PixelBuffer`] 访问像素，不关心文件格式。
//! [`Raster`] 是基于 `image::RgbaImage` 的默认实现。

use image::{DynamicImage, Rgba, RgbaImage};

/// 隐写编码/解码所需的最小像素接口。
///
/// 通道值统一为 `[R, G, B, A]`；没有 alpha 通道的图像读取时 A 为 255。
pub trait PixelBuffer {
    fn width(&self) -> u32;

    fn height(&self) -> u32;

    fn has_alpha(&self) -> bool;

    fn get(&self, x: u32, y: u32) -> [u8; 4];

    fn set(&mut self, x: u32, y: u32, channels: [u8; 4]);

    /// 把所有像素的 alpha 置为 255，并使图像带上 alpha 通道。
    fn force_opaque(&mut self);
}

/// 按隐写格式规定的顺序遍历像素坐标：外层 x，内层 y (逐列扫描)。
pub fn raster_order(width: u32, height: u32) -> impl Iterator<Item = (u32, u32)> {
    (0..width).flat_map(move |x| (0..height).map(move |y| (x, y)))
}

/// 内存中的 8 位 RGBA 像素缓冲区。
#[derive(Debug, Clone, PartialEq)]
pub struct Raster {
    pixels: RgbaImage,
    has_alpha: bool,
}

impl Raster {
    pub fn new(pixels: RgbaImage, has_alpha: bool) -> Self {
        Self { pixels, has_alpha }
    }

    /// 任意颜色布局的图像都会被归一化为 8 位 RGBA。
    pub fn from_dynamic(image: DynamicImage) -> Self {
        let has_alpha = image.color().has_alpha();
        Self::new(image.to_rgba8(), has_alpha)
    }

    /// 转回 `DynamicImage`，没有 alpha 通道时输出 RGB。
    pub fn to_dynamic(&self) -> DynamicImage {
        let rgba = DynamicImage::ImageRgba8(self.pixels.clone());
        if self.has_alpha {
            rgba
        } else {
            DynamicImage::ImageRgb8(rgba.to_rgb8())
        }
    }

    /// 按行优先排列的原始样本，每像素 4 或 3 字节。
    pub fn samples(&self) -> Vec<u8> {
        if self.has_alpha {
            self.pixels.as_raw().clone()
        } else {
            self.pixels
                .pixels()
                .flat_map(|pixel| [pixel[0], pixel[1], pixel[2]])
                .collect()
        }
    }

    pub fn pixels(&self) -> &RgbaImage {
        &self.pixels
    }
}

impl PixelBuffer for Raster {
    fn width(&self) -> u32 {
        self.pixels.width()
    }

    fn height(&self) -> u32 {
        self.pixels.height()
    }

    fn has_alpha(&self) -> bool {
        self.has_alpha
    }

    fn get(&self, x: u32, y: u32) -> [u8; 4] {
        let Rgba([r, g, b, a]) = *self.pixels.get_pixel(x, y);
        if self.has_alpha { [r, g, b, a] } else { [r, g, b, 255] }
    }

    fn set(&mut self, x: u32, y: u32, channels: [u8; 4]) {
        self.pixels.put_pixel(x, y, Rgba(channels));
    }

    fn force_opaque(&mut self) {
        self.pixels.pixels_mut().for_each(|pixel| pixel[3] = 255);
        self.has_alpha = true;
    }
}
