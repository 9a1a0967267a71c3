//! # 解码状态机模块
//!
//! 解码器在读取第一个像素时并不知道载荷使用哪种方案，
//! 因此同时收集 alpha 与 RGB 两路候选比特，谁先凑满 120 bits 就先检验谁。
//! 每个像素驱动一次 [`ScanState::step`]，进入终止状态后立即停止扫描。

use crate::constants::{LENGTH_BITS, SIGNATURE_BITS};
use crate::framing::{Scheme, Signature, parse_length, parse_signature};

/// 扫描过程中的状态。
#[derive(Debug, Clone, PartialEq)]
pub enum ScanState {
    /// 正在确认签名。`None` 表示该候选不存在或已被否定。
    ConfirmingSignature {
        alpha: Option<Vec<bool>>,
        rgb: Option<Vec<bool>>,
    },
    /// 签名已确认，正在读取 32 位长度字段。
    ReadingLength {
        signature: Signature,
        buf: Vec<bool>,
    },
    /// 正在读取 `target` 个载荷比特。
    ReadingPayload {
        signature: Signature,
        buf: Vec<bool>,
        target: usize,
    },
    /// 载荷读取完毕，`bits` 的长度恰好等于长度字段的值。
    Done {
        signature: Signature,
        bits: Vec<bool>,
    },
    /// 签名不匹配，图像中没有隐藏载荷。
    Rejected,
}

impl ScanState {
    /// 初始状态。没有 alpha 通道的图像只跟踪 RGB 候选。
    pub fn new(has_alpha: bool) -> Self {
        ScanState::ConfirmingSignature {
            alpha: has_alpha.then(|| Vec::with_capacity(SIGNATURE_BITS)),
            rgb: Some(Vec::with_capacity(SIGNATURE_BITS)),
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, ScanState::Done { .. } | ScanState::Rejected)
    }

    /// 读入一个像素的通道值 `[R, G, B, A]`，返回下一个状态。
    pub fn step(self, pixel: [u8; 4]) -> Self {
        match self {
            ScanState::ConfirmingSignature { mut alpha, mut rgb } => {
                if let Some(buf) = alpha.as_mut() {
                    push_pixel_bits(buf, Scheme::Alpha, pixel);
                }
                if let Some(buf) = rgb.as_mut() {
                    push_pixel_bits(buf, Scheme::Rgb, pixel);
                }

                if let Some(buf) = alpha.as_ref().filter(|buf| buf.len() == SIGNATURE_BITS) {
                    return match confirm(buf, Scheme::Alpha) {
                        Some(signature) => ScanState::reading_length(signature),
                        None => {
                            tracing::debug!("alpha candidate does not carry a known signature");
                            ScanState::Rejected
                        }
                    };
                }

                if let Some(buf) = rgb.as_ref().filter(|buf| buf.len() == SIGNATURE_BITS) {
                    match confirm(buf, Scheme::Rgb) {
                        Some(signature) => return ScanState::reading_length(signature),
                        None => {
                            tracing::debug!("rgb candidate does not carry a known signature");
                            rgb = None;
                        }
                    }
                }

                if alpha.is_none() && rgb.is_none() {
                    return ScanState::Rejected;
                }
                ScanState::ConfirmingSignature { alpha, rgb }
            }
            ScanState::ReadingLength { signature, mut buf } => {
                push_pixel_bits(&mut buf, signature.scheme, pixel);
                if buf.len() < LENGTH_BITS {
                    return ScanState::ReadingLength { signature, buf };
                }
                // RGB 每次产出 3 bits，第 33 位属于载荷。
                let carry = buf.split_off(LENGTH_BITS);
                let target = parse_length(&buf) as usize;
                tracing::debug!(scheme = %signature.scheme, compressed = signature.compressed, bits = target, "payload length read");
                ScanState::ReadingPayload {
                    signature,
                    buf: carry,
                    target,
                }
            }
            ScanState::ReadingPayload {
                signature,
                mut buf,
                target,
            } => {
                push_pixel_bits(&mut buf, signature.scheme, pixel);
                if buf.len() < target {
                    return ScanState::ReadingPayload {
                        signature,
                        buf,
                        target,
                    };
                }
                buf.truncate(target);
                ScanState::Done {
                    signature,
                    bits: buf,
                }
            }
            terminal => terminal,
        }
    }

    fn reading_length(signature: Signature) -> Self {
        tracing::debug!(scheme = %signature.scheme, compressed = signature.compressed, "signature confirmed");
        ScanState::ReadingLength {
            signature,
            buf: Vec::with_capacity(LENGTH_BITS + 1),
        }
    }
}

/// 候选只接受属于自己通道的签名。
fn confirm(buf: &[bool], scheme: Scheme) -> Option<Signature> {
    parse_signature(buf).filter(|signature| signature.scheme == scheme)
}

fn push_pixel_bits(buf: &mut Vec<bool>, scheme: Scheme, [r, g, b, a]: [u8; 4]) {
    match scheme {
        Scheme::Alpha => buf.push(a & 1 == 1),
        Scheme::Rgb => buf.extend([r & 1 == 1, g & 1 == 1, b & 1 == 1]),
    }
}
