use base64::{engine::general_purpose::STANDARD, Engine as _};
use image::{ImageFormat, Luma};
use qrcode::{EcLevel, QrCode};
use std::io::Cursor;

use crate::error::{PipelineError, Result};

/// Pixels per module. The quiet zone is the standard four modules.
pub const MODULE_SIZE: u32 = 10;

pub fn render_qr_png(url: &str) -> Result<Vec<u8>> {
    let code = QrCode::with_error_correction_level(url.as_bytes(), EcLevel::L)
        .map_err(|e| PipelineError::EncodingFailed(e.to_string()))?;

    let image = code
        .render::<Luma<u8>>()
        .module_dimensions(MODULE_SIZE, MODULE_SIZE)
        .quiet_zone(true)
        .dark_color(Luma([0u8]))
        .light_color(Luma([255u8]))
        .build();

    let mut buf = Cursor::new(Vec::new());
    image
        .write_to(&mut buf, ImageFormat::Png)
        .map_err(|e| PipelineError::EncodingFailed(e.to_string()))?;

    Ok(buf.into_inner())
}

pub fn encode_qr(url: &str) -> Result<String> {
    Ok(STANDARD.encode(render_qr_png(url)?))
}
