/// QR codes for a short URL: inline SVG preview and a PNG for download
use crate::error::{KurlError, KurlResult};
use crate::keyword::last_segment;
use image::{DynamicImage, ImageFormat, Luma};
use qrcode::render::svg;
use qrcode::{EcLevel, QrCode};
use std::io::Cursor;

/// Edge length of the preview shown in the popup
pub const PREVIEW_SIZE: u32 = 160;
/// Edge length of the downloaded PNG
pub const DOWNLOAD_SIZE: u32 = 512;

const PREVIEW_DARK: &str = "#111827";
const PREVIEW_LIGHT: &str = "#ffffff";

fn encode(text: &str) -> KurlResult<QrCode> {
    QrCode::with_error_correction_level(text.as_bytes(), EcLevel::H)
        .map_err(|e| KurlError::InvalidUrl(format!("Cannot encode QR code: {}", e)))
}

/// SVG document for the inline preview
pub fn qr_svg(text: &str) -> KurlResult<String> {
    let code = encode(text)?;
    Ok(code
        .render::<svg::Color>()
        .min_dimensions(PREVIEW_SIZE, PREVIEW_SIZE)
        .dark_color(svg::Color(PREVIEW_DARK))
        .light_color(svg::Color(PREVIEW_LIGHT))
        .build())
}

/// PNG bytes, black on white, at least `DOWNLOAD_SIZE` pixels wide
pub fn qr_png(text: &str) -> KurlResult<Vec<u8>> {
    let code = encode(text)?;
    let img = code
        .render::<Luma<u8>>()
        .min_dimensions(DOWNLOAD_SIZE, DOWNLOAD_SIZE)
        .build();

    let mut bytes = Vec::new();
    DynamicImage::ImageLuma8(img)
        .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
        .map_err(|e| KurlError::Storage(format!("Cannot write PNG: {}", e)))?;
    Ok(bytes)
}

/// "kurl-qrcode-<name>.png": the custom keyword, else the short URL's last segment
pub fn qr_filename(custom_keyword: &str, short_url: &str) -> String {
    let custom = custom_keyword.trim();
    let name = if !custom.is_empty() {
        custom
    } else {
        match last_segment(short_url.trim()) {
            "" => "link",
            segment => segment,
        }
    };
    format!("kurl-qrcode-{}.png", name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filename_prefers_custom_keyword() {
        assert_eq!(qr_filename(" promo ", "https://sho.rt/abc"), "kurl-qrcode-promo.png");
    }

    #[test]
    fn test_filename_from_short_url() {
        assert_eq!(qr_filename("", "https://sho.rt/abc"), "kurl-qrcode-abc.png");
        assert_eq!(qr_filename("", "https://example.com/yourls/x1?s=1"), "kurl-qrcode-x1.png");
    }

    #[test]
    fn test_filename_default() {
        assert_eq!(qr_filename("", ""), "kurl-qrcode-link.png");
    }

    #[test]
    fn test_svg_preview() {
        let svg = qr_svg("https://sho.rt/abc").unwrap();
        assert!(svg.contains("<svg"));
        assert!(svg.contains(PREVIEW_DARK));
    }

    #[test]
    fn test_png_download() {
        let png = qr_png("https://sho.rt/abc").unwrap();
        assert_eq!(&png[..8], b"\x89PNG\r\n\x1a\n");

        let decoded = image::load_from_memory(&png).unwrap();
        assert!(decoded.width() >= DOWNLOAD_SIZE);
    }
}
