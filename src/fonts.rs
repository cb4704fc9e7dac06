use std::path::{Path, PathBuf};
use std::sync::Arc;

use eframe::egui::{self, FontData, FontDefinitions, FontFamily};

/// System fonts with Japanese coverage, tried in order.
const CANDIDATES: &[&str] = &[
    "/usr/share/fonts/opentype/noto/NotoSansCJK-Regular.ttc",
    "/usr/share/fonts/noto-cjk/NotoSansCJK-Regular.ttc",
    "/usr/share/fonts/google-noto-cjk/NotoSansCJK-Regular.ttc",
    "/usr/share/fonts/truetype/takao-gothic/TakaoPGothic.ttf",
    "/System/Library/Fonts/ヒラギノ角ゴシック W3.ttc",
    "/System/Library/Fonts/Hiragino Sans GB.ttc",
    "C:\\Windows\\Fonts\\meiryo.ttc",
    "C:\\Windows\\Fonts\\msgothic.ttc",
];

const FONT_NAME: &str = "catalog-cjk";

fn find_font(configured: Option<&Path>) -> Option<PathBuf> {
    configured
        .map(Path::to_path_buf)
        .into_iter()
        .chain(CANDIDATES.iter().map(PathBuf::from))
        .find(|p| p.is_file())
}

/// Install a CJK-capable font as the first fallback of both families.
/// egui's bundled fonts have no Japanese glyphs.
pub fn install_cjk_font(ctx: &egui::Context, configured: Option<&Path>) {
    let Some(path) = find_font(configured) else {
        log::warn!("No CJK font found; Japanese text will not render. Set `font_path` in the config.");
        return;
    };
    let bytes = match std::fs::read(&path) {
        Ok(bytes) => bytes,
        Err(e) => {
            log::warn!("Failed to read font {}: {e}", path.display());
            return;
        }
    };

    let mut fonts = FontDefinitions::default();
    fonts
        .font_data
        .insert(FONT_NAME.to_owned(), Arc::new(FontData::from_owned(bytes)));
    for family in [FontFamily::Proportional, FontFamily::Monospace] {
        fonts
            .families
            .entry(family)
            .or_default()
            .push(FONT_NAME.to_owned());
    }
    ctx.set_fonts(fonts);
    log::info!("Using font {}", path.display());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn configured_font_wins_when_present() {
        let file = tempfile::NamedTempFile::new().unwrap();
        assert_eq!(find_font(Some(file.path())), Some(file.path().to_path_buf()));
    }

    #[test]
    fn missing_configured_font_falls_back() {
        let found = find_font(Some(Path::new("/definitely/not/here.ttf")));
        assert_ne!(found, Some(PathBuf::from("/definitely/not/here.ttf")));
    }
}
