//! Loading sprite PNGs from a directory tree.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use atlaspack_core::{dice_texture, PackConfig, PixelBuffer, SourceTexture};
use walkdir::WalkDir;

/// All `*.png` files under `dir`, in sorted path order.
pub fn find_pngs(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        anyhow::bail!("input directory not found: {}", dir.display());
    }

    let mut paths = Vec::new();
    for entry in WalkDir::new(dir) {
        let entry = entry.context("Failed to walk input directory")?;
        let path = entry.path();
        if entry.file_type().is_file()
            && path
                .extension()
                .is_some_and(|ext| ext.eq_ignore_ascii_case("png"))
        {
            paths.push(path.to_path_buf());
        }
    }
    paths.sort();
    Ok(paths)
}

/// Texture name for `path`: relative to `root`, without extension, with `/`
/// separators on every platform.
pub fn texture_name(root: &Path, path: &Path) -> String {
    let relative = path.strip_prefix(root).unwrap_or(path).with_extension("");
    relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

/// Decode a PNG (any color type) into RGBA8.
pub fn load_image(path: &Path) -> Result<PixelBuffer> {
    let image = image::open(path)
        .with_context(|| format!("Failed to decode image: {}", path.display()))?
        .to_rgba8();
    let (width, height) = image.dimensions();
    let buffer = PixelBuffer::from_rgba8(width, height, image.as_raw())
        .with_context(|| format!("Invalid pixel data in {}", path.display()))?;
    Ok(buffer)
}

/// Load and dice every PNG under `dir`.
///
/// Sprites that dice to no units at all are skipped.
pub fn load_textures(dir: &Path, config: &PackConfig) -> Result<Vec<SourceTexture>> {
    let mut textures = Vec::new();
    for path in find_pngs(dir)? {
        let image = load_image(&path)?;
        let name = texture_name(dir, &path);
        log::debug!("loaded {} ({}x{})", path.display(), image.width, image.height);
        let texture = dice_texture(name, &image, config);
        if texture.units.is_empty() {
            log::warn!("skipping '{}': no visible pixels", texture.name);
            continue;
        }
        textures.push(texture);
    }
    Ok(textures)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_texture_name_uses_relative_path() {
        let root = Path::new("sprites");
        assert_eq!(texture_name(root, &root.join("hero.png")), "hero");
        assert_eq!(
            texture_name(root, &root.join("ui").join("button.png")),
            "ui/button"
        );
    }

    #[test]
    fn test_find_pngs_sorted_and_filtered() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("b")).unwrap();
        for name in ["c.png", "a.PNG", "b/z.png", "notes.txt"] {
            std::fs::write(dir.path().join(name), b"").unwrap();
        }
        let found: Vec<_> = find_pngs(dir.path())
            .unwrap()
            .iter()
            .map(|p| texture_name(dir.path(), p))
            .collect();
        assert_eq!(found, vec!["a", "b/z", "c"]);
    }

    #[test]
    fn test_missing_directory_is_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(find_pngs(&dir.path().join("missing")).is_err());
    }
}
