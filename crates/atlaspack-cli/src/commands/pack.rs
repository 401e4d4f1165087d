//! Pack command implementation
//!
//! Dices every PNG under an input directory, packs the units into atlases
//! and writes `atlas_<index>.png` files plus an `atlases.json` manifest.

use std::fs;
use std::ops::ControlFlow;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use atlaspack_core::manifest::atlas_file_name;
use atlaspack_core::{
    Atlas, AtlasManifest, AtlasPacker, PackConfig, PackError, PngAsset, PngConfig,
    PngSerializer,
};
use colored::Colorize;
use serde::{Deserialize, Serialize};

use super::json_output::{error_codes, JsonError};
use crate::input::load_textures;

/// Name of the manifest written next to the atlases.
pub const MANIFEST_FILE: &str = "atlases.json";

/// Command-line overrides applied on top of the configuration file.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    /// `--unit-size`
    pub unit_size: Option<u32>,
    /// `--padding`
    pub padding: Option<u32>,
    /// `--uv-inset`
    pub uv_inset: Option<f32>,
    /// `--force-square`
    pub force_square: bool,
    /// `--atlas-size`
    pub atlas_size: Option<u32>,
    /// `--keep-transparent`
    pub keep_transparent: bool,
    /// `--compression`: "fast", "default" or "best"
    pub compression: Option<String>,
}

impl ConfigOverrides {
    /// Overwrite the fields given on the command line.
    pub fn apply(&self, config: &mut PackConfig) {
        if let Some(unit_size) = self.unit_size {
            config.unit_size = unit_size;
        }
        if let Some(padding) = self.padding {
            config.padding = padding;
        }
        if let Some(uv_inset) = self.uv_inset {
            config.uv_inset = uv_inset;
        }
        if let Some(atlas_size) = self.atlas_size {
            config.atlas_size_limit = atlas_size;
        }
        if self.force_square {
            config.force_square = true;
        }
        if self.keep_transparent {
            config.trim_transparent = false;
        }
    }

    /// PNG settings for the requested compression preset.
    pub fn png_config(&self) -> PngConfig {
        match self.compression.as_deref() {
            Some("fast") => PngConfig::fast(),
            Some("best") => PngConfig::best_compression(),
            _ => PngConfig::default(),
        }
    }
}

/// One written atlas.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AtlasSummary {
    /// File name inside the output directory
    pub file: String,
    /// Image width in pixels
    pub width: u32,
    /// Image height in pixels
    pub height: u32,
    /// Distinct units stored
    pub units: usize,
    /// Textures packed into this atlas
    pub textures: usize,
    /// BLAKE3 hash of the PNG file
    pub hash: String,
}

/// Result of a successful pack run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PackSummary {
    /// Number of source textures packed
    pub textures: usize,
    /// Written atlases, in order
    pub atlases: Vec<AtlasSummary>,
    /// Path of the manifest file
    pub manifest: String,
}

/// JSON output for the pack command.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PackOutput {
    /// Whether packing succeeded
    pub success: bool,
    /// Errors encountered during packing
    pub errors: Vec<JsonError>,
    /// Pack result (on success)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<PackSummary>,
}

impl PackOutput {
    /// Creates a successful pack output.
    pub fn success(summary: PackSummary) -> Self {
        Self {
            success: true,
            errors: Vec::new(),
            result: Some(summary),
        }
    }

    /// Creates a failed pack output.
    pub fn failure(errors: Vec<JsonError>) -> Self {
        Self {
            success: false,
            errors,
            result: None,
        }
    }
}

/// Step of a pack run that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Loading or validating the configuration
    Config,
    /// Reading and dicing input images
    Input,
    /// Packing atlases
    Pack,
    /// Writing atlases and manifest
    Output,
}

/// A failed pack run.
#[derive(Debug)]
pub struct PackFailure {
    /// Where the run stopped
    pub stage: Stage,
    /// Underlying error
    pub error: anyhow::Error,
}

impl PackFailure {
    fn at(stage: Stage) -> impl FnOnce(anyhow::Error) -> Self {
        move |error| Self { stage, error }
    }

    /// Process exit status: 2 for packing failures, 1 otherwise.
    pub fn exit_status(&self) -> u8 {
        match self.stage {
            Stage::Pack => 2,
            Stage::Config | Stage::Input | Stage::Output => 1,
        }
    }

    /// True when a texture did not fit into an atlas.
    pub fn is_capacity(&self) -> bool {
        self.error
            .downcast_ref::<PackError>()
            .is_some_and(PackError::is_capacity)
    }

    fn to_json(&self) -> JsonError {
        let code = match self.stage {
            Stage::Config => error_codes::CONFIG,
            Stage::Input => error_codes::INPUT,
            Stage::Pack if self.is_capacity() => error_codes::DOES_NOT_FIT,
            Stage::Pack => error_codes::PACK,
            Stage::Output => error_codes::OUTPUT_WRITE,
        };
        let error = JsonError::new(code, format!("{:#}", self.error));
        if self.is_capacity() {
            error.with_suggestion("raise --atlas-size or lower --unit-size/--padding")
        } else {
            error
        }
    }
}

/// Run the pack command.
///
/// # Arguments
/// * `input` - Directory scanned recursively for `*.png` sprites
/// * `output` - Directory receiving atlases and manifest
/// * `config_path` - Optional JSON configuration file
/// * `overrides` - Command-line configuration overrides
/// * `json_output` - Whether to output machine-readable JSON
///
/// # Returns
/// Exit code: 0 on success, 1 on configuration/input/output errors, 2 when
/// packing fails
pub fn run(
    input: &str,
    output: &str,
    config_path: Option<&str>,
    overrides: &ConfigOverrides,
    json_output: bool,
) -> Result<ExitCode> {
    if json_output {
        run_json(input, output, config_path, overrides)
    } else {
        run_human(input, output, config_path, overrides)
    }
}

/// Run pack with human-readable (colored) output.
fn run_human(
    input: &str,
    output: &str,
    config_path: Option<&str>,
    overrides: &ConfigOverrides,
) -> Result<ExitCode> {
    println!("{} {}", "Input:".cyan().bold(), input);
    println!("{} {}", "Output:".cyan().bold(), output);
    if let Some(path) = config_path {
        println!("{} {}", "Config:".cyan().bold(), path);
    }

    let result = pack_directory(
        Path::new(input),
        Path::new(output),
        config_path.map(Path::new),
        overrides,
        true,
    );

    match result {
        Ok(summary) => {
            println!(
                "\n{} Packed {} textures into {} atlas(es)",
                "SUCCESS".green().bold(),
                summary.textures,
                summary.atlases.len()
            );
            for atlas in &summary.atlases {
                println!(
                    "  {} {}x{}, {} units, {} textures",
                    atlas.file,
                    atlas.width,
                    atlas.height,
                    atlas.units,
                    atlas.textures
                );
            }
            println!("{} {}", "Manifest:".dimmed(), summary.manifest);
            Ok(ExitCode::SUCCESS)
        }
        Err(failure) => {
            eprintln!("\n{} {:#}", "FAILED".red().bold(), failure.error);
            Ok(ExitCode::from(failure.exit_status()))
        }
    }
}

/// Run pack with JSON output.
fn run_json(
    input: &str,
    output: &str,
    config_path: Option<&str>,
    overrides: &ConfigOverrides,
) -> Result<ExitCode> {
    let result = pack_directory(
        Path::new(input),
        Path::new(output),
        config_path.map(Path::new),
        overrides,
        false,
    );

    let (report, code) = match result {
        Ok(summary) => (PackOutput::success(summary), ExitCode::SUCCESS),
        Err(failure) => {
            let file = match failure.stage {
                Stage::Config => config_path,
                Stage::Input => Some(input),
                Stage::Pack => None,
                Stage::Output => Some(output),
            };
            let mut error = failure.to_json();
            if let Some(file) = file {
                error = error.with_file(file);
            }
            (
                PackOutput::failure(vec![error]),
                ExitCode::from(failure.exit_status()),
            )
        }
    };

    println!(
        "{}",
        serde_json::to_string_pretty(&report).context("Failed to serialize pack output")?
    );
    Ok(code)
}

/// Load the configuration file (or defaults), apply overrides and validate.
pub fn resolve_config(
    config_path: Option<&Path>,
    overrides: &ConfigOverrides,
) -> Result<PackConfig> {
    let mut config = match config_path {
        Some(path) => PackConfig::from_path(path)
            .with_context(|| format!("Failed to load config: {}", path.display()))?,
        None => PackConfig::default(),
    };
    overrides.apply(&mut config);
    config.validate()?;
    Ok(config)
}

/// Dice, pack and write everything for one input directory.
///
/// With `report_progress`, a status line is printed at every atlas boundary.
pub fn pack_directory(
    input: &Path,
    output: &Path,
    config_path: Option<&Path>,
    overrides: &ConfigOverrides,
    report_progress: bool,
) -> Result<PackSummary, PackFailure> {
    let config = resolve_config(config_path, overrides).map_err(PackFailure::at(Stage::Config))?;
    let textures = load_textures(input, &config).map_err(PackFailure::at(Stage::Input))?;
    let texture_count = textures.len();
    log::info!("diced {} textures from {}", texture_count, input.display());

    let mut packer = AtlasPacker::new(config.clone());
    if report_progress {
        println!("{} {} textures", "Loaded".dimmed(), texture_count);
        packer = packer.with_progress(|progress| {
            println!(
                "  {} atlas #{} ({} textures pending)",
                "->".green(),
                progress.atlases_done,
                progress.textures_pending
            );
            ControlFlow::Continue(())
        });
    }

    let atlases = packer
        .pack(textures, &mut PngSerializer::new(overrides.png_config()))
        .map_err(|e| PackFailure {
            stage: Stage::Pack,
            error: e.into(),
        })?;

    let manifest = AtlasManifest::from_atlases(&config, &atlases);
    let manifest_path =
        write_outputs(output, &atlases, &manifest).map_err(PackFailure::at(Stage::Output))?;

    Ok(PackSummary {
        textures: texture_count,
        atlases: manifest
            .atlases
            .iter()
            .map(|record| AtlasSummary {
                file: record.file.clone(),
                width: record.width,
                height: record.height,
                units: record.units.len(),
                textures: record.textures.len(),
                hash: record.hash.clone(),
            })
            .collect(),
        manifest: manifest_path.display().to_string(),
    })
}

/// Write atlas PNGs and the manifest; returns the manifest path.
fn write_outputs(
    output: &Path,
    atlases: &[Atlas<PngAsset>],
    manifest: &AtlasManifest,
) -> Result<PathBuf> {
    fs::create_dir_all(output)
        .with_context(|| format!("Failed to create output directory: {}", output.display()))?;

    for (index, atlas) in atlases.iter().enumerate() {
        let path = output.join(atlas_file_name(index));
        fs::write(&path, &atlas.asset.png_data)
            .with_context(|| format!("Failed to write atlas: {}", path.display()))?;
    }

    let manifest_path = output.join(MANIFEST_FILE);
    let json = serde_json::to_string_pretty(manifest).context("Failed to serialize manifest")?;
    fs::write(&manifest_path, json)
        .with_context(|| format!("Failed to write manifest: {}", manifest_path.display()))?;

    Ok(manifest_path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overrides_replace_given_fields_only() {
        let mut config = PackConfig::default();
        ConfigOverrides {
            unit_size: Some(16),
            atlas_size: Some(512),
            keep_transparent: true,
            ..ConfigOverrides::default()
        }
        .apply(&mut config);
        assert_eq!(config.unit_size, 16);
        assert_eq!(config.atlas_size_limit, 512);
        assert_eq!(config.padding, 2);
        assert!(!config.trim_transparent);
        assert!(!config.force_square);
    }

    #[test]
    fn test_compression_preset_selects_png_config() {
        let preset = |name: &str| ConfigOverrides {
            compression: Some(name.to_string()),
            ..ConfigOverrides::default()
        };
        let fast = preset("fast").png_config();
        let best = preset("best").png_config();
        let default = ConfigOverrides::default().png_config();
        assert_eq!(format!("{:?}", fast.compression), "Fast");
        assert_eq!(format!("{:?}", best.compression), "Best");
        assert_eq!(format!("{:?}", default.compression), "Default");
    }

    #[test]
    fn test_resolve_config_file_then_flags() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pack.json");
        fs::write(&path, r#"{ "unit_size": 32, "padding": 1 }"#).unwrap();

        let overrides = ConfigOverrides {
            padding: Some(4),
            ..ConfigOverrides::default()
        };
        let config = resolve_config(Some(&path), &overrides).unwrap();
        assert_eq!(config.unit_size, 32);
        assert_eq!(config.padding, 4);
    }

    #[test]
    fn test_resolve_config_rejects_invalid_values() {
        let overrides = ConfigOverrides {
            unit_size: Some(0),
            ..ConfigOverrides::default()
        };
        assert!(resolve_config(None, &overrides).is_err());
    }

    #[test]
    fn test_failure_exit_status() {
        let pack = PackFailure {
            stage: Stage::Pack,
            error: PackError::Cancelled { atlases_done: 0 }.into(),
        };
        let input = PackFailure {
            stage: Stage::Input,
            error: anyhow::anyhow!("missing"),
        };
        assert_eq!(pack.exit_status(), 2);
        assert_eq!(input.exit_status(), 1);
        assert!(!pack.is_capacity());
        assert_eq!(pack.to_json().code, error_codes::PACK);
    }
}
