//! Atlaspack CLI - dice sprite images and pack them into texture atlases
//!
//! This binary provides the `pack` command, which turns a directory of PNG
//! sprites into atlas images and a JSON manifest of UV rects.

use clap::{Parser, Subcommand};
use std::process::ExitCode;

use atlaspack_cli::commands;
use atlaspack_cli::commands::pack::ConfigOverrides;
use atlaspack_cli::logging;

/// Atlaspack - sprite dicing atlas packer
#[derive(Parser)]
#[command(name = "atlaspack")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Dice PNG sprites from a directory and pack them into atlases
    Pack {
        /// Directory scanned recursively for *.png sprites
        #[arg(short, long)]
        input: String,

        /// Directory receiving atlas_<n>.png files and atlases.json
        #[arg(short, long)]
        output: String,

        /// JSON configuration file (flags below override it)
        #[arg(short, long)]
        config: Option<String>,

        /// Unit size in pixels, before padding
        #[arg(long)]
        unit_size: Option<u32>,

        /// Padding pixels on each side of a unit
        #[arg(long)]
        padding: Option<u32>,

        /// Fractional UV inset in [0, 1)
        #[arg(long)]
        uv_inset: Option<f32>,

        /// Make every atlas as tall as it is wide
        #[arg(long)]
        force_square: bool,

        /// Maximum atlas side length in pixels
        #[arg(long)]
        atlas_size: Option<u32>,

        /// Keep fully transparent units instead of dropping them
        #[arg(long)]
        keep_transparent: bool,

        /// PNG compression preset for atlas images
        #[arg(long, value_parser = ["fast", "default", "best"])]
        compression: Option<String>,

        /// Output machine-readable JSON (no colored output)
        #[arg(long)]
        json: bool,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let result = match cli.command {
        Commands::Pack {
            input,
            output,
            config,
            unit_size,
            padding,
            uv_inset,
            force_square,
            atlas_size,
            keep_transparent,
            compression,
            json,
        } => {
            let overrides = ConfigOverrides {
                unit_size,
                padding,
                uv_inset,
                force_square,
                atlas_size,
                keep_transparent,
                compression,
            };
            commands::pack::run(&input, &output, config.as_deref(), &overrides, json)
        }
    };

    match result {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{}: {}", colored::Colorize::red("error"), e);
            ExitCode::from(1)
        }
    }
}
