//! Command-line front-end.
//!
//! Landmarks are not detected by this tool. They are read from a JSON file written by an
//! external face mesh detector (`{"landmarks": [[x, y], ...]}`, normalized coordinates).

use std::{
    path::{Path, PathBuf},
    process::ExitCode,
};

use clap::{Args, Parser, Subcommand};
use makeover::{
    color,
    config::Presets,
    error::Outcome,
    face::regions,
    fashion::{self, FashionStyle},
    garment::{self, Placement},
    image::Image,
    landmark::Precomputed,
    makeup::{self, MakeupOptions},
    style,
};

#[derive(Parser, Debug)]
#[command(name = "makeover")]
#[command(author, version, about = "Face landmark guided makeup and garment compositing", long_about = None)]
struct Cli {
    /// JSON file overriding the tuning presets
    #[arg(long, global = true)]
    presets: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Apply lipstick, eyeshadow and blush
    Makeup {
        photo: PathBuf,
        output: PathBuf,
        #[command(flatten)]
        landmarks: LandmarkArgs,
        /// JSON file with makeup options; flags below override it
        #[arg(long)]
        options: Option<PathBuf>,
        /// Lip color (enables lips)
        #[arg(long)]
        lips: Option<String>,
        /// Eyeshadow color (enables eyeshadow)
        #[arg(long)]
        eyeshadow: Option<String>,
        /// Blush color (enables blush)
        #[arg(long)]
        blush: Option<String>,
        /// Global intensity in [0, 1]
        #[arg(long)]
        intensity: Option<f32>,
    },
    /// Transfer the color grading of a reference image onto the face
    Style {
        photo: PathBuf,
        reference: PathBuf,
        output: PathBuf,
        #[command(flatten)]
        landmarks: LandmarkArgs,
    },
    /// Recolor a garment sprite
    Recolor {
        sprite: PathBuf,
        /// Target color (`#RRGGBB` or `#RGB`)
        color: String,
        /// Output file (written without alpha channel)
        output: PathBuf,
    },
    /// Place a garment sprite onto a photo
    TryOn {
        photo: PathBuf,
        garment: PathBuf,
        output: PathBuf,
        #[arg(long, default_value_t = 0, allow_hyphen_values = true)]
        x: i64,
        #[arg(long, default_value_t = 0, allow_hyphen_values = true)]
        y: i64,
        #[arg(long, default_value_t = 1.0)]
        scale: f32,
        /// Recolor the garment before placing it
        #[arg(long)]
        color: Option<String>,
    },
    /// Apply a fashion filter (casual, vintage, elegant, monochrome)
    Filter {
        photo: PathBuf,
        style: FashionStyle,
        output: PathBuf,
        #[arg(long, default_value_t = 0.5)]
        intensity: f32,
    },
    /// Render landmarks onto a photo
    Landmarks {
        photo: PathBuf,
        output: PathBuf,
        #[command(flatten)]
        landmarks: LandmarkArgs,
        /// Only mark the landmarks of this region (e.g. `lips_outer`, `left_cheek`)
        #[arg(long)]
        region: Option<String>,
    },
}

#[derive(Args, Debug)]
struct LandmarkArgs {
    /// JSON file with precomputed face landmarks (no face if omitted)
    #[arg(long = "landmarks")]
    path: Option<PathBuf>,
}

impl LandmarkArgs {
    fn detector(&self) -> anyhow::Result<Precomputed> {
        match &self.path {
            Some(path) => Precomputed::load(path),
            None => Ok(Precomputed::no_face()),
        }
    }
}

fn main() -> anyhow::Result<ExitCode> {
    makeover::init_logger!();

    let cli = Cli::parse();
    let presets = match &cli.presets {
        Some(path) => Presets::load(path)?,
        None => Presets::default(),
    };

    let outcome = match cli.command {
        Command::Makeup {
            photo,
            output,
            landmarks,
            options,
            lips,
            eyeshadow,
            blush,
            intensity,
        } => {
            let mut opts = match options {
                Some(path) => serde_json::from_str(&std::fs::read_to_string(path)?)?,
                None => MakeupOptions::default(),
            };
            if let Some(c) = lips {
                opts.apply_lips = true;
                opts.lip_color = c;
            }
            if let Some(c) = eyeshadow {
                opts.apply_eyeshadow = true;
                opts.eyeshadow_color = c;
            }
            if let Some(c) = blush {
                opts.apply_blush = true;
                opts.blush_color = c;
            }
            if let Some(i) = intensity {
                opts.intensity = i;
            }

            let photo = Image::load(photo)?;
            let outcome = makeup::apply(&mut landmarks.detector()?, &photo, &opts, &presets);
            finish(outcome, &output)?
        }
        Command::Style {
            photo,
            reference,
            output,
            landmarks,
        } => {
            let photo = Image::load(photo)?;
            let reference = Image::load(reference)?;
            let outcome = style::transfer(&mut landmarks.detector()?, &photo, &reference, &presets);
            finish(outcome, &output)?
        }
        Command::Recolor {
            sprite,
            color,
            output,
        } => {
            let sprite = Image::load(sprite)?;
            let outcome = garment::recolor_hex(&sprite, &color, &presets.recolor);
            finish(outcome, &output)?
        }
        Command::TryOn {
            photo,
            garment: sprite,
            output,
            x,
            y,
            scale,
            color: recolor_to,
        } => {
            let photo = Image::load(photo)?;
            let mut sprite = Image::load(sprite)?;
            if let Some(spec) = recolor_to {
                sprite = garment::recolor(&sprite, color::hex_to_rgb(&spec), &presets.recolor);
            }
            let outcome = garment::place(&photo, &sprite, Placement { x, y, scale });
            finish(outcome, &output)?
        }
        Command::Filter {
            photo,
            style,
            output,
            intensity,
        } => {
            let photo = Image::load(photo)?;
            fashion::apply(&photo, style, intensity).save(&output)?;
            true
        }
        Command::Landmarks {
            photo,
            output,
            landmarks,
            region,
        } => {
            let region = match region {
                Some(name) => Some(regions::by_name(&name).ok_or_else(|| {
                    let known = regions::ALL.iter().map(|r| r.name).collect::<Vec<_>>();
                    anyhow::anyhow!("unknown region '{name}' (known: {})", known.join(", "))
                })?),
                None => None,
            };

            let mut photo = Image::load(photo)?;
            match (landmarks.detector()?.landmarks(), region) {
                (Some(lms), Some(region)) => lms.draw_region(&mut photo, &region),
                (Some(lms), None) => lms.draw(&mut photo),
                (None, _) => log::warn!("no landmarks to draw"),
            }
            photo.save(&output)?;
            true
        }
    };

    Ok(if outcome {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(2)
    })
}

/// Logs the outcome, saves its image and returns whether the operation succeeded.
fn finish(outcome: Outcome, output: &Path) -> anyhow::Result<bool> {
    for note in &outcome.notes {
        log::warn!("{note}");
    }
    log::info!("{}", outcome.status);
    outcome.image.save(output)?;
    Ok(outcome.success())
}
