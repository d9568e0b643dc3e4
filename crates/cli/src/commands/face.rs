//! `face render` and `face describe`.

use anyhow::Context;
use clap::{Args, Subcommand};
use sigaid_face::Face;
use std::path::PathBuf;

/// `sigaid face` subcommands.
#[derive(Subcommand)]
pub enum FaceCommand {
    /// Render the vector graphic for an input.
    Render(RenderArgs),
    /// Print the feature description for an input.
    Describe(DescribeArgs),
}

/// Arguments for `sigaid face render`.
#[derive(Args)]
pub struct RenderArgs {
    /// The input: hex with `--hex`, otherwise raw text (hashed if not
    /// exactly 32 bytes).
    pub input: String,
    /// Interpret the input as hex.
    #[arg(long)]
    pub hex: bool,
    /// Output size in pixels.
    #[arg(long, default_value_t = 200)]
    pub size: u32,
    /// Emit the animated variant.
    #[arg(long)]
    pub animated: bool,
    /// Write to a file instead of stdout.
    #[arg(long)]
    pub out: Option<PathBuf>,
}

/// Arguments for `sigaid face describe`.
#[derive(Args)]
pub struct DescribeArgs {
    /// The input: hex with `--hex`, otherwise raw text.
    pub input: String,
    /// Interpret the input as hex.
    #[arg(long)]
    pub hex: bool,
}

fn face_for(input: &str, is_hex: bool) -> anyhow::Result<Face> {
    if is_hex {
        Face::from_hex(input).context("invalid hex input")
    } else {
        Ok(Face::from_bytes(input.as_bytes()))
    }
}

pub(crate) fn run(command: FaceCommand) -> anyhow::Result<()> {
    match command {
        FaceCommand::Render(args) => {
            let face = face_for(&args.input, args.hex)?;
            let svg = face.to_vector_graphic(args.size, args.animated);
            match args.out {
                Some(path) => std::fs::write(&path, svg)
                    .with_context(|| format!("writing {}", path.display()))?,
                None => println!("{}", svg),
            }
            Ok(())
        }
        FaceCommand::Describe(args) => {
            let face = face_for(&args.input, args.hex)?;
            println!("{}", face.full_description());
            Ok(())
        }
    }
}
