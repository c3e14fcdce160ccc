//! enroll: store one person's reference face embedding.
//!
//! ```text
//! enroll --image ada.jpg --name ada --out-dir faces/ --bbox 0.3,0.2,0.4,0.5
//! ```

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing::info;

use face_gate::{enroll, DownsampleEmbedder, FaceBox};

#[derive(Parser, Debug)]
#[command(name = "enroll", about = "Enroll a reference face into the identity registry")]
struct Cli {
    /// Reference photo (PNG or JPEG)
    #[arg(long)]
    image: PathBuf,

    /// Identity name; becomes `<name>.json`
    #[arg(long)]
    name: String,

    /// Registry directory
    #[arg(long, default_value = "faces")]
    out_dir: PathBuf,

    /// Face box relative to the image: xmin,ymin,width,height
    #[arg(long, default_value_t = FaceBox::full())]
    bbox: FaceBox,

    /// Side of the square grayscale thumbnail used as the embedding
    #[arg(long, default_value_t = 32)]
    side: u32,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "enroll=info,face_gate=info".into()),
        )
        .init();

    info!("enrolling {} from {}", cli.name, cli.image.display());
    let embedder = DownsampleEmbedder { side: cli.side };
    let path = enroll(&embedder, &cli.image, &cli.bbox, &cli.name, &cli.out_dir)
        .with_context(|| format!("enrolling {}", cli.name))?;
    println!("saved embedding to {}", path.display());
    Ok(())
}
