//! vpxsplit CLI
//!
//! Inspect, extract and cut VP8/VP9 streams stored in IVF or WebM files

use bytes::Bytes;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing::info;
use vpxsplit_lib::codec::{fourcc_to_string, is_keyframe, Codec};
use vpxsplit_lib::format::ivf::{IvfHeader, IvfWriter, DEFAULT_FRAME_RATE};
use vpxsplit_lib::format::{FrameReader, VideoParams};
use vpxsplit_lib::{init, Config};

#[derive(Parser)]
#[command(name = "vpxsplit")]
#[command(about = "Extract VP8/VP9 frames from IVF and WebM files", long_about = None)]
#[command(version)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Enable debug output
    #[arg(short, long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show container and stream parameters
    Info {
        /// Input file path
        input: PathBuf,
    },

    /// List every coded frame with its size
    Frames {
        /// Input file path
        input: PathBuf,

        /// Stop after this many frames
        #[arg(short = 'n', long)]
        limit: Option<u64>,
    },

    /// Write every coded frame into a new IVF file
    Extract {
        /// Input file path
        input: PathBuf,

        /// Output IVF file
        #[arg(short, long)]
        output: PathBuf,

        /// Stop after this many frames
        #[arg(short = 'n', long)]
        limit: Option<u64>,
    },

    /// Cut the stream into IVF files starting at keyframes
    Split {
        /// Input file path
        input: PathBuf,

        /// Output file prefix; files are named PREFIX_FIRST_LAST.ivf
        #[arg(short, long)]
        output: PathBuf,

        /// Minimum number of frames per output file
        #[arg(short, long, default_value = "30")]
        gop: u64,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = Config {
        verbose: cli.verbose,
        debug: cli.debug,
    };

    init(config)?;

    info!("vpxsplit v{}", vpxsplit_lib::VERSION);

    match cli.command {
        Commands::Info { input } => {
            cmd_info(&input)?;
        }
        Commands::Frames { input, limit } => {
            cmd_frames(&input, limit)?;
        }
        Commands::Extract {
            input,
            output,
            limit,
        } => {
            info!("Extracting {} -> {}", input.display(), output.display());
            cmd_extract(&input, &output, limit)?;
        }
        Commands::Split { input, output, gop } => {
            if gop == 0 {
                anyhow::bail!("--gop must be at least 1");
            }
            info!("Splitting {} every {} frames", input.display(), gop);
            cmd_split(&input, &output, gop)?;
        }
    }

    Ok(())
}

fn open_input(input: &Path) -> anyhow::Result<FrameReader> {
    FrameReader::open(input)
        .map_err(|e| anyhow::anyhow!("Failed to open {}: {}", input.display(), e))
}

fn stream_codec(params: &VideoParams) -> anyhow::Result<Codec> {
    params.codec().ok_or_else(|| {
        anyhow::anyhow!(
            "Unsupported codec fourcc {} (expected VP8 or VP9)",
            fourcc_to_string(params.fourcc)
        )
    })
}

/// IVF header for re-wrapped output
fn output_header(params: &VideoParams, codec: Codec) -> IvfHeader {
    let (fps_num, fps_den) = params.frame_rate().unwrap_or(DEFAULT_FRAME_RATE);
    IvfHeader::new(
        codec,
        params.width.min(u16::MAX as u32) as u16,
        params.height.min(u16::MAX as u32) as u16,
        fps_num,
        fps_den,
    )
}

fn cmd_info(input: &Path) -> anyhow::Result<()> {
    let reader = open_input(input)?;
    let params = reader.params();

    println!("File: {}", input.display());
    println!("  Format: {}", reader.format());
    match params.codec() {
        Some(codec) => println!("  Codec: {}", codec),
        None => println!("  Codec: unknown"),
    }
    println!("  FourCC: {}", fourcc_to_string(params.fourcc));
    println!("  Resolution: {}x{}", params.width, params.height);
    match params.frame_rate() {
        Some((num, den)) => println!("  Frame Rate: {}/{}", num, den),
        None => println!("  Frame Rate: unknown"),
    }

    Ok(())
}

fn cmd_frames(input: &Path, limit: Option<u64>) -> anyhow::Result<()> {
    let mut reader = open_input(input)?;
    let codec = reader.params().codec();

    let mut frame_no = 0u64;
    while limit.map_or(true, |limit| frame_no < limit) {
        let Some(frame) = reader.read() else {
            break;
        };
        let key = codec.is_some_and(|codec| is_keyframe(codec, frame.data()));
        println!(
            "Frame {:04}: {:8} bytes{}",
            frame_no,
            frame.len(),
            if key { " key" } else { "" }
        );
        frame_no += 1;
    }

    println!("{} frames", frame_no);
    Ok(())
}

fn cmd_extract(input: &Path, output: &Path, limit: Option<u64>) -> anyhow::Result<()> {
    let mut reader = open_input(input)?;
    let codec = stream_codec(reader.params())?;
    let mut writer = IvfWriter::create(output, output_header(reader.params(), codec))?;

    let mut frame_no = 0u64;
    while limit.map_or(true, |limit| frame_no < limit) {
        let Some(frame) = reader.read() else {
            break;
        };
        writer.write_frame(frame.data(), frame_no)?;
        frame_no += 1;
    }

    writer.finish()?;
    println!("Wrote {} frames to {}", frame_no, output.display());
    Ok(())
}

fn segment_path(prefix: &Path, first: u64, last: u64) -> PathBuf {
    let mut name = prefix.as_os_str().to_owned();
    name.push(format!("_{:04}_{:04}.ivf", first, last));
    PathBuf::from(name)
}

fn write_segment(
    prefix: &Path,
    header: IvfHeader,
    first: u64,
    frames: &[(Bytes, u64)],
) -> anyhow::Result<()> {
    if frames.is_empty() {
        return Ok(());
    }

    let last = first + frames.len() as u64 - 1;
    let path = segment_path(prefix, first, last);
    let mut writer = IvfWriter::create(&path, header)?;
    for (frame, timestamp) in frames {
        writer.write_frame(frame, *timestamp)?;
    }
    writer.finish()?;

    println!("Frames[{:04}-{:04}] => {}", first, last, path.display());
    Ok(())
}

fn cmd_split(input: &Path, prefix: &Path, gop: u64) -> anyhow::Result<()> {
    let mut reader = open_input(input)?;
    let codec = stream_codec(reader.params())?;
    let header = output_header(reader.params(), codec);

    let mut segment: Vec<(Bytes, u64)> = Vec::new();
    let mut first = 0u64;
    let mut frame_no = 0u64;

    while let Some(frame) = reader.read() {
        if is_keyframe(codec, frame.data()) && frame_no - first >= gop {
            write_segment(prefix, header, first, &segment)?;
            segment.clear();
            first = frame_no;
        }
        segment.push((frame.to_bytes(), frame.timestamp()));
        frame_no += 1;
    }

    write_segment(prefix, header, first, &segment)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_segment_path() {
        let path = segment_path(Path::new("out/clip"), 0, 29);
        assert_eq!(path, PathBuf::from("out/clip_0000_0029.ivf"));
    }

    #[test]
    fn test_cli_parses_split() {
        let cli = Cli::parse_from(["vpxsplit", "split", "in.webm", "-o", "out", "--gop", "10"]);
        match cli.command {
            Commands::Split { gop, .. } => assert_eq!(gop, 10),
            _ => panic!("expected split"),
        }
    }
}
