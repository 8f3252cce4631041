use std::io;
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result, anyhow, bail};
use clap::{Args, Parser, Subcommand};
use log::info;

use fractal_sampler::export::{
    bifurcation_image, frame_image, legend_image, save_image, save_samples, write_json_lines
};
use fractal_sampler::{
    BifurcationParams, ColorScheme, Event, Job, Message, RasterFrame, RasterParams,
    RasterResolution, Resolution, Sample, SampleParams, Session, ZoomRegion, load_job
};

#[derive(Parser)]
#[command(name = "fractal_sampler", about = "Streamed Mandelbrot and logistic-map sampling")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Render a colored Mandelbrot raster to PNG
    Raster(RasterArgs),
    /// Sample a Mandelbrot point cloud around a center
    Cloud(CloudArgs),
    /// Sample the logistic-map bifurcation diagram
    Bifurcation(BifurcationArgs),
    /// Write a palette strip for a color scheme
    Legend(LegendArgs),
    /// Run a job described in a JSON file
    Run(RunArgs),
}

#[derive(Args)]
struct RasterArgs {
    #[arg(long, default_value = "low")]
    resolution: RasterResolution,
    /// Width in pixels when --resolution custom
    #[arg(long)]
    width: Option<u32>,
    #[arg(long, default_value_t = 100)]
    max_iterations: u32,
    #[arg(long, default_value = "classic")]
    scheme: ColorScheme,
    #[arg(long, default_value_t = 2.0)]
    escape_radius: f64,
    /// centerX,centerY,width,height of the region to sample
    #[arg(long, value_delimiter = ',', allow_hyphen_values = true)]
    zoom_region: Option<Vec<f64>>,
    #[arg(long, default_value = "mandelbrot.png")]
    out: PathBuf,
}

#[derive(Args)]
struct CloudArgs {
    #[arg(long, default_value_t = -0.5, allow_hyphen_values = true)]
    center_x: f64,
    #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
    center_y: f64,
    #[arg(long, default_value_t = 1.0)]
    zoom: f64,
    #[arg(long, default_value = "medium")]
    resolution: Resolution,
    #[arg(long, default_value_t = 100)]
    max_iterations: u32,
    #[arg(long, default_value_t = 2.0)]
    escape_radius: f64,
    /// .json/.jsonl for JSON lines, anything else for a binary dump; stdout when omitted
    #[arg(long)]
    out: Option<PathBuf>,
}

#[derive(Args)]
struct BifurcationArgs {
    #[arg(long, default_value_t = 1.1)]
    start_r: f64,
    #[arg(long, default_value_t = 4.0)]
    end_r: f64,
    #[arg(long, default_value = "medium")]
    resolution: Resolution,
    #[arg(long, default_value_t = 0.0001)]
    accuracy: f64,
    #[arg(long, default_value_t = 300)]
    max_iterations: u32,
    #[arg(long, default_value_t = 100)]
    warmup: u32,
    #[arg(long)]
    out: Option<PathBuf>,
    /// Also plot the samples to this PNG
    #[arg(long)]
    plot: Option<PathBuf>,
}

#[derive(Args)]
struct LegendArgs {
    #[arg(long, default_value = "classic")]
    scheme: ColorScheme,
    #[arg(long, default_value_t = 100)]
    max_iterations: u32,
    #[arg(long, default_value_t = 512)]
    width: u32,
    #[arg(long, default_value_t = 32)]
    height: u32,
    #[arg(long, default_value = "legend.png")]
    out: PathBuf,
}

#[derive(Args)]
struct RunArgs {
    #[arg(long)]
    config: PathBuf,
    #[arg(long)]
    out: Option<PathBuf>,
}

enum Output {
    Frame(RasterFrame),
    Points(Vec<Sample>),
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    match cli.command {
        Command::Raster(args) => {
            let zoom_region = match args.zoom_region.as_deref() {
                None => None,
                Some(&[center_x, center_y, width, height]) => {
                    Some(ZoomRegion { center_x, center_y, width, height })
                }
                Some(other) => bail!("--zoom-region takes 4 values, got {}", other.len()),
            };
            let params = RasterParams {
                max_iterations: args.max_iterations,
                resolution: args.resolution,
                custom_resolution: args.width,
                color_scheme: args.scheme,
                escape_radius: args.escape_radius,
                zoom_region,
            };
            let output = execute(Job::Raster(params)).await?;
            write_output(output, Some(&args.out))?;
        }
        Command::Cloud(args) => {
            let params = SampleParams {
                center_x: args.center_x,
                center_y: args.center_y,
                zoom: args.zoom,
                resolution: args.resolution,
                max_iterations: args.max_iterations,
                escape_radius: args.escape_radius,
            };
            let output = execute(Job::Cloud(params)).await?;
            write_output(output, args.out.as_deref())?;
        }
        Command::Bifurcation(args) => {
            let params = BifurcationParams {
                start_r: args.start_r,
                end_r: args.end_r,
                resolution: args.resolution,
                accuracy_value: args.accuracy,
                max_iterations: args.max_iterations,
                warmup_iterations: args.warmup,
            };
            let output = execute(Job::Bifurcation(params)).await?;
            if let (Some(plot), Output::Points(samples)) = (&args.plot, &output) {
                save_image(&bifurcation_image(samples, 1600, 900), plot)?;
            }
            write_output(output, args.out.as_deref())?;
        }
        Command::Legend(args) => {
            let img = legend_image(args.max_iterations, args.scheme, args.width, args.height);
            save_image(&img, &args.out)?;
        }
        Command::Run(args) => {
            let job = load_job(&args.config)
                .with_context(|| format!("loading {}", args.config.display()))?;
            let output = execute(job).await?;
            write_output(output, args.out.as_deref())?;
        }
    }

    Ok(())
}

/// Runs one job through a session, logging progress, until its Complete arrives.
async fn execute(job: Job) -> Result<Output> {
    let name = job.name();
    let started = Instant::now();
    let mut session = Session::new();
    session.start(job);

    let mut points = Vec::new();
    loop {
        let envelope = tokio::select! {
            envelope = session.recv() => envelope.ok_or_else(|| anyhow!("session closed mid-run"))?,
            _ = tokio::signal::ctrl_c() => {
                session.cancel();
                bail!("{} run interrupted", name);
            }
        };

        match envelope.event {
            Event::Raster(Message::Chunk { payload, progress }) => {
                info!("{}: rows {}..{} of {} ({:.1}%)",
                    name, payload.rows.start, payload.rows.end, payload.height, progress * 100.0);
            }
            Event::Raster(Message::Complete { payload }) => {
                info!("{} done in {:.2?}", name, started.elapsed());
                let frame = payload.ok_or_else(|| anyhow!("raster run finished without a frame"))?;
                return Ok(Output::Frame(frame));
            }
            Event::Points(Message::Chunk { payload, progress }) => {
                info!("{}: +{} points ({:.1}%)", name, payload.len(), progress * 100.0);
                points.extend(payload);
            }
            Event::Points(Message::Complete { .. }) => {
                info!("{} done in {:.2?}: {} points", name, started.elapsed(), points.len());
                return Ok(Output::Points(points));
            }
        }
    }
}

fn write_output(output: Output, out: Option<&Path>) -> Result<()> {
    match output {
        Output::Frame(frame) => {
            let path = out.unwrap_or(Path::new("mandelbrot.png"));
            save_image(&frame_image(&frame)?, path)?;
        }
        Output::Points(samples) => match out {
            None => write_json_lines(io::stdout().lock(), &samples)?,
            Some(path) if is_json(path) => {
                let file = std::fs::File::create(path)
                    .with_context(|| format!("creating {}", path.display()))?;
                write_json_lines(io::BufWriter::new(file), &samples)?;
            }
            Some(path) => save_samples(&samples, path)?,
        },
    }
    Ok(())
}

fn is_json(path: &Path) -> bool {
    matches!(path.extension().and_then(|e| e.to_str()), Some("json" | "jsonl"))
}
