use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand};
use image::GrayImage;
use rf_core::{PadMode, Signal};
use rf_rank::{RankConfig, RankOutput, RankParams, rank_filter, rank_pool};
use serde::Serialize;

#[derive(Parser, Debug)]
#[command(name = "rf_gallery")]
#[command(about = "Run rank-order filters on image and signal fixtures")]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    #[command(name = "filter")]
    Filter(FilterArgs),
    #[command(name = "pool")]
    Pool(PoolArgs),
    #[command(name = "signal")]
    Signal(SignalArgs),
}

#[derive(Args, Debug, Clone)]
struct CommonArgs {
    #[arg(long, required = true)]
    input: PathBuf,
    #[arg(long, default_value = "docs/fig/raw")]
    out: PathBuf,
    /// 1-indexed ascending rank; defaults to the window median
    #[arg(long)]
    rank: Option<usize>,
    /// Kernel extent, one value or one per dimension (comma separated)
    #[arg(long, value_delimiter = ',', default_value = "3")]
    kernel: Vec<usize>,
    /// zeros, constant, reflect, replicate or circular
    #[arg(long, default_value_t = PadMode::Replicate)]
    mode: PadMode,
}

#[derive(Args, Debug, Clone)]
struct FilterArgs {
    #[command(flatten)]
    common: CommonArgs,
    /// Padding value for `--mode constant`
    #[arg(long)]
    value: Option<u8>,
}

#[derive(Args, Debug, Clone)]
struct PoolArgs {
    #[command(flatten)]
    common: CommonArgs,
    #[arg(long)]
    value: Option<u8>,
    #[arg(long, value_delimiter = ',', default_value = "2")]
    stride: Vec<usize>,
    #[arg(long, value_delimiter = ',', default_value = "0")]
    padding: Vec<usize>,
    /// Also write the padded-buffer index of every selected pixel
    #[arg(long)]
    indices: bool,
}

#[derive(Args, Debug, Clone)]
struct SignalArgs {
    #[command(flatten)]
    common: CommonArgs,
    #[arg(long)]
    value: Option<f32>,
}

#[derive(Debug, Clone, Serialize)]
struct MetaRank {
    variant: &'static str,
    rank: usize,
    window_volume: usize,
    kernel: Vec<usize>,
    stride: Vec<usize>,
    padding: Vec<usize>,
    mode: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    value: Option<f64>,
    input_shape: Vec<usize>,
    output_shape: Vec<usize>,
}

#[derive(Debug, Clone, Serialize)]
struct SelectedDto {
    out: [usize; 2],
    padded_index: usize,
    value: u8,
    /// `None` for pixels taken from constant padding.
    source: Option<[usize; 2]>,
}

#[derive(Debug, Clone, Serialize)]
struct IndicesDto {
    padded_shape: [usize; 2],
    selected: Vec<SelectedDto>,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.cmd {
        Command::Filter(args) => run_filter(args),
        Command::Pool(args) => run_pool(args),
        Command::Signal(args) => run_signal(args),
    }
}

fn run_filter(args: FilterArgs) -> Result<()> {
    let case_dir = prepare_case(&args.common, "filter", "input.png")?;
    let img = load_input_u8(&args.common.input)?;

    let params = RankParams {
        rank: resolve_rank(args.common.rank, &args.common.kernel, 2)?,
        kernel: args.common.kernel.clone(),
        ..RankParams::default()
    }
    .with_mode(args.common.mode, args.value);
    let cfg = RankConfig::<u8, 2>::new(&params).context("building filter configuration")?;

    let out = rank_filter(&img.as_view(), &cfg).context("running rank filter")?;
    save_u8_image(case_dir.join("filtered.png"), &out.values)?;

    write_json(
        case_dir.join("meta.json"),
        &meta(&cfg, args.value.map(f64::from), &img.shape(), &out.values.shape()),
    )?;
    log::info!(
        "filter: rank {}/{} over {:?} -> {}",
        cfg.rank(),
        cfg.window_volume(),
        img.shape(),
        case_dir.display()
    );

    Ok(())
}

fn run_pool(args: PoolArgs) -> Result<()> {
    let case_dir = prepare_case(&args.common, "pool", "input.png")?;
    let img = load_input_u8(&args.common.input)?;

    let params = RankParams::pool(
        resolve_rank(args.common.rank, &args.common.kernel, 2)?,
        &args.common.kernel,
        &args.stride,
        &args.padding,
    )
    .with_mode(args.common.mode, args.value)
    .with_indices(args.indices);
    let cfg = RankConfig::<u8, 2>::new(&params).context("building pool configuration")?;

    let out = rank_pool(&img.as_view(), &cfg).context("running rank pool")?;
    if out.values.is_empty() {
        bail!("pooling produced an empty image of shape {:?}.", out.values.shape());
    }
    save_u8_image(case_dir.join("pooled.png"), &out.values)?;

    if let Some(dto) = indices_dto(&out) {
        write_json(case_dir.join("indices.json"), &dto)?;
    }

    write_json(
        case_dir.join("meta.json"),
        &meta(&cfg, args.value.map(f64::from), &img.shape(), &out.values.shape()),
    )?;
    log::info!(
        "pool: {:?} -> {:?} into {}",
        img.shape(),
        out.values.shape(),
        case_dir.display()
    );

    Ok(())
}

fn run_signal(args: SignalArgs) -> Result<()> {
    let case_dir = prepare_case(&args.common, "signal", "input.csv")?;
    let values = read_csv(&args.common.input)?;
    let signal = Signal::from_vec([values.len()], values)
        .with_context(|| format!("constructing signal from {}", args.common.input.display()))?;

    let params = RankParams {
        rank: resolve_rank(args.common.rank, &args.common.kernel, 1)?,
        kernel: args.common.kernel.clone(),
        ..RankParams::default()
    }
    .with_mode(args.common.mode, args.value);
    let cfg = RankConfig::<f32, 1>::new(&params).context("building signal configuration")?;

    let out = rank_filter(&signal.as_view(), &cfg).context("running rank filter")?;
    write_csv(case_dir.join("filtered.csv"), out.values.data())?;

    write_json(
        case_dir.join("meta.json"),
        &meta(
            &cfg,
            args.value.map(f64::from),
            &signal.shape(),
            &out.values.shape(),
        ),
    )?;
    log::info!(
        "signal: {} samples -> {}",
        signal.len(),
        case_dir.display()
    );

    Ok(())
}

/// Explicit rank, or the median of a window with `kernel` broadcast to `dims`.
fn resolve_rank(rank: Option<usize>, kernel: &[usize], dims: usize) -> Result<usize> {
    if let Some(r) = rank {
        return Ok(r);
    }
    let volume = match kernel {
        [k] => k.checked_pow(dims as u32),
        ks => ks.iter().try_fold(1usize, |acc, &k| acc.checked_mul(k)),
    };
    match volume {
        Some(v) if v > 0 => Ok(v.div_ceil(2)),
        _ => bail!("cannot derive a median rank from kernel {:?}.", kernel),
    }
}

fn meta<T, const N: usize>(
    cfg: &RankConfig<T, N>,
    value: Option<f64>,
    input_shape: &[usize; N],
    output_shape: &[usize; N],
) -> MetaRank {
    MetaRank {
        variant: cfg.variant().as_str(),
        rank: cfg.rank(),
        window_volume: cfg.window_volume(),
        kernel: cfg.kernel().to_vec(),
        stride: cfg.stride().to_vec(),
        padding: cfg.padding().to_vec(),
        mode: cfg.pad_mode().as_str(),
        value: if cfg.pad_mode() == PadMode::Constant {
            value
        } else {
            None
        },
        input_shape: input_shape.to_vec(),
        output_shape: output_shape.to_vec(),
    }
}

fn indices_dto(out: &RankOutput<u8, 2>) -> Option<IndicesDto> {
    let indices = out.indices.as_ref()?;
    let width = indices.width();
    let selected = indices
        .data()
        .iter()
        .zip(out.values.data())
        .enumerate()
        .map(|(i, (&padded_index, &value))| SelectedDto {
            out: [i / width, i % width],
            padded_index,
            value,
            source: out.source_coord(padded_index),
        })
        .collect();

    Some(IndicesDto {
        padded_shape: out.padded_shape(),
        selected,
    })
}

fn prepare_case(common: &CommonArgs, case_name: &str, copy_name: &str) -> Result<PathBuf> {
    ensure_file_exists(&common.input, "input")?;

    let case_dir = common.out.join(case_name);
    fs::create_dir_all(&case_dir)
        .with_context(|| format!("creating output directory {}", case_dir.display()))?;

    fs::copy(&common.input, case_dir.join(copy_name)).with_context(|| {
        format!(
            "copying input {} -> {}",
            common.input.display(),
            case_dir.join(copy_name).display()
        )
    })?;

    Ok(case_dir)
}

fn load_input_u8(path: &Path) -> Result<Signal<u8, 2>> {
    let dyn_img =
        image::open(path).with_context(|| format!("opening input image {}", path.display()))?;
    let luma = dyn_img.to_luma8();
    let (w, h) = luma.dimensions();
    let data = luma.into_raw();

    Signal::from_vec([h as usize, w as usize], data)
        .with_context(|| format!("constructing rf-core image from {}", path.display()))
}

fn save_u8_image(path: PathBuf, img: &Signal<u8, 2>) -> Result<()> {
    let gray = GrayImage::from_raw(img.width() as u32, img.height() as u32, img.data().to_vec())
        .context("constructing GrayImage from raw bytes")?;
    gray.save(&path)
        .with_context(|| format!("saving image {}", path.display()))
}

fn write_json(path: PathBuf, value: &impl Serialize) -> Result<()> {
    let bytes = serde_json::to_vec_pretty(value).context("serializing json")?;
    fs::write(&path, bytes).with_context(|| format!("writing json {}", path.display()))
}

/// Reads the last column of every row; a non-numeric first row is a header.
fn read_csv(path: &Path) -> Result<Vec<f32>> {
    let text = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    let mut values = Vec::new();
    for (line_no, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let field = line.rsplit(',').next().unwrap_or(line).trim();
        match field.parse::<f32>() {
            Ok(v) => values.push(v),
            Err(_) if line_no == 0 => continue,
            Err(e) => bail!(
                "{}:{}: cannot parse '{}' as a sample: {e}",
                path.display(),
                line_no + 1,
                field
            ),
        }
    }
    Ok(values)
}

fn write_csv(path: PathBuf, values: &[f32]) -> Result<()> {
    let mut file =
        fs::File::create(&path).with_context(|| format!("creating {}", path.display()))?;
    writeln!(file, "index,value").context("writing csv header")?;
    for (i, v) in values.iter().enumerate() {
        writeln!(file, "{i},{v}").context("writing csv row")?;
    }
    Ok(())
}

fn ensure_file_exists(path: &Path, what: &str) -> Result<()> {
    if !path.exists() {
        bail!("{} file does not exist: {}", what, path.display());
    }
    if !path.is_file() {
        bail!("{} path is not a file: {}", what, path.display());
    }
    Ok(())
}
