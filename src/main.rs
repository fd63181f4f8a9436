use build_map_loader::constants::{MAXSECTORS, MAXSPRITES, MAXWALLS};
use build_map_loader::{decode, Capacity, MapSummary, Sector, Sprite, Wall, World};
use clap::{ArgAction, Parser};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::{fs, io};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(version, about = "Decode Build engine maps and print a summary")]
struct Args {
    /// Map files to decode
    #[arg(required = true)]
    files: Vec<PathBuf>,

    /// Print JSON instead of one line per file
    #[arg(long)]
    json: bool,

    /// Include the decoded sectors, walls and sprites in the JSON output
    #[arg(long, requires = "json")]
    records: bool,

    #[arg(long, default_value_t = MAXSECTORS)]
    max_sectors: usize,

    #[arg(long, default_value_t = MAXWALLS)]
    max_walls: usize,

    #[arg(long, default_value_t = MAXSPRITES)]
    max_sprites: usize,

    /// More logging, repeat for more detail. RUST_LOG takes precedence.
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

// What gets printed for each file in JSON mode
#[derive(Serialize)]
struct Report<'a> {
    file: String,
    summary: &'a MapSummary,
    #[serde(skip_serializing_if = "Option::is_none")]
    sectors: Option<&'a [Sector]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    walls: Option<&'a [Wall]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    sprites: Option<&'a [Sprite]>,
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

// Read a file into a u8 vector
fn read_file(filename: &Path) -> io::Result<Vec<u8>> {
    let data = fs::read(filename)?;
    info!("Read {} bytes from {}", data.len(), filename.display());
    Ok(data)
}

fn print_line(path: &Path, summary: &MapSummary) {
    let start = &summary.start;
    let mut line = format!(
        "{}: {:?} version 0x{:x}, {} sectors, {} walls, {} sprites",
        path.display(),
        summary.format,
        summary.format.version(),
        summary.numsectors,
        summary.numwalls,
        summary.numsprites,
    );
    line.push_str(&format!(
        ", start ({}, {}, {}) ang {} sector {}",
        start.x, start.y, start.z, start.ang, start.sector
    ));

    if let Some(extended) = &summary.extended {
        line.push_str(&format!(
            ", revision {}, visibility {}",
            extended.revision, extended.visibility
        ));
    }
    if let Some(pskyoff) = &summary.pskyoff {
        line.push_str(&format!(", {} sky offsets", pskyoff.len()));
    }

    println!("{}", line);
}

fn print_json(
    args: &Args,
    path: &Path,
    summary: &MapSummary,
    world: &World,
) -> serde_json::Result<()> {
    let report = Report {
        file: path.display().to_string(),
        summary,
        sectors: args.records.then(|| world.sectors_of(summary)),
        walls: args.records.then(|| world.walls_of(summary)),
        sprites: args.records.then(|| world.sprites_of(summary)),
    };

    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

// Decode one file and print it. Errors are reported by the caller.
fn process(args: &Args, path: &Path, world: &mut World) -> Result<(), String> {
    let data = read_file(path).map_err(|e| format!("unable to read file: {}", e))?;
    let summary = decode(&data, world).map_err(|e| e.to_string())?;

    if args.json {
        print_json(args, path, &summary, world).map_err(|e| e.to_string())?;
    } else {
        print_line(path, &summary);
    }

    Ok(())
}

pub fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(args.verbose);

    let mut world = World::with_capacity(Capacity {
        sectors: args.max_sectors,
        walls: args.max_walls,
        sprites: args.max_sprites,
    });

    let mut failed = false;
    for path in &args.files {
        if let Err(message) = process(&args, path, &mut world) {
            eprintln!("{}: {}", path.display(), message);
            failed = true;
        }
    }

    if failed {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
