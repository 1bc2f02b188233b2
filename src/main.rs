mod fetch;
mod logger;

use std::fs::{self, File};
use std::io::{BufWriter, Write as _};
use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::Parser;

use crate::fetch::{GLCOREARB_URL, HttpDownloader, KHRPLATFORM_URL, ensure_file};
use crate::logger::Logger;

/// Generates gl3w.h and gl3w.c from the Khronos glcorearb.h header.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Cli {
    /// Load extensions
    #[arg(long)]
    ext: bool,

    /// Root directory; GL/, KHR/ and gl3w.c live under it
    #[arg(long, env = "GL3W_ROOT", default_value = ".")]
    root: PathBuf,

    /// One of off, error, warn, info, debug, trace
    #[arg(long, env = "GL3W_LOG", default_value = "info")]
    log_level: log::LevelFilter,
}

fn write_file<F>(path: &Path, generate: F) -> anyhow::Result<()>
where
    F: FnOnce(&mut BufWriter<File>) -> anyhow::Result<()>,
{
    log::info!("generating {}...", path.display());

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("could not create {}", parent.display()))?;
    }
    let mut w = BufWriter::new(
        File::create(path).with_context(|| format!("could not create {}", path.display()))?,
    );
    generate(&mut w).with_context(|| format!("could not write {}", path.display()))?;
    w.flush()
        .with_context(|| format!("could not write {}", path.display()))?;

    Ok(())
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    Logger::init(cli.log_level)?;

    for dir in ["GL", "KHR"] {
        let path = cli.root.join(dir);
        fs::create_dir_all(&path).with_context(|| format!("could not create {}", path.display()))?;
    }

    let glcorearb_path = cli.root.join("GL/glcorearb.h");
    let mut downloader = HttpDownloader;
    ensure_file(&mut downloader, GLCOREARB_URL, &glcorearb_path)?;
    ensure_file(
        &mut downloader,
        KHRPLATFORM_URL,
        &cli.root.join("KHR/khrplatform.h"),
    )?;

    log::info!("parsing {}...", glcorearb_path.display());
    let header = fs::read_to_string(&glcorearb_path)
        .with_context(|| format!("could not read {}", glcorearb_path.display()))?;
    let records = gl3w_generator::extract(&header, cli.ext)?;
    log::info!("found {} functions", records.len());

    write_file(&cli.root.join("GL/gl3w.h"), |w| {
        gl3w_generator::generate_header(w, &records)
    })?;
    write_file(&cli.root.join("gl3w.c"), |w| {
        gl3w_generator::generate_source(w, &records)
    })?;

    Ok(())
}
