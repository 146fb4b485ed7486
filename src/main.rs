//! Command line front end, decodes one JPEG file into a binary PPM image.

use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use clap::Parser;
use kpeg::{write_ppm, DecodeErrors, Decoder};
use log::{error, info};

/// A simple baseline JPEG decoder.
///
/// Decompresses a JPEG image into a binary PPM image written next to the
/// input with the extension replaced. Details of the decode are traced to
/// `kpeg.log` in the working directory.
#[derive(Parser, Debug)]
#[command(name = "kpeg", version, about)]
struct Args
{
    /// JPEG file to decompress
    input: PathBuf,
}

fn main()
{
    setup_logging();

    info!("kpeg - a simple baseline JPEG decoder");

    let args = Args::parse();

    if let Err(err) = run(&args.input)
    {
        eprintln!("{err}");
        std::process::exit(1);
    }
}

/// Route log records to an append-only `kpeg.log`.
///
/// When the file cannot be opened the records fall through to stderr, a
/// missing sink never stops a decode.
fn setup_logging()
{
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));

    if let Ok(sink) = OpenOptions::new().create(true).append(true).open("kpeg.log")
    {
        builder.target(env_logger::Target::Pipe(Box::new(sink)));
    }

    let _ = builder.try_init();
}

fn run(input: &Path) -> Result<(), DecodeErrors>
{
    println!("Decoding...");

    let mut decoder = Decoder::new();
    let pixels = decoder.decode_file(input).map_err(|err| {
        error!("Decoding '{}' failed: {}", input.display(), err);
        err
    })?;

    let output = input.with_extension("ppm");

    dump_raw_data(&output, &pixels, &decoder).map_err(|err| {
        error!("Unable to create dump file '{}': {}", output.display(), err);

        // do not leave a partial image behind
        let _ = std::fs::remove_file(&output);

        DecodeErrors::IoError(err)
    })?;

    info!("Raw image data dumped to file: '{}'", output.display());

    println!("Generated file: {}", output.display());
    println!("Complete! Check log file 'kpeg.log' for details.");

    Ok(())
}

fn dump_raw_data(output: &Path, pixels: &[u8], decoder: &Decoder) -> std::io::Result<()>
{
    let mut writer = BufWriter::new(File::create(output)?);

    write_ppm(
        &mut writer,
        pixels,
        usize::from(decoder.width()),
        usize::from(decoder.height()),
    )?;

    writer.flush()
}
