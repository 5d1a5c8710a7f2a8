//Enable more cargo lint tests
#![warn(rust_2018_idioms)]
#![warn(clippy::disallowed_types)]

use std::path::Path;

use huffpack::compression::compress::{compress_file, compress_stdin};
use huffpack::compression::decompress::{decompress_file, decompress_stdin, test_file};
use huffpack::tools::cli::{hufopts_init, HufOpts, Mode};
use huffpack::tools::report::{file_codes, text_codes};
use huffpack::{HufError, Result};

use log::{error, info, LevelFilter};
use simplelog::{ColorChoice, Config, TermLogger, TerminalMode};

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

fn main() -> Result<()> {
    // Available log levels are Error, Warn, Info, Debug, Trace. Logs go to stderr so that
    // --stdout output is not mixed with them.
    if let Err(e) = TermLogger::init(
        LevelFilter::Trace,
        Config::default(),
        TerminalMode::Stderr,
        ColorChoice::Auto,
    ) {
        eprintln!("Could not start logging: {}", e);
    }

    let opts = hufopts_init();

    //----- Figure how what we need to do and go do it
    let result = run(&opts);
    if let Err(e) = &result {
        error!("{}", e);
    }
    info!("Done.");
    result
}

fn run(opts: &HufOpts) -> Result<()> {
    if let Some(text) = &opts.text {
        print!("{}", text_codes(text)?);
    }
    if opts.files.is_empty() {
        return match opts.op_mode {
            Mode::Zip => compress_stdin().map(|_| ()),
            Mode::Unzip => decompress_stdin().map(|_| ()),
            // Text was handled above; anything else needs a file
            Mode::Codes if opts.text.is_some() => Ok(()),
            Mode::Codes | Mode::Test => Err(HufError::Io(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                format!("{} mode needs at least one input file", opts.op_mode),
            ))),
        };
    }

    for file in &opts.files {
        let path = Path::new(file);
        match opts.op_mode {
            Mode::Zip => {
                compress_file(opts, path)?;
            }
            Mode::Unzip => {
                decompress_file(opts, path)?;
            }
            Mode::Test => {
                test_file(path)?;
            }
            Mode::Codes => print!("{}", file_codes(path)?),
        }
    }
    Ok(())
}
