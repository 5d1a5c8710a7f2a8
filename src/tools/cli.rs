use clap::Parser;
use log::{info, warn};
use std::{fmt::Display, fmt::Formatter};

/// Verbosity of user information
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verbosity {
    Quiet,
    Errors,
    Warnings,
    Info,
    Debug,
    Trace,
}

/// Zip, Unzip, Test, or just show the codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Zip,
    Unzip,
    Test,
    Codes,
}
impl Display for Mode {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// Define the two output channels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Output {
    File,
    Stdout,
}
impl Display for Output {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HufOpts {
    /// Vec of names of files to read for input
    pub files: Vec<String>,
    /// Silently overwrite existing files with the same name
    pub force_overwrite: bool,
    /// Compress/Decompress/Test/Codes
    pub op_mode: Mode,
    /// Location where output is sent
    pub output: Output,
    /// Extension added to compressed files
    pub suffix: String,
    /// Text to build and show codes for, in place of a file
    pub text: Option<String>,
    /// Verbosity of user information
    pub verbose: Verbosity,
}

impl HufOpts {
    pub fn new() -> Self {
        Self {
            files: vec![],
            force_overwrite: false,
            op_mode: Mode::Zip,
            output: Output::File,
            suffix: "huf".to_string(),
            text: None,
            verbose: Verbosity::Warnings,
        }
    }
}

impl Default for HufOpts {
    fn default() -> Self {
        Self::new()
    }
}

/// Command Line Interpretation - uses external CLAP crate.
#[derive(Parser, Debug)]
#[clap(
    version,
    about = "A static Huffman file compressor",
    long_about = "
    Compresses each byte of a file with a Huffman code built from the byte counts of that
    same file. The counts are stored at the front of the compressed file so that the
    decoder can rebuild exactly the same code.

    If no file names are given, huffpack compresses or decompresses from standard input
    to standard output."
)]
struct Args {
    /// Files to process
    #[clap()]
    files: Vec<String>,

    /// Perform compression on the input files (the default)
    #[clap(short = 'z', long = "compress")]
    compress: bool,

    /// Perform decompression on the input files
    #[clap(short = 'd', long = "decompress")]
    decompress: bool,

    /// Test compressed file integrity
    #[clap(short = 't', long = "test")]
    test: bool,

    /// Print the code table of each input file instead of compressing it
    #[clap(long = "codes")]
    codes: bool,

    /// Print the code table for this text
    #[clap(long = "text", value_name = "TEXT")]
    text: Option<String>,

    /// Overwrite existing output files
    #[clap(short = 'f', long = "force")]
    force: bool,

    /// Send output to standard out
    #[clap(short = 'c', long = "stdout")]
    stdout: bool,

    /// Extension for compressed files
    #[clap(short = 'S', long = "suffix", default_value = "huf")]
    suffix: String,

    /// Be verbose (repeat for more)
    #[clap(short = 'v', long = "verbose", parse(from_occurrences))]
    verbose: u64,

    /// Only report errors; twice to suppress all log messages
    #[clap(short = 'q', long = "quiet", parse(from_occurrences))]
    quiet: u64,
}

/// Put command line information from CLAP into our internal structure.
fn from_args(args: Args) -> HufOpts {
    let mut opts = HufOpts::new();

    // Most specific mode wins when several are given.
    opts.op_mode = if args.codes || args.text.is_some() {
        Mode::Codes
    } else if args.test {
        Mode::Test
    } else if args.decompress {
        Mode::Unzip
    } else {
        Mode::Zip
    };
    if args.compress && opts.op_mode != Mode::Zip {
        warn!("--compress ignored, running in {} mode", opts.op_mode);
    }

    opts.files = args.files;
    opts.force_overwrite = args.force;
    if args.stdout {
        opts.output = Output::Stdout
    };
    opts.suffix = args.suffix.trim_start_matches('.').to_string();
    opts.text = args.text;
    // Any -q overrides -v.
    opts.verbose = match (args.quiet, args.verbose) {
        (0, 0) => Verbosity::Warnings,
        (0, 1) => Verbosity::Info,
        (0, 2) => Verbosity::Debug,
        (0, _) => Verbosity::Trace,
        (1, _) => Verbosity::Errors,
        _ => Verbosity::Quiet,
    };
    opts
}

/// Parse an explicit argument list (the first item is the program name).
pub fn hufopts_from<I, T>(args: I) -> Result<HufOpts, clap::Error>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    Args::try_parse_from(args).map(from_args)
}

/// Read the process command line, set the log level and report the settings.
pub fn hufopts_init() -> HufOpts {
    let opts = from_args(Args::parse());

    // Set the log level
    log::set_max_level(level_filter(opts.verbose));

    info!("---- huffpack {} ----", env!("CARGO_PKG_VERSION"));
    info!("Verbosity set to {}", log::max_level());
    info!("Operational mode set to {}", opts.op_mode);
    if opts.files.is_empty() && opts.text.is_none() {
        info!("Reading standard input, writing standard output");
    }
    for file in &opts.files {
        info!("Getting input from the file {}", file);
    }
    info!("Output sent to {}", opts.output);
    if opts.force_overwrite {
        info!("Forcing file overwriting")
    };
    opts
}

/// Log filter for a verbosity setting.
pub fn level_filter(verbose: Verbosity) -> log::LevelFilter {
    match verbose {
        Verbosity::Quiet => log::LevelFilter::Off,
        Verbosity::Errors => log::LevelFilter::Error,
        Verbosity::Warnings => log::LevelFilter::Warn,
        Verbosity::Info => log::LevelFilter::Info,
        Verbosity::Debug => log::LevelFilter::Debug,
        Verbosity::Trace => log::LevelFilter::Trace,
    }
}

#[cfg(test)]
mod test {
    use super::{hufopts_from, level_filter, HufOpts, Mode, Output, Verbosity};

    #[test]
    fn defaults_test() {
        let opts = hufopts_from(["huffpack", "a.txt"]).unwrap();
        assert_eq!(
            opts,
            HufOpts {
                files: vec!["a.txt".to_string()],
                ..HufOpts::default()
            }
        );
    }

    #[test]
    fn short_flags_test() {
        let opts = hufopts_from(["huffpack", "-dfc", "-vv", "a.huf", "b.huf"]).unwrap();
        assert_eq!(opts.op_mode, Mode::Unzip);
        assert!(opts.force_overwrite);
        assert_eq!(opts.output, Output::Stdout);
        assert_eq!(opts.verbose, Verbosity::Debug);
        assert_eq!(opts.files, vec!["a.huf", "b.huf"]);
    }

    #[test]
    fn mode_priority_test() {
        let opts = hufopts_from(["huffpack", "-d", "-t", "x"]).unwrap();
        assert_eq!(opts.op_mode, Mode::Test);
        let opts = hufopts_from(["huffpack", "-t", "--text", "hello"]).unwrap();
        assert_eq!(opts.op_mode, Mode::Codes);
        assert_eq!(opts.text.as_deref(), Some("hello"));
    }

    #[test]
    fn suffix_test() {
        let opts = hufopts_from(["huffpack", "--suffix", ".gz", "x"]).unwrap();
        assert_eq!(opts.suffix, "gz");
    }

    #[test]
    fn quiet_test() {
        let opts = hufopts_from(["huffpack", "-q", "-vvv"]).unwrap();
        assert_eq!(opts.verbose, Verbosity::Errors);
        assert_eq!(level_filter(opts.verbose), log::LevelFilter::Error);
        let opts = hufopts_from(["huffpack", "-qq"]).unwrap();
        assert_eq!(opts.verbose, Verbosity::Quiet);
        assert_eq!(level_filter(opts.verbose), log::LevelFilter::Off);
        let opts = hufopts_from(["huffpack", "--quiet", "-v", "--quiet", "-q"]).unwrap();
        assert_eq!(opts.verbose, Verbosity::Quiet);
    }

    #[test]
    fn bad_flag_test() {
        assert!(hufopts_from(["huffpack", "--nope"]).is_err());
    }
}
