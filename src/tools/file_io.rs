//! Output handling for the file front end: naming, overwrite protection, and writing through
//! a temporary file that only takes the final name once the codec has succeeded.

use std::ffi::OsString;
use std::fs::{self, File, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use log::{debug, warn};

use super::cli::{HufOpts, Output};
use crate::error::Result;

/// Name of the compressed file: the input name with the suffix appended.
pub fn compressed_name(path: &Path, suffix: &str) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(".");
    name.push(suffix);
    PathBuf::from(name)
}

/// Name of the restored file: the input name without its last extension, or with `.out`
/// added if it has none.
pub fn decompressed_name(path: &Path) -> PathBuf {
    if path.extension().is_some() {
        path.with_extension("")
    } else {
        compressed_name(path, "out")
    }
}

/// A sink for codec output: either standard out or a temporary file beside the final target.
pub struct OutputFile {
    /// Handle to the output stream
    writer: Box<dyn Write + Sync + Send>,
    /// (temporary, final) paths when writing to a file
    target: Option<(PathBuf, PathBuf)>,
}

impl OutputFile {
    /// Open the sink for `path`. Fails if the file exists and overwriting was not forced.
    pub fn create(opts: &HufOpts, path: &Path) -> Result<Self> {
        if opts.output == Output::Stdout {
            return Ok(Self {
                writer: Box::new(io::stdout()),
                target: None,
            });
        }
        if path.exists() && !opts.force_overwrite {
            return Err(io::Error::new(
                io::ErrorKind::AlreadyExists,
                format!("{} already exists, use --force to overwrite", path.display()),
            )
            .into());
        }
        let tmp = compressed_name(path, "tmp");
        let file: File = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&tmp)?;
        debug!("Writing to temporary file {}", tmp.display());
        Ok(Self {
            writer: Box::new(BufWriter::new(file)),
            target: Some((tmp, path.to_path_buf())),
        })
    }

    /// Flush and move the temporary file to its final name.
    pub fn commit(mut self) -> Result<()> {
        self.writer.flush()?;
        if let Some((tmp, path)) = self.target.take() {
            // Close the file before renaming it
            drop(self.writer);
            fs::rename(&tmp, &path)?;
            debug!("Renamed {} to {}", tmp.display(), path.display());
        }
        Ok(())
    }

    /// Drop the output, removing any temporary file.
    pub fn discard(self) {
        let Self { writer, target } = self;
        drop(writer);
        if let Some((tmp, _)) = target {
            if let Err(e) = fs::remove_file(&tmp) {
                warn!("Could not remove {}: {}", tmp.display(), e);
            }
        }
    }
}

impl Write for OutputFile {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.writer.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.writer.flush()
    }
}

#[cfg(test)]
mod test {
    use super::{compressed_name, decompressed_name, OutputFile};
    use crate::error::HufError;
    use crate::tools::cli::HufOpts;
    use std::io::Write;
    use std::path::{Path, PathBuf};

    fn scratch(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("huffpack-file-io-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        dir.join(name)
    }

    #[test]
    fn names_test() {
        assert_eq!(
            compressed_name(Path::new("dir/a.txt"), "huf"),
            PathBuf::from("dir/a.txt.huf")
        );
        assert_eq!(
            decompressed_name(Path::new("dir/a.txt.huf")),
            PathBuf::from("dir/a.txt")
        );
        assert_eq!(
            decompressed_name(Path::new("dir/plain")),
            PathBuf::from("dir/plain.out")
        );
    }

    #[test]
    fn commit_test() {
        let path = scratch("commit.bin");
        let _ = std::fs::remove_file(&path);
        let mut out = OutputFile::create(&HufOpts::new(), &path).unwrap();
        out.write_all(b"data").unwrap();
        assert!(!path.exists());
        out.commit().unwrap();
        assert_eq!(std::fs::read(&path).unwrap(), b"data");
        assert!(!compressed_name(&path, "tmp").exists());
    }

    #[test]
    fn discard_test() {
        let path = scratch("discard.bin");
        let _ = std::fs::remove_file(&path);
        let mut out = OutputFile::create(&HufOpts::new(), &path).unwrap();
        out.write_all(b"partial").unwrap();
        out.discard();
        assert!(!path.exists());
        assert!(!compressed_name(&path, "tmp").exists());
    }

    #[test]
    fn no_overwrite_test() {
        let path = scratch("exists.bin");
        std::fs::write(&path, b"keep me").unwrap();
        assert!(matches!(
            OutputFile::create(&HufOpts::new(), &path),
            Err(HufError::Io(ref e)) if e.kind() == std::io::ErrorKind::AlreadyExists
        ));

        let opts = HufOpts {
            force_overwrite: true,
            ..HufOpts::new()
        };
        let mut out = OutputFile::create(&opts, &path).unwrap();
        out.write_all(b"new").unwrap();
        out.commit().unwrap();
        assert_eq!(std::fs::read(&path).unwrap(), b"new");
    }
}
