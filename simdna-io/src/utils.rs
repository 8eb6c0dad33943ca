use std::ffi::OsStr;
use std::fs::File;
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};

use flate2::Compression;
use flate2::read::MultiGzDecoder;
use flate2::write::GzEncoder;

fn is_gzipped(path: &Path) -> bool {
    path.extension() == Some(OsStr::new("gz"))
}

///
/// Get a reader for either a gzip'd or non-gzip'd file.
///
/// # Arguments
///
/// - path: path to the file to read
///
pub fn get_dynamic_reader(path: &Path) -> io::Result<BufReader<Box<dyn Read>>> {
    let file = File::open(path)?;
    let file: Box<dyn Read> = match is_gzipped(path) {
        true => Box::new(MultiGzDecoder::new(file)),
        false => Box::new(file),
    };

    Ok(BufReader::new(file))
}

/// A file writer that gzip-compresses when the path ends in `.gz`.
pub enum DynamicWriter {
    Plain(BufWriter<File>),
    Gzip(GzEncoder<BufWriter<File>>),
}

impl DynamicWriter {
    /// Flush everything, writing the gzip trailer if there is one.
    pub fn finish(self) -> io::Result<()> {
        match self {
            DynamicWriter::Plain(mut writer) => writer.flush(),
            DynamicWriter::Gzip(encoder) => encoder.finish()?.flush(),
        }
    }
}

impl Write for DynamicWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            DynamicWriter::Plain(writer) => writer.write(buf),
            DynamicWriter::Gzip(encoder) => encoder.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            DynamicWriter::Plain(writer) => writer.flush(),
            DynamicWriter::Gzip(encoder) => encoder.flush(),
        }
    }
}

///
/// Get a writer for either a gzip'd or non-gzip'd file, creating parent
/// directories as needed.
///
/// # Arguments
///
/// - path: path to the file to write
///
pub fn get_dynamic_writer(path: &Path) -> io::Result<DynamicWriter> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    let file = BufWriter::new(File::create(path)?);
    Ok(match is_gzipped(path) {
        true => DynamicWriter::Gzip(GzEncoder::new(file, Compression::default())),
        false => DynamicWriter::Plain(file),
    })
}

///
/// Build the path of a companion file next to `path`.
///
/// The file name is cut at its first `.`, then `suffix` and `extension` are
/// appended, so `out/run.simdata.gz` with `("_info", ".txt")` becomes
/// `out/run_info.txt`.
///
pub fn companion_path(path: &Path, suffix: &str, extension: &str) -> PathBuf {
    let file_name = path
        .file_name()
        .and_then(OsStr::to_str)
        .unwrap_or_default();
    let core = match file_name.split_once('.') {
        Some((core, _)) if !core.is_empty() => core,
        _ => file_name,
    };
    path.with_file_name(format!("{}{}{}", core, suffix, extension))
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[case("out/run.simdata.gz", "_info", ".txt", "out/run_info.txt")]
    #[case("run.txt", "", ".fa", "run.fa")]
    #[case("/tmp/sims/density", "_info", ".txt", "/tmp/sims/density_info.txt")]
    fn test_companion_path(
        #[case] path: &str,
        #[case] suffix: &str,
        #[case] extension: &str,
        #[case] expected: &str,
    ) {
        assert_eq!(
            companion_path(Path::new(path), suffix, extension),
            PathBuf::from(expected)
        );
    }

    #[rstest]
    #[case("lines.txt")]
    #[case("lines.txt.gz")]
    fn test_writer_and_reader_agree(#[case] file_name: &str) {
        use std::io::BufRead;

        let tempdir = tempfile::tempdir().unwrap();
        let path = tempdir.path().join("nested").join(file_name);

        let mut writer = get_dynamic_writer(&path).unwrap();
        writeln!(writer, "first").unwrap();
        writeln!(writer, "second").unwrap();
        writer.finish().unwrap();

        let lines: Vec<String> = get_dynamic_reader(&path)
            .unwrap()
            .lines()
            .map(|l| l.unwrap())
            .collect();
        assert_eq!(lines, vec!["first", "second"]);
    }
}
