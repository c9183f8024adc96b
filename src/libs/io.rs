use anyhow::Context;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

/// Opens `input` for buffered reading.
///
/// `stdin` reads from standard input, and files ending in `.gz` are
/// decompressed on the fly.
///
/// ```
/// use std::io::BufRead;
/// let reader = mafsplit::reader("tests/maf/example.maf").unwrap();
/// let lines = reader.lines().collect::<Vec<_>>();
/// assert_eq!(lines.len(), 19);
///
/// assert!(mafsplit::reader("tests/maf/not-there.maf").is_err());
/// ```
pub fn reader(input: &str) -> anyhow::Result<Box<dyn BufRead>> {
    let reader: Box<dyn BufRead> = if input == "stdin" {
        Box::new(BufReader::new(std::io::stdin()))
    } else {
        let path = Path::new(input);
        let file = std::fs::File::open(path)
            .with_context(|| format!("could not open {}", path.display()))?;

        if path.extension() == Some(std::ffi::OsStr::new("gz")) {
            Box::new(BufReader::new(flate2::read::MultiGzDecoder::new(file)))
        } else {
            Box::new(BufReader::new(file))
        }
    };

    Ok(reader)
}

/// Creates (or truncates) `output` for buffered writing.
pub fn writer<P: AsRef<Path>>(output: P) -> std::io::Result<Box<dyn Write>> {
    let file = std::fs::File::create(output)?;
    Ok(Box::new(BufWriter::new(file)))
}

/// Opens an existing `output` for buffered writing at its end.
pub fn appender<P: AsRef<Path>>(output: P) -> std::io::Result<Box<dyn Write>> {
    let file = std::fs::OpenOptions::new().append(true).open(output)?;
    Ok(Box::new(BufWriter::new(file)))
}
