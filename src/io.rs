//! File opening helpers with transparent gzip support.

use std::{
    fs::File,
    io::{BufRead, BufReader, BufWriter, Write},
    path::Path,
};

use flate2::{Compression, bufread::MultiGzDecoder, write::GzEncoder};
use log::trace;

use crate::error::Result;

fn is_gzip(path: &Path) -> bool {
    path.extension().and_then(|s| s.to_str()) == Some("gz")
}

/// Open a file for reading, decompressing it if the name ends in `.gz`.
///
/// Multi-member archives (bgzip output) are read to the end.
pub fn open_read_maybe_gz<P>(path: P) -> Result<Box<dyn BufRead>>
where
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let file = File::open(path).map(BufReader::new)?;
    if is_gzip(path) {
        trace!("opening {:?} as gzip for reading", path);
        Ok(Box::new(BufReader::new(MultiGzDecoder::new(file))))
    } else {
        trace!("opening {:?} as plain text for reading", path);
        Ok(Box::new(file))
    }
}

/// Output sink returned by [`open_write_maybe_gz`].
///
/// Call [`OutputWriter::finish`] once all data is written. Dropping the
/// writer instead still attempts to finish it, but any error is lost.
pub enum OutputWriter {
    Plain(BufWriter<File>),
    Gzip(GzEncoder<BufWriter<File>>),
}

impl OutputWriter {
    /// Flush buffered data and, for gzip output, write the stream trailer.
    pub fn finish(self) -> Result<()> {
        match self {
            OutputWriter::Plain(mut file) => file.flush()?,
            OutputWriter::Gzip(encoder) => encoder.finish()?.flush()?,
        }
        Ok(())
    }
}

impl Write for OutputWriter {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        match self {
            OutputWriter::Plain(file) => file.write(buf),
            OutputWriter::Gzip(encoder) => encoder.write(buf),
        }
    }

    fn flush(&mut self) -> std::io::Result<()> {
        match self {
            OutputWriter::Plain(file) => file.flush(),
            OutputWriter::Gzip(encoder) => encoder.flush(),
        }
    }
}

/// Create a file for writing, compressing it if the name ends in `.gz`.
pub fn open_write_maybe_gz<P>(path: P) -> Result<OutputWriter>
where
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let file = BufWriter::new(File::create(path)?);
    if is_gzip(path) {
        trace!("opening {:?} as gzip for writing", path);
        Ok(OutputWriter::Gzip(GzEncoder::new(
            file,
            Compression::default(),
        )))
    } else {
        trace!("opening {:?} as plain text for writing", path);
        Ok(OutputWriter::Plain(file))
    }
}
