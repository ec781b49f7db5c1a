//! Compression phase: gzip a finished dump into a sibling file.

use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use flate2::{Compression, GzBuilder};
use tracing::info;

use super::error::DumpError;

/// Stream `src` through a gzip encoder into `dst`, returning the number of
/// uncompressed bytes copied. `src` is only read; `dst` is truncated.
pub fn gzip_file(src: &Path, dst: &Path) -> Result<u64, DumpError> {
    let read_err = |source| DumpError::Read {
        path: src.to_path_buf(),
        source,
    };
    let input = File::open(src).map_err(read_err)?;
    let output = File::create(dst).map_err(|source| DumpError::Compress {
        path: dst.to_path_buf(),
        source,
    })?;

    let compress_err = |source| DumpError::Compress {
        path: dst.to_path_buf(),
        source,
    };

    let mut builder = GzBuilder::new();
    if let Some(name) = src.file_name() {
        builder = builder.filename(name.to_string_lossy().as_bytes());
    }
    let mut encoder = builder.write(BufWriter::new(output), Compression::default());

    let copied = copy_blocks(&mut BufReader::new(input), &mut encoder, read_err, compress_err)?;
    let mut writer = encoder.finish().map_err(compress_err)?;
    writer.flush().map_err(compress_err)?;

    info!(
        src = %src.display(),
        dst = %dst.display(),
        bytes = copied,
        "dump compressed"
    );
    Ok(copied)
}

/// `io::copy` with read and write failures kept apart.
fn copy_blocks<R, W, RE, WE>(
    reader: &mut R,
    writer: &mut W,
    read_err: RE,
    write_err: WE,
) -> Result<u64, DumpError>
where
    R: BufRead,
    W: Write,
    RE: Fn(io::Error) -> DumpError,
    WE: Fn(io::Error) -> DumpError,
{
    let mut copied = 0u64;
    loop {
        let block = match reader.fill_buf() {
            Ok(block) => block,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(read_err(e)),
        };
        if block.is_empty() {
            return Ok(copied);
        }
        let len = block.len();
        writer.write_all(block).map_err(&write_err)?;
        reader.consume(len);
        copied += len as u64;
    }
}
