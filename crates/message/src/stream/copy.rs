use std::io;

use tracing::trace;

use crate::protocol::StreamError;
use crate::stream::Stream;

/// Size of each chunk moved by [`copy_to_stream`]
const COPY_CHUNK_SIZE: usize = 8 * 1024;

/// Copies everything from the current position of `src` into `dst`.
///
/// Reads 8 KiB chunks until `src` reports EOF (or hands back an empty chunk)
/// and writes each one completely. Returns the number of bytes copied.
///
/// # Errors
///
/// Read and write failures are returned as-is; the copy is not resumed.
pub fn copy_to_stream(src: &mut dyn Stream, dst: &mut dyn Stream) -> Result<u64, StreamError> {
    let mut copied = 0u64;
    let mut chunks = 0usize;

    while !src.eof() {
        let chunk = src.read(COPY_CHUNK_SIZE)?;
        if chunk.is_empty() {
            break;
        }

        let mut written = 0;
        while written < chunk.len() {
            let n = dst.write(&chunk[written..])?;
            if n == 0 {
                return Err(io::Error::from(io::ErrorKind::WriteZero).into());
            }
            written += n;
        }

        copied += chunk.len() as u64;
        chunks += 1;
    }

    trace!(copied, chunks, "copied stream");
    Ok(copied)
}
