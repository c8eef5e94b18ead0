// LogSieve - platform/fs.rs
//
// Whole-file text reads for the loader.
//
// The encoding is taken from the byte-order mark: UTF-8, UTF-16 LE/BE and
// UTF-32 LE/BE are recognised and the mark itself is stripped. Without a
// mark the content is UTF-8. Invalid sequences are replaced, never
// rejected. Large files are memory-mapped; small files are read with
// retries on transient I/O errors.

use crate::util::constants::{MAX_READ_RETRIES, READ_RETRY_DELAYS_MS};
use std::io;
use std::path::Path;
use std::time::Duration;

/// Read a whole file as text.
///
/// Files at or above `large_threshold` bytes go through `memmap2`.
pub fn read_text(path: &Path, large_threshold: u64) -> io::Result<String> {
    let size = std::fs::metadata(path)?.len();
    if size >= large_threshold {
        tracing::debug!(
            file = %path.display(),
            size_mb = size / (1024 * 1024),
            "Large file, memory-mapping"
        );
        read_mapped(path)
    } else {
        read_with_retry(path)
    }
}

fn read_mapped(path: &Path) -> io::Result<String> {
    let file = std::fs::File::open(path)?;
    // SAFETY: the map is read-only and dropped before returning. External
    // modification during the read is accepted for a batch log viewer.
    let mmap = unsafe { memmap2::Mmap::map(&file)? };
    Ok(decode(&mmap))
}

fn read_with_retry(path: &Path) -> io::Result<String> {
    let mut last_err: Option<io::Error> = None;

    for attempt in 0..MAX_READ_RETRIES {
        match std::fs::read(path) {
            Ok(bytes) => return Ok(decode_owned(bytes)),
            Err(e) if is_transient_error(&e) => {
                tracing::debug!(
                    file = %path.display(),
                    attempt = attempt + 1,
                    error = %e,
                    "Transient I/O error, retrying"
                );
                std::thread::sleep(Duration::from_millis(
                    READ_RETRY_DELAYS_MS[attempt as usize],
                ));
                last_err = Some(e);
            }
            Err(e) => return Err(e),
        }
    }

    Err(last_err.unwrap_or_else(|| io::Error::other("Unknown read error")))
}

/// Text encodings identified by a leading byte-order mark.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Encoding {
    Utf8,
    Utf16Le,
    Utf16Be,
    Utf32Le,
    Utf32Be,
}

/// Detect the encoding and the length of its byte-order mark.
///
/// UTF-32 LE is checked before UTF-16 LE: its mark starts with the same
/// two bytes.
fn sniff_bom(bytes: &[u8]) -> (Encoding, usize) {
    match bytes {
        [0xFF, 0xFE, 0x00, 0x00, ..] => (Encoding::Utf32Le, 4),
        [0x00, 0x00, 0xFE, 0xFF, ..] => (Encoding::Utf32Be, 4),
        [0xEF, 0xBB, 0xBF, ..] => (Encoding::Utf8, 3),
        [0xFF, 0xFE, ..] => (Encoding::Utf16Le, 2),
        [0xFE, 0xFF, ..] => (Encoding::Utf16Be, 2),
        _ => (Encoding::Utf8, 0),
    }
}

/// Decode file content, honouring any byte-order mark.
pub fn decode(bytes: &[u8]) -> String {
    let (encoding, bom_len) = sniff_bom(bytes);
    let body = &bytes[bom_len..];

    match encoding {
        Encoding::Utf8 => String::from_utf8_lossy(body).into_owned(),
        Encoding::Utf16Le => decode_utf16(body, u16::from_le_bytes),
        Encoding::Utf16Be => decode_utf16(body, u16::from_be_bytes),
        Encoding::Utf32Le => decode_utf32(body, u32::from_le_bytes),
        Encoding::Utf32Be => decode_utf32(body, u32::from_be_bytes),
    }
}

/// Like `decode`, but avoids a copy for plain valid UTF-8.
fn decode_owned(bytes: Vec<u8>) -> String {
    if sniff_bom(&bytes).1 > 0 {
        return decode(&bytes);
    }
    match String::from_utf8(bytes) {
        Ok(s) => s,
        Err(e) => String::from_utf8_lossy(e.as_bytes()).into_owned(),
    }
}

fn decode_utf16(body: &[u8], unit: fn([u8; 2]) -> u16) -> String {
    let chunks = body.chunks_exact(2);
    let dangling = !chunks.remainder().is_empty();
    let units: Vec<u16> = chunks.map(|c| unit([c[0], c[1]])).collect();

    let mut text = String::from_utf16_lossy(&units);
    if dangling {
        text.push(char::REPLACEMENT_CHARACTER);
    }
    text
}

fn decode_utf32(body: &[u8], unit: fn([u8; 4]) -> u32) -> String {
    let chunks = body.chunks_exact(4);
    let dangling = !chunks.remainder().is_empty();

    let mut text: String = chunks
        .map(|c| {
            char::from_u32(unit([c[0], c[1], c[2], c[3]])).unwrap_or(char::REPLACEMENT_CHARACTER)
        })
        .collect();
    if dangling {
        text.push(char::REPLACEMENT_CHARACTER);
    }
    text
}

/// Returns true for transient I/O errors that are worth retrying.
fn is_transient_error(e: &io::Error) -> bool {
    matches!(
        e.kind(),
        io::ErrorKind::WouldBlock | io::ErrorKind::Interrupted | io::ErrorKind::TimedOut
    )
}
