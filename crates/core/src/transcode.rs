//! Font transcoding to the compressed web-delivery format (WOFF).
//!
//! TrueType/OpenType binaries are repackaged into a WOFF 1.0 container
//! with per-table zlib compression. Inputs already in a web format
//! (woff, woff2) pass through untouched. Transcode failure is always
//! non-fatal for the caller: the original asset is still stored and
//! the web-optimized asset is simply omitted.

use std::io::Write;

use flate2::write::ZlibEncoder;
use flate2::Compression;

use crate::format::FontFormat;

/// WOFF 1.0 file header size in bytes.
const WOFF_HEADER_LEN: usize = 44;

/// WOFF table directory entry size in bytes.
const WOFF_DIR_ENTRY_LEN: usize = 20;

/// sfnt offset table size in bytes.
const SFNT_HEADER_LEN: usize = 12;

/// sfnt table record size in bytes.
const SFNT_DIR_ENTRY_LEN: usize = 16;

/// Recognized sfnt version tags: TrueType 1.0, 'OTTO' (CFF), 'true'.
const SFNT_VERSIONS: &[u32] = &[0x0001_0000, 0x4F54_544F, 0x7472_7565];

#[derive(Debug, thiserror::Error)]
pub enum TranscodeError {
    #[error("Malformed sfnt data: {0}")]
    Malformed(&'static str),

    #[error("Source format '{0}' cannot be converted to WOFF")]
    UnsupportedSource(&'static str),

    #[error("Table compression failed: {0}")]
    Compression(#[from] std::io::Error),
}

/// Result of a transcode attempt.
#[derive(Debug)]
pub enum TranscodeOutcome {
    /// The input is already a web format; store it as-is (no-op).
    AlreadyWeb,
    /// The input was repackaged into a WOFF container.
    Converted(Vec<u8>),
}

/// Convert a font binary to the web-delivery format.
///
/// Idempotent for woff/woff2 input. EOT carries a proprietary wrapper
/// this service does not unpack, so it is reported as unsupported.
pub fn to_web_format(
    data: &[u8],
    format: FontFormat,
) -> Result<TranscodeOutcome, TranscodeError> {
    match format {
        FontFormat::Woff | FontFormat::Woff2 => Ok(TranscodeOutcome::AlreadyWeb),
        FontFormat::Eot => Err(TranscodeError::UnsupportedSource("eot")),
        FontFormat::Ttf | FontFormat::Otf => sfnt_to_woff(data).map(TranscodeOutcome::Converted),
    }
}

/// One parsed sfnt table record.
struct SfntTable {
    tag: u32,
    checksum: u32,
    data_start: usize,
    data_len: usize,
}

/// Repackage an sfnt (ttf/otf) binary as a WOFF 1.0 container.
fn sfnt_to_woff(data: &[u8]) -> Result<Vec<u8>, TranscodeError> {
    let flavor = read_u32(data, 0).ok_or(TranscodeError::Malformed("missing sfnt header"))?;
    if !SFNT_VERSIONS.contains(&flavor) {
        return Err(TranscodeError::Malformed("unrecognized sfnt version"));
    }

    let num_tables =
        read_u16(data, 4).ok_or(TranscodeError::Malformed("missing table count"))? as usize;
    if num_tables == 0 {
        return Err(TranscodeError::Malformed("sfnt has no tables"));
    }

    let mut tables = Vec::with_capacity(num_tables);
    for i in 0..num_tables {
        let entry = SFNT_HEADER_LEN + i * SFNT_DIR_ENTRY_LEN;
        let tag = read_u32(data, entry).ok_or(TranscodeError::Malformed("truncated directory"))?;
        let checksum = read_u32(data, entry + 4)
            .ok_or(TranscodeError::Malformed("truncated directory"))?;
        let offset = read_u32(data, entry + 8)
            .ok_or(TranscodeError::Malformed("truncated directory"))? as usize;
        let length = read_u32(data, entry + 12)
            .ok_or(TranscodeError::Malformed("truncated directory"))? as usize;

        if offset.checked_add(length).is_none_or(|end| end > data.len()) {
            return Err(TranscodeError::Malformed("table extends past end of file"));
        }

        tables.push(SfntTable {
            tag,
            checksum,
            data_start: offset,
            data_len: length,
        });
    }

    // The WOFF table directory must be sorted by tag.
    tables.sort_by_key(|t| t.tag);

    // Compress each table; keep the raw bytes when zlib does not shrink.
    let mut payloads = Vec::with_capacity(num_tables);
    for table in &tables {
        let raw = &data[table.data_start..table.data_start + table.data_len];
        let mut encoder = ZlibEncoder::new(Vec::new(), Compression::best());
        encoder.write_all(raw)?;
        let compressed = encoder.finish()?;

        if compressed.len() < raw.len() {
            payloads.push(compressed);
        } else {
            payloads.push(raw.to_vec());
        }
    }

    let dir_end = WOFF_HEADER_LEN + num_tables * WOFF_DIR_ENTRY_LEN;
    let total_len: usize = dir_end + payloads.iter().map(|p| padded(p.len())).sum::<usize>();
    let total_sfnt_size: usize = SFNT_HEADER_LEN
        + num_tables * SFNT_DIR_ENTRY_LEN
        + tables.iter().map(|t| padded(t.data_len)).sum::<usize>();

    let mut out = Vec::with_capacity(total_len);

    // WOFF header.
    out.extend_from_slice(b"wOFF");
    out.extend_from_slice(&flavor.to_be_bytes());
    out.extend_from_slice(&(total_len as u32).to_be_bytes());
    out.extend_from_slice(&(num_tables as u16).to_be_bytes());
    out.extend_from_slice(&0u16.to_be_bytes()); // reserved
    out.extend_from_slice(&(total_sfnt_size as u32).to_be_bytes());
    out.extend_from_slice(&1u16.to_be_bytes()); // majorVersion
    out.extend_from_slice(&0u16.to_be_bytes()); // minorVersion
    out.extend_from_slice(&0u32.to_be_bytes()); // metaOffset
    out.extend_from_slice(&0u32.to_be_bytes()); // metaLength
    out.extend_from_slice(&0u32.to_be_bytes()); // metaOrigLength
    out.extend_from_slice(&0u32.to_be_bytes()); // privOffset
    out.extend_from_slice(&0u32.to_be_bytes()); // privLength

    // Table directory.
    let mut offset = dir_end;
    for (table, payload) in tables.iter().zip(&payloads) {
        out.extend_from_slice(&table.tag.to_be_bytes());
        out.extend_from_slice(&(offset as u32).to_be_bytes());
        out.extend_from_slice(&(payload.len() as u32).to_be_bytes());
        out.extend_from_slice(&(table.data_len as u32).to_be_bytes());
        out.extend_from_slice(&table.checksum.to_be_bytes());
        offset += padded(payload.len());
    }

    // Table data, each padded to a 4-byte boundary. The directory end
    // is itself 4-aligned, so padding the whole buffer is equivalent.
    for payload in &payloads {
        out.extend_from_slice(payload);
        out.resize(padded(out.len()), 0);
    }

    Ok(out)
}

/// Round a length up to the next 4-byte boundary.
fn padded(len: usize) -> usize {
    (len + 3) & !3
}

fn read_u16(data: &[u8], at: usize) -> Option<u16> {
    let bytes = data.get(at..at + 2)?;
    Some(u16::from_be_bytes([bytes[0], bytes[1]]))
}

fn read_u32(data: &[u8], at: usize) -> Option<u32> {
    let bytes = data.get(at..at + 4)?;
    Some(u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    /// Build a minimal sfnt with the given tables (tag, body bytes).
    fn build_sfnt(tables: &[(&[u8; 4], Vec<u8>)]) -> Vec<u8> {
        let n = tables.len();
        let mut out = Vec::new();
        out.extend_from_slice(&0x0001_0000u32.to_be_bytes());
        out.extend_from_slice(&(n as u16).to_be_bytes());
        out.extend_from_slice(&[0u8; 6]); // searchRange/entrySelector/rangeShift

        let mut offset = SFNT_HEADER_LEN + n * SFNT_DIR_ENTRY_LEN;
        for (tag, body) in tables {
            out.extend_from_slice(*tag);
            out.extend_from_slice(&0u32.to_be_bytes()); // checksum (unchecked)
            out.extend_from_slice(&(offset as u32).to_be_bytes());
            out.extend_from_slice(&(body.len() as u32).to_be_bytes());
            offset += padded(body.len());
        }
        for (_, body) in tables {
            out.extend_from_slice(body);
            while out.len() % 4 != 0 {
                out.push(0);
            }
        }
        out
    }

    #[test]
    fn woff_input_passes_through() {
        let outcome = to_web_format(b"wOFFwhatever", FontFormat::Woff).unwrap();
        assert_matches!(outcome, TranscodeOutcome::AlreadyWeb);

        let outcome = to_web_format(b"wOF2whatever", FontFormat::Woff2).unwrap();
        assert_matches!(outcome, TranscodeOutcome::AlreadyWeb);
    }

    #[test]
    fn eot_is_unsupported() {
        let result = to_web_format(b"anything", FontFormat::Eot);
        assert_matches!(result, Err(TranscodeError::UnsupportedSource("eot")));
    }

    #[test]
    fn ttf_converts_to_valid_woff_container() {
        // Highly repetitive table data so zlib actually shrinks it.
        let glyf = vec![0xAB; 4096];
        let head = vec![1, 2, 3, 4, 5, 6, 7, 8];
        let sfnt = build_sfnt(&[(b"glyf", glyf), (b"head", head)]);

        let TranscodeOutcome::Converted(woff) =
            to_web_format(&sfnt, FontFormat::Ttf).unwrap()
        else {
            panic!("expected conversion");
        };

        assert_eq!(&woff[0..4], b"wOFF");
        // Flavor mirrors the original sfnt version.
        assert_eq!(read_u32(&woff, 4).unwrap(), 0x0001_0000);
        // Declared total length matches the buffer.
        assert_eq!(read_u32(&woff, 8).unwrap() as usize, woff.len());
        assert_eq!(read_u16(&woff, 12).unwrap(), 2);
        // Repetitive input must end up smaller than the raw sfnt.
        assert!(woff.len() < sfnt.len());

        // Directory is sorted by tag and records the original lengths.
        let first_tag = read_u32(&woff, WOFF_HEADER_LEN).unwrap();
        let second_tag = read_u32(&woff, WOFF_HEADER_LEN + WOFF_DIR_ENTRY_LEN).unwrap();
        assert!(first_tag < second_tag);
        let orig_len_first = read_u32(&woff, WOFF_HEADER_LEN + 12).unwrap();
        assert_eq!(orig_len_first, 4096);
    }

    #[test]
    fn incompressible_tables_are_stored_raw() {
        // A table shorter than any zlib framing overhead.
        let sfnt = build_sfnt(&[(b"cmap", vec![0x42])]);

        let TranscodeOutcome::Converted(woff) =
            to_web_format(&sfnt, FontFormat::Ttf).unwrap()
        else {
            panic!("expected conversion");
        };

        let comp_len = read_u32(&woff, WOFF_HEADER_LEN + 8).unwrap();
        let orig_len = read_u32(&woff, WOFF_HEADER_LEN + 12).unwrap();
        assert_eq!(comp_len, orig_len);
    }

    #[test]
    fn corrupt_input_is_rejected_not_panicking() {
        assert_matches!(
            to_web_format(b"", FontFormat::Ttf),
            Err(TranscodeError::Malformed(_))
        );
        assert_matches!(
            to_web_format(b"garbage-not-a-font", FontFormat::Ttf),
            Err(TranscodeError::Malformed(_))
        );

        // Table directory pointing past the end of the buffer.
        let mut sfnt = build_sfnt(&[(b"glyf", vec![0u8; 16])]);
        let len = sfnt.len();
        sfnt.truncate(len - 8);
        assert_matches!(
            to_web_format(&sfnt, FontFormat::Ttf),
            Err(TranscodeError::Malformed(_))
        );
    }
}
