//! `.npy` header parsing and the fixed-width unicode (`<U{n}`) array codec.
//!
//! `ndarray-npy` covers numeric element types only, so name arrays are
//! encoded here in the layout NumPy uses for `np.save(path, list_of_str)`:
//! every element is `n` UTF-32 code units, NUL padded.

use std::io::{Read, Write};

use byteorder::{BigEndian, LittleEndian, ReadBytesExt, WriteBytesExt};

use crate::error::{FeatureError, Result};

const MAGIC: &[u8; 6] = b"\x93NUMPY";
const ALIGNMENT: usize = 64;

/// Parsed `.npy` header dictionary
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct NpyHeader {
    pub descr: String,
    pub fortran_order: bool,
    pub shape: Vec<usize>,
}

impl NpyHeader {
    /// Whether the payload is a unicode string array
    pub fn is_unicode(&self) -> bool {
        self.descr.len() > 2 && self.descr[1..].starts_with('U')
    }

    fn element_count(&self) -> usize {
        self.shape.iter().product()
    }
}

fn format_error(msg: impl Into<String>) -> FeatureError {
    FeatureError::NpyFormat(msg.into())
}

/// Read the magic string, version and header dictionary
pub(crate) fn read_header<R: Read>(reader: &mut R) -> Result<NpyHeader> {
    let mut magic = [0u8; 6];
    reader.read_exact(&mut magic)?;
    if &magic != MAGIC {
        return Err(format_error("missing NUMPY magic string"));
    }
    let major = reader.read_u8()?;
    let _minor = reader.read_u8()?;
    let header_len = match major {
        1 => reader.read_u16::<LittleEndian>()? as usize,
        2 | 3 => reader.read_u32::<LittleEndian>()? as usize,
        v => return Err(format_error(format!("unsupported format version {v}"))),
    };
    let mut raw = vec![0u8; header_len];
    reader.read_exact(&mut raw)?;
    let text = String::from_utf8(raw).map_err(|_| format_error("header is not UTF-8"))?;
    parse_header_dict(&text)
}

fn dict_value<'a>(text: &'a str, key: &str) -> Result<&'a str> {
    let needle = format!("'{key}':");
    let start = text
        .find(&needle)
        .map(|i| i + needle.len())
        .ok_or_else(|| format_error(format!("header lacks {key}")))?;
    Ok(text[start..].trim_start())
}

fn parse_header_dict(text: &str) -> Result<NpyHeader> {
    let descr_field = dict_value(text, "descr")?;
    let descr = descr_field
        .strip_prefix('\'')
        .and_then(|rest| rest.split('\'').next())
        .ok_or_else(|| format_error("descr is not a quoted string"))?
        .to_string();

    let fortran_order = dict_value(text, "fortran_order")?.starts_with("True");

    let shape_field = dict_value(text, "shape")?;
    let inner = shape_field
        .strip_prefix('(')
        .and_then(|rest| rest.split(')').next())
        .ok_or_else(|| format_error("shape is not a tuple"))?;
    let shape = inner
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.parse::<usize>()
                .map_err(|_| format_error(format!("bad shape entry {s}")))
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(NpyHeader {
        descr,
        fortran_order,
        shape,
    })
}

/// Write a 1-D `<U{n}` array
pub(crate) fn write_names<W: Write>(mut writer: W, names: &[String]) -> Result<()> {
    let width = names
        .iter()
        .map(|n| n.chars().count())
        .max()
        .unwrap_or(0)
        .max(1);

    let dict = format!(
        "{{'descr': '<U{width}', 'fortran_order': False, 'shape': ({},), }}",
        names.len()
    );
    // magic(6) + version(2) + length(2) + dict + padding + '\n'
    let unpadded = MAGIC.len() + 2 + 2 + dict.len() + 1;
    let padding = (ALIGNMENT - unpadded % ALIGNMENT) % ALIGNMENT;
    let header_len = dict.len() + padding + 1;
    let header_len = u16::try_from(header_len)
        .map_err(|_| format_error("header longer than 65535 bytes"))?;

    writer.write_all(MAGIC)?;
    writer.write_all(&[1, 0])?;
    writer.write_u16::<LittleEndian>(header_len)?;
    writer.write_all(dict.as_bytes())?;
    writer.write_all(&vec![b' '; padding])?;
    writer.write_all(b"\n")?;

    for name in names {
        let mut written = 0;
        for c in name.chars() {
            writer.write_u32::<LittleEndian>(c as u32)?;
            written += 1;
        }
        for _ in written..width {
            writer.write_u32::<LittleEndian>(0)?;
        }
    }
    writer.flush()?;
    Ok(())
}

/// Read a 1-D unicode array
pub(crate) fn read_names<R: Read>(mut reader: R) -> Result<Vec<String>> {
    let header = read_header(&mut reader)?;
    if !header.is_unicode() {
        return Err(format_error(format!(
            "expected a unicode array, found {}",
            header.descr
        )));
    }
    if header.shape.len() != 1 {
        return Err(format_error(format!(
            "expected a 1-D name array, found shape {:?}",
            header.shape
        )));
    }
    let width: usize = header.descr[2..]
        .parse()
        .map_err(|_| format_error(format!("bad unicode width in {}", header.descr)))?;
    let big_endian = header.descr.starts_with('>');

    let mut names = Vec::with_capacity(header.element_count());
    for _ in 0..header.element_count() {
        let mut name = String::with_capacity(width);
        let mut ended = false;
        for _ in 0..width {
            let unit = if big_endian {
                reader.read_u32::<BigEndian>()?
            } else {
                reader.read_u32::<LittleEndian>()?
            };
            if unit == 0 {
                ended = true;
            }
            if ended {
                continue;
            }
            let c = char::from_u32(unit)
                .ok_or_else(|| format_error(format!("invalid code point {unit:#x}")))?;
            name.push(c);
        }
        names.push(name);
    }
    Ok(names)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names_round_trip() {
        let names = vec![
            "A_0-to-X".to_string(),
            "Bé_12-to-X".to_string(),
            String::new(),
        ];
        let mut buf = Vec::new();
        write_names(&mut buf, &names).unwrap();

        // Header plus preamble is 64-byte aligned
        let header_len = u16::from_le_bytes([buf[8], buf[9]]) as usize;
        assert_eq!((10 + header_len) % ALIGNMENT, 0);
        assert_eq!(buf.len(), 10 + header_len + names.len() * 10 * 4);

        let header = read_header(&mut buf.as_slice()).unwrap();
        assert_eq!(header.descr, "<U10");
        assert_eq!(header.shape, vec![3]);
        assert!(!header.fortran_order);

        assert_eq!(read_names(buf.as_slice()).unwrap(), names);
    }

    #[test]
    fn test_empty_names() {
        let mut buf = Vec::new();
        write_names(&mut buf, &[]).unwrap();
        let header = read_header(&mut buf.as_slice()).unwrap();
        assert_eq!(header.descr, "<U1");
        assert_eq!(header.shape, vec![0]);
        assert!(read_names(buf.as_slice()).unwrap().is_empty());
    }

    #[test]
    fn test_parse_numpy_written_header() {
        let header =
            parse_header_dict("{'descr': '<f8', 'fortran_order': False, 'shape': (3, 4), }")
                .unwrap();
        assert_eq!(header.descr, "<f8");
        assert_eq!(header.shape, vec![3, 4]);
        assert!(!header.is_unicode());
    }

    #[test]
    fn test_rejects_bad_magic() {
        let err = read_header(&mut &b"NOTNPY\x01\x00\x00\x00"[..]).unwrap_err();
        assert!(matches!(err, FeatureError::NpyFormat(_)));
    }
}
