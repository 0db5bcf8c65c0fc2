use std::io::{Read, Write};

use byteorder::{ReadBytesExt, WriteBytesExt};

use super::XDREndian;

pub const ALIGNMENT: usize = 4;

fn padding_len(src_len: usize) -> usize {
    (ALIGNMENT - (src_len % ALIGNMENT)) % ALIGNMENT
}

pub fn read_padding(src_len: usize, src: &mut impl Read) -> std::io::Result<()> {
    let pad_len = padding_len(src_len);
    if pad_len > 0 {
        let mut padding_buffer: [u8; ALIGNMENT] = Default::default();
        src.read_exact(&mut padding_buffer[..pad_len])?;
    }
    Ok(())
}

pub fn write_padding(src_len: usize, dest: &mut impl Write) -> std::io::Result<()> {
    let pad_len = padding_len(src_len);
    if pad_len > 0 {
        let padding_buffer: [u8; ALIGNMENT] = Default::default();
        dest.write_all(&padding_buffer[..pad_len])?;
    }
    Ok(())
}

pub fn invalid_data(m: &str) -> std::io::Error {
    std::io::Error::new(std::io::ErrorKind::InvalidData, m)
}

/// Reads a variable-length opaque body of at most `max` bytes into `buf`.
///
/// The declared length is checked before anything is read, and the body is pulled
/// through [`Read::take`] so a hostile length prefix never drives an allocation.
pub fn read_opaque(src: &mut impl Read, max: usize, buf: &mut Vec<u8>) -> std::io::Result<()> {
    let length = src.read_u32::<XDREndian>()? as usize;
    if length > max {
        return Err(std::io::Error::new(
            std::io::ErrorKind::InvalidData,
            format!("opaque length {length} exceeds maximum {max}"),
        ));
    }

    buf.clear();
    let read = src.by_ref().take(length as u64).read_to_end(buf)?;
    if read != length {
        buf.clear();
        return Err(std::io::Error::new(
            std::io::ErrorKind::UnexpectedEof,
            format!("opaque body truncated: {read} of {length} bytes"),
        ));
    }
    read_padding(length, src)
}

/// Writes a variable-length opaque body, refusing values longer than `max`.
pub fn write_opaque(data: &[u8], max: usize, dest: &mut impl Write) -> std::io::Result<()> {
    if data.len() > max {
        return Err(std::io::Error::new(
            std::io::ErrorKind::InvalidData,
            format!("opaque length {} exceeds maximum {max}", data.len()),
        ));
    }
    let Ok(length) = u32::try_from(data.len()) else {
        return Err(invalid_data("cannot cast `usize` to `u32`"));
    };

    dest.write_u32::<XDREndian>(length)?;
    dest.write_all(data)?;
    write_padding(data.len(), dest)
}
