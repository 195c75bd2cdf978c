//! Segment parsing of corrected data codewords.
//!
//! Numeric, alphanumeric, byte and Kanji segments append to the payload; ECI
//! segments record the declared charset; structured-append and FNC1 headers
//! are skipped. Parsing ends at a terminator, an unknown mode, or when fewer
//! than four bits remain.

use super::SymbolError;

/// Largest payload accepted from one symbol
pub const MAX_PAYLOAD: usize = 8896;

const ALNUM_CHARSET: &[u8; 45] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ $%*+-./:";

/// Parsed payload of one symbol
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Payload {
    /// Highest data mode indicator seen (1, 2, 4 or 8); 0 when no data segment
    pub mode: u32,
    /// ECI assignment number, when the symbol declares one
    pub eci: Option<u32>,
    /// Concatenated segment bytes
    pub bytes: Vec<u8>,
}

struct BitReader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> BitReader<'a> {
    fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    fn remaining(&self) -> usize {
        self.data.len() * 8 - self.pos
    }

    fn take(&mut self, count: usize) -> Result<u32, SymbolError> {
        if count > self.remaining() {
            return Err(SymbolError::DataUnderflow);
        }
        let mut value = 0u32;
        for _ in 0..count {
            let bit = (self.data[self.pos / 8] >> (7 - self.pos % 8)) & 1;
            value = (value << 1) | bit as u32;
            self.pos += 1;
        }
        Ok(value)
    }
}

/// Width of the character-count field for `mode` at `version`
fn count_bits(mode: u32, version: u8) -> usize {
    let band = match version {
        1..=9 => 0,
        10..=26 => 1,
        _ => 2,
    };
    match mode {
        1 => [10, 12, 14][band],
        2 => [9, 11, 13][band],
        4 => [8, 16, 16][band],
        _ => [8, 10, 12][band],
    }
}

fn reserve(payload: &Payload, extra: usize) -> Result<(), SymbolError> {
    if payload.bytes.len() + extra > MAX_PAYLOAD {
        return Err(SymbolError::DataOverflow);
    }
    Ok(())
}

fn push_digits(out: &mut Vec<u8>, value: u32, digits: usize) {
    for i in (0..digits).rev() {
        out.push(b'0' + (value / 10u32.pow(i as u32) % 10) as u8);
    }
}

fn numeric(reader: &mut BitReader<'_>, payload: &mut Payload, version: u8) -> Result<(), SymbolError> {
    let mut count = reader.take(count_bits(1, version))? as usize;
    reserve(payload, count)?;
    while count >= 3 {
        let value = reader.take(10)?;
        push_digits(&mut payload.bytes, value, 3);
        count -= 3;
    }
    match count {
        2 => push_digits(&mut payload.bytes, reader.take(7)?, 2),
        1 => push_digits(&mut payload.bytes, reader.take(4)?, 1),
        _ => {}
    }
    Ok(())
}

fn alnum_char(index: u32) -> u8 {
    ALNUM_CHARSET[(index % 45) as usize]
}

fn alphanumeric(
    reader: &mut BitReader<'_>,
    payload: &mut Payload,
    version: u8,
) -> Result<(), SymbolError> {
    let mut count = reader.take(count_bits(2, version))? as usize;
    reserve(payload, count)?;
    while count >= 2 {
        let pair = reader.take(11)?;
        payload.bytes.push(alnum_char(pair / 45));
        payload.bytes.push(alnum_char(pair % 45));
        count -= 2;
    }
    if count == 1 {
        let single = reader.take(6)?;
        payload.bytes.push(alnum_char(single));
    }
    Ok(())
}

fn byte(reader: &mut BitReader<'_>, payload: &mut Payload, version: u8) -> Result<(), SymbolError> {
    let count = reader.take(count_bits(4, version))? as usize;
    reserve(payload, count)?;
    if reader.remaining() < count * 8 {
        return Err(SymbolError::DataUnderflow);
    }
    for _ in 0..count {
        payload.bytes.push(reader.take(8)? as u8);
    }
    Ok(())
}

fn kanji(reader: &mut BitReader<'_>, payload: &mut Payload, version: u8) -> Result<(), SymbolError> {
    let count = reader.take(count_bits(8, version))? as usize;
    reserve(payload, count * 2)?;
    if reader.remaining() < count * 13 {
        return Err(SymbolError::DataUnderflow);
    }
    for _ in 0..count {
        let packed = reader.take(13)?;
        let intermediate = ((packed / 0xC0) << 8) | (packed % 0xC0);
        let sjis = if intermediate + 0x8140 <= 0x9FFC {
            intermediate + 0x8140
        } else {
            intermediate + 0xC140
        };
        payload.bytes.push((sjis >> 8) as u8);
        payload.bytes.push(sjis as u8);
    }
    Ok(())
}

fn eci(reader: &mut BitReader<'_>) -> Result<u32, SymbolError> {
    let first = reader.take(8)?;
    if first & 0x80 == 0 {
        Ok(first)
    } else if first & 0xC0 == 0x80 {
        Ok(((first & 0x3F) << 8) | reader.take(8)?)
    } else if first & 0xE0 == 0xC0 {
        Ok(((first & 0x1F) << 16) | reader.take(16)?)
    } else {
        Err(SymbolError::DataUnderflow)
    }
}

/// Parse the data codewords of a symbol of the given version
pub fn parse(data: &[u8], version: u8) -> Result<Payload, SymbolError> {
    let mut reader = BitReader::new(data);
    let mut payload = Payload::default();

    while reader.remaining() >= 4 {
        let mode = reader.take(4)?;
        match mode {
            1 => numeric(&mut reader, &mut payload, version)?,
            2 => alphanumeric(&mut reader, &mut payload, version)?,
            4 => byte(&mut reader, &mut payload, version)?,
            8 => kanji(&mut reader, &mut payload, version)?,
            7 => payload.eci = Some(eci(&mut reader)?),
            // Structured append: symbol index, count and parity
            3 => {
                reader.take(16)?;
            }
            // FNC1 in first position carries no data
            5 => {}
            // FNC1 in second position: application indicator
            9 => {
                reader.take(8)?;
            }
            _ => break,
        }

        if mode.is_power_of_two() && mode > payload.mode {
            payload.mode = mode;
        }
    }

    Ok(payload)
}
