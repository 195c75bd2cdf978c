//! Fixed QR vocabularies: version bounds, ECC levels, data modes and ECI charsets
use std::fmt;

/// Smallest QR Model 2 version
pub const VERSION_MIN: u8 = 1;
/// Largest QR Model 2 version
pub const VERSION_MAX: u8 = 40;

/// Error correction level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EccLevel {
    /// Low (~7% recovery capacity)
    L,
    /// Medium (~15% recovery capacity)
    M,
    /// Quartile (~25% recovery capacity)
    Q,
    /// High (~30% recovery capacity)
    H,
}

impl EccLevel {
    /// All levels, weakest first
    pub const ALL: [EccLevel; 4] = [EccLevel::L, EccLevel::M, EccLevel::Q, EccLevel::H];

    /// Level from the 2-bit format indicator (01=L, 00=M, 11=Q, 10=H)
    pub fn from_format_bits(bits: u32) -> Option<Self> {
        match bits {
            0 => Some(EccLevel::M),
            1 => Some(EccLevel::L),
            2 => Some(EccLevel::H),
            3 => Some(EccLevel::Q),
            _ => None,
        }
    }

    /// The 2-bit indicator stored in the format information
    pub fn format_bits(self) -> u32 {
        match self {
            EccLevel::M => 0,
            EccLevel::L => 1,
            EccLevel::H => 2,
            EccLevel::Q => 3,
        }
    }

    /// Row in the ECC block tables (ordered L, M, Q, H)
    pub(crate) fn table_index(self) -> usize {
        match self {
            EccLevel::L => 0,
            EccLevel::M => 1,
            EccLevel::Q => 2,
            EccLevel::H => 3,
        }
    }

    /// Canonical symbol ("L", "M", "Q" or "H")
    pub fn symbol(self) -> &'static str {
        match self {
            EccLevel::L => "L",
            EccLevel::M => "M",
            EccLevel::Q => "Q",
            EccLevel::H => "H",
        }
    }
}

impl fmt::Display for EccLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// Data encoding mode of a decoded symbol
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mode {
    /// Digits 0-9
    Numeric,
    /// 0-9, A-Z, space and $%*+-./:
    Alnum,
    /// 8-bit bytes
    Byte,
    /// Shift-JIS double-byte characters
    Kanji,
}

impl Mode {
    /// All modes, in mode-indicator order
    pub const ALL: [Mode; 4] = [Mode::Numeric, Mode::Alnum, Mode::Byte, Mode::Kanji];

    /// Mode from its 4-bit indicator
    pub fn from_indicator(code: u32) -> Option<Self> {
        match code {
            1 => Some(Mode::Numeric),
            2 => Some(Mode::Alnum),
            4 => Some(Mode::Byte),
            8 => Some(Mode::Kanji),
            _ => None,
        }
    }

    /// The 4-bit mode indicator
    pub fn indicator(self) -> u32 {
        match self {
            Mode::Numeric => 1,
            Mode::Alnum => 2,
            Mode::Byte => 4,
            Mode::Kanji => 8,
        }
    }

    /// Canonical symbol ("NUMERIC", "ALNUM", "BYTE" or "KANJI")
    pub fn symbol(self) -> &'static str {
        match self {
            Mode::Numeric => "NUMERIC",
            Mode::Alnum => "ALNUM",
            Mode::Byte => "BYTE",
            Mode::Kanji => "KANJI",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// Extended Channel Interpretation: the character set a payload was written in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[allow(missing_docs)]
pub enum Eci {
    Iso8859_1,
    Ibm437,
    Iso8859_2,
    Iso8859_3,
    Iso8859_4,
    Iso8859_5,
    Iso8859_6,
    Iso8859_7,
    Iso8859_8,
    Iso8859_9,
    Windows874,
    Iso8859_13,
    Iso8859_15,
    ShiftJis,
    Utf8,
}

impl Eci {
    /// Every recognized designator
    pub const ALL: [Eci; 15] = [
        Eci::Iso8859_1,
        Eci::Ibm437,
        Eci::Iso8859_2,
        Eci::Iso8859_3,
        Eci::Iso8859_4,
        Eci::Iso8859_5,
        Eci::Iso8859_6,
        Eci::Iso8859_7,
        Eci::Iso8859_8,
        Eci::Iso8859_9,
        Eci::Windows874,
        Eci::Iso8859_13,
        Eci::Iso8859_15,
        Eci::ShiftJis,
        Eci::Utf8,
    ];

    /// Charset from an ECI assignment number.
    ///
    /// Both 1 (legacy) and 3 designate ISO-8859-1.
    pub fn from_assignment(value: u32) -> Option<Self> {
        let eci = match value {
            1 | 3 => Eci::Iso8859_1,
            2 => Eci::Ibm437,
            4 => Eci::Iso8859_2,
            5 => Eci::Iso8859_3,
            6 => Eci::Iso8859_4,
            7 => Eci::Iso8859_5,
            8 => Eci::Iso8859_6,
            9 => Eci::Iso8859_7,
            10 => Eci::Iso8859_8,
            11 => Eci::Iso8859_9,
            13 => Eci::Windows874,
            15 => Eci::Iso8859_13,
            17 => Eci::Iso8859_15,
            20 => Eci::ShiftJis,
            26 => Eci::Utf8,
            _ => return None,
        };
        Some(eci)
    }

    /// Preferred ECI assignment number
    pub fn assignment(self) -> u32 {
        match self {
            Eci::Iso8859_1 => 3,
            Eci::Ibm437 => 2,
            Eci::Iso8859_2 => 4,
            Eci::Iso8859_3 => 5,
            Eci::Iso8859_4 => 6,
            Eci::Iso8859_5 => 7,
            Eci::Iso8859_6 => 8,
            Eci::Iso8859_7 => 9,
            Eci::Iso8859_8 => 10,
            Eci::Iso8859_9 => 11,
            Eci::Windows874 => 13,
            Eci::Iso8859_13 => 15,
            Eci::Iso8859_15 => 17,
            Eci::ShiftJis => 20,
            Eci::Utf8 => 26,
        }
    }

    /// Canonical symbol, e.g. "UTF_8" or "ISO_8859_15"
    pub fn symbol(self) -> &'static str {
        match self {
            Eci::Iso8859_1 => "ISO_8859_1",
            Eci::Ibm437 => "IBM437",
            Eci::Iso8859_2 => "ISO_8859_2",
            Eci::Iso8859_3 => "ISO_8859_3",
            Eci::Iso8859_4 => "ISO_8859_4",
            Eci::Iso8859_5 => "ISO_8859_5",
            Eci::Iso8859_6 => "ISO_8859_6",
            Eci::Iso8859_7 => "ISO_8859_7",
            Eci::Iso8859_8 => "ISO_8859_8",
            Eci::Iso8859_9 => "ISO_8859_9",
            Eci::Windows874 => "WINDOWS_874",
            Eci::Iso8859_13 => "ISO_8859_13",
            Eci::Iso8859_15 => "ISO_8859_15",
            Eci::ShiftJis => "SHIFT_JIS",
            Eci::Utf8 => "UTF_8",
        }
    }
}

impl fmt::Display for Eci {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}
