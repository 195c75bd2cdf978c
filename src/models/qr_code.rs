use super::{EccLevel, Eci, Mode};

/// A successfully decoded QR symbol
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedCode {
    /// QR version (1-40)
    pub version: u8,
    /// Error correction level
    pub ecc_level: EccLevel,
    /// Mask pattern index (0-7)
    pub mask: u8,
    /// Highest data mode used in the payload
    pub mode: Mode,
    /// Character set declared by an ECI marker, if the symbol carries one
    pub eci: Option<Eci>,
    /// Decoded payload bytes
    pub data: Vec<u8>,
}

impl DecodedCode {
    /// Payload as text, replacing invalid UTF-8 sequences
    pub fn text(&self) -> std::borrow::Cow<'_, str> {
        String::from_utf8_lossy(&self.data)
    }
}

/// A located QR symbol that could not be decoded
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailedCode {
    /// Why this symbol could not be decoded
    pub err: String,
}

impl FailedCode {
    /// Create a failure record
    pub fn new(err: impl Into<String>) -> Self {
        Self { err: err.into() }
    }
}

/// One entry of a [`DecodeResult`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CodeEntry {
    /// The symbol decoded cleanly
    Decoded(DecodedCode),
    /// The symbol was located but not decoded
    Failed(FailedCode),
}

impl CodeEntry {
    /// The decoded code, if this entry is a success
    pub fn decoded(&self) -> Option<&DecodedCode> {
        match self {
            CodeEntry::Decoded(code) => Some(code),
            CodeEntry::Failed(_) => None,
        }
    }

    /// The failure, if this entry is one
    pub fn failed(&self) -> Option<&FailedCode> {
        match self {
            CodeEntry::Decoded(_) => None,
            CodeEntry::Failed(failure) => Some(failure),
        }
    }

    /// Whether this entry decoded cleanly
    pub fn is_decoded(&self) -> bool {
        matches!(self, CodeEntry::Decoded(_))
    }
}

/// Every symbol found in one image, in the engine's discovery order.
///
/// An empty result means no symbol was located; it is not an error.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DecodeResult {
    entries: Vec<CodeEntry>,
}

impl DecodeResult {
    /// Wrap entries, keeping their order
    pub fn new(entries: Vec<CodeEntry>) -> Self {
        Self { entries }
    }

    /// Number of located symbols
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when no symbol was located
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entry at `index`
    pub fn get(&self, index: usize) -> Option<&CodeEntry> {
        self.entries.get(index)
    }

    /// Iterate entries in discovery order
    pub fn iter(&self) -> std::slice::Iter<'_, CodeEntry> {
        self.entries.iter()
    }

    /// Borrow the entries
    pub fn entries(&self) -> &[CodeEntry] {
        &self.entries
    }

    /// Take ownership of the entries
    pub fn into_entries(self) -> Vec<CodeEntry> {
        self.entries
    }

    /// Successfully decoded symbols only
    pub fn decoded(&self) -> impl Iterator<Item = &DecodedCode> + '_ {
        self.entries.iter().filter_map(CodeEntry::decoded)
    }
}

impl IntoIterator for DecodeResult {
    type Item = CodeEntry;
    type IntoIter = std::vec::IntoIter<CodeEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl<'a> IntoIterator for &'a DecodeResult {
    type Item = &'a CodeEntry;
    type IntoIter = std::slice::Iter<'a, CodeEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
