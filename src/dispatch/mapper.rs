//! Engine symbols to public result entries
use crate::engine::{EngineSymbol, SymbolData};
use crate::models::{
    CodeEntry, DecodeResult, DecodedCode, EccLevel, Eci, FailedCode, Mode, VERSION_MAX, VERSION_MIN,
};

fn map_decoded(symbol: SymbolData) -> Result<DecodedCode, FailedCode> {
    let version = u8::try_from(symbol.version)
        .ok()
        .filter(|v| (VERSION_MIN..=VERSION_MAX).contains(v))
        .ok_or_else(|| FailedCode::new(format!("unrecognized version {}", symbol.version)))?;
    let ecc_level = EccLevel::from_format_bits(symbol.ecc_level)
        .ok_or_else(|| FailedCode::new(format!("unrecognized ECC level {}", symbol.ecc_level)))?;
    let mask = u8::try_from(symbol.mask)
        .ok()
        .filter(|m| *m <= 7)
        .ok_or_else(|| FailedCode::new(format!("unrecognized mask {}", symbol.mask)))?;
    let mode = Mode::from_indicator(symbol.mode)
        .ok_or_else(|| FailedCode::new(format!("unrecognized mode {}", symbol.mode)))?;
    let eci = symbol
        .eci
        .map(|code| Eci::from_assignment(code).ok_or_else(|| FailedCode::new(format!("unrecognized ECI {code}"))))
        .transpose()?;

    Ok(DecodedCode {
        version,
        ecc_level,
        mask,
        mode,
        eci,
        data: symbol.payload,
    })
}

/// One entry per engine symbol, same order. Metadata outside the known
/// vocabularies turns that entry into a failure; the others are unaffected.
pub fn map_symbols(symbols: Vec<EngineSymbol>) -> DecodeResult {
    DecodeResult::new(
        symbols
            .into_iter()
            .map(|symbol| match symbol {
                EngineSymbol::Decoded(data) => match map_decoded(data) {
                    Ok(code) => CodeEntry::Decoded(code),
                    Err(failure) => CodeEntry::Failed(failure),
                },
                EngineSymbol::Failed(err) => CodeEntry::Failed(FailedCode::new(err)),
            })
            .collect(),
    )
}
