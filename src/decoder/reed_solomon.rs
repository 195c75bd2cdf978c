//! Reed-Solomon correction over GF(256) with primitive polynomial
//! x^8 + x^4 + x^3 + x^2 + 1 (0x11D) and generator roots α^0..α^(n-1).

use thiserror::Error;

const PRIMITIVE: u16 = 0x11D;

struct Tables {
    exp: [u8; 512],
    log: [u8; 256],
}

const fn build_tables() -> Tables {
    let mut exp = [0u8; 512];
    let mut log = [0u8; 256];
    let mut x: u16 = 1;
    let mut i = 0;
    while i < 255 {
        exp[i] = x as u8;
        log[x as usize] = i as u8;
        x <<= 1;
        if x & 0x100 != 0 {
            x ^= PRIMITIVE;
        }
        i += 1;
    }
    // Doubled so products of two logs index without a modulo
    while i < 512 {
        exp[i] = exp[i - 255];
        i += 1;
    }
    Tables { exp, log }
}

static GF: Tables = build_tables();

/// GF(256) arithmetic
pub struct Gf256;

impl Gf256 {
    /// α^n
    #[inline]
    pub fn exp(n: usize) -> u8 {
        GF.exp[n % 255]
    }

    /// Product
    #[inline]
    pub fn mul(a: u8, b: u8) -> u8 {
        if a == 0 || b == 0 {
            return 0;
        }
        GF.exp[GF.log[a as usize] as usize + GF.log[b as usize] as usize]
    }

    /// Quotient; `None` when dividing by zero
    #[inline]
    pub fn div(a: u8, b: u8) -> Option<u8> {
        if b == 0 {
            return None;
        }
        if a == 0 {
            return Some(0);
        }
        Some(GF.exp[GF.log[a as usize] as usize + 255 - GF.log[b as usize] as usize])
    }

    /// Multiplicative inverse of a non-zero element
    #[inline]
    pub fn inv(a: u8) -> Option<u8> {
        Self::div(1, a)
    }
}

/// The block holds more errors than its ECC codewords can repair
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("uncorrectable block")]
pub struct Uncorrectable;

/// Evaluate a polynomial stored lowest degree first
fn eval_low_first(poly: &[u8], x: u8) -> u8 {
    poly.iter().rev().fold(0, |acc, &c| Gf256::mul(acc, x) ^ c)
}

/// Repair `block` (data followed by `ecc_len` ECC codewords, highest-degree
/// coefficient first) in place. Returns the number of corrected codewords.
pub fn correct(block: &mut [u8], ecc_len: usize) -> Result<usize, Uncorrectable> {
    let n = block.len();
    if ecc_len == 0 || n > 255 || ecc_len > n {
        return Err(Uncorrectable);
    }

    let synd = syndromes(block, ecc_len);
    if synd.iter().all(|&s| s == 0) {
        return Ok(0);
    }

    let locator = berlekamp_massey(&synd);
    let errors = locator.len() - 1;
    if errors == 0 || errors * 2 > ecc_len {
        return Err(Uncorrectable);
    }

    // Chien search: codeword at index j is the coefficient of x^(n-1-j)
    let positions: Vec<usize> = (0..n)
        .filter(|&power| eval_low_first(&locator, Gf256::exp(255 - power % 255)) == 0)
        .collect();
    if positions.len() != errors {
        return Err(Uncorrectable);
    }

    // Ω(x) = S(x)Λ(x) mod x^ecc_len
    let mut omega = vec![0u8; ecc_len];
    for (i, &s) in synd.iter().enumerate() {
        for (j, &l) in locator.iter().enumerate() {
            if i + j < ecc_len {
                omega[i + j] ^= Gf256::mul(s, l);
            }
        }
    }

    // Formal derivative keeps odd-degree terms only
    let derivative: Vec<u8> = locator
        .iter()
        .enumerate()
        .skip(1)
        .map(|(i, &c)| if i % 2 == 1 { c } else { 0 })
        .collect();

    for &power in &positions {
        let x = Gf256::exp(power);
        let x_inv = Gf256::inv(x).ok_or(Uncorrectable)?;
        let numerator = Gf256::mul(x, eval_low_first(&omega, x_inv));
        let denominator = eval_low_first(&derivative, x_inv);
        let magnitude = Gf256::div(numerator, denominator).ok_or(Uncorrectable)?;
        block[n - 1 - power] ^= magnitude;
    }

    if syndromes(block, ecc_len).iter().any(|&s| s != 0) {
        return Err(Uncorrectable);
    }
    Ok(errors)
}

fn syndromes(block: &[u8], ecc_len: usize) -> Vec<u8> {
    (0..ecc_len)
        .map(|i| {
            let root = Gf256::exp(i);
            block.iter().fold(0, |acc, &c| Gf256::mul(acc, root) ^ c)
        })
        .collect()
}

/// Error locator Λ(x), lowest degree first, trimmed of high zero terms
fn berlekamp_massey(syndromes: &[u8]) -> Vec<u8> {
    let mut locator = vec![1u8];
    let mut previous = vec![1u8];
    let mut degree = 0usize;
    let mut shift = 1usize;
    let mut last_discrepancy = 1u8;

    for k in 0..syndromes.len() {
        let mut discrepancy = syndromes[k];
        for i in 1..=degree.min(locator.len() - 1) {
            discrepancy ^= Gf256::mul(locator[i], syndromes[k - i]);
        }

        if discrepancy == 0 {
            shift += 1;
            continue;
        }

        let scale = Gf256::div(discrepancy, last_discrepancy).unwrap_or(0);
        let mut next = locator.clone();
        if next.len() < previous.len() + shift {
            next.resize(previous.len() + shift, 0);
        }
        for (i, &p) in previous.iter().enumerate() {
            next[i + shift] ^= Gf256::mul(scale, p);
        }

        if 2 * degree <= k {
            previous = std::mem::replace(&mut locator, next);
            degree = k + 1 - degree;
            last_discrepancy = discrepancy;
            shift = 1;
        } else {
            locator = next;
            shift += 1;
        }
    }

    locator.truncate(degree + 1);
    while locator.len() > 1 && locator.last() == Some(&0) {
        locator.pop();
    }
    locator
}
