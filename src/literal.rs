//! Decoding of single Go literal expressions into primitive values.
//!
//! Only nodes written directly as literals decode: basic literal tokens, and
//! identifiers for boolean requests. Anything else, and any mismatch between
//! the literal's category and the requested kind, is `None`.

use goscan_syntax::SyntaxTree;
use goscan_syntax::ast::{BasicLit, BasicLitKind, Expr, ExprId};

use crate::value::{Primitive, PrimitiveKind, Value};

// =============================================================================
// 1. Entry points
// =============================================================================

/// Decodes `expr` as a value of `kind`.
pub fn decode_literal(tree: &SyntaxTree, expr: ExprId, kind: PrimitiveKind) -> Option<Value> {
    match tree.arena().exprs[expr] {
        Expr::Ident(name) if kind == PrimitiveKind::Bool => parse_bool(tree.name(name)).map(Value::Bool),
        Expr::BasicLit(lit) => decode_basic_lit(tree, lit, kind),
        _ => None,
    }
}

/// Typed form of [`decode_literal`].
#[inline]
pub fn decode<T: Primitive>(tree: &SyntaxTree, expr: ExprId) -> Option<T> {
    decode_literal(tree, expr, T::KIND).and_then(T::from_value)
}

/// Decodes a basic literal token. Booleans never come from basic literals.
pub fn decode_basic_lit(tree: &SyntaxTree, lit: BasicLit, kind: PrimitiveKind) -> Option<Value> {
    let text = tree.text(lit.raw);
    match (lit.kind, kind) {
        (BasicLitKind::String, PrimitiveKind::String) => unquote(text).map(Value::String),
        (BasicLitKind::Int, PrimitiveKind::I8) => text.parse().ok().map(Value::I8),
        (BasicLitKind::Int, PrimitiveKind::I16) => text.parse().ok().map(Value::I16),
        (BasicLitKind::Int, PrimitiveKind::I32) => text.parse().ok().map(Value::I32),
        (BasicLitKind::Int, PrimitiveKind::I64) => text.parse().ok().map(Value::I64),
        (BasicLitKind::Int, PrimitiveKind::U8) => text.parse().ok().map(Value::U8),
        (BasicLitKind::Int, PrimitiveKind::U16) => text.parse().ok().map(Value::U16),
        (BasicLitKind::Int, PrimitiveKind::U32) => text.parse().ok().map(Value::U32),
        (BasicLitKind::Int, PrimitiveKind::U64) => text.parse().ok().map(Value::U64),
        (BasicLitKind::Float, PrimitiveKind::F32) => parse_f32(text).map(Value::F32),
        (BasicLitKind::Float, PrimitiveKind::F64) => parse_f64(text).map(Value::F64),
        _ => None,
    }
}

// =============================================================================
// 2. Booleans
// =============================================================================

/// The tokens Go's `strconv.ParseBool` accepts.
pub fn parse_bool(s: &str) -> Option<bool> {
    match s {
        "1" | "t" | "T" | "TRUE" | "true" | "True" => Some(true),
        "0" | "f" | "F" | "FALSE" | "false" | "False" => Some(false),
        _ => None,
    }
}

// =============================================================================
// 3. Strings
// =============================================================================

/// Go `strconv.Unquote` for string literals: `"..."` with escapes, or raw
/// `` `...` `` with carriage returns dropped. The result must be UTF-8.
pub fn unquote(raw: &str) -> Option<String> {
    if let Some(body) = raw.strip_prefix('`').and_then(|r| r.strip_suffix('`')) {
        if body.contains('`') {
            return None;
        }
        return Some(body.replace('\r', ""));
    }

    let body = raw.strip_prefix('"')?.strip_suffix('"')?;
    if !body.contains('\\') {
        return (!body.contains(['"', '\n'])).then(|| body.to_owned());
    }

    let mut out = Vec::with_capacity(body.len());
    let mut chars = body.chars();
    while let Some(c) = chars.next() {
        match c {
            '"' | '\n' => return None,
            '\\' => unescape(&mut chars, &mut out)?,
            c => {
                let mut buf = [0u8; 4];
                out.extend_from_slice(c.encode_utf8(&mut buf).as_bytes());
            }
        }
    }

    String::from_utf8(out).ok()
}

/// One escape sequence after the backslash. `\x` and octal escapes produce
/// raw bytes; `\u` and `\U` produce UTF-8.
fn unescape(chars: &mut std::str::Chars<'_>, out: &mut Vec<u8>) -> Option<()> {
    let byte = match chars.next()? {
        'a' => 0x07,
        'b' => 0x08,
        'f' => 0x0c,
        'n' => b'\n',
        'r' => b'\r',
        't' => b'\t',
        'v' => 0x0b,
        '\\' => b'\\',
        '"' => b'"',
        'x' => u8::try_from(read_digits(chars, 2, 16)?).ok()?,
        d @ '0'..='7' => {
            let rest = read_digits(chars, 2, 8)?;
            let v = d.to_digit(8)? * 64 + rest;
            u8::try_from(v).ok()?
        }
        'u' => return push_char(read_digits(chars, 4, 16)?, out),
        'U' => return push_char(read_digits(chars, 8, 16)?, out),
        _ => return None,
    };
    out.push(byte);
    Some(())
}

fn read_digits(chars: &mut std::str::Chars<'_>, n: usize, radix: u32) -> Option<u32> {
    let mut v = 0u32;
    for _ in 0..n {
        v = v * radix + chars.next()?.to_digit(radix)?;
    }
    Some(v)
}

fn push_char(code: u32, out: &mut Vec<u8>) -> Option<()> {
    let c = char::from_u32(code)?;
    let mut buf = [0u8; 4];
    out.extend_from_slice(c.encode_utf8(&mut buf).as_bytes());
    Some(())
}

// =============================================================================
// 4. Floating point
// =============================================================================

/// Literal text with `_` separators removed, or `None` if a separator is not
/// between two digits (or after a base prefix).
fn strip_separators(s: &str) -> Option<std::borrow::Cow<'_, str>> {
    if !s.contains('_') {
        return Some(s.into());
    }
    let bytes = s.as_bytes();
    let hex = bytes.len() > 2 && bytes[0] == b'0' && matches!(bytes[1], b'x' | b'X');
    let is_digit = |b: u8| if hex { b.is_ascii_hexdigit() } else { b.is_ascii_digit() };
    for (i, &b) in bytes.iter().enumerate() {
        if b != b'_' {
            continue;
        }
        let prev_ok = (hex && i == 2) || (i > 0 && is_digit(bytes[i - 1]));
        let next_ok = bytes.get(i + 1).is_some_and(|&n| is_digit(n));
        if !prev_ok || !next_ok {
            return None;
        }
    }
    Some(s.replace('_', "").into())
}

#[inline]
fn is_hex(s: &str) -> bool {
    s.len() > 2 && s.as_bytes()[0] == b'0' && matches!(s.as_bytes()[1], b'x' | b'X')
}

/// `strconv.ParseFloat(s, 64)`; non-finite results are rejected.
pub fn parse_f64(text: &str) -> Option<f64> {
    let s = strip_separators(text)?;
    let v = if is_hex(&s) {
        parse_hex_float(&s)?
    } else {
        s.parse::<f64>().ok()?
    };
    v.is_finite().then_some(v)
}

/// `strconv.ParseFloat(s, 32)`; values outside the `f32` range are rejected.
pub fn parse_f32(text: &str) -> Option<f32> {
    let s = strip_separators(text)?;
    let v = if is_hex(&s) {
        parse_hex_f32(&s)?
    } else {
        s.parse::<f32>().ok()?
    };
    v.is_finite().then_some(v)
}

/// `0x` mantissa with optional `.`, mandatory `p` exponent.
fn parse_hex_float(s: &str) -> Option<f64> {
    let (bits, exp2) = hex_mantissa(s)?;
    Some(scale_pow2(bits as f64, exp2))
}

/// Rounds the hex mantissa straight to `f32` precision, subnormals
/// included, so the result is never rounded twice.
fn parse_hex_f32(s: &str) -> Option<f32> {
    let (bits, exp2) = hex_mantissa(s)?;
    if bits == 0 {
        return Some(0.0);
    }
    let len = i64::from(64 - bits.leading_zeros());
    let top = len - 1 + exp2;
    if top < -150 {
        return Some(0.0);
    }
    // 24 significant bits, fewer once the value drops below 2^-126.
    let precision = if top < -126 { top + 150 } else { 24 };
    if len <= precision {
        return Some(scale_pow2(bits as f64, exp2) as f32);
    }

    let shift = (len - precision) as u32;
    let wide = u128::from(bits);
    let mut kept = wide >> shift;
    let rem = wide & ((1u128 << shift) - 1);
    let half = 1u128 << (shift - 1);
    if rem > half || (rem == half && kept & 1 == 1) {
        kept += 1;
    }
    Some(scale_pow2(kept as f64, exp2 + i64::from(shift)) as f32)
}

/// Mantissa digits as an integer (a set low bit stands in for dropped
/// non-zero digits) and the binary exponent applying to it.
fn hex_mantissa(s: &str) -> Option<(u64, i64)> {
    let (mantissa, exp) = s[2..].split_once(['p', 'P'])?;
    let exp: i64 = exp.parse().ok()?;
    let (int_part, frac_part) = mantissa.split_once('.').unwrap_or((mantissa, ""));
    if int_part.is_empty() && frac_part.is_empty() {
        return None;
    }

    let mut bits: u64 = 0;
    let mut exp2 = exp;
    let mut sticky = false;
    for (c, is_frac) in int_part
        .chars()
        .map(|c| (c, false))
        .chain(frac_part.chars().map(|c| (c, true)))
    {
        let d = u64::from(c.to_digit(16)?);
        if bits >> 60 == 0 {
            bits = bits * 16 + d;
            if is_frac {
                exp2 -= 4;
            }
        } else {
            sticky |= d != 0;
            if !is_frac {
                exp2 += 4;
            }
        }
    }
    if sticky {
        bits |= 1;
    }
    Some((bits, exp2))
}

fn scale_pow2(mut x: f64, mut exp: i64) -> f64 {
    exp = exp.clamp(-2200, 2200);
    while exp > 1000 {
        x *= 2f64.powi(1000);
        exp -= 1000;
    }
    while exp < -1000 {
        x *= 2f64.powi(-1000);
        exp += 1000;
    }
    x * 2f64.powi(exp as i32)
}
