// Text Packing Codec
// Packs a string into one decimal big integer and back, three digits per character
//
// Layout: "999" || ccc || ccc || ...
// Each ccc is a code point zero-padded to three digits. The leading 9s keep
// the packed integer free of leading zeros, so its decimal form always
// reproduces the exact digit string that was packed.

use super::bigint::{parse_decimal, to_decimal, RsaBigInt};
use crate::error::{Result, RsaError};

/// Digit block placed in front of every packed message
pub const SENTINEL: &str = "999";

/// Digits per character field
pub const FIELD_WIDTH: usize = 3;

/// Largest code point a field can hold
pub const MAX_CODE_POINT: u32 = 999;

/// Pack text into its decimal digit string
pub fn encode_digits(text: &str) -> Result<String> {
    let mut digits = String::with_capacity(SENTINEL.len() + text.len() * FIELD_WIDTH);
    digits.push_str(SENTINEL);

    for (position, ch) in text.chars().enumerate() {
        let code = ch as u32;
        if code > MAX_CODE_POINT {
            return Err(RsaError::UnsupportedCharacter { ch, code, position });
        }
        digits.push_str(&format!("{:03}", code));
    }

    Ok(digits)
}

/// Pack text into a single integer
pub fn encode(text: &str) -> Result<RsaBigInt> {
    let digits = encode_digits(text)?;
    parse_decimal(&digits).ok_or_else(|| {
        RsaError::MalformedCiphertext("packed digits did not parse as an integer".to_string())
    })
}

/// Unpack a digit string produced by [`encode_digits`]
pub fn decode(packed_digits: &str) -> Result<String> {
    let body = packed_digits.strip_prefix(SENTINEL).ok_or_else(|| {
        RsaError::MalformedCiphertext(format!("missing {:?} sentinel", SENTINEL))
    })?;

    if !body.bytes().all(|b| b.is_ascii_digit()) {
        return Err(RsaError::MalformedCiphertext(
            "packed message contains non-digit characters".to_string(),
        ));
    }

    if body.len() % FIELD_WIDTH != 0 {
        return Err(RsaError::MalformedCiphertext(format!(
            "{} digits after the sentinel do not split into {}-digit groups",
            body.len(),
            FIELD_WIDTH
        )));
    }

    let mut text = String::with_capacity(body.len() / FIELD_WIDTH);
    for group in body.as_bytes().chunks(FIELD_WIDTH) {
        // Groups are ASCII digits, so this slice is valid UTF-8
        let group = std::str::from_utf8(group).unwrap_or_default();
        let field = group.strip_prefix('0').unwrap_or(group);
        let code: u32 = field.parse().map_err(|_| {
            RsaError::MalformedCiphertext(format!("bad character group {:?}", group))
        })?;
        let ch = char::from_u32(code).ok_or_else(|| {
            RsaError::MalformedCiphertext(format!("{} is not a character", code))
        })?;
        text.push(ch);
    }

    Ok(text)
}

/// Unpack an integer produced by [`encode`]
pub fn decode_integer(packed: &RsaBigInt) -> Result<String> {
    decode(&to_decimal(packed))
}

/// Characters that always fit below a modulus of `modulus_bits` bits
pub fn max_message_chars(modulus_bits: u64) -> usize {
    // A packed integer with k digits is below 10^k <= 2^(modulus_bits - 1)
    // whenever k <= (modulus_bits - 1) * log10(2)
    if modulus_bits < 2 {
        return 0;
    }
    let max_digits = ((modulus_bits - 1) as f64 * std::f64::consts::LOG10_2).floor() as usize;
    max_digits.saturating_sub(SENTINEL.len()) / FIELD_WIDTH
}

#[cfg(test)]
mod tests {
    use super::*;
    use super::super::bigint::from_u64;

    #[test]
    fn test_encode_single_char() {
        assert_eq!(encode_digits("A").unwrap(), "999065");
        assert_eq!(encode("A").unwrap(), from_u64(999_065));
        assert_eq!(decode("999065").unwrap(), "A");
    }

    #[test]
    fn test_empty_string() {
        assert_eq!(encode_digits("").unwrap(), "999");
        assert_eq!(encode("").unwrap(), from_u64(999));
        assert_eq!(decode("999").unwrap(), "");
    }

    #[test]
    fn test_field_widths() {
        // Single-digit, two-digit and three-digit code points all take 3 digits
        assert_eq!(encode_digits("\u{7}").unwrap(), "999007");
        assert_eq!(encode_digits("\n").unwrap(), "999010");
        assert_eq!(encode_digits("é").unwrap(), "999233");
        assert_eq!(encode_digits("Hi!").unwrap(), "999072105033");
    }

    #[test]
    fn test_decode_inverts_encode() {
        let samples = [
            "Hello, World!",
            "\0leading nul",
            "tabs\tand\nnewlines",
            "Latin-1: ÿ ñ ß ©",
            "0000",
        ];
        for text in samples {
            assert_eq!(decode(&encode_digits(text).unwrap()).unwrap(), text);
            assert_eq!(decode_integer(&encode(text).unwrap()).unwrap(), text);
        }

        let all_latin1: String = (0u32..=255).filter_map(char::from_u32).collect();
        assert_eq!(decode_integer(&encode(&all_latin1).unwrap()).unwrap(), all_latin1);
    }

    #[test]
    fn test_unsupported_character() {
        let err = encode("ok €").unwrap_err();
        assert_eq!(
            err,
            RsaError::UnsupportedCharacter {
                ch: '€',
                code: 0x20AC,
                position: 3,
            }
        );
    }

    #[test]
    fn test_malformed_digits() {
        let cases = ["", "065", "998065", "99906", "9990655", "999a65", "999-65"];
        for case in cases {
            assert!(
                matches!(decode(case), Err(RsaError::MalformedCiphertext(_))),
                "expected {:?} to be rejected",
                case
            );
        }
    }

    #[test]
    fn test_max_message_chars() {
        assert_eq!(max_message_chars(0), 0);
        // 2047 * log10(2) = 616.2 digits, minus the sentinel, 3 per char
        assert_eq!(max_message_chars(2048), 204);

        let text = "x".repeat(max_message_chars(2048));
        let packed = encode(&text).unwrap();
        assert!(packed.bits() < 2048);
    }
}
