//! PlantUML text encoding.
//!
//! A source is compressed with zlib's raw deflate at level 9, the stream
//! PlantUML's reference encoders produce, and written in PlantUML's base64
//! variant: digits first, then upper and lower case letters, then `-` and `_`.
//! The text is padded with `0` to a whole number of four character groups, the
//! way PlantUML's own encoder emits it. Servers inflate the payload and ignore
//! the zero bytes the padding decodes to.

use std::io::{Read, Write};

use base64::Engine;
use base64::alphabet::Alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use flate2::Compression;
use flate2::read::DeflateDecoder;
use flate2::write::DeflateEncoder;

use crate::error::{DecodeError, EncodeError};

const PLANTUML_ALPHABET: Alphabet =
    match Alphabet::new("0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz-_") {
        Ok(alphabet) => alphabet,
        Err(_) => panic!("invalid PlantUML alphabet"),
    };

const PLANTUML_BASE64: GeneralPurpose = GeneralPurpose::new(
    &PLANTUML_ALPHABET,
    GeneralPurposeConfig::new()
        .with_encode_padding(false)
        .with_decode_allow_trailing_bits(true)
        .with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Encode diagram source into a URL-safe payload.
///
/// The same source always yields the same payload, identical to the one
/// PlantUML's own text encoder emits.
pub fn encode(source: &str) -> Result<String, EncodeError> {
    let mut encoder = DeflateEncoder::new(Vec::with_capacity(source.len()), Compression::best());
    encoder.write_all(source.as_bytes())?;
    let compressed = encoder.finish()?;
    Ok(encode_bytes(&compressed))
}

/// Decode a payload produced by [`encode`] or by any PlantUML encoder.
pub fn decode(payload: &str) -> Result<String, DecodeError> {
    let compressed = PLANTUML_BASE64.decode(payload.trim())?;
    let mut decoder = DeflateDecoder::new(compressed.as_slice());
    let mut inflated = Vec::new();
    decoder.read_to_end(&mut inflated)?;
    Ok(String::from_utf8(inflated)?)
}

fn encode_bytes(bytes: &[u8]) -> String {
    let mut encoded = PLANTUML_BASE64.encode(bytes);
    while encoded.len() % 4 != 0 {
        encoded.push('0');
    }
    encoded
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_encode_bytes_alphabet() {
        assert_eq!(encode_bytes(&[0x00, 0x10, 0x83]), "0123");
        assert_eq!(encode_bytes(&[0xFB, 0xFF]), "-_y0");
        assert_eq!(encode_bytes(b"hello world"), "Q6LiR6yWTszoR6G0");
    }

    #[test]
    fn test_encode_bytes_pads_with_zero() {
        assert_eq!(encode_bytes(&[0x00]), "0000");
        assert_eq!(encode_bytes(&[0xFF]), "_m00");
        assert_eq!(encode_bytes(&[]), "");
    }

    #[test]
    fn test_decode_known_payload() {
        assert_eq!(
            decode("SoWkIImgAStDuKhCoKnELT2rKqZAJ-9oICrB0Ge20000").unwrap(),
            "@startuml\nalice -> bob\n@enduml"
        );
        assert_eq!(
            decode("SoWkIImgAStDuNBAJrBGjLDmpCbCJbMmKiX8pSd9vt98pKi1IW80").unwrap(),
            "@startuml\nBob -> Alice : hello\n@enduml"
        );
    }

    #[test]
    fn test_decode_ignores_surrounding_whitespace() {
        assert_eq!(
            decode("  SoWkIImgAStDuKhCoKnELT2rKqZAJ-9oICrB0Ge20000\n").unwrap(),
            "@startuml\nalice -> bob\n@enduml"
        );
    }

    const SEQUENCE_SRC: &str = "@startuml\nactor User\nparticipant \"Web App\" as App\n\
        database Store\nUser -> App : login(name, password)\nApp -> Store : find user\n\
        Store --> App : user record\nApp --> User : session token\n@enduml";

    #[test]
    fn test_encode_matches_plantuml_encoder() {
        assert_eq!(
            encode("@startuml\nalice -> bob\n@enduml").unwrap(),
            "SoWkIImgAStDuKhCoKnELT2rKqZAJ-9oICrB0Ge20000"
        );
        assert_eq!(
            encode("@startuml\nBob -> Alice : hello\n@enduml").unwrap(),
            "SoWkIImgAStDuNBAJrBGjLDmpCbCJbMmKiX8pSd9vt98pKi1IW80"
        );
        assert_eq!(
            encode("@startditaa\n+---+\n| A |\n+---+\n@endditaa").unwrap(),
            "SoWkIImgISaiIKpaqjRLrTNcgb5mLAY1iXrIyrB0SW00"
        );
        assert_eq!(
            encode("@startdot\ndigraph { a -> b }\n@enddot").unwrap(),
            "SoWkIImgISaluKh9J2zABCXGg5P8LD2rKqXIgELoICrB0Ke10000"
        );
    }

    #[test]
    fn test_encode_multiline_diagram_matches_plantuml_encoder() {
        assert_eq!(
            encode(SEQUENCE_SRC).unwrap(),
            "FOv12i9034NtSufFLmhs0br8FOE8wxGJPR3D39CfNj-a1LU1_z_ZPzH6jMth4cXkkUAXN4EnACsfa3HqJvvmAwK3\
             gTyGgT54ohWRpy45z5UlC639xoGdePKlAAJwpJMUWtU6x891hoGHcmyTIV_NFKJbsQn3icOV6A2ichAWvGzB65cYFVq3"
        );
        assert_eq!(decode(&encode(SEQUENCE_SRC).unwrap()).unwrap(), SEQUENCE_SRC);
    }

    #[test]
    fn test_encode_is_deterministic() {
        let source = "@startuml\nalice -> bob\n@enduml";
        assert_eq!(encode(source).unwrap(), encode(source).unwrap());
    }

    #[test]
    fn test_encode_uses_url_safe_groups() {
        let payload = encode("@startditaa\n+---+\n| A |\n+---+\n@endditaa").unwrap();
        assert_eq!(payload.len() % 4, 0);
        assert!(
            payload
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        );
    }

    #[test]
    fn test_decode_reverses_encode() {
        let sources = [
            "@startuml\nalice -> bob\n@enduml",
            "@startdot\ndigraph { a -> b }\n@enddot",
            "@startuml\nBob -> Alice : héllo ✓\n@enduml",
            "",
        ];
        for source in sources {
            assert_eq!(decode(&encode(source).unwrap()).unwrap(), source);
        }
    }

    #[test]
    fn test_decode_rejects_foreign_characters() {
        let err = decode("SoWk+Img").unwrap_err();
        assert!(matches!(err, DecodeError::Payload(_)));
    }

    #[test]
    fn test_decode_rejects_invalid_deflate_stream() {
        // Decodes to 0xFF bytes: a final block with the reserved block type.
        let err = decode("____").unwrap_err();
        assert!(matches!(err, DecodeError::Inflate(_)));
    }
}
