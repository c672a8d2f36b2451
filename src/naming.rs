use crate::error::RenamerError;
use crate::Result;

/// Characters that may not appear in a prefix or joiner
pub const RESERVED_CHARS: &[char] = &['\\', '/', '*', '?', '"', '|', '<', '>'];

/// Largest accepted width of the numeric suffix
pub const MAX_SUFFIX_LENGTH: usize = 10;

/// Validated naming choices collected from the user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenameSettings {
    pub prefix: String,
    pub joiner: char,
    pub suffix_length: usize,
}

impl RenameSettings {
    /// Build settings from raw input, applying every validation rule
    pub fn new(prefix: &str, joiner: &str, suffix_length: &str) -> Result<Self> {
        validate_prefix(prefix)?;
        let joiner = validate_joiner(joiner)?;
        let suffix_length = parse_suffix_length(suffix_length)?;
        Ok(Self {
            prefix: prefix.to_string(),
            joiner,
            suffix_length,
        })
    }

    /// New name for `original_name` at position `counter`
    pub fn name_for(&self, original_name: &str, counter: u64) -> String {
        compute_name(
            original_name,
            counter,
            self.suffix_length,
            &self.prefix,
            self.joiner,
        )
    }
}

/// Compute the new name for an entry.
///
/// The result is `prefix + joiner + counter + joiner + extension`, where the
/// counter is zero-padded to `length` digits. A counter that is wider than
/// `length` is written out in full.
pub fn compute_name(
    original_name: &str,
    counter: u64,
    length: usize,
    prefix: &str,
    joiner: char,
) -> String {
    let extension = extension_of(original_name);
    let padded = pad_counter(counter, length);
    format!("{prefix}{joiner}{padded}{joiner}{extension}")
}

/// Substring after the final '.', or the whole name when there is no '.'
pub fn extension_of(name: &str) -> &str {
    name.rsplit('.').next().unwrap_or(name)
}

/// Left-pad the decimal counter with zeros, never truncating
pub fn pad_counter(counter: u64, length: usize) -> String {
    format!("{counter:0>length$}")
}

/// First reserved character in `value`, if any
pub fn find_reserved_char(value: &str) -> Option<char> {
    value.chars().find(|c| RESERVED_CHARS.contains(c))
}

/// Validate a filename prefix. Any reserved character rejects the whole value.
pub fn validate_prefix(prefix: &str) -> Result<()> {
    match find_reserved_char(prefix) {
        Some(ch) => Err(RenamerError::ReservedCharacter {
            field: "Prefix",
            ch,
        }),
        None => Ok(()),
    }
}

/// Validate the joiner and return it as a single char
pub fn validate_joiner(joiner: &str) -> Result<char> {
    let mut chars = joiner.chars();
    match (chars.next(), chars.next()) {
        (Some(ch), None) => {
            if RESERVED_CHARS.contains(&ch) {
                Err(RenamerError::ReservedCharacter {
                    field: "Joiner",
                    ch,
                })
            } else {
                Ok(ch)
            }
        }
        _ => Err(RenamerError::JoinerLength {
            count: joiner.chars().count(),
        }),
    }
}

/// Parse and range-check the suffix length
pub fn parse_suffix_length(input: &str) -> Result<usize> {
    let trimmed = input.trim();
    let length: i64 = trimmed
        .parse()
        .map_err(|_| RenamerError::SuffixNotInteger {
            input: trimmed.to_string(),
        })?;

    if length < 1 || length > MAX_SUFFIX_LENGTH as i64 {
        return Err(RenamerError::SuffixOutOfRange {
            length,
            max: MAX_SUFFIX_LENGTH,
        });
    }

    Ok(length as usize)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compute_name() {
        assert_eq!(compute_name("a.txt", 1, 3, "img", '_'), "img_001_txt");
        assert_eq!(compute_name("b.txt", 2, 3, "img", '_'), "img_002_txt");
        assert_eq!(compute_name("photo.JPG", 42, 5, "trip", '-'), "trip-00042-JPG");
    }

    #[test]
    fn test_compute_name_pads_to_exact_width() {
        for length in 1..=MAX_SUFFIX_LENGTH {
            for counter in [0u64, 1, 7, 9] {
                let name = compute_name("x.txt", counter, length, "p", '_');
                let digits = name.split('_').nth(1).unwrap();
                assert_eq!(digits.len(), length, "counter {counter} length {length}");
                assert_eq!(digits.parse::<u64>().unwrap(), counter);
            }
        }
    }

    #[test]
    fn test_compute_name_does_not_truncate() {
        assert_eq!(compute_name("a.txt", 1234, 2, "img", '_'), "img_1234_txt");
        assert_eq!(pad_counter(100, 1), "100");
        assert_eq!(pad_counter(12_345_678_901, 10), "12345678901");
    }

    #[test]
    fn test_compute_name_is_deterministic() {
        let first = compute_name("report.final.pdf", 17, 4, "doc", '.');
        let second = compute_name("report.final.pdf", 17, 4, "doc", '.');
        assert_eq!(first, second);
        assert_eq!(first, "doc.0017.pdf");
    }

    #[test]
    fn test_extension_of() {
        assert_eq!(extension_of("a.b.txt"), "txt");
        assert_eq!(extension_of("file.tar.gz"), "gz");
        assert_eq!(extension_of("README"), "README");
        assert_eq!(extension_of(".hidden"), "hidden");
        assert_eq!(extension_of("trailing."), "");
        assert_eq!(compute_name("a.b.txt", 1, 1, "x", '_'), "x_1_txt");
    }

    #[test]
    fn test_compute_name_without_extension() {
        assert_eq!(compute_name("Makefile", 3, 2, "f", '_'), "f_03_Makefile");
    }

    #[test]
    fn test_validate_prefix() {
        assert!(validate_prefix("holiday").is_ok());
        assert!(validate_prefix("").is_ok());
        assert!(validate_prefix("with space-and_dash").is_ok());

        for ch in RESERVED_CHARS {
            let prefix = format!("ab{ch}cd");
            match validate_prefix(&prefix) {
                Err(RenamerError::ReservedCharacter { field, ch: found }) => {
                    assert_eq!(field, "Prefix");
                    assert_eq!(found, *ch);
                }
                other => panic!("Expected ReservedCharacter for {prefix}, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_validate_prefix_rejects_any_position() {
        assert!(validate_prefix("*start").is_err());
        assert!(validate_prefix("end>").is_err());
        assert!(validate_prefix("ok|ok?").is_err());
    }

    #[test]
    fn test_validate_joiner() {
        assert_eq!(validate_joiner("_").unwrap(), '_');
        assert_eq!(validate_joiner("-").unwrap(), '-');
        assert_eq!(validate_joiner("é").unwrap(), 'é');

        for ch in RESERVED_CHARS {
            assert!(validate_joiner(&ch.to_string()).is_err());
        }

        assert!(matches!(
            validate_joiner(""),
            Err(RenamerError::JoinerLength { count: 0 })
        ));
        assert!(matches!(
            validate_joiner("__"),
            Err(RenamerError::JoinerLength { count: 2 })
        ));
    }

    #[test]
    fn test_rename_settings() {
        let settings = RenameSettings::new("img", "_", "3").unwrap();
        assert_eq!(settings.joiner, '_');
        assert_eq!(settings.suffix_length, 3);
        assert_eq!(settings.name_for("a.txt", 1), "img_001_txt");

        assert!(RenameSettings::new("im/g", "_", "3").is_err());
        assert!(RenameSettings::new("img", "<", "3").is_err());
        assert!(RenameSettings::new("img", "_", "0").is_err());
    }

    #[test]
    fn test_parse_suffix_length() {
        assert_eq!(parse_suffix_length("1").unwrap(), 1);
        assert_eq!(parse_suffix_length(" 10 ").unwrap(), 10);

        assert!(matches!(
            parse_suffix_length("0"),
            Err(RenamerError::SuffixOutOfRange { length: 0, .. })
        ));
        assert!(matches!(
            parse_suffix_length("11"),
            Err(RenamerError::SuffixOutOfRange { length: 11, .. })
        ));
        assert!(matches!(
            parse_suffix_length("-3"),
            Err(RenamerError::SuffixOutOfRange { .. })
        ));
        assert!(matches!(
            parse_suffix_length("three"),
            Err(RenamerError::SuffixNotInteger { .. })
        ));
        assert!(matches!(
            parse_suffix_length("2.5"),
            Err(RenamerError::SuffixNotInteger { .. })
        ));
    }
}
