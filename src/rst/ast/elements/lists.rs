//! List payloads and the enumerator model used to sequence enumerated lists

use super::super::NodeId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Bullet or enumerator of a list item, as written (`-`, `3`, `iv`, `#`)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListItem {
    pub bullet: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumeratedList {
    pub list_type: EnumeratedListType,
}

/// Sequence type of an enumerated list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EnumeratedListType {
    Arabic,
    AlphabetUpper,
    AlphabetLower,
    RomanUpper,
    RomanLower,
}

impl EnumeratedListType {
    /// Detect the sequence type of an enumerator.
    ///
    /// Roman numerals are checked before single letters, so `i` and `I` are Roman while
    /// `v`, `x` and friends on their own are alphabetic. `#` counts as Arabic.
    pub fn detect(enumerator: &str) -> Option<Self> {
        if is_roman(enumerator, true) {
            Some(Self::RomanUpper)
        } else if is_roman(enumerator, false) {
            Some(Self::RomanLower)
        } else if enumerator == "#"
            || (!enumerator.is_empty() && enumerator.bytes().all(|b| b.is_ascii_digit()))
        {
            Some(Self::Arabic)
        } else if is_single(enumerator, |c| c.is_ascii_uppercase()) {
            Some(Self::AlphabetUpper)
        } else if is_single(enumerator, |c| c.is_ascii_lowercase()) {
            Some(Self::AlphabetLower)
        } else {
            None
        }
    }

    /// Ordinal value of an enumerator of this type (`#` has none)
    pub fn ordinal(&self, enumerator: &str) -> Option<u64> {
        match self {
            Self::Arabic => enumerator.parse().ok(),
            Self::AlphabetUpper | Self::AlphabetLower => enumerator
                .chars()
                .next()
                .map(|c| c.to_ascii_uppercase() as u64),
            Self::RomanUpper | Self::RomanLower => Some(roman_to_int(enumerator)),
        }
    }
}

impl fmt::Display for EnumeratedListType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Arabic => "Arabic",
            Self::AlphabetUpper => "AlphabetUpper",
            Self::AlphabetLower => "AlphabetLower",
            Self::RomanUpper => "RomanUpper",
            Self::RomanLower => "RomanLower",
        };
        f.write_str(name)
    }
}

/// Whether `curr` may follow `prev` in the same enumerated list.
///
/// No previous item and the auto-enumerator `#` always succeed. Otherwise both must have
/// the same type and `curr` must be exactly one past `prev`.
pub fn is_sequential_bullet(curr: &str, prev: Option<&str>) -> bool {
    let Some(prev) = prev else {
        return true;
    };
    if curr == "#" {
        return true;
    }

    let (Some(prev_type), Some(curr_type)) = (
        EnumeratedListType::detect(prev),
        EnumeratedListType::detect(curr),
    ) else {
        return false;
    };
    if prev_type != curr_type {
        return false;
    }

    match (prev_type.ordinal(prev), curr_type.ordinal(curr)) {
        (Some(p), Some(c)) => p.checked_add(1) == Some(c),
        // an explicit number cannot follow `#`
        _ => false,
    }
}

fn is_single(s: &str, pred: impl Fn(char) -> bool) -> bool {
    let mut chars = s.chars();
    matches!((chars.next(), chars.next()), (Some(c), None) if pred(c))
}

fn is_roman(s: &str, upper: bool) -> bool {
    let (one, all) = if upper {
        ('I', "MDCLXVI")
    } else {
        ('i', "mdclxvi")
    };
    if s.is_empty() {
        return false;
    }
    s.chars().all(|c| c == one) || (s.chars().count() >= 2 && s.chars().all(|c| all.contains(c)))
}

pub(crate) fn roman_to_int(s: &str) -> u64 {
    let chars: Vec<char> = s.chars().map(|c| c.to_ascii_uppercase()).collect();
    let mut sum: i64 = 0;

    for (i, &curr) in chars.iter().enumerate() {
        let next = chars.get(i + 1).copied();
        sum += match curr {
            'V' => 5,
            'L' => 50,
            'D' => 500,
            'M' => 1000,
            'I' if matches!(next, Some('V') | Some('X')) => -1,
            'I' => 1,
            'X' if matches!(next, Some('L') | Some('C')) => -10,
            'X' => 10,
            'C' if matches!(next, Some('D') | Some('M')) => -100,
            'C' => 100,
            _ => 0,
        };
    }

    sum.max(0) as u64
}

/// `:name: body`. The name's inline nodes are the leading children.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldListItem {
    pub name: Vec<NodeId>,
}

/// One option of an option list item, e.g. `--output=FILE`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandOption {
    pub name: String,
    /// `" "` or `"="` when an argument follows
    pub delimiter: Option<String>,
    pub arg: Option<String>,
}

impl fmt::Display for CommandOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)?;
        if let Some(arg) = &self.arg {
            write!(f, "{}{}", self.delimiter.as_deref().unwrap_or(" "), arg)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionListItem {
    pub options: Vec<CommandOption>,
}

/// Term, classifiers and definition. Term and classifier inline nodes lead the child list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DefinitionListItem {
    pub term: Vec<NodeId>,
    pub classifiers: Vec<Vec<NodeId>>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("1", EnumeratedListType::Arabic)]
    #[case("42", EnumeratedListType::Arabic)]
    #[case("#", EnumeratedListType::Arabic)]
    #[case("I", EnumeratedListType::RomanUpper)]
    #[case("iv", EnumeratedListType::RomanLower)]
    #[case("XII", EnumeratedListType::RomanUpper)]
    #[case("V", EnumeratedListType::AlphabetUpper)]
    #[case("a", EnumeratedListType::AlphabetLower)]
    #[case("Z", EnumeratedListType::AlphabetUpper)]
    fn test_detect(#[case] enumerator: &str, #[case] expected: EnumeratedListType) {
        assert_eq!(EnumeratedListType::detect(enumerator), Some(expected));
    }

    #[rstest]
    #[case("2", Some("1"), true)]
    #[case("3", Some("1"), false)]
    #[case("1", None, true)]
    #[case("#", Some("7"), true)]
    #[case("b", Some("a"), true)]
    #[case("B", Some("a"), false)]
    #[case("ii", Some("i"), true)]
    #[case("iv", Some("iii"), true)]
    #[case("2", Some("a"), false)]
    #[case("18446744073709551615", Some("18446744073709551615"), false)]
    #[case("18446744073709551615", Some("18446744073709551614"), true)]
    fn test_is_sequential_bullet(
        #[case] curr: &str,
        #[case] prev: Option<&str>,
        #[case] expected: bool,
    ) {
        assert_eq!(is_sequential_bullet(curr, prev), expected);
    }

    #[test]
    fn test_roman_to_int() {
        assert_eq!(roman_to_int("XIV"), 14);
        assert_eq!(roman_to_int("mcmxc"), 1990);
        assert_eq!(roman_to_int("iii"), 3);
    }

    #[test]
    fn test_command_option_display() {
        let opt = CommandOption {
            name: "--output".to_string(),
            delimiter: Some("=".to_string()),
            arg: Some("FILE".to_string()),
        };
        assert_eq!(opt.to_string(), "--output=FILE");
    }
}
