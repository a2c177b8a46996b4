//! Character-level helpers for the scanner.

use nom::{
    branch::alt,
    character::complete::{char as tag_char, digit0, digit1},
    combinator::{all_consuming, opt, recognize},
    sequence::pair,
    IResult,
};

/// Recognizes a numeric literal: digits with an optional fractional part (`12`, `1.5`, `5.`),
/// or a fractional part alone (`.5`).
fn number_literal(input: &str) -> IResult<&str, &str> {
    alt((
        recognize(pair(digit1, opt(pair(tag_char('.'), digit0)))),
        recognize(pair(tag_char('.'), digit1)),
    ))(input)
}

/// Checks whether the entire `word` is a numeric literal.
pub(super) fn is_number(word: &str) -> bool {
    all_consuming(number_literal)(word).is_ok()
}

/// Checks whether `word` followed by `next` may start a number. Besides complete literals,
/// this covers a lone `.` directly followed by a digit.
pub(super) fn starts_number(word: &str, next: Option<char>) -> bool {
    is_number(word) || (word == "." && next.map_or(false, |c| c.is_ascii_digit()))
}

/// Checks whether the first non-whitespace char at or after `from` is `(`.
pub(super) fn starts_call(chars: &[char], from: usize) -> bool {
    chars
        .get(from..)
        .and_then(|rest| rest.iter().find(|c| !c.is_whitespace()))
        == Some(&'(')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recognizing_numbers() {
        for word in ["0", "12", "1.5", "5.", ".5", "007.250"] {
            assert!(is_number(word), "{}", word);
        }
        for word in ["", ".", "1.2.3", "..5", "x1", "1x", "-1", "1e5", " 1"] {
            assert!(!is_number(word), "{}", word);
        }
    }

    #[test]
    fn number_starts() {
        assert!(starts_number("1", None));
        assert!(starts_number(".", Some('5')));
        assert!(!starts_number(".", Some('x')));
        assert!(!starts_number(".", None));
    }

    #[test]
    fn detecting_calls() {
        let chars: Vec<_> = "abs  (x) + sin x".chars().collect();
        assert!(starts_call(&chars, 3));
        assert!(!starts_call(&chars, 7));
        assert!(!starts_call(&chars, 14));
        assert!(!starts_call(&chars, 100));
    }
}
