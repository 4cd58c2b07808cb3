//! Natural, case-insensitive string ordering for node names.

use std::cmp::Ordering;

/// A run of characters that compares as a unit.
#[derive(Debug, Clone, Copy)]
enum Chunk<'a> {
    Digits(&'a str),
    Text(&'a str),
}

struct Chunks<'a> {
    rest: &'a str,
}

impl<'a> Iterator for Chunks<'a> {
    type Item = Chunk<'a>;

    fn next(&mut self) -> Option<Chunk<'a>> {
        let first = self.rest.chars().next()?;
        let digits = first.is_ascii_digit();
        let end = self
            .rest
            .char_indices()
            .find(|(_, c)| c.is_ascii_digit() != digits)
            .map_or(self.rest.len(), |(i, _)| i);

        let (chunk, rest) = self.rest.split_at(end);
        self.rest = rest;
        Some(if digits {
            Chunk::Digits(chunk)
        } else {
            Chunk::Text(chunk)
        })
    }
}

/// Rank used when characters of different kinds meet: separators and
/// punctuation sort before digits, digits before letters.
fn class(c: char) -> u8 {
    if c.is_whitespace() || c.is_ascii_punctuation() {
        0
    } else if c.is_ascii_digit() {
        1
    } else {
        2
    }
}

fn fold(c: char) -> char {
    c.to_lowercase().next().unwrap_or(c)
}

fn cmp_text(a: &str, b: &str) -> Ordering {
    let mut a = a.chars();
    let mut b = b.chars();
    loop {
        match (a.next(), b.next()) {
            (None, None) => return Ordering::Equal,
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(x), Some(y)) => {
                let ord = (class(x), fold(x)).cmp(&(class(y), fold(y)));
                if ord != Ordering::Equal {
                    return ord;
                }
            }
        }
    }
}

fn cmp_digits(a: &str, b: &str) -> Ordering {
    let a = a.trim_start_matches('0');
    let b = b.trim_start_matches('0');
    a.len().cmp(&b.len()).then_with(|| a.cmp(b))
}

fn cmp_chunk(a: Chunk<'_>, b: Chunk<'_>) -> Ordering {
    match (a, b) {
        (Chunk::Digits(x), Chunk::Digits(y)) => cmp_digits(x, y),
        (Chunk::Text(x), Chunk::Text(y)) => cmp_text(x, y),
        (Chunk::Digits(x), Chunk::Text(y)) | (Chunk::Text(y), Chunk::Digits(x)) => {
            let ord = cmp_text(x, y);
            if matches!(a, Chunk::Digits(_)) {
                ord
            } else {
                ord.reverse()
            }
        }
    }
}

/// Compares two names the way a file browser would.
///
/// Runs of ASCII digits compare by numeric value (`"2" < "10"`), letters
/// compare case-insensitively, and separators sort before digits which sort
/// before letters. Names that differ only in letter case compare equal, so a
/// stable sort keeps their original relative order.
///
/// Accented letters are compared as distinct characters; no locale
/// collation tables are consulted.
pub fn natural_cmp(a: &str, b: &str) -> Ordering {
    let mut a = Chunks { rest: a };
    let mut b = Chunks { rest: b };
    loop {
        match (a.next(), b.next()) {
            (None, None) => return Ordering::Equal,
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(x), Some(y)) => {
                let ord = cmp_chunk(x, y);
                if ord != Ordering::Equal {
                    return ord;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numbers_compare_by_value() {
        assert_eq!(natural_cmp("2", "10"), Ordering::Less);
        assert_eq!(natural_cmp("10", "9"), Ordering::Greater);
        assert_eq!(natural_cmp("post2", "post10"), Ordering::Less);
    }

    #[test]
    fn leading_zeros_are_ignored() {
        assert_eq!(natural_cmp("01_intro", "1_intro"), Ordering::Equal);
        assert_eq!(natural_cmp("02_next", "10_last"), Ordering::Less);
    }

    #[test]
    fn case_is_ignored() {
        assert_eq!(natural_cmp("Alpha", "alpha"), Ordering::Equal);
        assert_eq!(natural_cmp("alpha", "Beta"), Ordering::Less);
    }

    #[test]
    fn digits_sort_before_letters() {
        assert_eq!(natural_cmp("9", "a"), Ordering::Less);
        assert_eq!(natural_cmp("a", "9"), Ordering::Greater);
        assert_eq!(natural_cmp("a1", "ab"), Ordering::Less);
    }

    #[test]
    fn prefix_sorts_first() {
        assert_eq!(natural_cmp("note", "notes"), Ordering::Less);
        assert_eq!(natural_cmp("", "a"), Ordering::Less);
    }
}
