use serde::{Deserialize, Serialize};

/// Convert a 1-based column number to its spreadsheet letter ("A", "Z", "AA").
pub fn col_letter(mut col: u32) -> String {
    debug_assert!(col >= 1, "columns are 1-based");
    let mut out = Vec::new();
    while col > 0 {
        let rem = ((col - 1) % 26) as u8;
        out.push(b'A' + rem);
        col = (col - 1) / 26;
    }
    out.reverse();
    String::from_utf8(out).unwrap_or_default()
}

/// Convert a column letter back to its 1-based number. Returns None for
/// empty input or any non-ASCII-alphabetic character.
pub fn col_number(letters: &str) -> Option<u32> {
    if letters.is_empty() {
        return None;
    }
    let mut n: u32 = 0;
    for ch in letters.chars() {
        if !ch.is_ascii_alphabetic() {
            return None;
        }
        let v = (ch.to_ascii_uppercase() as u32) - ('A' as u32) + 1;
        n = n.checked_mul(26)?.checked_add(v)?;
    }
    Some(n)
}

/// A contiguous run of columns, 1-based inclusive start, fixed width.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColRange {
    pub start: u32,
    pub width: u32,
}

impl ColRange {
    pub fn new(start: u32, width: u32) -> Self {
        Self { start, width }
    }

    /// Last column of the range, inclusive.
    pub fn end(&self) -> u32 {
        self.start + self.width.saturating_sub(1)
    }

    pub fn contains(&self, col: u32) -> bool {
        self.width > 0 && col >= self.start && col <= self.end()
    }

    pub fn overlaps(&self, other: &ColRange) -> bool {
        self.width > 0 && other.width > 0 && self.start <= other.end() && other.start <= self.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn letters_round_trip() {
        for (n, s) in [(1, "A"), (2, "B"), (26, "Z"), (27, "AA"), (52, "AZ"), (703, "AAA")] {
            assert_eq!(col_letter(n), s);
            assert_eq!(col_number(s), Some(n));
        }
    }

    #[test]
    fn col_number_rejects_garbage() {
        assert_eq!(col_number(""), None);
        assert_eq!(col_number("A1"), None);
    }

    #[test]
    fn range_overlap() {
        let a = ColRange::new(1, 7); // A-G
        let b = ColRange::new(9, 2); // I-J
        assert!(!a.overlaps(&b));
        assert!(a.overlaps(&ColRange::new(7, 1)));
        assert_eq!(a.end(), 7);
        assert!(b.contains(10));
        assert!(!b.contains(11));
    }
}
