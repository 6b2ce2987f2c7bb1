use crate::range::error::{RangeError, Result};

const ALPHABET: &[u8; 26] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ";
const BASE: u64 = 26;

/// Returns the column label for a zero-based column index.
///
/// ```
/// use sheetfill::range::column_label;
///
/// assert_eq!(column_label(0).unwrap(), "A");
/// assert_eq!(column_label(28).unwrap(), "AC");
/// assert_eq!(column_label(702).unwrap(), "AAA");
/// assert!(column_label(-1).is_err());
/// ```
pub fn column_label(index: i64) -> Result<String> {
    if index < 0 {
        return Err(RangeError::invalid(format!(
            "column index must be non-negative, got {index}"
        )));
    }

    Ok(label_for(index as u64))
}

// Infallible core for callers that already hold an unsigned index.
#[must_use]
pub(crate) fn label_for(index: u64) -> String {
    let mut reversed = String::new();
    let mut n = index;

    loop {
        let (quotient, remainder) = (n / BASE, n % BASE);
        reversed.push(ALPHABET[remainder as usize] as char);

        // No zero digit: the next place carries quotient - 1, not quotient
        if quotient == 0 {
            break;
        }
        n = quotient - 1;
    }

    reversed.chars().rev().collect()
}

/// Returns the zero-based column index for a label. Case-insensitive.
pub fn column_index(label: &str) -> Result<u64> {
    let label = normalize_label(label)?;
    let mut result: u64 = 0;

    for b in label.bytes() {
        let digit = u64::from(b - b'A' + 1);
        result = result
            .checked_mul(BASE)
            .and_then(|r| r.checked_add(digit))
            .ok_or_else(|| RangeError::invalid(format!("column label too long: {label}")))?;
    }

    Ok(result - 1)
}

/// Uppercases a column label, rejecting anything that is not a non-empty run of
/// ASCII letters.
pub fn normalize_label(label: &str) -> Result<String> {
    if label.is_empty() || !label.bytes().all(|b| b.is_ascii_alphabetic()) {
        return Err(RangeError::invalid(format!(
            "column label must be letters A-Z, got {label:?}"
        )));
    }

    Ok(label.to_ascii_uppercase())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn known_labels() {
        let cases = [
            (0, "A"),
            (1, "B"),
            (25, "Z"),
            (26, "AA"),
            (27, "AB"),
            (28, "AC"),
            (51, "AZ"),
            (52, "BA"),
            (701, "ZZ"),
            (702, "AAA"),
            (16383, "XFD"),
        ];

        for (index, expected) in cases {
            assert_eq!(column_label(index).unwrap(), expected, "index {index}");
        }
    }

    #[test]
    fn negative_index_is_rejected() {
        assert!(matches!(
            column_label(-1),
            Err(RangeError::InvalidArgument(_))
        ));
        assert!(column_label(i64::MIN).is_err());
    }

    #[test]
    fn huge_index_does_not_overflow() {
        let label = column_label(i64::MAX).unwrap();
        assert!(label.bytes().all(|b| b.is_ascii_uppercase()));
        assert_eq!(column_index(&label).unwrap(), i64::MAX as u64);
    }

    #[test]
    fn index_from_label() {
        assert_eq!(column_index("A").unwrap(), 0);
        assert_eq!(column_index("ab").unwrap(), 27);
        assert_eq!(column_index("ZZ").unwrap(), 701);
        assert_eq!(column_index("AAA").unwrap(), 702);
    }

    #[test]
    fn malformed_labels() {
        for bad in ["", "A1", "$A", "Ä", " B", "A-B"] {
            assert!(normalize_label(bad).is_err(), "{bad:?} should be rejected");
            assert!(column_index(bad).is_err(), "{bad:?} should be rejected");
        }
        assert!(column_index("ZZZZZZZZZZZZZZZZ").is_err());
    }

    proptest! {
        #[test]
        fn labels_are_uppercase_letters(index in 0i64..50_000_000) {
            let label = column_label(index).unwrap();
            prop_assert!(!label.is_empty());
            prop_assert!(label.bytes().all(|b| b.is_ascii_uppercase()));
        }

        #[test]
        fn labels_strictly_increase(a in 0i64..5_000_000, b in 0i64..5_000_000) {
            prop_assume!(a < b);
            let la = column_label(a).unwrap();
            let lb = column_label(b).unwrap();
            prop_assert!((la.len(), &la) < (lb.len(), &lb));
        }

        #[test]
        fn index_inverts_label(index in 0i64..50_000_000) {
            let label = column_label(index).unwrap();
            prop_assert_eq!(column_index(&label).unwrap(), index as u64);
            prop_assert_eq!(column_index(&label.to_lowercase()).unwrap(), index as u64);
        }
    }
}
