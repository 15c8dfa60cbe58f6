use std::cmp::Ordering;

#[derive(Debug)]
enum Chunk<'a> {
    Text(String),
    Digits(&'a str),
}

/// Split into alternating text and digit runs, always starting with a
/// (possibly empty) text run so chunks line up position by position.
fn chunks(s: &str) -> Vec<Chunk<'_>> {
    let mut out = Vec::new();
    let mut rest = s;
    loop {
        let text_end = rest
            .find(|c: char| c.is_ascii_digit())
            .unwrap_or(rest.len());
        out.push(Chunk::Text(rest[..text_end].to_lowercase()));
        rest = &rest[text_end..];
        if rest.is_empty() {
            break;
        }
        let digits_end = rest
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(rest.len());
        out.push(Chunk::Digits(&rest[..digits_end]));
        rest = &rest[digits_end..];
    }
    out
}

fn cmp_digits(a: &str, b: &str) -> Ordering {
    let a = a.trim_start_matches('0');
    let b = b.trim_start_matches('0');
    a.len().cmp(&b.len()).then_with(|| a.cmp(b))
}

/// Numeric-aware, case-insensitive filename ordering.
///
/// Digit runs compare by value ("file2" < "file10"), text runs compare
/// lowercased. Names equal under those rules fall back to a raw comparison
/// so the order is total and stable.
pub fn natural_cmp(a: &str, b: &str) -> Ordering {
    let left = chunks(a);
    let right = chunks(b);
    for (l, r) in left.iter().zip(right.iter()) {
        let ord = match (l, r) {
            (Chunk::Text(x), Chunk::Text(y)) => x.cmp(y),
            (Chunk::Digits(x), Chunk::Digits(y)) => cmp_digits(x, y),
            // Chunks alternate identically on both sides.
            (Chunk::Text(_), Chunk::Digits(_)) => Ordering::Greater,
            (Chunk::Digits(_), Chunk::Text(_)) => Ordering::Less,
        };
        if ord != Ordering::Equal {
            return ord;
        }
    }
    left.len().cmp(&right.len()).then_with(|| a.cmp(b))
}
