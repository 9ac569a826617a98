use std::cmp::Ordering;
use std::iter::Peekable;
use std::str::Chars;

/// Sort a tag list into display/retention order.
///
/// `latest` always comes first; everything else is ordered descending by a
/// numeric-aware, case-insensitive comparison, so `v0.10` lands before
/// `v0.2`. The input is left untouched. `sort_by` is stable, so equal tags
/// keep their relative input order.
pub fn order(tags: &[String]) -> Vec<String> {
    let mut ordered = tags.to_vec();
    ordered.sort_by(|a, b| match (a == "latest", b == "latest") {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Less,
        (false, true) => Ordering::Greater,
        // Descending: compare b against a
        (false, false) => natural_cmp(b, a),
    });
    ordered
}

/// Ascending numeric-aware, case-insensitive comparison.
///
/// Digit runs are compared by value (leading zeros ignored), all other
/// characters by their lowercased form.
pub fn natural_cmp(a: &str, b: &str) -> Ordering {
    let mut ca = a.chars().peekable();
    let mut cb = b.chars().peekable();

    loop {
        match (ca.peek().copied(), cb.peek().copied()) {
            (None, None) => return Ordering::Equal,
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(x), Some(y)) => {
                if x.is_ascii_digit() && y.is_ascii_digit() {
                    let na = take_digits(&mut ca);
                    let nb = take_digits(&mut cb);
                    match cmp_digits(&na, &nb) {
                        Ordering::Equal => continue,
                        other => return other,
                    }
                }

                let lx = x.to_lowercase().next().unwrap_or(x);
                let ly = y.to_lowercase().next().unwrap_or(y);
                match lx.cmp(&ly) {
                    Ordering::Equal => {
                        ca.next();
                        cb.next();
                    }
                    other => return other,
                }
            }
        }
    }
}

fn take_digits(chars: &mut Peekable<Chars<'_>>) -> String {
    let mut run = String::new();
    while let Some(c) = chars.peek() {
        if c.is_ascii_digit() {
            run.push(*c);
            chars.next();
        } else {
            break;
        }
    }
    run
}

/// Compare two digit runs by numeric value without parsing into a fixed-width
/// integer, so arbitrarily long runs (timestamps, build numbers) stay exact.
fn cmp_digits(a: &str, b: &str) -> Ordering {
    let a = a.trim_start_matches('0');
    let b = b.trim_start_matches('0');
    match a.len().cmp(&b.len()) {
        Ordering::Equal => a.cmp(b),
        other => other,
    }
}
