//! Text normalisation for clause comparison.

/// Lower-case, collapse every whitespace run (newlines included) into a single
/// space, and trim both ends.
///
/// Idempotent: `normalize(&normalize(x)) == normalize(x)`.
pub fn normalize(text: &str) -> String {
    let lower = text.to_lowercase();
    let mut out = String::with_capacity(lower.len());
    for word in lower.split_whitespace() {
        if !out.is_empty() {
            out.push(' ');
        }
        out.push_str(word);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn case_and_whitespace_insensitive() {
        assert_eq!(normalize("A  B\nC"), normalize("a b c"));
        assert_eq!(normalize("A  B\nC"), "a b c");
    }

    #[test]
    fn trims_edges() {
        assert_eq!(normalize("  \n\tRescisão antecipada \r\n"), "rescisão antecipada");
    }

    #[test]
    fn idempotent() {
        let samples = [
            "",
            "   ",
            "1. OBJETO DO CONTRATO\nO presente   contrato",
            "Multa\u{a0}de 30%",
        ];
        for s in samples {
            let once = normalize(s);
            assert_eq!(normalize(&once), once, "not idempotent for {s:?}");
        }
    }

    #[test]
    fn empty_input() {
        assert_eq!(normalize(""), "");
        assert_eq!(normalize(" \n "), "");
    }
}
