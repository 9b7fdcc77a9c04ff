/// Uppercase the first character of every word.
///
/// A word starts at any alphanumeric (or `_`) character that follows a
/// non-word character, so hyphenated and apostrophe names are handled:
/// `"carrie-anne moss"` becomes `"Carrie-Anne Moss"`. Characters other than
/// word starts are left untouched.
pub fn capitalize_words(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut in_word = false;

    for c in s.chars() {
        let is_word = c.is_alphanumeric() || c == '_';
        if is_word && !in_word {
            out.extend(c.to_uppercase());
        } else {
            out.push(c);
        }
        in_word = is_word;
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capitalize_words() {
        assert_eq!(capitalize_words("keanu reeves"), "Keanu Reeves");
        assert_eq!(capitalize_words("carrie-anne moss"), "Carrie-Anne Moss");
        assert_eq!(capitalize_words("conan o'brien"), "Conan O'Brien");
        assert_eq!(capitalize_words("  double  space "), "  Double  Space ");
        assert_eq!(capitalize_words(""), "");
    }

    #[test]
    fn test_capitalize_keeps_existing_case() {
        assert_eq!(capitalize_words("leonardo DiCaprio"), "Leonardo DiCaprio");
        assert_eq!(capitalize_words("renée zellweger"), "Renée Zellweger");
    }
}
