use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// Regex for file extensions kept from client-supplied upload names
    /// - Valid: "jpg", "PNG", "jpeg", "gif"
    /// - Invalid: "", "tar.gz", "jp g", "../x", "php%00"
    pub static ref FILE_EXTENSION_REGEX: Regex = Regex::new(r"^[A-Za-z0-9]{1,8}$").unwrap();

    /// Regex for positive integer identifiers sent as strings
    /// - Valid: "1", "42", "+7"
    /// - Invalid: "0x1", "1.5", "-3", " 4", ""
    pub static ref INTEGER_ID_REGEX: Regex = Regex::new(r"^\+?[0-9]+$").unwrap();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_extension_regex_valid() {
        assert!(FILE_EXTENSION_REGEX.is_match("jpg"));
        assert!(FILE_EXTENSION_REGEX.is_match("PNG"));
        assert!(FILE_EXTENSION_REGEX.is_match("jpeg"));
        assert!(FILE_EXTENSION_REGEX.is_match("gif"));
    }

    #[test]
    fn test_file_extension_regex_invalid() {
        assert!(!FILE_EXTENSION_REGEX.is_match("")); // empty
        assert!(!FILE_EXTENSION_REGEX.is_match("tar.gz")); // dot
        assert!(!FILE_EXTENSION_REGEX.is_match("jp g")); // space
        assert!(!FILE_EXTENSION_REGEX.is_match("../x")); // path
        assert!(!FILE_EXTENSION_REGEX.is_match("verylongext")); // too long
    }

    #[test]
    fn test_integer_id_regex() {
        assert!(INTEGER_ID_REGEX.is_match("1"));
        assert!(INTEGER_ID_REGEX.is_match("+7"));
        assert!(!INTEGER_ID_REGEX.is_match("1.5"));
        assert!(!INTEGER_ID_REGEX.is_match("-3"));
        assert!(!INTEGER_ID_REGEX.is_match(" 4"));
        assert!(!INTEGER_ID_REGEX.is_match(""));
    }
}
