use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumIter, EnumString};

/// Languages the game ships text for.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Default,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    AsRefStr,
)]
pub enum ClientLanguage {
    #[serde(rename = "ja")]
    #[strum(serialize = "ja")]
    Japanese,
    #[default]
    #[serde(rename = "en")]
    #[strum(serialize = "en")]
    English,
    #[serde(rename = "de")]
    #[strum(serialize = "de")]
    German,
    #[serde(rename = "fr")]
    #[strum(serialize = "fr")]
    French,
}

impl ClientLanguage {
    /// Capitalizes the first letter of every word. Japanese has no letter case,
    /// so the text is returned as is.
    pub fn title_case(self, text: &str) -> String {
        if self == ClientLanguage::Japanese {
            return text.to_string();
        }
        let mut out = String::with_capacity(text.len());
        let mut at_word_start = true;
        for c in text.chars() {
            if at_word_start && c.is_alphabetic() {
                out.extend(c.to_uppercase());
                at_word_start = false;
            } else {
                out.push(c);
                at_word_start = c.is_whitespace() || c == '-';
            }
        }
        out
    }
}

pub fn first_char_to_upper(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

pub fn first_char_to_lower(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_language_codes() {
        assert_eq!(ClientLanguage::from_str("de").unwrap(), ClientLanguage::German);
        assert_eq!(ClientLanguage::French.to_string(), "fr");
        assert_eq!(
            serde_json::to_string(&ClientLanguage::Japanese).unwrap(),
            "\"ja\""
        );
    }

    #[test]
    fn test_title_case() {
        assert_eq!(
            ClientLanguage::English.title_case("the lost city of amdapor"),
            "The Lost City Of Amdapor"
        );
        assert_eq!(ClientLanguage::English.title_case("x-ray  vision"), "X-Ray  Vision");
        assert_eq!(ClientLanguage::English.title_case("1st place"), "1st Place");
        assert_eq!(ClientLanguage::Japanese.title_case("abc"), "abc");
    }

    #[test]
    fn test_first_char_case() {
        assert_eq!(first_char_to_upper("élan vital"), "Élan vital");
        assert_eq!(first_char_to_lower("Hello World"), "hello World");
        assert_eq!(first_char_to_upper(""), "");
    }
}
