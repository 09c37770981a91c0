//! Decoded file contents.

use std::fmt;

/// Text decoded from one selected file.
///
/// Produced once per acquisition and handed to the delivery step unchanged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedText {
    text: String,
    file_name: String,
    byte_len: usize,
}

impl DecodedText {
    pub fn new(text: impl Into<String>, file_name: impl Into<String>, byte_len: usize) -> Self {
        Self {
            text: text.into(),
            file_name: file_name.into(),
            byte_len,
        }
    }

    /// The decoded string.
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Name of the file the text came from, as reported by the picker.
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    /// Size of the file before decoding.
    pub fn byte_len(&self) -> usize {
        self.byte_len
    }

    /// Whether decoding substituted any U+FFFD replacement characters.
    pub fn has_replacements(&self) -> bool {
        self.text.contains(char::REPLACEMENT_CHARACTER)
    }

    pub fn into_string(self) -> String {
        self.text
    }
}

impl fmt::Display for DecodedText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

impl AsRef<str> for DecodedText {
    fn as_ref(&self) -> &str {
        &self.text
    }
}
