//! Extraction options and configuration.

/// Options for pulling content out of Word documents.
#[derive(Debug, Clone, Default)]
pub struct ExtractOptions {
    /// Error handling mode
    pub error_mode: ErrorMode,

    /// What to extract from the document
    pub extract_mode: ExtractMode,

    /// How DOCX runs become text lines
    pub text_grouping: TextGrouping,
}

impl ExtractOptions {
    /// Create new extract options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set error mode.
    pub fn with_error_mode(mut self, mode: ErrorMode) -> Self {
        self.error_mode = mode;
        self
    }

    /// Enable lenient mode (skip undecodable pictures).
    pub fn lenient(mut self) -> Self {
        self.error_mode = ErrorMode::Lenient;
        self
    }

    /// Extract text only.
    pub fn text_only(mut self) -> Self {
        self.extract_mode = ExtractMode::TextOnly;
        self
    }

    /// Set text grouping.
    pub fn with_text_grouping(mut self, grouping: TextGrouping) -> Self {
        self.text_grouping = grouping;
        self
    }

    /// Whether pictures should be collected.
    pub fn wants_images(&self) -> bool {
        self.extract_mode == ExtractMode::Full
    }
}

/// Error handling mode during extraction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ErrorMode {
    /// Fail on any error
    #[default]
    Strict,
    /// Skip undecodable pictures and continue
    Lenient,
}

/// What content to extract from the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExtractMode {
    /// Extract text and pictures
    #[default]
    Full,
    /// Extract text content only
    TextOnly,
}

/// How the text of a DOCX paragraph is split into lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextGrouping {
    /// One line per non-empty run
    #[default]
    Run,
    /// Runs of a paragraph are joined into one line
    Paragraph,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_options_builder() {
        let options = ExtractOptions::new()
            .lenient()
            .text_only()
            .with_text_grouping(TextGrouping::Paragraph);

        assert_eq!(options.error_mode, ErrorMode::Lenient);
        assert_eq!(options.extract_mode, ExtractMode::TextOnly);
        assert_eq!(options.text_grouping, TextGrouping::Paragraph);
        assert!(!options.wants_images());
    }

    #[test]
    fn test_default_options() {
        let options = ExtractOptions::default();
        assert_eq!(options.error_mode, ErrorMode::Strict);
        assert_eq!(options.text_grouping, TextGrouping::Run);
        assert!(options.wants_images());
    }
}
