//! Book metadata used on the title and copyright pages.

use crate::error::{Error, Result};
use serde::Serialize;

/// Front-matter information for a rendered book.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BookMetadata {
    /// Book title (required)
    pub title: String,
    /// Subtitle shown under the title (optional, blank means none)
    pub subtitle: String,
    /// Author or brand (required)
    pub author: String,
    /// Rights holder shown on the copyright page; defaults to the author
    pub publisher: Option<String>,
}

impl BookMetadata {
    /// Creates metadata with the required fields.
    pub fn new(title: impl Into<String>, author: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            author: author.into(),
            ..Default::default()
        }
    }

    /// Sets the subtitle.
    pub fn with_subtitle(mut self, subtitle: impl Into<String>) -> Self {
        self.subtitle = subtitle.into();
        self
    }

    /// Sets the publisher.
    pub fn with_publisher(mut self, publisher: impl Into<String>) -> Self {
        self.publisher = Some(publisher.into());
        self
    }

    /// Returns the subtitle if it has visible text.
    pub fn subtitle(&self) -> Option<&str> {
        let subtitle = self.subtitle.trim();
        (!subtitle.is_empty()).then_some(subtitle)
    }

    /// Returns the name printed in the copyright notice.
    pub fn rights_holder(&self) -> &str {
        self.publisher
            .as_deref()
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .unwrap_or_else(|| self.author.trim())
    }

    /// Checks that title and author are present.
    pub fn validate(&self) -> Result<()> {
        if self.title.trim().is_empty() {
            return Err(Error::MissingMetadata("title"));
        }
        if self.author.trim().is_empty() {
            return Err(Error::MissingMetadata("author"));
        }
        Ok(())
    }

    /// Returns a file-name friendly version of the title.
    pub fn file_stem(&self) -> String {
        self.title.trim().replace(' ', "_")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_requires_title_and_author() {
        assert!(BookMetadata::new("Title", "Author").validate().is_ok());
        assert!(matches!(
            BookMetadata::new("  ", "Author").validate(),
            Err(Error::MissingMetadata("title"))
        ));
        assert!(matches!(
            BookMetadata::new("Title", "").validate(),
            Err(Error::MissingMetadata("author"))
        ));
    }

    #[test]
    fn test_rights_holder_falls_back_to_author() {
        let meta = BookMetadata::new("T", "Jane Roe");
        assert_eq!(meta.rights_holder(), "Jane Roe");
        let meta = meta.with_publisher("Acme Press");
        assert_eq!(meta.rights_holder(), "Acme Press");
        let meta = BookMetadata::new("T", "Jane Roe").with_publisher("   ");
        assert_eq!(meta.rights_holder(), "Jane Roe");
    }

    #[test]
    fn test_subtitle_and_file_stem() {
        let meta = BookMetadata::new("My First Book", "A").with_subtitle("  ");
        assert_eq!(meta.subtitle(), None);
        assert_eq!(meta.file_stem(), "My_First_Book");
    }
}
