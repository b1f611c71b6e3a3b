//! Typed view over entry front-matter
//!
//! [`FrontMatter`] wraps a [`Metadata`] and gives the well-known entry
//! fields typed accessors. Unknown keys stay reachable through
//! [`FrontMatter::metadata`].

use crate::error::FingerprintResult;
use crate::hash::Fingerprint;
use crate::list::HashableList;
use crate::metadata::Metadata;
use crate::value::Value;

/// Entry front-matter with typed accessors
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrontMatter {
    meta: Metadata,
}

impl FrontMatter {
    /// Wrap existing metadata
    pub fn new(meta: Metadata) -> Self {
        Self { meta }
    }

    impl_text_fields!(
        title => "title",
        author => "author",
        lang => "lang",
        date => "date",
        permalink => "permalink",
        kind => "type",
    );

    impl_flag_fields!(draft => "draft");

    /// Tags as text.
    ///
    /// Accepts any sequence of text items, or a single comma-separated
    /// string. Non-text items are skipped.
    pub fn tags(&self) -> Vec<&str> {
        match self.meta.get("tags") {
            Some(Value::Text(s)) => s
                .split(',')
                .map(str::trim)
                .filter(|t| !t.is_empty())
                .collect(),
            Some(other) => other
                .as_slice()
                .unwrap_or_default()
                .iter()
                .filter_map(Value::as_str)
                .collect(),
            None => Vec::new(),
        }
    }

    /// Set tags.
    ///
    /// Stored as a [`HashableList`] so the front-matter stays fingerprintable.
    pub fn set_tags<I, S>(&mut self, tags: I) -> FingerprintResult<()>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let list: HashableList = tags.into_iter().map(|t| Value::Text(t.into())).collect();
        self.meta.set("tags", list)
    }

    /// Underlying metadata
    pub fn metadata(&self) -> &Metadata {
        &self.meta
    }

    /// Underlying metadata, mutably
    pub fn metadata_mut(&mut self) -> &mut Metadata {
        &mut self.meta
    }

    /// Unwrap into the underlying metadata
    pub fn into_inner(self) -> Metadata {
        self.meta
    }

    /// Content fingerprint of the underlying metadata
    pub fn fingerprint(&self) -> FingerprintResult<Fingerprint> {
        self.meta.fingerprint()
    }
}

impl From<Metadata> for FrontMatter {
    fn from(meta: Metadata) -> Self {
        Self::new(meta)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_accessors() {
        let mut fm = FrontMatter::default();
        assert_eq!(fm.title(), None);

        fm.set_title("Hello").unwrap();
        fm.set_kind("page").unwrap();
        assert_eq!(fm.title(), Some("Hello"));
        assert_eq!(fm.kind(), Some("page"));
        assert_eq!(fm.metadata().get("type"), Some(&Value::from("page")));
    }

    #[test]
    fn test_non_text_value_reads_as_none() {
        let meta = Metadata::from_pairs([("author.name", "Ada")]).unwrap();
        let fm = FrontMatter::from(meta);
        assert_eq!(fm.author(), None);
        assert_eq!(
            fm.metadata().lookup_path("author.name"),
            Ok(&Value::from("Ada"))
        );
    }

    #[test]
    fn test_draft_flag() {
        let mut fm = FrontMatter::default();
        assert_eq!(fm.draft(), None);
        fm.set_draft(true).unwrap();
        assert_eq!(fm.draft(), Some(true));
    }

    #[test]
    fn test_tags_from_list_and_string() {
        let mut fm = FrontMatter::default();
        fm.set_tags(["rust", "web"]).unwrap();
        assert_eq!(fm.tags(), vec!["rust", "web"]);
        assert!(fm.fingerprint().is_ok());

        fm.metadata_mut().set("tags", "a, b,,c").unwrap();
        assert_eq!(fm.tags(), vec!["a", "b", "c"]);

        fm.metadata_mut().set("tags", Value::list(["x", "y"])).unwrap();
        assert_eq!(fm.tags(), vec!["x", "y"]);
    }

    #[test]
    fn test_fingerprint_tracks_metadata() {
        let mut fm = FrontMatter::default();
        fm.set_title("A").unwrap();
        let before = fm.fingerprint().unwrap();
        fm.set_title("B").unwrap();
        assert_ne!(fm.fingerprint().unwrap(), before);
        assert_eq!(fm.fingerprint(), fm.metadata().fingerprint());
    }
}
