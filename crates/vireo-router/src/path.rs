//! Request path decomposition.

use std::borrow::Cow;

use smallvec::SmallVec;

/// Number of directory parts stored inline.
const INLINE_DIRECTORIES: usize = 6;

/// A request path split into directory parts and a trailing file name.
///
/// Every segment is percent-decoded exactly once, here; nothing downstream
/// decodes again.
///
/// | Path | Directories | File name |
/// |------|-------------|-----------|
/// | `/` | `[]` | `""` |
/// | `/about` | `[]` | `"about"` |
/// | `/shop/item/` | `["shop", "item"]` | `""` |
/// | `/shop/item/42` | `["shop", "item"]` | `"42"` |
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RequestPath {
    directories: SmallVec<[String; INLINE_DIRECTORIES]>,
    filename: String,
}

impl RequestPath {
    /// Decomposes a URL path (as found in a request URL, still percent-encoded).
    ///
    /// # Example
    ///
    /// ```rust
    /// use vireo_router::RequestPath;
    ///
    /// let path = RequestPath::parse("/docs/my%20file.txt");
    /// assert_eq!(path.directories(), ["docs"]);
    /// assert_eq!(path.filename(), "my file.txt");
    /// ```
    #[must_use]
    pub fn parse(path: &str) -> Self {
        let trimmed = path.strip_prefix('/').unwrap_or(path);
        let mut parts: SmallVec<[String; INLINE_DIRECTORIES]> =
            trimmed.split('/').map(decode_segment).collect();

        // `split` always yields at least one item.
        let filename = parts.pop().unwrap_or_default();

        Self {
            directories: parts,
            filename,
        }
    }

    /// Builds a request path from already-decoded parts.
    #[must_use]
    pub fn from_parts<I, S>(directories: I, filename: impl Into<String>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            directories: directories.into_iter().map(Into::into).collect(),
            filename: filename.into(),
        }
    }

    /// Returns the directory parts (every segment but the last).
    #[must_use]
    pub fn directories(&self) -> &[String] {
        &self.directories
    }

    /// Returns the trailing file name; empty when the path ends in `/`.
    #[must_use]
    pub fn filename(&self) -> &str {
        &self.filename
    }
}

fn decode_segment(segment: &str) -> String {
    match urlencoding::decode(segment) {
        Ok(Cow::Borrowed(s)) => s.to_string(),
        Ok(Cow::Owned(s)) => s,
        Err(_) => String::from_utf8_lossy(&urlencoding::decode_binary(segment.as_bytes()))
            .into_owned(),
    }
}
