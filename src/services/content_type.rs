use mime::Mime;

/// Maps a stored file extension to a MIME type.
pub trait MimeResolver: Send + Sync {
    fn lookup(&self, extension: &str) -> Option<Mime>;
}

/// Decides whether a resolved MIME type may be served at all.
pub trait ContentPolicy: Send + Sync {
    fn allows(&self, mime: &Mime) -> bool;
}

/// Static extension table from `mime_guess`.
#[derive(Debug, Default, Clone, Copy)]
pub struct ExtensionMimeResolver;

impl MimeResolver for ExtensionMimeResolver {
    fn lookup(&self, extension: &str) -> Option<Mime> {
        let ext = normalize_extension(extension)?;
        mime_guess::from_ext(&ext).first()
    }
}

/// Accepts `png`, `.png` and `photo.png` alike.
pub fn normalize_extension(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    let ext = trimmed.rsplit('.').next().unwrap_or(trimmed);
    if ext.is_empty() {
        None
    } else {
        Some(ext.to_ascii_lowercase())
    }
}

/// Allows MIME types whose top-level type is in a fixed list.
#[derive(Debug, Clone)]
pub struct CategoryPolicy {
    categories: Vec<String>,
}

impl CategoryPolicy {
    pub fn new<I, S>(categories: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            categories: categories
                .into_iter()
                .map(|c| c.into().trim().to_ascii_lowercase())
                .filter(|c| !c.is_empty())
                .collect(),
        }
    }

    /// Images and videos only.
    pub fn media() -> Self {
        Self::new(["image", "video"])
    }

    pub fn categories(&self) -> &[String] {
        &self.categories
    }
}

impl Default for CategoryPolicy {
    fn default() -> Self {
        Self::media()
    }
}

impl ContentPolicy for CategoryPolicy {
    fn allows(&self, mime: &Mime) -> bool {
        let top = mime.type_().as_str();
        self.categories.iter().any(|c| c.eq_ignore_ascii_case(top))
    }
}
