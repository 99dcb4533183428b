/// Resolves catalog image fields, which may be absolute URLs or paths relative to the CDN.
#[derive(Debug, Clone)]
pub struct ImageResolver {
    cdn_base: String,
}

impl ImageResolver {
    pub fn new(cdn_base: impl Into<String>) -> Self {
        Self { cdn_base: cdn_base.into() }
    }

    /// An empty path stays empty.
    pub fn resolve(&self, path: &str) -> String {
        if path.is_empty() || path.starts_with("http") {
            return path.to_string();
        }
        format!("{}{}", self.cdn_base, path)
    }
}
