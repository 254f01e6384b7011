#[derive(Debug, Clone)]
pub struct ServitechURL(String);

impl AsRef<str> for ServitechURL {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl ServitechURL {
    /// Creates a new ServitechURL rooted at the given API base, e.g. `http://192.168.1.73:8000`.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self(base_url.into().trim_end_matches('/').to_string())
    }

    /// Append the given path to the URL.
    pub fn append_path(&self, path: &str) -> Self {
        let trimmed_url = self.0.trim_end_matches('/');
        let trimmed_path = path.trim_start_matches('/');
        Self(format!("{}/{}", trimmed_url, trimmed_path))
    }

    /// Append a path segment that is a resource id.
    pub fn append_id(&self, id: impl std::fmt::Display) -> Self {
        self.append_path(&id.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn joins_paths_without_doubling_slashes() {
        let url = ServitechURL::new("http://localhost:8000/")
            .append_path("/incidencias/")
            .append_path("pausar")
            .append_id(42);
        assert_eq!(url.as_ref(), "http://localhost:8000/incidencias/pausar/42");
    }

    #[test]
    fn technician_bucket_path() {
        let url = ServitechURL::new("http://localhost:8000")
            .append_path("/incidencias/tecnico")
            .append_id(7)
            .append_path("en-reparacion");
        assert_eq!(
            url.as_ref(),
            "http://localhost:8000/incidencias/tecnico/7/en-reparacion"
        );
    }
}
