use url::Url;

/// Rewrites hrefs found on crawled pages into absolute URLs on the root's origin.
///
/// Only root-relative paths (`/about`) and links that start with the full root URL
/// are followed. Everything else (other hosts, `mailto:`, bare fragments, paths
/// relative to the current page) is rejected.
#[derive(Debug, Clone)]
pub struct Normalizer {
    root: Url,
}

impl Normalizer {
    pub fn new(root: &Url) -> Self {
        Self { root: root.clone() }
    }

    /// Returns the absolute URL for `href`, or `None` when it must not be followed.
    pub fn normalize(&self, href: &str) -> Option<String> {
        let relative = if href.starts_with('/') && href != "/" {
            href
        } else {
            href.strip_prefix(self.root.as_str())?
        };

        let (relative, fragment) = match relative.split_once('#') {
            Some((path, fragment)) => (path, Some(fragment)),
            None => (relative, None),
        };
        let (relative, query) = match relative.split_once('?') {
            Some((path, query)) => (path, Some(query)),
            None => (relative, None),
        };

        let joined = clean_path(&format!("{}/{}", self.root.path(), relative));

        let mut absolute = self.root.clone();
        absolute.set_path(&joined);
        absolute.set_query(query);
        absolute.set_fragment(fragment);
        Some(absolute.to_string())
    }
}

/// Lexically cleans a rooted path: collapses repeated slashes, resolves `.` and `..`
/// and drops any trailing slash. `..` at the top stays at `/`.
pub fn clean_path(path: &str) -> String {
    let mut segments: Vec<&str> = Vec::new();
    for segment in path.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            segment => segments.push(segment),
        }
    }
    format!("/{}", segments.join("/"))
}
