use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet, VecDeque};

/// One page of the sitemap.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SitemapNode {
    pub address: String,
    /// Round in which the page was discovered; the root is 0.
    pub depth: usize,
}

/// One step of [`Sitemap::walk`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalkEntry<'a> {
    pub url: &'a str,
    /// Hops from the root along the walk's breadth-first tree.
    pub hops: usize,
    pub links: Vec<&'a str>,
}

/// Directed page-to-page reachability graph produced by a crawl.
///
/// Nodes live in a petgraph arena keyed by their URL; links are edges and adding the
/// same link twice is a no-op. Cycles are allowed.
#[derive(Debug, Clone)]
pub struct Sitemap {
    graph: DiGraph<SitemapNode, ()>,
    index: HashMap<String, NodeIndex>,
    root: NodeIndex,
}

impl Sitemap {
    pub fn new(root_url: impl Into<String>) -> Self {
        let address = root_url.into();
        let mut graph = DiGraph::new();
        let root = graph.add_node(SitemapNode {
            address: address.clone(),
            depth: 0,
        });
        let index = HashMap::from([(address, root)]);

        Self { graph, index, root }
    }

    pub fn root(&self) -> &SitemapNode {
        &self.graph[self.root]
    }

    /// Number of distinct pages, root included.
    pub fn len(&self) -> usize {
        self.graph.node_count()
    }

    /// Always false: a sitemap holds at least its root.
    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    pub fn link_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn contains(&self, url: &str) -> bool {
        self.index.contains_key(url)
    }

    pub fn node(&self, url: &str) -> Option<&SitemapNode> {
        self.index.get(url).map(|idx| &self.graph[*idx])
    }

    /// Registers `url` if it is new. Returns true when a node was created.
    pub fn insert(&mut self, url: &str, depth: usize) -> bool {
        if self.index.contains_key(url) {
            return false;
        }

        let idx = self.graph.add_node(SitemapNode {
            address: url.to_string(),
            depth,
        });
        self.index.insert(url.to_string(), idx);
        true
    }

    /// Records `from -> to`. Returns false if either page is unknown.
    pub fn add_link(&mut self, from: &str, to: &str) -> bool {
        match (self.index.get(from), self.index.get(to)) {
            (Some(&source), Some(&target)) => {
                self.graph.update_edge(source, target, ());
                true
            }
            _ => false,
        }
    }

    /// Outbound links of `url` in the order they were first recorded.
    pub fn links(&self, url: &str) -> Vec<&str> {
        self.index
            .get(url)
            .map(|idx| self.targets(*idx))
            .unwrap_or_default()
            .into_iter()
            .map(|target| self.graph[target].address.as_str())
            .collect()
    }

    /// All pages in discovery order.
    pub fn nodes(&self) -> impl Iterator<Item = &SitemapNode> {
        self.graph.node_weights()
    }

    /// All links as `(from, to)` pairs in the order they were recorded.
    pub fn edges(&self) -> impl Iterator<Item = (&str, &str)> {
        self.graph.edge_references().map(|edge| {
            (
                self.graph[edge.source()].address.as_str(),
                self.graph[edge.target()].address.as_str(),
            )
        })
    }

    /// Breadth-first walk from the root yielding every reachable page exactly once.
    ///
    /// Deduplication is by URL string, so back-references and cycles are safe.
    pub fn walk(&self) -> Vec<WalkEntry<'_>> {
        let root = self.graph[self.root].address.as_str();
        let mut seen: HashSet<&str> = HashSet::from([root]);
        let mut queue = VecDeque::from([(self.root, 0)]);
        let mut entries = Vec::new();

        while let Some((idx, hops)) = queue.pop_front() {
            let targets = self.targets(idx);
            let mut links = Vec::with_capacity(targets.len());

            for target in targets {
                let address = self.graph[target].address.as_str();
                if seen.insert(address) {
                    queue.push_back((target, hops + 1));
                }
                links.push(address);
            }

            entries.push(WalkEntry {
                url: self.graph[idx].address.as_str(),
                hops,
                links,
            });
        }

        entries
    }

    fn targets(&self, idx: NodeIndex) -> Vec<NodeIndex> {
        let mut edges: Vec<_> = self
            .graph
            .edges(idx)
            .map(|edge| (edge.id(), edge.target()))
            .collect();
        edges.sort_by_key(|(id, _)| *id);
        edges.into_iter().map(|(_, target)| target).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sitemap(links: &[(&str, &str)]) -> Sitemap {
        let mut sitemap = Sitemap::new("/");
        for (depth, (from, to)) in links.iter().enumerate() {
            sitemap.insert(from, depth);
            sitemap.insert(to, depth + 1);
            sitemap.add_link(from, to);
        }
        sitemap
    }

    #[test]
    fn test_new_holds_only_root() {
        let sitemap = Sitemap::new("https://x.com/");
        assert_eq!(sitemap.len(), 1);
        assert!(!sitemap.is_empty());
        assert_eq!(sitemap.link_count(), 0);
        assert_eq!(sitemap.root().address, "https://x.com/");
        assert_eq!(sitemap.root().depth, 0);
    }

    #[test]
    fn test_insert_is_idempotent() {
        let mut sitemap = Sitemap::new("/");
        assert!(sitemap.insert("/a", 1));
        assert!(!sitemap.insert("/a", 5));
        assert_eq!(sitemap.len(), 2);
        assert_eq!(sitemap.node("/a").map(|n| n.depth), Some(1));
    }

    #[test]
    fn test_add_link_is_a_set() {
        let mut sitemap = sitemap(&[("/", "/a"), ("/", "/a")]);
        assert_eq!(sitemap.link_count(), 1);
        assert!(!sitemap.add_link("/", "/unknown"));
        assert_eq!(sitemap.links("/"), vec!["/a"]);
    }

    #[test]
    fn test_links_keep_recording_order() {
        let sitemap = sitemap(&[("/", "/c"), ("/", "/a"), ("/", "/b")]);
        assert_eq!(sitemap.links("/"), vec!["/c", "/a", "/b"]);
        assert!(sitemap.links("/missing").is_empty());
    }

    #[test]
    fn test_walk_visits_each_page_once_with_cycles() {
        let sitemap = sitemap(&[
            ("/", "/a"),
            ("/", "/b"),
            ("/a", "/b"),
            ("/b", "/a"),
            ("/b", "/"),
            ("/a", "/c"),
        ]);

        let walk = sitemap.walk();
        let urls: Vec<&str> = walk.iter().map(|e| e.url).collect();
        assert_eq!(urls, vec!["/", "/a", "/b", "/c"]);

        let hops: Vec<usize> = walk.iter().map(|e| e.hops).collect();
        assert_eq!(hops, vec![0, 1, 1, 2]);

        assert_eq!(walk[2].links, vec!["/a", "/"]);
    }

    #[test]
    fn test_walk_skips_unreachable_pages() {
        let mut sitemap = sitemap(&[("/", "/a")]);
        sitemap.insert("/orphan", 1);

        let urls: Vec<&str> = sitemap.walk().iter().map(|e| e.url).collect();
        assert_eq!(urls, vec!["/", "/a"]);
        assert_eq!(sitemap.nodes().count(), 3);
    }

    #[test]
    fn test_edges() {
        let sitemap = sitemap(&[("/", "/a"), ("/a", "/")]);
        let edges: Vec<_> = sitemap.edges().collect();
        assert_eq!(edges, vec![("/", "/a"), ("/a", "/")]);
    }
}
