//! Segment trie used by the router.
//!
//! Each node represents one path position and branches on it:
//! - literal children, keyed by the exact segment text
//! - at most one argument child, which accepts any segment
//! - at most one route, bound when a template ends at this node
//!
//! Argument names never reach the trie, so `/users/:id` and `/users/:user_id`
//! land on the same node and conflict for the same method.
//!
//! ## Lookup
//!
//! Lookup walks one segment at a time and tries the literal child before the
//! argument child. If the literal branch dead-ends deeper down, the walk backs
//! up and retries through the argument child, so for
//!
//! ```text
//! /files/latest/meta
//! /files/:id/raw
//! ```
//!
//! `/files/latest/raw` still reaches the second route, while `/files/latest/meta`
//! always prefers the literal one. Each path resolves to at most one route.

use smallvec::SmallVec;
use std::collections::HashMap;
use std::sync::Arc;

use crate::path::{split_segments, ArgVec, Segment};
use crate::route::Route;

/// Concrete path segments, stack-allocated for typical depths.
type SegmentVec<'a> = SmallVec<[&'a str; 16]>;

#[derive(Default)]
struct TrieNode {
    literals: HashMap<String, TrieNode>,
    arg: Option<Box<TrieNode>>,
    route: Option<Arc<Route>>,
}

impl TrieNode {
    /// Bind `route` at the end of `segments`. On conflict the already bound
    /// route is returned and the trie is left as it was at that node.
    fn insert(&mut self, segments: &[Segment], route: Arc<Route>) -> Result<(), Arc<Route>> {
        let Some((first, rest)) = segments.split_first() else {
            if let Some(existing) = &self.route {
                return Err(Arc::clone(existing));
            }
            self.route = Some(route);
            return Ok(());
        };

        let child = match first {
            Segment::Literal(text) => self.literals.entry(text.clone()).or_default(),
            Segment::Arg(_) => self.arg.get_or_insert_with(Box::default),
        };
        child.insert(rest, route)
    }

    fn search(&self, segments: &[&str], args: &mut ArgVec) -> Option<&Arc<Route>> {
        let Some((first, rest)) = segments.split_first() else {
            return self.route.as_ref();
        };

        if let Some(child) = self.literals.get(*first) {
            if let Some(route) = child.search(rest, args) {
                return Some(route);
            }
        }

        if let Some(child) = &self.arg {
            args.push((*first).to_owned());
            if let Some(route) = child.search(rest, args) {
                return Some(route);
            }
            // Backtrack
            args.pop();
        }

        None
    }
}

/// Routes of a single HTTP method.
#[derive(Default)]
pub(crate) struct SegmentTrie {
    root: TrieNode,
}

impl SegmentTrie {
    pub(crate) fn insert(&mut self, route: Arc<Route>) -> Result<(), Arc<Route>> {
        let segments = route.path().segments().to_vec();
        self.root.insert(&segments, route)
    }

    /// Find the route for a concrete path and the argument strings it captured.
    pub(crate) fn search(&self, path: &str) -> Option<(Arc<Route>, ArgVec)> {
        let segments: SegmentVec<'_> = split_segments(path).collect();
        let mut args = ArgVec::new();
        let route = self.root.search(&segments, &mut args)?;
        Some((Arc::clone(route), args))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::router::tests::unit_route;
    use http::Method;

    fn route(path: &str) -> Arc<Route> {
        Arc::new(unit_route(Method::GET, path))
    }

    fn trie(paths: &[&str]) -> SegmentTrie {
        let mut trie = SegmentTrie::default();
        for path in paths {
            assert!(trie.insert(route(path)).is_ok(), "insert {path}");
        }
        trie
    }

    fn resolve(trie: &SegmentTrie, path: &str) -> Option<(String, Vec<String>)> {
        trie.search(path)
            .map(|(route, args)| (route.path().to_string(), args.into_vec()))
    }

    #[test]
    fn test_simple_route() {
        let trie = trie(&["/health"]);
        assert_eq!(resolve(&trie, "/health"), Some(("/health".into(), vec![])));
        assert_eq!(resolve(&trie, "/healthz"), None);
    }

    #[test]
    fn test_root_route() {
        let trie = trie(&["/", "/a"]);
        assert_eq!(resolve(&trie, "/"), Some(("/".into(), vec![])));
        assert_eq!(resolve(&trie, "/a"), Some(("/a".into(), vec![])));
    }

    #[test]
    fn test_multiple_arguments() {
        let trie = trie(&["/users/:user_id/posts/:post_id"]);
        assert_eq!(
            resolve(&trie, "/users/123/posts/456"),
            Some((
                "/users/:user_id/posts/:post_id".into(),
                vec!["123".into(), "456".into()]
            ))
        );
    }

    #[test]
    fn test_literal_preferred_over_argument() {
        let trie = trie(&["/a/:x", "/a/b"]);
        assert_eq!(resolve(&trie, "/a/b"), Some(("/a/b".into(), vec![])));
        assert_eq!(resolve(&trie, "/a/c"), Some(("/a/:x".into(), vec!["c".into()])));
    }

    #[test]
    fn test_backtracks_into_argument_branch() {
        let trie = trie(&["/files/latest/meta", "/files/:id/raw"]);
        assert_eq!(
            resolve(&trie, "/files/latest/raw"),
            Some(("/files/:id/raw".into(), vec!["latest".into()]))
        );
        assert_eq!(
            resolve(&trie, "/files/latest/meta"),
            Some(("/files/latest/meta".into(), vec![]))
        );
    }

    #[test]
    fn test_prefix_is_not_a_match() {
        let trie = trie(&["/users/:id/posts"]);
        assert_eq!(resolve(&trie, "/users/1"), None);
        assert_eq!(resolve(&trie, "/users/1/posts/2"), None);
    }

    #[test]
    fn test_argument_names_do_not_distinguish_routes() {
        let mut trie = trie(&["/users/:id"]);
        let existing = trie.insert(route("/users/:user_id")).unwrap_err();
        assert_eq!(existing.path().to_string(), "/users/:id");
    }

    #[test]
    fn test_shared_prefix_with_different_suffixes() {
        let trie = trie(&["/users/:id/posts", "/users/:id/comments"]);
        assert_eq!(
            resolve(&trie, "/users/7/comments"),
            Some(("/users/:id/comments".into(), vec!["7".into()]))
        );
    }
}
