//! # Path Templates
//!
//! A [`Path`] is a `/`-separated template made of literal segments and
//! argument placeholders. A segment starting with `:` is an argument; the rest
//! of the segment names it, but the name is only used for display. Matching is
//! purely positional.
//!
//! ```rust
//! use restmux::path::Path;
//!
//! let path = Path::parse("/users/:user_id/posts/:post_id");
//! assert_eq!(path.num_args(), 2);
//!
//! let args = path.matches("/users/42/posts/abc").unwrap();
//! assert_eq!(args.as_slice(), ["42", "abc"]);
//!
//! assert!(path.matches("/users/42/posts").is_none());
//! ```
//!
//! Leading and trailing separators are ignored on both sides, so `/items/`
//! and `items` tokenize the same way and the root `/` has no segments.

use smallvec::SmallVec;
use std::fmt;

/// Number of path arguments stored inline before spilling to the heap.
/// Templates with more than a handful of arguments are rare.
pub const MAX_INLINE_ARGS: usize = 8;

/// Argument strings extracted from a concrete path, in template order.
pub type ArgVec = SmallVec<[String; MAX_INLINE_ARGS]>;

const ARG_MARKER: char = ':';
const SEPARATOR: char = '/';

/// One segment of a path template.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Segment {
    /// Must equal the concrete segment verbatim.
    Literal(String),
    /// Captures the concrete segment; the name is documentation only.
    Arg(String),
}

impl Segment {
    fn parse(raw: &str) -> Self {
        match raw.strip_prefix(ARG_MARKER) {
            Some(name) => Segment::Arg(name.to_owned()),
            None => Segment::Literal(raw.to_owned()),
        }
    }

    #[must_use]
    pub fn is_arg(&self) -> bool {
        matches!(self, Segment::Arg(_))
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Segment::Literal(text) => f.write_str(text),
            Segment::Arg(name) => write!(f, "{ARG_MARKER}{name}"),
        }
    }
}

/// Split a concrete or templated path into its segments.
///
/// Surrounding separators are dropped; interior empty segments (`/a//b`) are
/// kept so that they can only match an identical template.
pub(crate) fn split_segments(path: &str) -> impl Iterator<Item = &str> + '_ {
    let trimmed = path.trim_matches(SEPARATOR);
    (!trimmed.is_empty())
        .then(|| trimmed.split(SEPARATOR))
        .into_iter()
        .flatten()
}

/// A parsed path template. Immutable once parsed.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Path {
    segments: Vec<Segment>,
    num_args: usize,
}

impl Path {
    /// Parse a template such as `/items/:id`.
    #[must_use]
    pub fn parse(template: &str) -> Self {
        let segments: Vec<Segment> = split_segments(template).map(Segment::parse).collect();
        let num_args = segments.iter().filter(|s| s.is_arg()).count();
        Self { segments, num_args }
    }

    /// Number of argument placeholders in the template.
    #[must_use]
    pub fn num_args(&self) -> usize {
        self.num_args
    }

    #[must_use]
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Names of the argument placeholders, in template order.
    pub fn arg_names(&self) -> impl Iterator<Item = &str> + '_ {
        self.segments.iter().filter_map(|segment| match segment {
            Segment::Arg(name) => Some(name.as_str()),
            Segment::Literal(_) => None,
        })
    }

    /// Match a concrete path against this template.
    ///
    /// Returns the captured argument strings in template order, or `None` if
    /// the segment counts differ or any literal segment differs.
    #[must_use]
    pub fn matches(&self, concrete: &str) -> Option<ArgVec> {
        let mut actual = split_segments(concrete);
        let mut args = ArgVec::new();

        for segment in &self.segments {
            let value = actual.next()?;
            match segment {
                Segment::Literal(text) if text != value => return None,
                Segment::Literal(_) => {}
                Segment::Arg(_) => args.push(value.to_owned()),
            }
        }

        if actual.next().is_some() {
            return None;
        }
        Some(args)
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.segments.is_empty() {
            return f.write_str("/");
        }
        for segment in &self.segments {
            write!(f, "{SEPARATOR}{segment}")?;
        }
        Ok(())
    }
}
