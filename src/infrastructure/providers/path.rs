//! # Path Resolver
//!
//! Navigates a [`serde_json::Value`] tree with dotted paths.
//!
//! A path is a list of segments separated by `.`. Each segment is a mapping
//! key, or a position when the current node is a sequence. Bracket indices
//! are accepted as an alternative spelling, so `rates.0.amount` and
//! `rates[0].amount` resolve to the same node. The empty path resolves to
//! the root.
//!
//! Resolution never fails loudly: a missing key, an out-of-range index or a
//! scalar in the middle of the path all yield `None`.
//!
//! # Examples
//!
//! ```
//! use serde_json::json;
//! use shipquote::infrastructure::providers::path::resolve;
//!
//! let tree = json!({"output": {"rateReplyDetails": [{"totalNetCharge": 512.4}]}});
//! assert_eq!(
//!     resolve(&tree, "output.rateReplyDetails[0].totalNetCharge"),
//!     Some(&json!(512.4))
//! );
//! assert_eq!(resolve(&tree, "output.missing"), None);
//! ```

use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Segment<'a> {
    Key(&'a str),
    Index(usize),
}

/// Splits a path into segments, or `None` if a bracket index is malformed.
fn segments(path: &str) -> Option<Vec<Segment<'_>>> {
    let mut out = Vec::new();
    if path.is_empty() {
        return Some(out);
    }

    for part in path.split('.') {
        let Some(open) = part.find('[') else {
            out.push(Segment::Key(part));
            continue;
        };

        let (name, mut rest) = part.split_at(open);
        if !name.is_empty() {
            out.push(Segment::Key(name));
        }
        while !rest.is_empty() {
            let inner = rest.strip_prefix('[')?;
            let close = inner.find(']')?;
            let (digits, tail) = inner.split_at(close);
            out.push(Segment::Index(digits.trim().parse().ok()?));
            rest = tail.get(1..)?;
        }
    }

    Some(out)
}

fn step<'v>(node: &'v Value, segment: Segment<'_>) -> Option<&'v Value> {
    match (node, segment) {
        (Value::Object(map), Segment::Key(key)) => map.get(key),
        (Value::Object(map), Segment::Index(index)) => map.get(&index.to_string()),
        (Value::Array(items), Segment::Index(index)) => items.get(index),
        (Value::Array(items), Segment::Key(key)) => items.get(key.parse::<usize>().ok()?),
        _ => None,
    }
}

/// Resolves `path` against `tree`.
///
/// Returns `None` when any segment is missing or the path is malformed.
#[must_use]
pub fn resolve<'v>(tree: &'v Value, path: &str) -> Option<&'v Value> {
    segments(path)?
        .into_iter()
        .try_fold(tree, |node, segment| step(node, segment))
}
