use std::collections::HashMap;

use chrono::{DateTime, Utc};

use crate::format::Style;
use crate::helix::LiveStream;

/// Rewrites the entries of `names` that are broadcasting with a live label.
///
/// Length and order of `names` are kept; offline names come back untouched.
/// Should the API report the same channel live twice, the later stream wins.
pub fn merge(
    mut names: Vec<String>,
    live: &[LiveStream],
    style: &Style,
    now: DateTime<Utc>,
) -> Vec<String> {
    let index: HashMap<String, usize> = names
        .iter()
        .enumerate()
        .map(|(idx, name)| (name.clone(), idx))
        .collect();

    for stream in live {
        if let Some(&idx) = index.get(&stream.user_name) {
            names[idx] = style.live(stream, now);
        }
    }
    names
}
