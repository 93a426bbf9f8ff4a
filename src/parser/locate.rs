//! Breadth-first search for the evaluation-shaped subtree.
//!
//! Models wrap their result in structures like `{"evaluation": {...}}` or
//! `{"data": {...}}`. BFS order means the shallowest qualifying node wins,
//! which unwraps thin wrappers without ever descending past the real payload.

use std::collections::{HashSet, VecDeque};

use serde_json::Value;

/// Node-visit bound; guarantees termination and bounded cost on any input.
const MAX_VISITED_NODES: usize = 1000;

/// Find the first node, in breadth-first order, that looks like an
/// evaluation payload. Returns `None` when the bound is exhausted or no
/// node qualifies.
pub(crate) fn find_evaluation_payload(root: &Value) -> Option<&Value> {
    let mut queue: VecDeque<&Value> = VecDeque::new();
    let mut visited: HashSet<*const Value> = HashSet::new();
    let mut steps = 0;
    queue.push_back(root);

    while let Some(current) = queue.pop_front() {
        if steps >= MAX_VISITED_NODES {
            break;
        }
        steps += 1;

        if !visited.insert(current as *const Value) {
            continue;
        }

        match current {
            Value::Object(map) => {
                if map.contains_key("score") && looks_like_evaluation(map) {
                    return Some(current);
                }
                queue.extend(map.values());
            }
            Value::Array(items) => {
                queue.extend(items.iter());
            }
            _ => {}
        }
    }

    None
}

fn looks_like_evaluation(map: &serde_json::Map<String, Value>) -> bool {
    let score = &map["score"];

    // A per-dimension leaf ({key, label, score}) also carries a score field;
    // those are nested items, not payload roots.
    let is_dimension_like = map.get("key").is_some_and(Value::is_string)
        && map.get("label").is_some_and(Value::is_string)
        && (score.is_number() || score.is_string());

    (!is_dimension_like && (score.is_number() || score.is_string()))
        || matches!(score, Value::Object(inner)
            if inner.contains_key("overall") || inner.contains_key("dimensions"))
        || map.get("summary").is_some_and(Value::is_string)
        || map.get("improvements").is_some_and(Value::is_array)
        || map.get("patchPlan").is_some_and(Value::is_array)
}
