use indexmap::IndexMap;
use serde_json::{Map, Value};

/// Counter name → count, in first-seen order.
pub type Counts = IndexMap<String, i64>;

/// Reduce a `/meta` `counts` object to plain integer counters.
///
/// Nested objects are walked and their leaves counted under the leaf's own
/// field name, so `{"entities":{"routes":2}}` yields `routes: 2`. Zero counts
/// never create an entry. Non-integer leaves are ignored.
pub fn flatten(counts: &Map<String, Value>) -> Counts {
    let mut out = Counts::new();
    collect_into(counts, &mut out);
    out
}

fn collect_into(map: &Map<String, Value>, out: &mut Counts) {
    for (field, value) in map {
        match value {
            Value::Object(nested) => collect_into(nested, out),
            Value::Number(n) => match n.as_i64() {
                Some(0) | None => {}
                Some(count) => {
                    let slot = out.entry(field.clone()).or_insert(0);
                    *slot = slot.saturating_add(count);
                }
            },
            _ => {}
        }
    }
}

/// Add every counter in `from` onto `into`, treating a missing entry as 0.
/// Sums saturate at `i64::MAX` / `i64::MIN`.
pub fn merge(into: &mut Counts, from: &Counts) {
    for (field, count) in from {
        let slot = into.entry(field.clone()).or_insert(0);
        *slot = slot.saturating_add(*count);
    }
}
