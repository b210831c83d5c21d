//! Total ordering over JSON values
//!
//! Ordering rules across types:
//! - missing = null < number < string < object < array < bool
//! - For same types, natural ordering (strings compare bytewise)

use std::cmp::Ordering;

use serde_json::Value;

fn type_rank(value: Option<&Value>) -> u8 {
    match value {
        None | Some(Value::Null) => 0,
        Some(Value::Number(_)) => 1,
        Some(Value::String(_)) => 2,
        Some(Value::Object(_)) => 3,
        Some(Value::Array(_)) => 4,
        Some(Value::Bool(_)) => 5,
    }
}

fn compare_numbers(a: &serde_json::Number, b: &serde_json::Number) -> Ordering {
    if let (Some(ai), Some(bi)) = (a.as_i64(), b.as_i64()) {
        return ai.cmp(&bi);
    }
    let a_f = a.as_f64().unwrap_or(0.0);
    let b_f = b.as_f64().unwrap_or(0.0);
    a_f.partial_cmp(&b_f).unwrap_or(Ordering::Equal)
}

/// Compares two optional JSON values for sorting.
pub fn compare_values(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    let rank = type_rank(a).cmp(&type_rank(b));
    if rank != Ordering::Equal {
        return rank;
    }

    match (a, b) {
        (Some(Value::Number(a)), Some(Value::Number(b))) => compare_numbers(a, b),
        (Some(Value::String(a)), Some(Value::String(b))) => a.cmp(b),
        (Some(Value::Bool(a)), Some(Value::Bool(b))) => a.cmp(b),
        (Some(Value::Array(a)), Some(Value::Array(b))) => {
            for (x, y) in a.iter().zip(b.iter()) {
                let ord = compare_values(Some(x), Some(y));
                if ord != Ordering::Equal {
                    return ord;
                }
            }
            a.len().cmp(&b.len())
        }
        (Some(Value::Object(a)), Some(Value::Object(b))) => {
            for ((ak, av), (bk, bv)) in a.iter().zip(b.iter()) {
                let ord = ak
                    .cmp(bk)
                    .then_with(|| compare_values(Some(av), Some(bv)));
                if ord != Ordering::Equal {
                    return ord;
                }
            }
            a.len().cmp(&b.len())
        }
        _ => Ordering::Equal,
    }
}

/// Resolves a dotted field path (`"_id.author"`) inside a document.
pub fn lookup<'a>(document: &'a Value, path: &str) -> Option<&'a Value> {
    path.split('.')
        .try_fold(document, |current, segment| current.get(segment))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_cross_type_order() {
        let ordered = [
            json!(null),
            json!(-3),
            json!(2.5),
            json!("A"),
            json!("a"),
            json!({"k": 1}),
            json!([1]),
            json!(false),
            json!(true),
        ];
        for pair in ordered.windows(2) {
            assert_eq!(
                compare_values(Some(&pair[0]), Some(&pair[1])),
                Ordering::Less,
                "{} should sort before {}",
                pair[0],
                pair[1]
            );
        }
    }

    #[test]
    fn test_missing_equals_null() {
        assert_eq!(compare_values(None, Some(&json!(null))), Ordering::Equal);
        assert_eq!(compare_values(None, Some(&json!(0))), Ordering::Less);
    }

    #[test]
    fn test_int_and_float_compare_numerically() {
        assert_eq!(
            compare_values(Some(&json!(300)), Some(&json!(299.5))),
            Ordering::Greater
        );
        assert_eq!(
            compare_values(Some(&json!(200)), Some(&json!(200.0))),
            Ordering::Equal
        );
    }

    #[test]
    fn test_lookup_dotted_path() {
        let doc = json!({"_id": {"author": "Author3"}, "pages": 200});
        assert_eq!(lookup(&doc, "_id.author"), Some(&json!("Author3")));
        assert_eq!(lookup(&doc, "pages"), Some(&json!(200)));
        assert_eq!(lookup(&doc, "_id.missing"), None);
        assert_eq!(lookup(&doc, "pages.deeper"), None);
    }
}
