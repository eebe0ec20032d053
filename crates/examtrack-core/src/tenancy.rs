//! Owner partitioning and import-merge semantics.
//!
//! Entity collections are partitioned by `owner`; these helpers split a
//! collection into the current user's rows vs everyone else's, and merge
//! imported rows into an existing collection without touching other
//! owners' data.

use crate::model::Record;

/// How imported rows combine with the owner's existing rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeMode {
    /// The incoming rows replace the owner's partition wholesale.
    Replace,
    /// The incoming rows are appended; duplicate ids keep the last
    /// occurrence.
    Append,
}

/// Split rows into `(owned, others)` by the `owner` field.
pub fn split_by_owner<T: Record + Clone>(rows: &[T], owner: &str) -> (Vec<T>, Vec<T>) {
    let mut owned = Vec::new();
    let mut others = Vec::new();
    for row in rows {
        if row.owner() == owner {
            owned.push(row.clone());
        } else {
            others.push(row.clone());
        }
    }
    (owned, others)
}

/// Keep the last occurrence of each id, preserving the position of that
/// last occurrence.
fn dedup_keep_last<T: Record>(rows: Vec<T>) -> Vec<T> {
    let mut seen = std::collections::HashSet::new();
    let mut kept: Vec<T> = rows
        .into_iter()
        .rev()
        .filter(|row| seen.insert(row.id().to_string()))
        .collect();
    kept.reverse();
    kept
}

/// Merge imported rows into an existing collection.
///
/// With an `owner`, rows of other owners pass through untouched, the
/// incoming rows are stamped with that owner, and the merge applies only
/// within the owner's partition. Without one, the merge applies to the
/// whole collection as-is.
pub fn merge_rows<T: Record>(
    existing: Vec<T>,
    mut incoming: Vec<T>,
    owner: Option<&str>,
    mode: MergeMode,
) -> Vec<T> {
    match owner {
        None => match mode {
            MergeMode::Replace => incoming,
            MergeMode::Append => {
                let mut combined = existing;
                combined.append(&mut incoming);
                dedup_keep_last(combined)
            }
        },
        Some(owner) => {
            for row in &mut incoming {
                row.set_owner(owner);
            }
            let (owned, others) = partition_owned(existing, owner);
            let merged = match mode {
                MergeMode::Replace => dedup_keep_last(incoming),
                MergeMode::Append => {
                    let mut combined = owned;
                    combined.append(&mut incoming);
                    dedup_keep_last(combined)
                }
            };
            let mut result = others;
            result.extend(merged);
            result
        }
    }
}

fn partition_owned<T: Record>(rows: Vec<T>, owner: &str) -> (Vec<T>, Vec<T>) {
    let mut owned = Vec::new();
    let mut others = Vec::new();
    for row in rows {
        if row.owner() == owner {
            owned.push(row);
        } else {
            others.push(row);
        }
    }
    (owned, others)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Subject;

    fn subject(id: &str, owner: &str, credits: u32) -> Subject {
        Subject {
            id: id.into(),
            name: id.into(),
            credits,
            confidence: 5,
            exam_date: None,
            owner: owner.into(),
        }
    }

    #[test]
    fn split_partitions_by_owner() {
        let rows = vec![
            subject("a", "u1", 1),
            subject("b", "u2", 1),
            subject("c", "u1", 1),
        ];
        let (owned, others) = split_by_owner(&rows, "u1");
        assert_eq!(owned.len(), 2);
        assert_eq!(others.len(), 1);
        assert_eq!(others[0].id, "b");
    }

    #[test]
    fn replace_only_touches_owner_partition() {
        let existing = vec![subject("a", "u1", 1), subject("b", "u2", 1)];
        let incoming = vec![subject("c", "", 1)];
        let merged = merge_rows(existing, incoming, Some("u1"), MergeMode::Replace);
        let ids: Vec<&str> = merged.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["b", "c"]);
        assert!(merged.iter().all(|s| s.id != "a"));
        assert_eq!(merged[1].owner, "u1");
    }

    #[test]
    fn append_keeps_last_duplicate() {
        let existing = vec![subject("a", "u1", 1), subject("b", "u1", 1)];
        let incoming = vec![subject("a", "u1", 5)];
        let merged = merge_rows(existing, incoming, Some("u1"), MergeMode::Append);
        let ids: Vec<&str> = merged.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["b", "a"]);
        let a = merged.iter().find(|s| s.id == "a").unwrap();
        assert_eq!(a.credits, 5);
    }

    #[test]
    fn ownerless_replace_swaps_everything() {
        let existing = vec![subject("a", "u1", 1)];
        let incoming = vec![subject("z", "u2", 1)];
        let merged = merge_rows(existing, incoming, None, MergeMode::Replace);
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].id, "z");
    }

    #[test]
    fn ownerless_append_dedups_globally() {
        let existing = vec![subject("a", "u1", 1), subject("b", "u2", 1)];
        let incoming = vec![subject("b", "u2", 9)];
        let merged = merge_rows(existing, incoming, None, MergeMode::Append);
        assert_eq!(merged.len(), 2);
        let b = merged.iter().find(|s| s.id == "b").unwrap();
        assert_eq!(b.credits, 9);
    }
}
