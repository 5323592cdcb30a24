//! Cascade merge of parsed assignments.

use super::parser::{Assignment, Quote};
use super::LoadedEnv;
use crate::domain::EnvFile;
use std::collections::HashSet;

/// Order discovered files for merging: farthest directory first, and
/// candidate order within one directory.
///
/// Under cascade (last wins) this lets nearer directories beat their
/// ancestors and `.env.<env>.local` beat `.env.local`, `.env.<env>` and `.env`.
/// Explicit file lists all sit at depth 0 and keep their given order.
pub fn merge_order(files: &[EnvFile]) -> Vec<EnvFile> {
    let mut ordered = files.to_vec();
    ordered.sort_by(|a, b| b.depth.cmp(&a.depth).then(a.order.cmp(&b.order)));
    ordered
}

/// Fold one file's assignments into `target`.
///
/// New keys are always set. Keys set by an earlier file are overwritten only
/// when `cascade` is on. Within a single file the last assignment wins.
pub fn merge_assignments(target: &mut LoadedEnv, assignments: &[Assignment], cascade: bool) {
    let mut introduced: HashSet<&str> = HashSet::new();
    for assignment in assignments {
        let key = assignment.key.as_str();
        let literal = assignment.quote == Quote::Single;
        if !target.mapping.contains_key(key) {
            target.set(key, &assignment.value, literal);
            introduced.insert(key);
        } else if cascade || introduced.contains(key) {
            target.set(key, &assignment.value, literal);
        }
    }
}
