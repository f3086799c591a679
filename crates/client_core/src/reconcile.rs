//! Deterministic updates of the local collection, applied only after the
//! remote service has confirmed an operation.

use shared::domain::{Comment, CommentId};

/// Replaces the whole collection with the first `limit` fetched records,
/// keeping response order. Returns the installed length.
pub fn install_initial(list: &mut Vec<Comment>, fetched: Vec<Comment>, limit: usize) -> usize {
    *list = fetched.into_iter().take(limit).collect();
    list.len()
}

pub fn append_created(list: &mut Vec<Comment>, created: Comment) {
    list.push(created);
}

/// Swaps every entry whose id is `id` for `replacement`, in place.
/// Returns how many entries were replaced; zero leaves the list untouched.
pub fn replace_matching(list: &mut [Comment], id: CommentId, replacement: &Comment) -> usize {
    let mut replaced = 0;
    for entry in list.iter_mut().filter(|entry| entry.id == id) {
        *entry = replacement.clone();
        replaced += 1;
    }
    replaced
}

pub fn remove_matching(list: &mut Vec<Comment>, id: CommentId) -> usize {
    let before = list.len();
    list.retain(|entry| entry.id != id);
    before - list.len()
}

#[cfg(test)]
#[path = "tests/reconcile_tests.rs"]
mod tests;
