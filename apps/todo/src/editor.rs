//! Editor operations.
//!
//! Pure functions from the current list to the next one. They never mutate
//! their input; the reducer swaps the result into the list atom.

use crate::types::{IdCounter, TodoId, TodoItem, TodoList};
use thiserror::Error;

/// Errors returned by the editor operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EditorError {
    /// No item carries the requested id
    #[error("Todo with ID {0} not found")]
    NotFound(TodoId),
}

/// Appends a new incomplete item with a freshly allocated id
///
/// Returns the new list and the advanced counter. The text is taken as is,
/// including the empty string.
#[must_use]
pub fn insert(list: &[TodoItem], counter: IdCounter, text: impl Into<String>) -> (TodoList, IdCounter) {
    let (id, counter) = counter.next();
    let mut next = Vec::with_capacity(list.len() + 1);
    next.extend_from_slice(list);
    next.push(TodoItem::new(id, text));
    (next, counter)
}

/// Replaces the first item with `id` by `new_item`
///
/// Every other item keeps its position.
///
/// # Errors
///
/// Returns [`EditorError::NotFound`] if no item has `id`.
pub fn update_by_id(id: TodoId, new_item: TodoItem, list: &[TodoItem]) -> Result<TodoList, EditorError> {
    let index = position(id, list)?;
    let mut next = list.to_vec();
    next[index] = new_item;
    Ok(next)
}

/// Removes the first item with `id`
///
/// Every other item keeps its relative order.
///
/// # Errors
///
/// Returns [`EditorError::NotFound`] if no item has `id`.
pub fn delete_by_id(id: TodoId, list: &[TodoItem]) -> Result<TodoList, EditorError> {
    let index = position(id, list)?;
    let mut next = Vec::with_capacity(list.len() - 1);
    next.extend_from_slice(&list[..index]);
    next.extend_from_slice(&list[index + 1..]);
    Ok(next)
}

fn position(id: TodoId, list: &[TodoItem]) -> Result<usize, EditorError> {
    list.iter()
        .position(|item| item.id == id)
        .ok_or(EditorError::NotFound(id))
}
