//! Column Sorting
//!
//! Derived ordering over a loaded collection. Sorting copies; the cached
//! collection is never reordered.

use std::cmp::Ordering;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn flipped(self) -> Self {
        match self {
            SortDirection::Ascending => SortDirection::Descending,
            SortDirection::Descending => SortDirection::Ascending,
        }
    }

    pub fn arrow(self) -> &'static str {
        match self {
            SortDirection::Ascending => "▲",
            SortDirection::Descending => "▼",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortState<F> {
    pub field: F,
    pub direction: SortDirection,
}

impl<F: Copy + PartialEq> SortState<F> {
    /// Column click: same column flips, another column starts ascending
    pub fn toggle(current: Option<Self>, field: F) -> Self {
        match current {
            Some(state) if state.field == field => SortState {
                field,
                direction: state.direction.flipped(),
            },
            _ => SortState {
                field,
                direction: SortDirection::Ascending,
            },
        }
    }
}

/// Comparable cell value
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SortValue<'a> {
    Text(&'a str),
    Number(f64),
}

/// Numbers order before text when a column mixes both
pub fn compare_values(a: &SortValue, b: &SortValue) -> Ordering {
    match (a, b) {
        (SortValue::Text(a), SortValue::Text(b)) => locale_compare(a, b),
        (SortValue::Number(a), SortValue::Number(b)) => a.partial_cmp(b).unwrap_or(Ordering::Equal),
        (SortValue::Number(_), SortValue::Text(_)) => Ordering::Less,
        (SortValue::Text(_), SortValue::Number(_)) => Ordering::Greater,
    }
}

#[cfg(target_arch = "wasm32")]
fn locale_compare(a: &str, b: &str) -> Ordering {
    let result = js_sys::JsString::from(a).locale_compare(b, &js_sys::Array::new());
    result.cmp(&0)
}

#[cfg(not(target_arch = "wasm32"))]
fn locale_compare(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}

/// Sorted copy of `items`; unsorted copy when `state` is `None`.
/// The sort is stable, so equal keys keep their loaded order.
pub fn sorted<T, F, K>(items: &[T], state: Option<SortState<F>>, key: K) -> Vec<T>
where
    T: Clone,
    F: Copy,
    K: for<'a> Fn(&'a T, F) -> SortValue<'a>,
{
    let mut view = items.to_vec();
    if let Some(state) = state {
        view.sort_by(|a, b| {
            let ordering = compare_values(&key(a, state.field), &key(b, state.field));
            match state.direction {
                SortDirection::Ascending => ordering,
                SortDirection::Descending => ordering.reverse(),
            }
        });
    }
    view
}
