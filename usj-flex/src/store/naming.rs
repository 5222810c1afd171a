//! Text name conflict resolution

use super::{StoreError, TargetProject};
use std::collections::HashSet;

/// Suggest a free text name
///
/// # Parameters
/// * `project` - Project whose existing texts are checked
/// * `base` - Requested name
///
/// # Returns
/// * `Ok(String)` - `base` when it is free, otherwise `"base (N)"` for the
///   smallest N >= 2 that is free
pub fn suggest_text_name<P: TargetProject + ?Sized>(
    project: &P,
    base: &str,
) -> Result<String, StoreError> {
    let taken: HashSet<String> = project
        .list_texts()?
        .into_iter()
        .map(|text| text.name)
        .collect();

    if !taken.contains(base) {
        return Ok(base.to_string());
    }

    let suggestion = (2u32..)
        .map(|n| format!("{} ({})", base, n))
        .find(|candidate| !taken.contains(candidate))
        .unwrap_or_else(|| base.to_string());
    Ok(suggestion)
}
