pub const QUESTIONS_PER_PAGE: usize = 10;

/// Returns the 1-based `page` of `items`, `QUESTIONS_PER_PAGE` long at most.
///
/// Pages past the end and pages below 1 are empty. The caller decides what an
/// empty page means; the question listing treats it as "not found".
pub fn paginate<T>(items: &[T], page: i64) -> &[T] {
    let Some(index) = usize::try_from(page).ok().and_then(|p| p.checked_sub(1)) else {
        return &[];
    };
    let start = index.saturating_mul(QUESTIONS_PER_PAGE);
    if start >= items.len() {
        return &[];
    }
    let end = start.saturating_add(QUESTIONS_PER_PAGE).min(items.len());
    &items[start..end]
}
