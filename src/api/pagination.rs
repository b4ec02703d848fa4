//! Fixed-size page windows over question listings

use serde::Deserialize;
use utoipa::IntoParams;

/// Number of questions in one page
pub const QUESTIONS_PER_PAGE: usize = 10;

/// `?page=N` query parameter
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PageQuery {
    /// 1-based page number; defaults to 1
    #[param(value_type = Option<i64>)]
    pub page: Option<String>,
}

impl PageQuery {
    /// Parse the page number, falling back to 1 when absent or not an integer
    pub fn page(&self) -> i64 {
        self.page
            .as_deref()
            .and_then(|p| p.trim().parse().ok())
            .unwrap_or(1)
    }
}

/// Slice out the window `[(page-1)*10, page*10)`, clamped to the list.
///
/// Pages below 1 and pages past the end yield an empty slice.
pub fn paginate<T>(items: &[T], page: i64) -> &[T] {
    if page < 1 {
        return &[];
    }

    let start = usize::try_from(page - 1)
        .ok()
        .and_then(|p| p.checked_mul(QUESTIONS_PER_PAGE))
        .unwrap_or(usize::MAX);
    if start >= items.len() {
        return &[];
    }

    let end = (start + QUESTIONS_PER_PAGE).min(items.len());
    &items[start..end]
}
