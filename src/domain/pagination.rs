use super::validation::ErrorResponse;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

pub const DEFAULT_PAGE_SIZE: usize = 10;
pub const MAX_PAGE_SIZE: usize = 100;

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Copy, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    }
}

/// Page selection and ordering for list endpoints. Pages are 0-based.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone)]
#[serde(rename_all = "camelCase", default)]
pub struct PageRequest {
    pub page: usize,
    pub size: usize,
    pub sort_by: String,
    pub sort_dir: String,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: 0,
            size: DEFAULT_PAGE_SIZE,
            sort_by: "id".to_string(),
            sort_dir: "ASC".to_string(),
        }
    }
}

impl PageRequest {
    pub fn new(page: usize, size: usize, sort_by: &str, sort_dir: SortDirection) -> Self {
        Self {
            page,
            size,
            sort_by: sort_by.to_string(),
            sort_dir: match sort_dir {
                SortDirection::Asc => "ASC".to_string(),
                SortDirection::Desc => "DESC".to_string(),
            },
        }
    }

    /// Checks size bounds, sort field and direction, collecting every problem.
    pub fn validate(&self, sortable: &[&str]) -> Vec<ErrorResponse> {
        let mut errors = Vec::new();
        if self.size == 0 || self.size > MAX_PAGE_SIZE {
            errors.push(ErrorResponse::new(
                "size",
                format!("size must be between 1 and {}", MAX_PAGE_SIZE),
            ));
        }
        if !sortable.contains(&self.sort_by.as_str()) {
            errors.push(ErrorResponse::new(
                "sortBy",
                format!(
                    "cannot sort by '{}', expected one of: {}",
                    self.sort_by,
                    sortable.join(", ")
                ),
            ));
        }
        if self.direction().is_none() {
            errors.push(ErrorResponse::new(
                "sortDir",
                format!("sort direction '{}' must be ASC or DESC", self.sort_dir),
            ));
        }
        errors
    }

    pub fn direction(&self) -> Option<SortDirection> {
        if self.sort_dir.eq_ignore_ascii_case("ASC") {
            Some(SortDirection::Asc)
        } else if self.sort_dir.eq_ignore_ascii_case("DESC") {
            Some(SortDirection::Desc)
        } else {
            None
        }
    }
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub content: Vec<T>,
    pub page_no: usize,
    pub page_size: usize,
    pub total_elements: usize,
    pub total_pages: usize,
    pub last: bool,
}

/// Cuts an already sorted collection down to the requested page.
pub fn paginate<T>(items: Vec<T>, request: &PageRequest) -> Page<T> {
    let size = request.size.max(1);
    let total_elements = items.len();
    let total_pages = total_elements.div_ceil(size);
    let content: Vec<T> = items
        .into_iter()
        .skip(request.page.saturating_mul(size))
        .take(size)
        .collect();

    Page {
        content,
        page_no: request.page,
        page_size: size,
        total_elements,
        total_pages,
        last: request.page.saturating_add(1) >= total_pages,
    }
}
