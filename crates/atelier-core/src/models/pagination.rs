use serde::Serialize;

pub const DEFAULT_PAGE: u32 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListKind {
    List,
    Media,
    Component,
}

impl ListKind {
    pub fn default_page_size(&self) -> u32 {
        match self {
            ListKind::List => 10,
            ListKind::Media => 12,
            ListKind::Component => 10,
        }
    }

    pub fn page_size_options(&self) -> &'static [u32] {
        match self {
            ListKind::List => &[10, 20, 50, 100],
            ListKind::Media => &[12, 24, 48],
            ListKind::Component => &[10, 20, 50],
        }
    }
}

/// `page`/`limit` pair sent by list endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Pagination {
    pub page: u32,
    pub limit: u32,
}

impl Pagination {
    pub fn first(kind: ListKind) -> Self {
        Self {
            page: DEFAULT_PAGE,
            limit: kind.default_page_size(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        assert_eq!(Pagination::first(ListKind::Media), Pagination { page: 1, limit: 12 });
        assert_eq!(ListKind::List.page_size_options(), &[10, 20, 50, 100]);
        assert!(ListKind::Component
            .page_size_options()
            .contains(&ListKind::Component.default_page_size()));
    }
}
