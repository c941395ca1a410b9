pub mod artists;
pub mod extract;
pub mod musics;
pub mod profiles;
pub mod users;

use harmony_db::repo::Page;
use serde::{Deserialize, Serialize};

pub const DEFAULT_PAGE_SIZE: u64 = 10;
pub const MAX_PAGE_SIZE: u64 = 100;
/// Highest page number whose row offset still fits a signed 64-bit OFFSET.
pub const MAX_PAGE: u64 = i64::MAX as u64 / MAX_PAGE_SIZE;

#[derive(Debug, Default, Deserialize)]
pub struct PaginationParams {
    pub page: Option<u64>,
    pub page_size: Option<u64>,
}

impl PaginationParams {
    /// 1-based page within `1..=MAX_PAGE` and a page size within
    /// `1..=MAX_PAGE_SIZE`.
    pub fn resolve(&self) -> (u64, u64) {
        let page = self.page.unwrap_or(1).clamp(1, MAX_PAGE);
        let page_size = self
            .page_size
            .unwrap_or(DEFAULT_PAGE_SIZE)
            .clamp(1, MAX_PAGE_SIZE);
        (page, page_size)
    }
}

#[derive(Debug, Serialize)]
pub struct PaginatedResponse<T: Serialize> {
    pub data: Vec<T>,
    pub total: u64,
    pub page: u64,
    pub page_size: u64,
    pub total_pages: u64,
}

impl<T: Serialize> PaginatedResponse<T> {
    pub fn from_page<M>(page: Page<M>, number: u64, page_size: u64) -> Self
    where
        T: From<M>,
    {
        Self {
            data: page.items.into_iter().map(T::from).collect(),
            total: page.total,
            page: number,
            page_size,
            total_pages: page.total.div_ceil(page_size),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: &str) -> Self {
        Self {
            message: message.to_string(),
        }
    }
}
