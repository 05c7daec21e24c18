//! Pagination instruments

use std::num::NonZeroU64;

use axum::{
    extract::{rejection::QueryRejection, FromRequestParts, Query},
    response::IntoResponse,
    Json,
};
use sea_orm::{ConnectionTrait, DbErr, ItemsAndPagesNumber, Paginator, SelectorTrait};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::{IntoParams, IntoResponses, ToSchema};

use crate::errors::ErrorResponse;

#[derive(
    Deserialize, Debug, Clone, Copy, PartialEq, Eq, FromRequestParts, IntoParams, Serialize,
)]
#[from_request(via(Query), rejection(ErrorResponse<QueryRejection>))]
#[into_params(parameter_in=Query)]
#[serde(try_from = "RawPaginationParams")]
/// Parameter needed on a paginated endpoint
///
/// The offset of the requested page must fit the database offset type,
/// otherwise the query is rejected.
pub struct PaginationParams {
    /// The requested page, starting from 0
    #[serde(default)]
    #[param(default = 0)]
    pub page: u64,
    /// The page size
    #[serde(default = "default_page_size")]
    #[param(value_type = u64, minimum = 1, default = default_page_size)]
    pub page_size: NonZeroU64,
}

#[derive(Deserialize)]
struct RawPaginationParams {
    #[serde(default)]
    page: u64,
    #[serde(default = "default_page_size")]
    page_size: NonZeroU64,
}

/// The requested page starts past the largest offset the database accepts
#[derive(Debug, Clone, Copy, Error)]
#[error("Page {page} of size {page_size} is out of range")]
pub struct PageOutOfRange {
    page: u64,
    page_size: NonZeroU64,
}

/// Largest offset postgres accepts (`bigint`)
const MAX_OFFSET: u64 = i64::MAX as u64;

impl TryFrom<RawPaginationParams> for PaginationParams {
    type Error = PageOutOfRange;

    fn try_from(
        RawPaginationParams { page, page_size }: RawPaginationParams,
    ) -> Result<Self, Self::Error> {
        match page.checked_mul(page_size.get()) {
            Some(offset) if offset <= MAX_OFFSET && page_size.get() <= MAX_OFFSET => {
                Ok(Self { page, page_size })
            }
            _ => Err(PageOutOfRange { page, page_size }),
        }
    }
}

impl Default for PaginationParams {
    fn default() -> Self {
        Self {
            page: 0,
            page_size: default_page_size(),
        }
    }
}

const fn default_page_size() -> NonZeroU64 {
    match NonZeroU64::new(15) {
        Some(size) => size,
        None => unreachable!(),
    }
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq, ToSchema, IntoResponses, Deserialize)]
#[response(status = OK)]
/// Paginated result
pub struct PaginatedDto<T: ToSchema> {
    /// Paginated data
    pub data: Box<[T]>,
    /// Page info
    pub page: PageInfo,
}
impl<T: Serialize + ToSchema> IntoResponse for PaginatedDto<T> {
    fn into_response(self) -> axum::response::Response {
        Json(self).into_response()
    }
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq, ToSchema, Deserialize)]
/// Page info
pub struct PageInfo {
    /// Current page number
    pub current: u64,
    /// Total number of pages
    pub number_of_pages: u64,
    /// Total number of items
    pub number_of_items: u64,
    /// Size of each page
    pub size: u64,
    /// Next page, if any
    pub next: Option<u64>,
    /// Previous page, if any
    pub prev: Option<u64>,
}

impl PageInfo {
    pub async fn new<C: ConnectionTrait, S: SelectorTrait>(
        current: u64,
        size: u64,
        paginator: &Paginator<'_, C, S>,
    ) -> Result<Self, DbErr> {
        let ItemsAndPagesNumber {
            number_of_items,
            number_of_pages,
        } = paginator.num_items_and_pages().await?;
        Ok(Self::from_counts(
            current,
            size,
            number_of_items,
            number_of_pages,
        ))
    }

    const fn from_counts(
        current: u64,
        size: u64,
        number_of_items: u64,
        number_of_pages: u64,
    ) -> Self {
        let next = match current.checked_add(1) {
            Some(n) if n < number_of_pages => Some(n),
            _ => None,
        };
        Self {
            current,
            number_of_items,
            number_of_pages,
            size,
            prev: current.checked_sub(1),
            next,
        }
    }
}
