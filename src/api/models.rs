//! API Data Models
//!
//! Data structures exchanged with the inventory REST service.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

/// Default number of vehicles per page
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Health probe response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Free-form status reported by the service
    pub status: String,
}

/// Payload for creating a vehicle
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VehicleCreate {
    pub vin: String,
    pub make: String,
    pub model: String,
    pub description: String,
    #[serde(default)]
    pub image_urls: Vec<String>,
}

/// Row of the vehicle listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VehicleListItem {
    pub vin: String,
    pub make: String,
    pub model: String,
    /// Server-assigned creation timestamp
    #[serde(default)]
    pub created_at: Option<String>,
}

/// Full vehicle record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vehicle {
    pub vin: String,
    pub make: String,
    pub model: String,
    pub description: String,
    #[serde(default)]
    pub image_urls: Vec<String>,
    /// Server-assigned creation timestamp
    #[serde(default)]
    pub created_at: Option<String>,
}

impl Vehicle {
    /// Parsed creation timestamp
    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        self.created_at.as_deref().and_then(parse_timestamp)
    }
}

impl VehicleListItem {
    /// Parsed creation timestamp
    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        self.created_at.as_deref().and_then(parse_timestamp)
    }
}

/// Parse a server timestamp.
///
/// Accepts RFC 3339 as well as the offset-less ISO form some backends emit
/// for naive datetimes (interpreted as UTC).
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f"))
        .ok()
        .map(|naive| naive.and_utc())
}

/// Paginated response envelope
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaginatedResponse<T> {
    /// Items on this page
    pub items: Vec<T>,
    /// Total items across all pages
    pub total: usize,
    /// Current page (1-indexed)
    pub page: usize,
    /// Items per page
    pub page_size: usize,
    /// Total pages; zero when the server omitted it
    #[serde(default)]
    pub total_pages: usize,
}

/// One page of the vehicle listing
pub type PaginatedVehicles = PaginatedResponse<VehicleListItem>;

/// Number of pages needed for `total` items, never less than one
pub fn total_pages_for(total: usize, page_size: usize) -> usize {
    if page_size == 0 {
        return 1;
    }
    total.div_ceil(page_size).max(1)
}

impl<T> PaginatedResponse<T> {
    /// Build a page, deriving the page count
    pub fn new(items: Vec<T>, total: usize, page: usize, page_size: usize) -> Self {
        Self {
            items,
            total,
            page,
            page_size,
            total_pages: total_pages_for(total, page_size),
        }
    }

    /// Empty first page
    pub fn empty(page_size: usize) -> Self {
        Self::new(Vec::new(), 0, 1, page_size)
    }

    /// Page count, falling back to one when the server sent zero
    pub fn page_count(&self) -> usize {
        self.total_pages.max(1)
    }

    /// 1-based index of the first item shown, zero when empty
    pub fn range_start(&self) -> usize {
        if self.total == 0 {
            0
        } else {
            self.page.saturating_sub(1) * self.page_size + 1
        }
    }

    /// 1-based index of the last item shown, zero when empty
    pub fn range_end(&self) -> usize {
        if self.total == 0 {
            0
        } else {
            (self.page * self.page_size).min(self.total)
        }
    }

    /// Whether `page` addresses an existing page
    pub fn contains_page(&self, page: usize) -> bool {
        page >= 1 && page <= self.page_count()
    }
}

impl<T: Clone> PaginatedResponse<T> {
    /// Paginate a complete, unpaginated listing client-side.
    ///
    /// Items are the slice `[(page-1)*page_size, page*page_size)` of `all`;
    /// out-of-range pages yield no items.
    pub fn from_unpaginated(all: &[T], page: usize, page_size: usize) -> Self {
        let items = if page == 0 {
            Vec::new()
        } else {
            let start = ((page - 1).saturating_mul(page_size)).min(all.len());
            let end = page.saturating_mul(page_size).min(all.len());
            all[start..end].to_vec()
        };
        Self::new(items, all.len(), page, page_size)
    }
}

impl<T> Default for PaginatedResponse<T> {
    fn default() -> Self {
        Self::empty(DEFAULT_PAGE_SIZE)
    }
}

/// Raw listing response.
///
/// Current backends answer with the envelope; older ones return every
/// vehicle as a bare array.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ListResponse {
    Page(PaginatedVehicles),
    Bare(Vec<VehicleListItem>),
}

impl ListResponse {
    /// Normalize into an envelope for the requested page
    pub fn into_page(self, page: usize, page_size: usize) -> PaginatedVehicles {
        match self {
            Self::Page(mut envelope) => {
                if envelope.total_pages == 0 {
                    envelope.total_pages = total_pages_for(envelope.total, envelope.page_size);
                }
                envelope
            }
            Self::Bare(all) => PaginatedResponse::from_unpaginated(&all, page, page_size),
        }
    }
}
