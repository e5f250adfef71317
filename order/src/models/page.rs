// order/src/models/page.rs

use serde::Serialize;

/// Zero-based page request as understood by the repositories.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
  pub number: u32,
  pub size: u32,
}

impl PageRequest {
  pub fn new(number: u32, size: u32) -> Self {
    Self { number, size: size.max(1) }
  }

  pub fn offset(&self) -> u64 {
    u64::from(self.number) * u64::from(self.size)
  }
}

/// One page of results plus the total element count.
#[derive(Debug, Clone)]
pub struct Page<T> {
  pub content: Vec<T>,
  pub request: PageRequest,
  pub total_elements: u64,
}

/// Paging block of a HAL collection response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageMetadata {
  pub size: u32,
  pub total_elements: u64,
  pub total_pages: u64,
  pub number: u32,
}

impl<T> Page<T> {
  pub fn new(content: Vec<T>, request: PageRequest, total_elements: u64) -> Self {
    Self {
      content,
      request,
      total_elements,
    }
  }

  pub fn total_pages(&self) -> u64 {
    self.total_elements.div_ceil(u64::from(self.request.size))
  }

  pub fn has_previous(&self) -> bool {
    self.request.number > 0
  }

  pub fn has_next(&self) -> bool {
    u64::from(self.request.number) + 1 < self.total_pages()
  }

  /// Index of the last page; 0 for an empty collection.
  pub fn last_page_number(&self) -> u32 {
    self.total_pages().saturating_sub(1).min(u64::from(u32::MAX)) as u32
  }

  pub fn metadata(&self) -> PageMetadata {
    PageMetadata {
      size: self.request.size,
      total_elements: self.total_elements,
      total_pages: self.total_pages(),
      number: self.request.number,
    }
  }

  pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
    Page {
      content: self.content.into_iter().map(f).collect(),
      request: self.request,
      total_elements: self.total_elements,
    }
  }
}
