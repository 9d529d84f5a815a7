//! Inventory page object.

use crate::browser::Page;
use crate::result::EnsayoResult;

/// The inventory listing shown after a successful login.
#[derive(Debug, Clone, Copy)]
pub struct InventoryPage<'a> {
    page: &'a Page,
}

impl<'a> InventoryPage<'a> {
    /// Page title selector
    pub const TITLE: &'static str = ".title";

    /// Create the page object over a live page handle
    #[must_use]
    pub const fn new(page: &'a Page) -> Self {
        Self { page }
    }

    /// Read the page title text
    pub async fn title(&self) -> EnsayoResult<String> {
        self.page.inner_text(Self::TITLE).await
    }
}
