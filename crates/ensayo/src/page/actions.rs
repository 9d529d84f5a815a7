//! Shared page interaction capabilities.

use crate::browser::Page;
use crate::result::EnsayoResult;
use tracing::info;

/// Click/fill capabilities composed by the higher-level page objects.
#[derive(Debug, Clone, Copy)]
pub struct PageActions<'a> {
    page: &'a Page,
}

impl<'a> PageActions<'a> {
    /// Wrap a page handle
    #[must_use]
    pub const fn new(page: &'a Page) -> Self {
        Self { page }
    }

    /// Click the element matching a selector
    pub async fn click(&self, selector: &str) -> EnsayoResult<()> {
        self.page.click(selector).await?;
        info!("{selector} clicked");
        Ok(())
    }

    /// Fill the element matching a selector with a value
    pub async fn fill(&self, selector: &str, value: &str) -> EnsayoResult<()> {
        self.page.fill(selector, value).await
    }

    /// Fill a sequence of fields, logging each step
    pub async fn fill_fields(&self, pairs: &[(&str, &str)]) -> EnsayoResult<()> {
        for (index, (selector, value)) in pairs.iter().enumerate() {
            info!("Step {}: Filling {selector}", index + 1);
            self.fill(selector, value).await?;
        }
        Ok(())
    }
}

#[cfg(all(test, not(feature = "browser")))]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_click_known_element() {
        let page = Page::new().with_element("#login-button", "Login");
        let actions = PageActions::new(&page);
        assert!(actions.click("#login-button").await.is_ok());
    }

    #[tokio::test]
    async fn test_fill_fields_stops_on_missing_element() {
        let page = Page::new().with_element("#user-name", "");
        let actions = PageActions::new(&page);
        let result = actions
            .fill_fields(&[("#user-name", "standard_user"), ("#password", "secret")])
            .await;
        assert!(result.is_err());
    }
}
