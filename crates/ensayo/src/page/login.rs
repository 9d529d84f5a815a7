//! Login page object.

use super::PageActions;
use crate::browser::Page;
use crate::result::EnsayoResult;

/// The login form of the application under test.
#[derive(Debug, Clone, Copy)]
pub struct LoginPage<'a> {
    page: &'a Page,
    actions: PageActions<'a>,
}

impl<'a> LoginPage<'a> {
    /// Username input selector
    pub const USERNAME_INPUT: &'static str = "#user-name";
    /// Password input selector
    pub const PASSWORD_INPUT: &'static str = "#password";
    /// Login button selector
    pub const LOGIN_BUTTON: &'static str = "#login-button";
    /// Error banner shown on rejected credentials
    pub const ERROR_BANNER: &'static str = "[data-test=\"error\"]";

    /// Create the page object over a live page handle
    #[must_use]
    pub const fn new(page: &'a Page) -> Self {
        Self {
            page,
            actions: PageActions::new(page),
        }
    }

    /// Check that the login form is rendered
    pub async fn is_loaded(&self) -> EnsayoResult<bool> {
        self.page.is_visible(Self::LOGIN_BUTTON).await
    }

    /// Fill the credential fields and submit the form
    pub async fn login(&self, username: &str, password: &str) -> EnsayoResult<()> {
        self.actions
            .fill_fields(&[
                (Self::USERNAME_INPUT, username),
                (Self::PASSWORD_INPUT, password),
            ])
            .await?;
        self.actions.click(Self::LOGIN_BUTTON).await
    }

    /// Check whether the credentials-rejected banner is shown
    pub async fn error_shown(&self) -> EnsayoResult<bool> {
        self.page.is_visible(Self::ERROR_BANNER).await
    }
}
