//! The login/inventory scenario suite.

use ensayo::page::{InventoryPage, LoginPage};
use ensayo::{EnsayoError, EnsayoResult, Page, TestCase, TestSuite};
use futures::future::BoxFuture;
use tracing::{error, info};

/// Build the scenario suite in registration order.
#[must_use]
pub fn suite() -> TestSuite {
    let mut suite = TestSuite::new("login-inventory");
    suite.add_test(TestCase::new("login_standard_user", login_standard_user));
    suite.add_test(TestCase::new(
        "invalid_login_bad_username",
        invalid_login_bad_username,
    ));
    suite.add_test(TestCase::new(
        "invalid_login_bad_password",
        invalid_login_bad_password,
    ));
    suite.add_test(TestCase::new(
        "invalid_login_empty_credentials",
        invalid_login_empty_credentials,
    ));
    suite.add_test(TestCase::new("checkout", checkout).with_skip("Feature not implemented yet"));
    suite.add_test(
        TestCase::new("view_product", view_product).with_xfail("BUG-123: View Product broken"),
    );
    suite
}

async fn assert_login_page_loaded(login: &LoginPage<'_>) -> EnsayoResult<()> {
    if login.is_loaded().await? {
        info!("Login page loaded");
        Ok(())
    } else {
        error!("Login button not visible. Test failed");
        Err(EnsayoError::assertion("Login button not visible"))
    }
}

/// Valid credentials land on the inventory page.
fn login_standard_user(page: &mut Page) -> BoxFuture<'_, EnsayoResult<()>> {
    Box::pin(async move {
        let login = LoginPage::new(page);
        assert_login_page_loaded(&login).await?;
        login.login("standard_user", "secret_sauce").await?;

        let inventory = InventoryPage::new(page);
        let title = inventory.title().await?;
        if !title.contains("Inventory") {
            error!("\"Inventory\" not in inventory page title. Test failed.");
            return Err(EnsayoError::assertion(
                "\"Inventory\" not in inventory page title",
            ));
        }
        info!("\"Inventory\" text found in inventory page title. Test passed.");
        Ok(())
    })
}

async fn attempt_invalid_login(
    page: &Page,
    scenario: &str,
    username: &str,
    password: &str,
) -> EnsayoResult<()> {
    let login = LoginPage::new(page);
    assert_login_page_loaded(&login).await?;
    login.login(username, password).await?;

    if login.error_shown().await? {
        info!(
            "Error message shown. Login failed for {scenario} scenario. \
             \"{username}\"/\"{password}\". Test passed"
        );
        Ok(())
    } else {
        error!("Error message not shown. Test failed");
        Err(EnsayoError::assertion(
            "error message not shown for rejected credentials",
        ))
    }
}

fn invalid_login_bad_username(page: &mut Page) -> BoxFuture<'_, EnsayoResult<()>> {
    Box::pin(attempt_invalid_login(
        page,
        "Bad username/Correct password",
        "bad_username",
        "secret_sauce",
    ))
}

fn invalid_login_bad_password(page: &mut Page) -> BoxFuture<'_, EnsayoResult<()>> {
    Box::pin(attempt_invalid_login(
        page,
        "Correct username/Bad password",
        "standard_user",
        "bad_password",
    ))
}

fn invalid_login_empty_credentials(page: &mut Page) -> BoxFuture<'_, EnsayoResult<()>> {
    Box::pin(attempt_invalid_login(
        page,
        "Empty username and password",
        "",
        "",
    ))
}

/// Placeholder until the checkout flow exists; never runs while skipped.
fn checkout(_page: &mut Page) -> BoxFuture<'_, EnsayoResult<()>> {
    Box::pin(async { Ok(()) })
}

/// Known-broken flow kept in the suite as an expected failure.
fn view_product(_page: &mut Page) -> BoxFuture<'_, EnsayoResult<()>> {
    Box::pin(async {
        Err(EnsayoError::assertion(
            "view product flow is not available",
        ))
    })
}
