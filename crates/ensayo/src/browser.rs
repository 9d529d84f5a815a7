//! Browser control for the test session driver.
//!
//! When compiled with the `browser` feature, pages are driven over the
//! Chrome DevTools Protocol via chromiumoxide. Without the feature, a
//! deterministic mock page stands in so the harness, page objects, and
//! failure triage can be exercised without a browser binary.

use crate::result::{EnsayoError, EnsayoResult};

/// Browser configuration
#[derive(Debug, Clone)]
pub struct BrowserConfig {
    /// Run in headless mode
    pub headless: bool,
    /// Viewport width
    pub viewport_width: u32,
    /// Viewport height
    pub viewport_height: u32,
    /// Path to chromium binary (None = auto-detect)
    pub chromium_path: Option<String>,
    /// Sandbox mode (disable for containers)
    pub sandbox: bool,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            headless: true,
            viewport_width: 1280,
            viewport_height: 720,
            chromium_path: None,
            sandbox: true,
        }
    }
}

impl BrowserConfig {
    /// Set viewport dimensions
    #[must_use]
    pub const fn with_viewport(mut self, width: u32, height: u32) -> Self {
        self.viewport_width = width;
        self.viewport_height = height;
        self
    }

    /// Set headless mode
    #[must_use]
    pub const fn with_headless(mut self, headless: bool) -> Self {
        self.headless = headless;
        self
    }

    /// Set chromium path
    #[must_use]
    pub fn with_chromium_path(mut self, path: impl Into<String>) -> Self {
        self.chromium_path = Some(path.into());
        self
    }

    /// Disable sandbox (for containers/CI)
    #[must_use]
    pub const fn with_no_sandbox(mut self) -> Self {
        self.sandbox = false;
        self
    }
}

// ============================================================================
// Real CDP Implementation (when `browser` feature is enabled)
// ============================================================================

#[cfg(feature = "browser")]
mod cdp {
    use super::{BrowserConfig, EnsayoError, EnsayoResult};
    use chromiumoxide::browser::{Browser as CdpBrowser, BrowserConfig as CdpConfig};
    use chromiumoxide::cdp::browser_protocol::page::{
        CaptureScreenshotFormat, CaptureScreenshotParams,
    };
    use chromiumoxide::page::Page as CdpPage;
    use futures::StreamExt;
    use std::sync::Arc;
    use tokio::sync::Mutex;

    /// Browser instance with a live CDP connection
    #[derive(Debug)]
    pub struct Browser {
        config: BrowserConfig,
        inner: Arc<Mutex<CdpBrowser>>,
        #[allow(dead_code)]
        handle: tokio::task::JoinHandle<()>,
    }

    impl Browser {
        /// Launch a new browser instance
        ///
        /// # Errors
        ///
        /// Returns error if browser cannot be launched
        pub async fn launch(config: BrowserConfig) -> EnsayoResult<Self> {
            let mut builder = CdpConfig::builder();

            if !config.headless {
                builder = builder.with_head();
            }

            if !config.sandbox {
                builder = builder.no_sandbox();
            }

            if let Some(ref path) = config.chromium_path {
                builder = builder.chrome_executable(path);
            }

            let cdp_config = builder
                .build()
                .map_err(|e| EnsayoError::BrowserLaunchError {
                    message: e.to_string(),
                })?;

            let (browser, mut handler) = CdpBrowser::launch(cdp_config).await.map_err(|e| {
                EnsayoError::BrowserLaunchError {
                    message: e.to_string(),
                }
            })?;

            let handle = tokio::spawn(async move {
                while let Some(h) = handler.next().await {
                    if h.is_err() {
                        break;
                    }
                }
            });

            Ok(Self {
                config,
                inner: Arc::new(Mutex::new(browser)),
                handle,
            })
        }

        /// Create a new page
        ///
        /// # Errors
        ///
        /// Returns error if page cannot be created
        pub async fn new_page(&self) -> EnsayoResult<Page> {
            let browser = self.inner.lock().await;
            let cdp_page =
                browser
                    .new_page("about:blank")
                    .await
                    .map_err(|e| EnsayoError::PageError {
                        message: e.to_string(),
                    })?;

            Ok(Page {
                url: String::from("about:blank"),
                inner: Arc::new(Mutex::new(cdp_page)),
            })
        }

        /// Get the browser configuration
        #[must_use]
        pub const fn config(&self) -> &BrowserConfig {
            &self.config
        }

        /// Close the browser
        pub async fn close(self) -> EnsayoResult<()> {
            let mut browser = self.inner.lock().await;
            browser
                .close()
                .await
                .map_err(|e| EnsayoError::BrowserLaunchError {
                    message: e.to_string(),
                })?;
            Ok(())
        }
    }

    /// A browser page with a live CDP connection
    #[derive(Debug)]
    pub struct Page {
        /// Current URL
        url: String,
        inner: Arc<Mutex<CdpPage>>,
    }

    impl Page {
        /// Navigate to a URL
        pub async fn goto(&mut self, url: &str) -> EnsayoResult<()> {
            let page = self.inner.lock().await;
            page.goto(url)
                .await
                .map_err(|e| EnsayoError::NavigationError {
                    url: url.to_string(),
                    message: e.to_string(),
                })?;
            self.url = url.to_string();
            Ok(())
        }

        /// Click the element matching a CSS selector
        pub async fn click(&self, selector: &str) -> EnsayoResult<()> {
            let page = self.inner.lock().await;
            let element = page
                .find_element(selector)
                .await
                .map_err(|e| EnsayoError::element(selector, e.to_string()))?;
            element
                .click()
                .await
                .map_err(|e| EnsayoError::element(selector, e.to_string()))?;
            Ok(())
        }

        /// Type a value into the element matching a CSS selector
        pub async fn fill(&self, selector: &str, value: &str) -> EnsayoResult<()> {
            let page = self.inner.lock().await;
            let element = page
                .find_element(selector)
                .await
                .map_err(|e| EnsayoError::element(selector, e.to_string()))?;
            element
                .click()
                .await
                .map_err(|e| EnsayoError::element(selector, e.to_string()))?;
            element
                .type_str(value)
                .await
                .map_err(|e| EnsayoError::element(selector, e.to_string()))?;
            Ok(())
        }

        /// Read the rendered text of the element matching a CSS selector
        pub async fn inner_text(&self, selector: &str) -> EnsayoResult<String> {
            let page = self.inner.lock().await;
            let expr = format!(
                "document.querySelector({})?.innerText ?? null",
                serde_json::to_string(selector).unwrap_or_default()
            );
            let result = page
                .evaluate(expr)
                .await
                .map_err(|e| EnsayoError::element(selector, e.to_string()))?;
            let text: Option<String> = result
                .into_value()
                .map_err(|e| EnsayoError::element(selector, e.to_string()))?;
            text.ok_or_else(|| EnsayoError::element(selector, "element not found"))
        }

        /// Check whether the element matching a CSS selector is rendered
        pub async fn is_visible(&self, selector: &str) -> EnsayoResult<bool> {
            let page = self.inner.lock().await;
            let expr = format!(
                "(() => {{ const el = document.querySelector({}); \
                 return el !== null && el.getClientRects().length > 0; }})()",
                serde_json::to_string(selector).unwrap_or_default()
            );
            let result = page
                .evaluate(expr)
                .await
                .map_err(|e| EnsayoError::element(selector, e.to_string()))?;
            result
                .into_value()
                .map_err(|e| EnsayoError::element(selector, e.to_string()))
        }

        /// Take a screenshot (PNG bytes)
        pub async fn screenshot(&self) -> EnsayoResult<Vec<u8>> {
            let page = self.inner.lock().await;
            let params = CaptureScreenshotParams::builder()
                .format(CaptureScreenshotFormat::Png)
                .build();

            let screenshot =
                page.execute(params)
                    .await
                    .map_err(|e| EnsayoError::ScreenshotError {
                        message: e.to_string(),
                    })?;

            use base64::Engine;
            base64::engine::general_purpose::STANDARD
                .decode(&screenshot.data)
                .map_err(|e| EnsayoError::ScreenshotError {
                    message: e.to_string(),
                })
        }

        /// Get current URL
        #[must_use]
        pub fn current_url(&self) -> &str {
            &self.url
        }
    }
}

// ============================================================================
// Mock Implementation (when `browser` feature is NOT enabled)
// ============================================================================

#[cfg(not(feature = "browser"))]
mod mock {
    use super::{BrowserConfig, EnsayoError, EnsayoResult};
    use std::collections::HashMap;

    /// Browser instance for testing (mock when `browser` feature disabled)
    #[derive(Debug)]
    pub struct Browser {
        config: BrowserConfig,
    }

    impl Browser {
        /// Launch a new browser instance (mock)
        pub async fn launch(config: BrowserConfig) -> EnsayoResult<Self> {
            Ok(Self { config })
        }

        /// Create a new page
        pub async fn new_page(&self) -> EnsayoResult<Page> {
            Ok(Page::new())
        }

        /// Get the browser configuration
        #[must_use]
        pub const fn config(&self) -> &BrowserConfig {
            &self.config
        }

        /// Close the browser
        pub async fn close(self) -> EnsayoResult<()> {
            Ok(())
        }
    }

    #[derive(Debug, Clone)]
    struct MockElement {
        text: String,
    }

    /// A deterministic in-memory page (mock when `browser` feature disabled).
    ///
    /// Elements are registered up front; interactions are recorded so tests
    /// can assert on them.
    #[derive(Debug, Default)]
    pub struct Page {
        url: String,
        elements: HashMap<String, MockElement>,
        fail_screenshot: bool,
    }

    impl Page {
        /// Create a new empty page
        #[must_use]
        pub fn new() -> Self {
            Self {
                url: String::from("about:blank"),
                ..Self::default()
            }
        }

        /// Register an element with rendered text
        #[must_use]
        pub fn with_element(mut self, selector: impl Into<String>, text: impl Into<String>) -> Self {
            let _ = self.elements.insert(
                selector.into(),
                MockElement { text: text.into() },
            );
            self
        }

        /// Make subsequent screenshot calls fail
        #[must_use]
        pub const fn with_failing_screenshot(mut self) -> Self {
            self.fail_screenshot = true;
            self
        }

        /// Navigate to a URL
        pub async fn goto(&mut self, url: &str) -> EnsayoResult<()> {
            self.url = url.to_string();
            Ok(())
        }

        /// Click a registered element
        pub async fn click(&self, selector: &str) -> EnsayoResult<()> {
            if !self.elements.contains_key(selector) {
                return Err(EnsayoError::element(selector, "element not found"));
            }
            Ok(())
        }

        /// Type a value into a registered element
        pub async fn fill(&self, selector: &str, _value: &str) -> EnsayoResult<()> {
            if !self.elements.contains_key(selector) {
                return Err(EnsayoError::element(selector, "element not found"));
            }
            Ok(())
        }

        /// Read the rendered text of a registered element
        pub async fn inner_text(&self, selector: &str) -> EnsayoResult<String> {
            self.elements
                .get(selector)
                .map(|e| e.text.clone())
                .ok_or_else(|| EnsayoError::element(selector, "element not found"))
        }

        /// Check whether an element is registered
        pub async fn is_visible(&self, selector: &str) -> EnsayoResult<bool> {
            Ok(self.elements.contains_key(selector))
        }

        /// Take a screenshot (mock returns a PNG header)
        pub async fn screenshot(&self) -> EnsayoResult<Vec<u8>> {
            if self.fail_screenshot {
                return Err(EnsayoError::ScreenshotError {
                    message: "mock screenshot failure".to_string(),
                });
            }
            Ok(vec![0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A])
        }

        /// Get current URL
        #[must_use]
        pub fn current_url(&self) -> &str {
            &self.url
        }
    }
}

// Re-export based on feature
#[cfg(feature = "browser")]
pub use cdp::{Browser, Page};

#[cfg(not(feature = "browser"))]
pub use mock::{Browser, Page};

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = BrowserConfig::default();
        assert!(config.headless);
        assert_eq!(config.viewport_width, 1280);
        assert!(config.sandbox);
    }

    #[test]
    fn test_config_builders() {
        let config = BrowserConfig::default()
            .with_viewport(800, 600)
            .with_headless(false)
            .with_no_sandbox()
            .with_chromium_path("/usr/bin/chromium");
        assert_eq!(config.viewport_width, 800);
        assert!(!config.headless);
        assert!(!config.sandbox);
        assert_eq!(config.chromium_path.as_deref(), Some("/usr/bin/chromium"));
    }

    #[cfg(not(feature = "browser"))]
    mod mock_page_tests {
        use super::super::*;

        #[tokio::test]
        async fn test_mock_navigation() {
            let browser = Browser::launch(BrowserConfig::default()).await.unwrap();
            let mut page = browser.new_page().await.unwrap();
            page.goto("https://app.example.com").await.unwrap();
            assert_eq!(page.current_url(), "https://app.example.com");
        }

        #[tokio::test]
        async fn test_mock_element_interactions() {
            let page = Page::new()
                .with_element("#login-button", "Login")
                .with_element(".title", "Inventory");

            assert!(page.is_visible("#login-button").await.unwrap());
            assert!(!page.is_visible("#missing").await.unwrap());
            assert_eq!(page.inner_text(".title").await.unwrap(), "Inventory");
            assert!(page.click("#login-button").await.is_ok());
            assert!(page.fill("#missing", "x").await.is_err());
        }

        #[tokio::test]
        async fn test_mock_screenshot_modes() {
            let page = Page::new();
            let bytes = page.screenshot().await.unwrap();
            assert_eq!(&bytes[1..4], b"PNG");

            let failing = Page::new().with_failing_screenshot();
            assert!(failing.screenshot().await.is_err());
        }
    }
}
