//! Real browser control over the Chrome DevTools Protocol.
//!
//! Each [`ChromiumDriver`] owns its own Chromium process with a throwaway
//! profile directory, so sessions share no cookies or storage. Element
//! commands run as small scripts against `document.querySelector`; `fill`
//! and `select_option` go through the native value setter and dispatch
//! `input`/`change` so React-controlled inputs observe the edit.

use crate::config::SuiteConfig;
use crate::driver::{BrowserDriver, ElementState};
use crate::result::{SwagError, SwagResult};
use crate::selector::Selector;
use crate::wait::{poll_until, WaitOptions};
use async_trait::async_trait;
use chromiumoxide::browser::{Browser as CdpBrowser, BrowserConfig as CdpConfig};
use chromiumoxide::page::Page as CdpPage;
use futures::StreamExt;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tempfile::TempDir;
use tokio::sync::Mutex;

/// Driver bound to one Chromium process and one tab
#[derive(Debug)]
pub struct ChromiumDriver {
    browser: Mutex<CdpBrowser>,
    page: CdpPage,
    handle: tokio::task::JoinHandle<()>,
    wait: WaitOptions,
    navigation_timeout: Duration,
    _profile: TempDir,
}

impl ChromiumDriver {
    /// Launch Chromium and open a blank tab
    ///
    /// # Errors
    ///
    /// Returns error if browser cannot be launched
    pub async fn launch(config: &SuiteConfig) -> SwagResult<Self> {
        let profile = tempfile::Builder::new()
            .prefix("swag-e2e-profile")
            .tempdir()?;

        let mut builder = CdpConfig::builder()
            .user_data_dir(profile.path())
            .request_timeout(config.navigation_timeout());

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
            .map_err(|message| SwagError::BrowserLaunch { message })?;

        let (browser, mut handler) =
            CdpBrowser::launch(cdp_config)
                .await
                .map_err(|e| SwagError::BrowserLaunch {
                    message: e.to_string(),
                })?;

        let handle = tokio::spawn(async move {
            while let Some(h) = handler.next().await {
                if h.is_err() {
                    break;
                }
            }
        });

        let page = browser
            .new_page("about:blank")
            .await
            .map_err(|e| SwagError::browser(e.to_string()))?;

        tracing::debug!(headless = config.headless, "chromium session launched");

        Ok(Self {
            browser: Mutex::new(browser),
            page,
            handle,
            wait: WaitOptions::new()
                .with_timeout(config.element_timeout_ms)
                .with_poll_interval(config.poll_interval_ms),
            navigation_timeout: config.navigation_timeout(),
            _profile: profile,
        })
    }

    /// Close the browser and remove its profile
    pub async fn close(self) -> SwagResult<()> {
        let closed = {
            let mut browser = self.browser.lock().await;
            match browser.close().await {
                Ok(_) => {
                    if let Err(e) = browser.wait().await {
                        tracing::warn!(error = %e, "chromium did not exit cleanly");
                    }
                    Ok(())
                }
                Err(e) => Err(SwagError::browser(e.to_string())),
            }
        };
        stop_handler(&self.handle, closed)
    }

    async fn eval<T: DeserializeOwned>(&self, script: String) -> SwagResult<T> {
        let result = self
            .page
            .evaluate(script)
            .await
            .map_err(|e| SwagError::browser(e.to_string()))?;
        result
            .into_value()
            .map_err(|e| SwagError::browser(e.to_string()))
    }

    async fn element_state(&self, selector: &Selector) -> SwagResult<DomState> {
        let raw: String = self.eval(state_script(selector)).await?;
        Ok(match raw.as_str() {
            "visible" => DomState::Visible,
            "hidden" => DomState::Hidden,
            _ => DomState::Detached,
        })
    }

    async fn query<T: DeserializeOwned>(
        &self,
        selector: &Selector,
        state: ElementState,
        body: &str,
    ) -> SwagResult<T> {
        self.wait_for(selector, state).await?;
        self.eval(element_script(selector, body)).await
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DomState {
    Detached,
    Hidden,
    Visible,
}

fn js_string(value: &str) -> String {
    serde_json::Value::String(value.to_string()).to_string()
}

fn state_script(selector: &Selector) -> String {
    format!(
        "(() => {{ const el = document.querySelector({sel}); \
         if (!el) return 'detached'; \
         const r = el.getBoundingClientRect(); const s = getComputedStyle(el); \
         return (r.width > 0 && r.height > 0 && s.visibility !== 'hidden' && s.display !== 'none') \
           ? 'visible' : 'hidden'; }})()",
        sel = js_string(&selector.to_css())
    )
}

fn count_script(selector: &Selector) -> String {
    format!(
        "Array.from(document.querySelectorAll({sel})).filter(el => {{ \
         const r = el.getBoundingClientRect(); const s = getComputedStyle(el); \
         return r.width > 0 && r.height > 0 && s.visibility !== 'hidden' && s.display !== 'none'; \
         }}).length",
        sel = js_string(&selector.to_css())
    )
}

/// Wrap `body` so it runs with `el` bound to the first match
fn element_script(selector: &Selector, body: &str) -> String {
    format!(
        "(() => {{ const el = document.querySelector({sel}); \
         if (!el) throw new Error('detached: ' + {sel}); {body} }})()",
        sel = js_string(&selector.to_css())
    )
}

fn set_value_body(value: &str) -> String {
    format!(
        "const proto = Object.getPrototypeOf(el); \
         const desc = Object.getOwnPropertyDescriptor(proto, 'value'); \
         if (!desc || !desc.set) return false; \
         el.focus(); desc.set.call(el, {v}); \
         el.dispatchEvent(new Event('input', {{ bubbles: true }})); \
         el.dispatchEvent(new Event('change', {{ bubbles: true }})); \
         return true;",
        v = js_string(value)
    )
}

#[async_trait]
impl BrowserDriver for ChromiumDriver {
    async fn navigate(&self, url: &str) -> SwagResult<()> {
        tracing::debug!(url, "goto");
        let nav = self.page.goto(url);
        tokio::time::timeout(self.navigation_timeout, nav)
            .await
            .map_err(|_| SwagError::Navigation {
                url: url.to_string(),
                message: format!("timed out after {}ms", self.navigation_timeout.as_millis()),
            })?
            .map_err(|e| SwagError::Navigation {
                url: url.to_string(),
                message: e.to_string(),
            })?;
        Ok(())
    }

    async fn click(&self, selector: &Selector) -> SwagResult<()> {
        self.wait_for(selector, ElementState::Visible).await?;
        let element = self
            .page
            .find_element(selector.to_css())
            .await
            .map_err(|e| SwagError::browser(e.to_string()))?;
        element
            .click()
            .await
            .map_err(|e| SwagError::browser(format!("click {selector}: {e}")))?;
        Ok(())
    }

    async fn fill(&self, selector: &Selector, value: &str) -> SwagResult<()> {
        let ok: bool = self
            .query(selector, ElementState::Visible, &set_value_body(value))
            .await?;
        if ok {
            Ok(())
        } else {
            Err(SwagError::browser(format!("{selector} is not an editable input")))
        }
    }

    async fn select_option(&self, selector: &Selector, value: &str) -> SwagResult<()> {
        let body = format!(
            "if (!el.options || ![...el.options].some(o => o.value === {v})) return false; {set}",
            v = js_string(value),
            set = set_value_body(value)
        );
        let ok: bool = self.query(selector, ElementState::Visible, &body).await?;
        if ok {
            Ok(())
        } else {
            Err(SwagError::browser(format!("{selector} has no option {value:?}")))
        }
    }

    async fn text(&self, selector: &Selector) -> SwagResult<String> {
        self.query(
            selector,
            ElementState::Attached,
            "return (el.innerText ?? el.textContent ?? '').trim();",
        )
        .await
    }

    async fn is_visible(&self, selector: &Selector) -> SwagResult<bool> {
        Ok(self.element_state(selector).await? == DomState::Visible)
    }

    async fn count_visible(&self, selector: &Selector) -> SwagResult<usize> {
        self.eval(count_script(selector)).await
    }

    async fn attribute(&self, selector: &Selector, name: &str) -> SwagResult<Option<String>> {
        let body = format!("return el.getAttribute({});", js_string(name));
        self.query(selector, ElementState::Attached, &body).await
    }

    async fn input_value(&self, selector: &Selector) -> SwagResult<String> {
        let value: Option<String> = self
            .query(
                selector,
                ElementState::Attached,
                "return typeof el.value === 'string' ? el.value : null;",
            )
            .await?;
        value.ok_or_else(|| SwagError::browser(format!("{selector} is not an input or select")))
    }

    async fn wait_for(&self, selector: &Selector, state: ElementState) -> SwagResult<()> {
        let reached = poll_until(self.wait, || async {
            let current = self.element_state(selector).await?;
            Ok(match state {
                ElementState::Attached => current != DomState::Detached,
                ElementState::Visible => current == DomState::Visible,
                ElementState::Hidden => current != DomState::Visible,
            })
        })
        .await?;

        if reached {
            Ok(())
        } else {
            Err(SwagError::ElementNotFound {
                selector: selector.to_css(),
                timeout_ms: self.wait.timeout_ms,
            })
        }
    }

    async fn current_url(&self) -> SwagResult<String> {
        self.eval("location.href".to_string()).await
    }
}

/// Stop the CDP event loop whatever the close outcome was
fn stop_handler(handle: &tokio::task::JoinHandle<()>, closed: SwagResult<()>) -> SwagResult<()> {
    handle.abort();
    if let Err(ref e) = closed {
        tracing::warn!(error = %e, "chromium close failed; handler stopped");
    }
    closed
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_scripts_quote_selectors() {
        let script = state_script(&Selector::data_test("login-button"));
        assert!(script.contains(r#"document.querySelector("[data-test=\"login-button\"]")"#));
    }

    #[test]
    fn test_set_value_escapes_input() {
        let body = set_value_body("it's \"quoted\"");
        assert!(body.contains(r#""it's \"quoted\"""#));
        assert!(body.contains("'input'"));
        assert!(body.contains("'change'"));
    }

    #[tokio::test]
    async fn test_handler_stopped_when_close_fails() {
        let handle = tokio::spawn(std::future::pending::<()>());
        let closed = stop_handler(&handle, Err(SwagError::browser("connection reset")));
        assert!(matches!(closed, Err(SwagError::Browser { .. })));
        assert!(handle.await.unwrap_err().is_cancelled());
    }

    #[tokio::test]
    async fn test_handler_stopped_after_clean_close() {
        let handle = tokio::spawn(std::future::pending::<()>());
        assert!(stop_handler(&handle, Ok(())).is_ok());
        assert!(handle.await.unwrap_err().is_cancelled());
    }
}
