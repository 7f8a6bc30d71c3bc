//! Embed for the third-party market overview widget.
//!
//! The server only decides what to mount: a [`WidgetEmbed`] is the symbol and
//! display configuration rendered into a container plus a small bootstrap
//! script. The injected vendor script lives in the browser, so the mount
//! lifecycle runs there, keyed by [`WidgetKey::fingerprint`]:
//!
//! - a container that already holds a script with the same fingerprint is
//!   left alone;
//! - any other script in the container is removed before the new one is
//!   appended;
//! - the script is removed when HTMX cleans the container up or the page is
//!   hidden.

use configuration::WidgetConfig;
use core_types::format::widget_symbol;
use serde::Serialize;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

/// The full tuple a mounted widget depends on.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct WidgetKey {
    pub symbol: String,
    pub config: WidgetConfig,
}

impl WidgetKey {
    pub fn new(currency: &str, config: &WidgetConfig) -> Self {
        Self {
            symbol: widget_symbol(currency),
            config: config.clone(),
        }
    }

    /// Stable tag for the injected script element.
    pub fn fingerprint(&self) -> String {
        let mut hasher = DefaultHasher::new();
        self.hash(&mut hasher);
        format!("{:016x}", hasher.finish())
    }
}

/// Configuration object the vendor script reads from its own body.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct EmbedConfig<'a> {
    symbol: &'a str,
    width: &'static str,
    height: &'static str,
    locale: &'a str,
    date_range: &'a str,
    color_theme: &'static str,
    is_transparent: bool,
    autosize: bool,
    large_chart_url: &'a str,
}

impl<'a> EmbedConfig<'a> {
    fn from_key(key: &'a WidgetKey) -> Self {
        Self {
            symbol: &key.symbol,
            width: "100%",
            height: "375",
            locale: &key.config.locale,
            date_range: &key.config.date_range,
            color_theme: key.config.color_theme.as_str(),
            is_transparent: key.config.is_transparent,
            autosize: key.config.autosize,
            large_chart_url: &key.config.large_chart_url,
        }
    }
}

#[derive(Debug, Clone)]
pub struct WidgetEmbed {
    pub key: WidgetKey,
    pub embed_json: String,
}

impl WidgetEmbed {
    pub fn new(currency: &str, config: &WidgetConfig) -> Result<Self, serde_json::Error> {
        let key = WidgetKey::new(currency, config);
        let embed_json = serde_json::to_string(&EmbedConfig::from_key(&key))?;
        Ok(Self { key, embed_json })
    }

    /// Container markup plus the bootstrap script that mounts the vendor
    /// script into it.
    pub fn render(&self, container_id: &str) -> String {
        let height = self.key.config.height;
        format!(
            r#"<div id="{container_id}" class="tradingview-widget-container" style="min-height: {height}px"><div class="tradingview-widget-container__widget"></div></div>
<script>
(function () {{
  var container = document.getElementById({id_js});
  if (!container) return;
  var key = {key_js};
  var current = container.querySelector('script[data-widget]');
  if (current && current.dataset.widget === key) return;
  container.querySelectorAll('script[data-widget]').forEach(function (s) {{ s.remove(); }});
  var script = document.createElement('script');
  script.type = 'text/javascript';
  script.async = true;
  script.src = {src_js};
  script.dataset.widget = key;
  script.innerHTML = {config_js};
  container.appendChild(script);
  var release = function () {{ script.remove(); }};
  container.addEventListener('htmx:beforeCleanupElement', release, {{ once: true }});
  window.addEventListener('pagehide', release, {{ once: true }});
}})();
</script>"#,
            id_js = js_string(container_id),
            key_js = js_string(&self.key.fingerprint()),
            src_js = js_string(&self.key.config.script_src),
            config_js = js_string(&self.embed_json),
        )
    }
}

/// The container with nothing mounted in it.
pub fn empty_container(container_id: &str) -> String {
    format!(
        r#"<div id="{container_id}" class="tradingview-widget-container"><div class="tradingview-widget-container__widget"></div></div>"#
    )
}

/// A JSON string literal that is safe to place inside a `<script>` element.
fn js_string(value: &str) -> String {
    serde_json::Value::String(value.to_string())
        .to_string()
        .replace("</", "<\\/")
}

#[cfg(test)]
mod tests {
    use super::*;
    use configuration::ColorTheme;
    use serde_json::Value;

    #[test]
    fn test_embed_config_fields() {
        let embed = WidgetEmbed::new("EUR/USD", &WidgetConfig::default()).unwrap();

        let json: Value = serde_json::from_str(&embed.embed_json).unwrap();
        assert_eq!(json["symbol"], "EURUSD");
        assert_eq!(json["width"], "100%");
        assert_eq!(json["height"], "375");
        assert_eq!(json["locale"], "en");
        assert_eq!(json["dateRange"], "12M");
        assert_eq!(json["colorTheme"], "dark");
        assert_eq!(json["isTransparent"], false);
        assert_eq!(json["autosize"], false);
        assert_eq!(json["largeChartUrl"], "");
    }

    #[test]
    fn test_only_first_slash_is_removed() {
        let key = WidgetKey::new("A/B/C", &WidgetConfig::default());
        assert_eq!(key.symbol, "AB/C");
    }

    #[test]
    fn test_same_config_renders_same_mount_key() {
        let config = WidgetConfig::default();
        let first = WidgetEmbed::new("EUR/USD", &config).unwrap().render("w");
        let second = WidgetEmbed::new("EUR/USD", &config).unwrap().render("w");
        assert_eq!(first, second);
    }

    #[test]
    fn test_changed_config_changes_mount_key() {
        let config = WidgetConfig::default();
        let dark = WidgetEmbed::new("EUR/USD", &config).unwrap();
        let light = WidgetEmbed::new(
            "EUR/USD",
            &WidgetConfig {
                color_theme: ColorTheme::Light,
                ..config.clone()
            },
        )
        .unwrap();
        let other = WidgetEmbed::new("GBP/USD", &config).unwrap();

        assert_ne!(dark.key.fingerprint(), light.key.fingerprint());
        assert_ne!(dark.key.fingerprint(), other.key.fingerprint());
        assert!(light.render("w").contains(&light.key.fingerprint()));
    }

    #[test]
    fn test_render_skips_matching_mount_then_releases_stale_one() {
        let embed = WidgetEmbed::new("EUR/USD", &WidgetConfig::default()).unwrap();
        let html = embed.render("market-widget");

        let skip = html.find("current.dataset.widget === key) return").unwrap();
        let remove = html.find("s.remove()").unwrap();
        let append = html.find("appendChild(script)").unwrap();
        assert!(skip < remove);
        assert!(remove < append);
        assert!(html.contains("htmx:beforeCleanupElement"));
        assert!(html.contains("pagehide"));
        assert!(html.contains("embed-widget-mini-symbol-overview.js"));
        assert!(html.contains(r#"id="market-widget""#));
        assert!(html.contains("EURUSD"));
    }

    #[test]
    fn test_empty_container_has_no_script() {
        let html = empty_container("market-widget");
        assert!(!html.contains("<script"));
        assert!(html.contains("tradingview-widget-container__widget"));
    }

    #[test]
    fn test_js_string_cannot_close_the_script_element() {
        assert_eq!(js_string("</script>"), r#""<\/script>""#);
    }

    #[test]
    fn test_fingerprint_tracks_config() {
        let config = WidgetConfig::default();
        let a = WidgetKey::new("EUR/USD", &config);
        let b = WidgetKey::new("EUR/USD", &config);
        let c = WidgetKey::new("EUR/USD", &WidgetConfig { height: 400, ..config.clone() });
        assert_eq!(a.fingerprint(), b.fingerprint());
        assert_ne!(a.fingerprint(), c.fingerprint());
    }
}
