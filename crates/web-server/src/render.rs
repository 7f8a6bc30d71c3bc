//! HTML rendering for the dashboard pages and their HTMX fragments.

use crate::chart::RiskExposureChart;
use crate::dashboard::{DashboardView, SymbolCard};
use crate::detail::DetailView;
use core_types::BadgeVariant;

const LAYOUT_HEAD: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="utf-8">
    <meta name="viewport" content="width=device-width, initial-scale=1">
    <script src="https://cdn.tailwindcss.com"></script>
    <script src="https://unpkg.com/htmx.org@1.9.12"></script>
    <script src="https://cdn.jsdelivr.net/npm/chart.js@4.4.1/dist/chart.umd.min.js"></script>
"#;

pub fn page(title: &str, body: &str) -> String {
    format!(
        r#"{LAYOUT_HEAD}    <title>{title}</title>
</head>
<body class="bg-gray-50 text-gray-900">
    <main class="container mx-auto p-4">
{body}
    </main>
</body>
</html>"#,
        title = html_escape(title),
    )
}

fn badge_classes(variant: BadgeVariant) -> &'static str {
    match variant {
        BadgeVariant::Default => "bg-gray-900 text-white",
        BadgeVariant::Destructive => "bg-red-600 text-white",
        BadgeVariant::Secondary => "bg-gray-100 text-gray-900",
    }
}

fn badge(label: &str, variant: BadgeVariant) -> String {
    format!(
        r#"<span class="inline-flex items-center rounded-full px-2.5 py-0.5 text-xs font-semibold {}" data-variant="{}">{}</span>"#,
        badge_classes(variant),
        variant,
        html_escape(label)
    )
}

fn spinner(message: &str) -> String {
    format!(
        r#"<div class="flex flex-col items-center justify-center py-16 text-gray-500">
            <div class="h-8 w-8 animate-spin rounded-full border-4 border-gray-300 border-t-gray-900"></div>
            <p class="mt-4">{}</p>
        </div>"#,
        html_escape(message)
    )
}

// ============================================================================
// DASHBOARD
// ============================================================================

/// The dashboard page as first served. The fragment request it fires on load
/// is the mount's one symbols fetch.
pub fn dashboard_page() -> String {
    let body = format!(
        r#"        <h1 class="text-3xl font-bold mb-6">Forex Risk Assessment</h1>
        <div id="dashboard" hx-get="/fragments/symbols" hx-trigger="load" hx-swap="outerHTML">
            {}
        </div>"#,
        render_dashboard(&DashboardView::Loading)
    );
    page("Forex Risk Assessment", &body)
}

pub fn render_dashboard(view: &DashboardView) -> String {
    match view {
        DashboardView::Loading => spinner("Loading currency data..."),
        DashboardView::Failed { message } => format!(
            r#"<div id="dashboard" class="rounded-md border border-red-200 bg-red-50 p-6 text-center">
            <h2 class="text-lg font-semibold text-red-700">Error</h2>
            <p class="mt-2 text-red-600">{}</p>
        </div>"#,
            html_escape(message)
        ),
        DashboardView::Loaded {
            options,
            selected,
            cards,
        } => {
            if options.is_empty() {
                return r#"<div id="dashboard" class="text-center py-16 text-gray-500">
            <p>No currency data available.</p>
        </div>"#
                    .to_string();
            }
            format!(
                r#"<div id="dashboard">
            {}
            {}
        </div>"#,
                render_selector(options, selected.as_deref()),
                render_card_grid(cards)
            )
        }
    }
}

fn render_selector(options: &[String], selected: Option<&str>) -> String {
    let mut html = String::from(
        r##"<div class="mb-6 max-w-sm">
            <select name="symbol" class="w-full rounded-md border border-gray-300 bg-white p-2"
                    hx-get="/fragments/cards" hx-target="#currency-grid" hx-swap="outerHTML">
                <option value="">Search for a currency</option>"##,
    );
    for option in options {
        let is_selected = if selected == Some(option.as_str()) { " selected" } else { "" };
        html.push_str(&format!(
            r#"
                <option value="{0}"{1}>{0}</option>"#,
            html_escape(option),
            is_selected
        ));
    }
    html.push_str(
        r#"
            </select>
        </div>"#,
    );
    html
}

pub fn render_card_grid(cards: &[SymbolCard]) -> String {
    if cards.is_empty() {
        return r#"<div id="currency-grid" class="text-center py-8 text-gray-500">
            <p>No currency matches the selection.</p>
        </div>"#
            .to_string();
    }

    let mut html = String::from(
        r#"<div id="currency-grid" class="grid grid-cols-1 gap-4 md:grid-cols-2 lg:grid-cols-3">"#,
    );
    for card in cards {
        html.push_str(&render_card(card));
    }
    html.push_str("</div>");
    html
}

fn render_card(card: &SymbolCard) -> String {
    format!(
        r#"
            <div class="rounded-lg border border-gray-200 bg-white p-4 shadow-sm">
                <div class="flex items-center justify-between pb-2">
                    <h3 class="text-sm font-medium">{}</h3>
                    {}
                </div>
                <div class="text-2xl font-bold">{}</div>
                <a href="{}" class="mt-4 inline-block w-full rounded-md border border-gray-300 py-2 text-center text-sm hover:bg-gray-50">View Details</a>
            </div>"#,
        html_escape(&card.currency),
        badge(&card.badge_label, card.badge_variant),
        html_escape(&card.headline),
        html_escape(&card.detail_href)
    )
}

// ============================================================================
// DETAIL
// ============================================================================

/// Full detail page. `widget_html` is the mounted widget container.
pub fn detail_page(view: &DetailView, widget_html: &str) -> String {
    let title = view.title();
    let body = format!(
        r#"        <h1 class="text-3xl font-bold mb-6">{title}</h1>
        <div class="grid grid-cols-1 gap-6 md:grid-cols-2">
            <div class="rounded-lg border border-gray-200 bg-white p-4 shadow-sm">
                {widget_html}
            </div>
            {profile}
        </div>
        {tabs}"#,
        title = html_escape(&title),
        profile = render_profile(view),
        tabs = render_tabs(view),
    );
    page(&title, &body)
}

fn render_profile(view: &DetailView) -> String {
    let mut rows = String::new();
    for (label, value) in view.profile.rows() {
        rows.push_str(&format!(
            r#"
                    <div class="flex justify-between py-1"><dt class="text-gray-500">{}</dt><dd class="font-medium">{}</dd></div>"#,
            label,
            html_escape(value)
        ));
    }
    format!(
        r#"<div class="rounded-lg border border-gray-200 bg-white p-4 shadow-sm">
                <h2 class="text-lg font-semibold mb-2">Risk Profile</h2>
                <dl>{rows}
                </dl>
            </div>"#
    )
}

fn render_tabs(view: &DetailView) -> String {
    format!(
        r#"<div class="mt-6" data-tabs>
            <div class="mb-4 inline-flex rounded-md bg-gray-100 p-1">
                <button type="button" data-tab="news" class="rounded px-3 py-1 text-sm font-medium bg-white shadow">News Sentiment</button>
                <button type="button" data-tab="exposure" class="rounded px-3 py-1 text-sm font-medium">Risk Exposure</button>
            </div>
            <div data-panel="news">{news}</div>
            <div data-panel="exposure" class="hidden">
                <p class="font-semibold mb-2">Risk Assessment:</p>
                <p class="mb-4">{assessment}</p>
                <p class="font-semibold mb-2">Volume and Exposure:</p>
                {exposure}
            </div>
        </div>
        <script>
        document.querySelectorAll('[data-tabs] [data-tab]').forEach(function (button) {{
            button.addEventListener('click', function () {{
                var root = button.closest('[data-tabs]');
                root.querySelectorAll('[data-tab]').forEach(function (b) {{
                    b.classList.toggle('bg-white', b === button);
                    b.classList.toggle('shadow', b === button);
                }});
                root.querySelectorAll('[data-panel]').forEach(function (p) {{
                    p.classList.toggle('hidden', p.dataset.panel !== button.dataset.tab);
                }});
                if (window.riskExposureChart) {{ window.riskExposureChart.resize(); }}
            }});
        }});
        </script>"#,
        news = render_news(view),
        assessment = html_escape(&view.record.risk_assessment),
        exposure = render_exposure(view.exposure.as_ref()),
    )
}

fn render_news(view: &DetailView) -> String {
    let mut html = String::from(
        r#"<div class="h-[300px] w-full overflow-y-auto rounded-md border border-gray-200 p-4">
                <div class="flex flex-wrap gap-2">"#,
    );
    if view.news.is_empty() {
        html.push_str("<p>No news items available.</p>");
    }
    for entry in &view.news {
        html.push_str(&format!(
            r#"
                    <span class="inline-block max-w-full whitespace-normal rounded-full px-4 py-2 text-left text-sm font-semibold {}" data-variant="{}">{}<span class="mt-1 block text-xs opacity-70">{}</span></span>"#,
            badge_classes(entry.badge_variant),
            entry.badge_variant,
            html_escape(&entry.text),
            html_escape(&entry.badge_label)
        ));
    }
    html.push_str(
        r#"
                </div>
            </div>"#,
    );
    html
}

fn render_exposure(chart: Option<&RiskExposureChart>) -> String {
    let Some(chart) = chart else {
        return r#"<p class="text-gray-500">No risk exposure data available.</p>"#.to_string();
    };

    let config = chart.chart_config().to_string().replace("</", "<\\/");
    let tooltips = serde_json::to_string(&chart.tooltips())
        .unwrap_or_else(|_| "[]".to_string())
        .replace("</", "<\\/");

    format!(
        r#"<div class="relative h-[200px] w-full"><canvas id="risk-exposure-chart"></canvas></div>
            <script>
            (function () {{
                var config = {config};
                var tooltips = {tooltips};
                config.options.plugins.tooltip = {{
                    callbacks: {{ label: function (ctx) {{ return tooltips[ctx.dataIndex]; }} }}
                }};
                window.riskExposureChart = new Chart(document.getElementById('risk-exposure-chart'), config);
            }})();
            </script>"#
    )
}

// ============================================================================
// ERRORS
// ============================================================================

/// Terminal page for a detail lookup that failed.
pub fn error_page(message: &str) -> String {
    let body = format!(
        r#"        <div class="rounded-md border border-red-200 bg-red-50 p-6 text-center">
            <h1 class="text-lg font-semibold text-red-700">Error</h1>
            <p class="mt-2 text-red-600">{}</p>
            <a href="/" class="mt-4 inline-block text-sm underline">Back to dashboard</a>
        </div>"#,
        html_escape(message)
    );
    page("Error", &body)
}

pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use api_client::testing::sample_record;

    #[test]
    fn test_html_escape() {
        assert_eq!(
            html_escape(r#"<b>"A" & 'B'</b>"#),
            "&lt;b&gt;&quot;A&quot; &amp; &#x27;B&#x27;&lt;/b&gt;"
        );
    }

    #[test]
    fn test_loading_state_text() {
        let html = dashboard_page();
        assert!(html.contains("Loading currency data..."));
        assert!(html.contains(r#"hx-get="/fragments/symbols""#));
    }

    #[test]
    fn test_empty_payload_message() {
        let html = render_dashboard(&DashboardView::loaded(&[], None));
        assert!(html.contains("No currency data available."));
    }

    #[test]
    fn test_loaded_dashboard_lists_cards_and_options() {
        let records = vec![sample_record("EUR/USD", 1.0951), sample_record("GBP/USD", 1.2744)];
        let html = render_dashboard(&DashboardView::loaded(&records, Some("GBP/USD".to_string())));

        assert!(html.contains("Search for a currency"));
        assert!(html.contains(r#"<option value="GBP/USD" selected>GBP/USD</option>"#));
        assert!(html.contains(r#"<option value="EUR/USD">EUR/USD</option>"#));
        assert!(html.contains("NEUTRAL"));
        assert!(html.contains("1.2667"));
        assert!(html.contains("/currency?currency=GBP%2FUSD"));
        assert!(!html.contains("/currency?currency=EUR%2FUSD"));
        assert!(html.contains("View Details"));
    }

    #[test]
    fn test_card_text_is_escaped() {
        let html = render_card_grid(&[SymbolCard::from_record(&sample_record("<X>", 1.0))]);
        assert!(html.contains("&lt;X&gt;"));
        assert!(!html.contains("<X>"));
    }

    #[test]
    fn test_detail_page_sections() {
        let view = DetailView::new(sample_record("EUR/USD", 1.0951), None);
        let html = detail_page(&view, "<div id=\"w\"></div>");

        assert!(html.contains("<title>EUR/USD Details</title>"));
        assert!(html.contains("Risk Profile"));
        assert!(html.contains("Predicted Price"));
        assert!(html.contains("$1.0923"));
        assert!(html.contains("News Sentiment"));
        assert!(html.contains("Risk Exposure"));
        assert!(html.contains("Sentiment: positive (0.81)"));
        assert!(html.contains("No risk exposure data available."));
        assert!(html.contains("EUR/USD risk is moderate."));
    }

    fn panel<'a>(html: &'a str, name: &str) -> &'a str {
        let start = html.find(&format!(r#"data-panel="{}""#, name)).unwrap();
        let rest = &html[start + 1..];
        let end = [rest.find("data-panel="), rest.find("<script>")]
            .into_iter()
            .flatten()
            .min()
            .map_or(html.len(), |i| start + 1 + i);
        &html[start..end]
    }

    #[test]
    fn test_risk_assessment_sits_in_exposure_tab() {
        let view = DetailView::new(sample_record("EUR/USD", 1.0951), None);
        let html = detail_page(&view, "");

        let exposure = panel(&html, "exposure");
        let assessment = exposure.find("EUR/USD risk is moderate.").unwrap();
        assert!(exposure.find("Risk Assessment:").unwrap() < assessment);
        assert!(assessment < exposure.find("Volume and Exposure:").unwrap());
        assert!(assessment < exposure.find("No risk exposure data available.").unwrap());

        assert!(!panel(&html, "news").contains("EUR/USD risk is moderate."));
        assert_eq!(html.matches("EUR/USD risk is moderate.").count(), 1);
    }

    #[test]
    fn test_assessment_precedes_chart() {
        let chart = RiskExposureChart::from_exposure(&api_client::testing::sample_exposure()).unwrap();
        let view = DetailView::new(sample_record("EUR/USD", 1.0951), Some(chart));
        let html = detail_page(&view, "");

        let exposure = panel(&html, "exposure");
        assert!(exposure.find("EUR/USD risk is moderate.").unwrap() < exposure.find("risk-exposure-chart").unwrap());
    }

    #[test]
    fn test_news_badge_carries_item_text() {
        let view = DetailView::new(sample_record("EUR/USD", 1.0951), None);
        let html = detail_page(&view, "");
        let news = panel(&html, "news");

        assert!(news.contains("overflow-y-auto"));
        assert!(news.contains("flex flex-wrap gap-2"));
        assert!(news.contains(
            r#"data-variant="default">EUR/USD steady ahead of data<span class="mt-1 block text-xs opacity-70">Sentiment: positive (0.81)</span></span>"#
        ));
        assert!(news.contains(
            r#"data-variant="destructive">EUR/USD pressured by yields<span class="mt-1 block text-xs opacity-70">Sentiment: negative (-0.46)</span></span>"#
        ));
    }

    #[test]
    fn test_selector_targets_card_grid() {
        let records = vec![sample_record("EUR/USD", 1.0951)];
        let html = render_dashboard(&DashboardView::loaded(&records, None));
        assert!(html.contains(r##"hx-target="#currency-grid""##));
        assert!(html.contains(r#"id="currency-grid""#));
    }

    #[test]
    fn test_detail_page_without_news() {
        let mut record = sample_record("EUR/USD", 1.1);
        record.news_items.clear();
        let html = detail_page(&DetailView::new(record, None), "");
        assert!(html.contains("No news items available."));
    }

    #[test]
    fn test_error_page_message() {
        let html = error_page("Currency details not found");
        assert!(html.contains("Currency details not found"));
    }
}
