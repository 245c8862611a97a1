//! Quality dashboard: backend statistics and scored annotations

use std::fmt::Write as _;

use async_trait::async_trait;
use serde_json::Value;
use stanshare_client::format::score_category;
use stanshare_client::{Endpoint, HttpTransport, PageQuery};

use super::{field_f64, field_str, PageId, View, ViewContext};
use crate::error::Result;
use crate::markup::escape_html;

pub struct QualityView;

#[async_trait]
impl<T: HttpTransport> View<T> for QualityView {
    fn page(&self) -> PageId {
        PageId::Annotations
    }

    async fn render(&self, ctx: &ViewContext<'_, T>) -> Result<String> {
        let query = PageQuery::default();

        // Legacy backends have no stats route
        let (stats, annotations) = if ctx.client.endpoints().supports(Endpoint::QualityStats) {
            let (stats, annotations) = futures::try_join!(
                ctx.client.get_quality_stats(),
                ctx.client.list_annotations(&query)
            )?;
            (Some(stats), annotations)
        } else {
            (None, ctx.client.list_annotations(&query).await?)
        };

        let stats_html = stats.as_ref().map(stat_cards).unwrap_or_default();

        if annotations.is_empty() {
            return Ok(format!(
                r#"<section class="quality">
{stats_html}    <p class="empty-state">No annotations to review.</p>
</section>"#
            ));
        }

        let mut rows = String::new();
        for annotation in &annotations.items {
            let fund = field_str(annotation, &["fund_name", "fund", "cik"]).unwrap_or_default();
            let field = field_str(annotation, &["field", "field_name", "label"]).unwrap_or_default();
            let score = match field_f64(annotation, &["quality_score", "score", "confidence"]) {
                Some(score) => {
                    let category = score_category(score, ctx.thresholds);
                    format!(
                        r#"<span class="score-pill {}" title="{}">{score:.1}</span>"#,
                        category.css_class(),
                        category.label(),
                    )
                }
                None => "-".to_string(),
            };

            let _ = writeln!(
                rows,
                "            <tr><td>{}</td><td>{}</td><td>{score}</td></tr>",
                escape_html(&fund),
                escape_html(&field),
            );
        }

        Ok(format!(
            r#"<section class="quality">
{stats_html}    <table class="data-table">
        <thead>
            <tr><th>Fund</th><th>Field</th><th>Score</th></tr>
        </thead>
        <tbody>
{rows}        </tbody>
    </table>
</section>"#
        ))
    }
}

/// One card per scalar statistic
fn stat_cards(stats: &Value) -> String {
    let Some(obj) = stats.as_object() else {
        return String::new();
    };

    let mut cards = String::new();
    for (key, value) in obj {
        let shown = match value {
            Value::String(s) => s.clone(),
            Value::Number(n) => n.to_string(),
            Value::Bool(b) => b.to_string(),
            _ => continue,
        };
        let _ = writeln!(
            cards,
            r#"        <div class="card"><div class="card-title">{}</div><div class="card-value">{}</div></div>"#,
            escape_html(&key.replace('_', " ")),
            escape_html(&shown),
        );
    }

    format!("    <div class=\"dashboard-grid\">\n{cards}    </div>\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::Session;
    use serde_json::json;
    use stanshare_client::{ApiVersion, ClientConfig, MockTransport, ScoreThresholds, StanShareClient};

    async fn render(config: &ClientConfig, mock: &MockTransport, thresholds: ScoreThresholds) -> Result<String> {
        let client = StanShareClient::with_transport(config, mock.clone());
        let session = Session::default();
        let ctx = ViewContext {
            client: &client,
            session: &session,
            thresholds: &thresholds,
        };
        QualityView.render(&ctx).await
    }

    fn annotations() -> Value {
        json!({
            "annotations": [
                {"fund_name": "Alpha", "field": "expense_ratio", "quality_score": 95},
                {"fund_name": "Beta", "field": "net_assets", "quality_score": 72.5},
                {"fund_name": "Gamma", "field": "ticker", "quality_score": 10},
                {"fund_name": "Delta", "field": "inception"}
            ]
        })
    }

    #[tokio::test]
    async fn test_scores_and_stats() {
        let mock = MockTransport::new();
        mock.add_json("GET /api/quality/stats", json!({"total_annotations": 4, "average_score": 59.2, "by_field": {}}));
        mock.add_json("GET /api/annotations", annotations());

        let html = render(&ClientConfig::default(), &mock, ScoreThresholds::default()).await.unwrap();
        assert!(html.contains(r#"<div class="card-title">total annotations</div><div class="card-value">4</div>"#));
        assert!(!html.contains("by field"));
        assert!(html.contains(r#"class="score-pill text-green-400 bg-green-400/10" title="excellent">95.0"#));
        assert!(html.contains(r#"title="warning">72.5"#));
        assert!(html.contains(r#"title="critical">10.0"#));
        assert!(html.contains("<td>Delta</td><td>inception</td><td>-</td>"));
        assert_eq!(mock.calls_to("GET /api/quality/stats"), 1);
    }

    #[tokio::test]
    async fn test_custom_thresholds() {
        let mock = MockTransport::new();
        mock.add_json("GET /api/quality/stats", json!({}));
        mock.add_json("GET /api/annotations", annotations());

        let strict = ScoreThresholds {
            excellent: 99.0,
            warning: 96.0,
            caution: 90.0,
        };
        let html = render(&ClientConfig::default(), &mock, strict).await.unwrap();
        assert!(html.contains(r#"title="caution">95.0"#));
        assert!(html.contains(r#"title="critical">72.5"#));
    }

    #[tokio::test]
    async fn test_legacy_skips_stats() {
        let mock = MockTransport::new();
        mock.add_json("GET /api/annotations", json!([]));

        let config = ClientConfig::default().with_api_version(ApiVersion::Legacy);
        let html = render(&config, &mock, ScoreThresholds::default()).await.unwrap();
        assert!(html.contains("No annotations to review."));
        assert_eq!(mock.call_count(), 1);
    }

    #[tokio::test]
    async fn test_stats_failure_fails_page() {
        let mock = MockTransport::new();
        mock.add_json("GET /api/annotations", annotations());

        assert!(render(&ClientConfig::default(), &mock, ScoreThresholds::default()).await.is_err());
    }
}
