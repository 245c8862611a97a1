//! Landing page: welcome panel, shortcuts and the signed-in user

use async_trait::async_trait;
use stanshare_client::HttpTransport;

use super::{PageId, View, ViewContext};
use crate::error::Result;
use crate::markup::escape_html;

pub struct OverviewView;

#[async_trait]
impl<T: HttpTransport> View<T> for OverviewView {
    fn page(&self) -> PageId {
        PageId::Overview
    }

    async fn render(&self, ctx: &ViewContext<'_, T>) -> Result<String> {
        let (min, max) = ctx.client.endpoints().fund_count_bounds();

        Ok(format!(
            r#"<section class="welcome">
    <h1>Welcome to StanShareAI Dashboard</h1>
    <p>Signed in as {name} ({email})</p>
    <div class="dashboard-grid">
        <a class="card" data-page="{extraction}">
            <div class="card-title">Extract Funds</div>
            <p>Queue SEC EDGAR filings for extraction.</p>
        </a>
        <a class="card" data-page="{funds}">
            <div class="card-title">Browse Funds</div>
            <p>Search extracted fund records.</p>
        </a>
        <a class="card" data-page="{annotations}">
            <div class="card-title">Quality Dashboard</div>
            <p>Review annotation scores.</p>
        </a>
    </div>
    <div class="dashboard-grid">
        <div class="card">
            <div class="card-title">Quick Stats</div>
            <p>Backend: {base_url} ({version})</p>
            <p>Batch size: {min} to {max} funds</p>
        </div>
        <div class="card">
            <div class="card-title">Getting Started</div>
            <ol>
                <li>Start an extraction batch</li>
                <li>Watch it until it completes</li>
                <li>Browse the funds and check their quality scores</li>
            </ol>
        </div>
    </div>
</section>"#,
            name = escape_html(ctx.session.display_name()),
            email = escape_html(ctx.session.display_email()),
            extraction = PageId::Extraction.file_name(),
            funds = PageId::Funds.file_name(),
            annotations = PageId::Annotations.file_name(),
            base_url = escape_html(ctx.client.base_url()),
            version = ctx.client.api_version(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::Session;
    use stanshare_client::{ClientConfig, MockTransport, ScoreThresholds, StanShareClient};

    #[tokio::test]
    async fn test_overview_is_static() {
        let mock = MockTransport::new();
        let client = StanShareClient::with_transport(&ClientConfig::default(), mock.clone());
        let session = Session::guest();
        let ctx = ViewContext {
            client: &client,
            session: &session,
            thresholds: &ScoreThresholds::default(),
        };

        let html = OverviewView.render(&ctx).await.unwrap();
        assert!(html.contains("Welcome to StanShareAI Dashboard"));
        assert!(html.contains(r#"data-page="funds.html""#));
        assert!(html.contains("guest@stanshareai.local"));
        assert!(html.contains("1 to 500 funds"));
        assert_eq!(mock.call_count(), 0);
    }
}
