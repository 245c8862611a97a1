//! Extraction page: new-batch form plus the status of the latest batch

use std::fmt::Write as _;

use async_trait::async_trait;
use stanshare_client::format::status_category;
use stanshare_client::{FormType, HttpTransport};

use super::{PageId, View, ViewContext};
use crate::error::Result;
use crate::markup::escape_html;

const DEFAULT_FUND_COUNT: u32 = 50;

pub struct ExtractionView;

#[async_trait]
impl<T: HttpTransport> View<T> for ExtractionView {
    fn page(&self) -> PageId {
        PageId::Extraction
    }

    async fn render(&self, ctx: &ViewContext<'_, T>) -> Result<String> {
        let endpoints = ctx.client.endpoints();
        let (min, max) = endpoints.fund_count_bounds();

        let mut options = String::new();
        for form in FormType::ALL {
            let _ = writeln!(options, r#"                <option value="{0}">{0}</option>"#, form.as_str());
        }

        let latest = match ctx.client.last_batch_id() {
            Some(batch_id) => {
                let status = ctx.client.get_extraction_status(&batch_id).await?;
                let state = status.status.as_str();
                format!(
                    r#"<div class="card">
        <div class="card-title">Latest Batch</div>
        <p>{id}</p>
        <span class="status-badge {class}">{state}</span>
    </div>"#,
                    id = escape_html(&batch_id),
                    class = status_category(state).css_class(),
                    state = escape_html(state),
                )
            }
            None => r#"<p class="empty-state">No extraction started in this session.</p>"#.to_string(),
        };

        Ok(format!(
            r#"<section class="extraction">
    <form class="card" data-action="start-extraction">
        <div class="form-row">
            <label for="fundCount">Number of funds ({min} to {max})</label>
            <input id="fundCount" name="fund_count" type="number" min="{min}" max="{max}" value="{count}">
        </div>
        <div class="form-row">
            <label for="formType">Form type</label>
            <select id="formType" name="form_type">
{options}            </select>
        </div>
        <div class="form-row">
            <label for="batchName">Batch name (optional)</label>
            <input id="batchName" name="batch_name" type="text">
        </div>
        <button class="btn btn-primary" type="submit">Start Extraction</button>
    </form>
    {latest}
</section>"#,
            count = endpoints.clamp_fund_count(DEFAULT_FUND_COUNT),
        ))
    }
}
