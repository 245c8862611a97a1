//! Fund browser: first page of extracted funds as a table

use std::fmt::Write as _;

use async_trait::async_trait;
use stanshare_client::format::{format_currency, format_date};
use stanshare_client::{HttpTransport, PageQuery};

use super::{field_f64, field_str, PageId, View, ViewContext};
use crate::error::Result;
use crate::markup::escape_html;

pub struct FundsView;

#[async_trait]
impl<T: HttpTransport> View<T> for FundsView {
    fn page(&self) -> PageId {
        PageId::Funds
    }

    async fn render(&self, ctx: &ViewContext<'_, T>) -> Result<String> {
        let page = ctx.client.list_funds(&PageQuery::default()).await?;

        if page.is_empty() {
            return Ok(r#"<section class="funds"><p class="empty-state">No funds extracted yet.</p></section>"#.to_string());
        }

        let mut rows = String::new();
        for fund in &page.items {
            let name = field_str(fund, &["fund_name", "name"]).unwrap_or_else(|| "Unnamed fund".to_string());
            let cik = field_str(fund, &["cik"]).unwrap_or_default();
            let form = field_str(fund, &["form_type", "fund_type"]).unwrap_or_default();
            let filed = field_str(fund, &["filing_date", "date"]);

            let _ = writeln!(
                rows,
                "            <tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>",
                escape_html(&name),
                escape_html(&cik),
                escape_html(&form),
                format_currency(field_f64(fund, &["total_assets", "net_assets"])),
                escape_html(&format_date(filed.as_deref())),
            );
        }

        let total = page.total.unwrap_or(page.len() as u64);

        Ok(format!(
            r#"<section class="funds">
    <table class="data-table">
        <thead>
            <tr><th>Fund</th><th>CIK</th><th>Form</th><th>Total Assets</th><th>Filed</th></tr>
        </thead>
        <tbody>
{rows}        </tbody>
    </table>
    <p class="table-footer">Showing {shown} of {total} funds</p>
</section>"#,
            shown = page.len(),
        ))
    }
}
