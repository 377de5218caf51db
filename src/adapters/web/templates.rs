//! HTML templates using Askama.

use askama::Template;

use super::WebError;

/// The form page, optionally followed by an error or a rendered report.
#[derive(Template, Default)]
#[template(path = "dashboard.html")]
pub struct DashboardTemplate {
    pub symbol: String,
    pub start_date: String,
    pub end_date: String,
    pub benchmark: String,
    pub error: String,
    pub report_html: String,
}

impl DashboardTemplate {
    pub fn to_html(&self) -> Result<String, WebError> {
        self.render()
            .map_err(|e| WebError::internal(format!("template error: {}", e)))
    }
}
