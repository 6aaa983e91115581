// Page shell served at the root path
use crate::application::refresh_client::DashboardState;
use crate::presentation::dashboard_view::region_html;

const INDEX_TEMPLATE: &str = include_str!("templates/index.html");
const DASHBOARD_SLOT: &str = "{{dashboard}}";

/// Full page with the current dashboard region in place.
pub fn render_page(state: &DashboardState, reloading: bool) -> String {
    INDEX_TEMPLATE.replacen(DASHBOARD_SLOT, &region_html(state, reloading), 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_embeds_region() {
        let page = render_page(&DashboardState::Loading, false);

        assert!(page.starts_with("<!DOCTYPE html>"));
        assert!(page.contains(r#"<section id="sbc-dashboard""#));
        assert!(!page.contains(DASHBOARD_SLOT));
    }

    #[test]
    fn test_hidden_page_keeps_shell() {
        let page = render_page(&DashboardState::Hidden, false);

        assert!(page.contains("<h1>Painel SBC</h1>"));
        assert!(page.contains(r#"data-state="hidden" hidden"#));
    }
}
