// Maps dashboard state to the HTML region served to the page
use crate::application::refresh_client::DashboardState;
use crate::domain::dashboard::{Dashboard, SourceLine, Tile};
use crate::presentation::html::{Element, Node};

pub const REGION_ID: &str = "sbc-dashboard";
pub const RELOAD_LABEL: &str = "Recarregar dados";
pub const RELOAD_BUSY_LABEL: &str = "Recarregando…";
const LOADING_TEXT: &str = "Carregando painel SBC…";
const SEPARATOR: &str = " · ";

/// The whole dashboard region. Hidden states still render an empty section
/// so the page script has something to swap.
pub fn render_region(state: &DashboardState, reloading: bool) -> Element {
    let region = Element::new("section")
        .attr("id", REGION_ID)
        .class("sbc-dashboard")
        .attr("data-state", state.name());

    match state {
        DashboardState::Loading => region
            .attr("aria-busy", "true")
            .child(Element::new("p").class("sbc-loading").text(LOADING_TEXT))
            .child(reload_control(reloading)),
        DashboardState::Hidden => region.flag("hidden"),
        DashboardState::ErrorDisplayed(message) => region.child(
            Element::new("div")
                .class("sbc-banner")
                .attr("role", "alert")
                .child(Element::new("p").text(message.as_str()))
                .child(reload_control(reloading)),
        ),
        DashboardState::Displayed(dashboard) => region
            .child(
                Element::new("div")
                    .class("sbc-toolbar")
                    .child(reload_control(reloading)),
            )
            .child(tiles(dashboard))
            .child(source_line(&dashboard.source)),
    }
}

pub fn region_html(state: &DashboardState, reloading: bool) -> String {
    render_region(state, reloading).render()
}

fn reload_control(reloading: bool) -> Element {
    let label = if reloading { RELOAD_BUSY_LABEL } else { RELOAD_LABEL };

    Element::new("form")
        .class("sbc-reload-form")
        .attr("method", "post")
        .attr("action", "/dashboard/reload")
        .child(
            Element::new("button")
                .attr("type", "submit")
                .class("sbc-reload")
                .flag_if("disabled", reloading)
                .text(label),
        )
}

fn tiles(dashboard: &Dashboard) -> Element {
    Element::new("div")
        .class("sbc-tiles")
        .children(dashboard.tiles.iter().map(tile))
}

fn tile(tile: &Tile) -> Node {
    Element::new("div")
        .class(format!("sbc-tile {}", tile.css_class()))
        .child(
            Element::new("span")
                .class("sbc-tile-value")
                .text(tile.value.to_string()),
        )
        .child(
            Element::new("span")
                .class("sbc-tile-label")
                .text(tile.label.as_str()),
        )
        .into()
}

fn source_line(source: &SourceLine) -> Element {
    match source {
        SourceLine::NotLoaded => Element::new("p")
            .class("sbc-fonte sbc-fonte-vazia")
            .text(SourceLine::NOT_LOADED_TEXT),
        SourceLine::Loaded {
            filename,
            modified_at,
            measurements,
            cache_age_seconds,
        } => {
            let parts = [
                ("sbc-fonte-arquivo", filename.clone()),
                ("sbc-fonte-data", modified_at.clone()),
                ("sbc-fonte-medicoes", SourceLine::measurements_text(*measurements)),
                ("sbc-fonte-cache", SourceLine::cache_text(*cache_age_seconds)),
            ];

            let mut line = Element::new("p").class("sbc-fonte");
            for (i, (class, text)) in parts.into_iter().enumerate() {
                if i > 0 {
                    line = line.text(SEPARATOR);
                }
                line = line.child(Element::new("span").class(class).text(text));
            }
            line
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::dashboard::{DEFAULT_REGION_LIMIT, TileKind};
    use crate::domain::overview::OverviewAggregate;

    const JANUARY: &[u8] = br#"{
        "total_sbcs": 12,
        "por_saude": {"disponivel": 9, "critico": 3},
        "por_regional": {"Norte": 5, "Sul": 4, "Leste": 2, "Oeste": 1, "Centro": 0},
        "dados_agregados_csv": 0,
        "csv_info": {"filename": "jan.csv", "modified_at": "2024-01-05",
                     "total_measurements": 500, "cache_age_seconds": 30}
    }"#;

    fn displayed(json: &[u8]) -> DashboardState {
        let overview = OverviewAggregate::from_json(json).unwrap();
        DashboardState::Displayed(Dashboard::from_overview(&overview, DEFAULT_REGION_LIMIT))
    }

    #[test]
    fn test_january_region_html() {
        let html = region_html(&displayed(JANUARY), false);

        assert!(html.contains(r#"data-state="displayed""#));
        assert!(html.contains(
            r#"<div class="sbc-tile sbc-total"><span class="sbc-tile-value">12</span><span class="sbc-tile-label">Total de SBCs</span></div>"#
        ));
        assert!(html.contains(r#"<span class="sbc-tile-label">Disponível</span>"#));
        assert!(html.contains(r#"<span class="sbc-tile-label">Crítico</span>"#));
        assert!(!html.contains("Moderado"));
        assert!(!html.contains("Atenção"));
        assert_eq!(html.matches("sbc-regional").count(), 4);
        assert!(!html.contains("Centro"));
        assert!(!html.contains("sbc-agregado"));
        assert!(html.contains(
            r#"<p class="sbc-fonte"><span class="sbc-fonte-arquivo">jan.csv</span> · <span class="sbc-fonte-data">2024-01-05</span> · <span class="sbc-fonte-medicoes">500 medições</span> · <span class="sbc-fonte-cache">Cache: 30s</span></p>"#
        ));
    }

    #[test]
    fn test_region_tiles_render_in_rank_order() {
        let html = region_html(&displayed(JANUARY), false);
        let positions: Vec<usize> = ["Norte", "Sul", "Leste", "Oeste"]
            .iter()
            .map(|name| html.find(&format!(">{}<", name)).unwrap())
            .collect();

        assert!(positions.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_no_source_indicator() {
        let html = region_html(&displayed(b"{}"), false);

        assert!(html.contains("Nenhuma fonte CSV carregada"));
        assert!(!html.contains("sbc-fonte-arquivo"));
    }

    #[test]
    fn test_hidden_region_is_empty() {
        let html = region_html(&DashboardState::Hidden, false);

        assert_eq!(
            html,
            r#"<section id="sbc-dashboard" class="sbc-dashboard" data-state="hidden" hidden></section>"#
        );
    }

    #[test]
    fn test_error_banner_hides_content() {
        let state = DashboardState::ErrorDisplayed("Fonte indisponível".to_string());
        let html = region_html(&state, false);

        assert!(html.contains(r#"<div class="sbc-banner" role="alert"><p>Fonte indisponível</p>"#));
        assert!(!html.contains("sbc-tiles"));
        assert!(!html.contains(" hidden"));
    }

    #[test]
    fn test_loading_region() {
        let html = region_html(&DashboardState::Loading, false);

        assert!(html.contains(r#"aria-busy="true""#));
        assert!(html.contains(LOADING_TEXT));
        assert!(html.contains(r#"<button type="submit" class="sbc-reload">Recarregar dados</button>"#));
    }

    #[test]
    fn test_reload_button_busy_label() {
        let idle = region_html(&displayed(b"{}"), false);
        let busy = region_html(&displayed(b"{}"), true);

        assert!(idle.contains(r#"<button type="submit" class="sbc-reload">Recarregar dados</button>"#));
        assert!(busy.contains(r#"<button type="submit" class="sbc-reload" disabled>Recarregando…</button>"#));
    }

    #[test]
    fn test_untrusted_strings_are_escaped() {
        let json = br#"{
            "por_regional": {"<img src=x onerror=alert(1)>": 3},
            "csv_info": {"filename": "a&b<c>.csv"}
        }"#;
        let html = region_html(&displayed(json), false);

        assert!(!html.contains("<img"));
        assert!(html.contains("&lt;img src=x onerror=alert(1)&gt;"));
        assert!(html.contains("a&amp;b&lt;c&gt;.csv"));
    }

    #[test]
    fn test_same_state_renders_identically() {
        let state = displayed(JANUARY);
        assert_eq!(region_html(&state, false), region_html(&state.clone(), false));

        if let DashboardState::Displayed(dashboard) = &state {
            assert_eq!(dashboard.tiles_of(TileKind::Region).count(), 4);
        }
    }
}
