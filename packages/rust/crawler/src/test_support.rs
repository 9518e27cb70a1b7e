//! Markup builders and client wiring shared by the crawler's mock-server tests.

use cims_shared::SiteConfig;
use wiremock::MockServer;

use crate::client::SiteClient;

/// Site config with every endpoint pointed at the mock server.
pub(crate) fn site_for(server: &MockServer) -> SiteConfig {
    SiteConfig {
        bootstrap_url: format!("{}/activitats/100-cims/", server.uri()),
        catalog_url: format!("{}/wp-admin/admin-ajax.php", server.uri()),
        request_timeout_secs: 10,
        ..SiteConfig::default()
    }
}

pub(crate) fn client_for(server: &MockServer) -> SiteClient {
    SiteClient::new(site_for(server)).expect("build test client")
}

/// One catalog card linking to `<base>/cim/<id>/`.
pub(crate) fn catalog_card(base: &str, id: &str, height: u32) -> String {
    format!(
        r#"<a class="item-100cims" href="{base}/cim/{id}/">
            <img src="{base}/img/{id}.jpg">
            <h3>{id}</h3>
            <h5>{height} m</h5>
            <h5>Region {id}</h5>
        </a>"#
    )
}

/// Pagination control whose last anchor points at page `total`.
pub(crate) fn pagination(total: u32) -> String {
    let links: String = (1..=total)
        .map(|page| format!(r#"<a class="page-link" data-page="{page}">{page}</a>"#))
        .collect();
    format!(r#"<nav class="paginacio">{links}</nav>"#)
}

/// Detail page carrying the labelled coordinate grid.
pub(crate) fn detail_page(latitude: &str, longitude: &str) -> String {
    format!(
        r#"<html><body><div class="row no-gutters fw-light lh-1-2">
            <div class="col-6">Latitud:</div><div class="col-6"> {latitude}º </div>
            <div class="col-6">Longitud:</div><div class="col-6"> {longitude}º </div>
        </div></body></html>"#
    )
}
