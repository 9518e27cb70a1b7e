//! Paginated catalog fetching.
//!
//! Page 1 is fetched first to learn the page count from its pagination
//! control; then every page `1..=total` is requested at once (no cap, the
//! catalog spans a handful of pages) and the parsed cards are flattened in
//! page order.

use futures::future::try_join_all;
use tracing::{debug, info, instrument};

use cims_extract::{parse_catalog_page, parse_total_pages};
use cims_shared::{BasicMountainRecord, Result};

use crate::client::SiteClient;

/// `action` value routing the AJAX call to the catalog loader.
pub const CATALOG_ACTION: &str = "load_100cims";

/// `cims_query` value selecting the active summits.
pub const CATALOG_QUERY: &str = "cims_actius";

/// POST one catalog page (1-based) and return its HTML fragment.
pub async fn fetch_page(client: &SiteClient, page: u32, token: &str) -> Result<String> {
    let page = page.to_string();
    let form = [
        ("action", CATALOG_ACTION),
        ("nonce", token),
        ("cims_query", CATALOG_QUERY),
        ("current_page", page.as_str()),
    ];

    debug!(page = %page, "fetching catalog page");
    client.post_form(&client.site().catalog_url, &form).await
}

/// Number of catalog pages, read from page 1.
///
/// A response without a pagination control is a single page.
pub async fn fetch_total_pages(client: &SiteClient, token: &str) -> Result<u32> {
    let first = fetch_page(client, 1, token).await?;
    Ok(parse_total_pages(&first)?.unwrap_or(1).max(1))
}

/// Fetch and parse the whole catalog.
///
/// Fails fast: any page request or parse failure aborts the fetch.
#[instrument(skip_all, fields(url = %client.site().catalog_url))]
pub async fn fetch_catalog(client: &SiteClient, token: &str) -> Result<Vec<BasicMountainRecord>> {
    let total = fetch_total_pages(client, token).await?;
    info!(total_pages = total, "catalog pagination discovered");

    let pages = try_join_all((1..=total).map(|page| fetch_page(client, page, token))).await?;

    let mut records = Vec::new();
    for markup in &pages {
        records.extend(parse_catalog_page(markup)?);
    }

    info!(
        pages = pages.len(),
        records = records.len(),
        "catalog fetched"
    );
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{catalog_card, client_for, pagination};
    use cims_shared::CimsError;
    use wiremock::matchers::{body_string_contains, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn mount_page(server: &MockServer, page: u32, body: String) {
        Mock::given(method("POST"))
            .and(path("/wp-admin/admin-ajax.php"))
            .and(body_string_contains(format!("current_page={page}")))
            .respond_with(ResponseTemplate::new(200).set_body_string(body))
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn fetch_page_sends_catalog_form() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/wp-admin/admin-ajax.php"))
            .and(body_string_contains("action=load_100cims"))
            .and(body_string_contains("nonce=tok42"))
            .and(body_string_contains("cims_query=cims_actius"))
            .and(body_string_contains("current_page=7"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<div></div>"))
            .expect(1)
            .mount(&server)
            .await;

        let body = fetch_page(&client_for(&server), 7, "tok42").await.unwrap();
        assert_eq!(body, "<div></div>");
    }

    #[tokio::test]
    async fn flattens_pages_in_page_then_item_order() {
        let server = MockServer::start().await;
        let base = server.uri();

        mount_page(
            &server,
            1,
            format!(
                "{}{}{}",
                catalog_card(&base, "a1", 100),
                catalog_card(&base, "a2", 200),
                pagination(3)
            ),
        )
        .await;
        mount_page(&server, 2, format!("{}{}", catalog_card(&base, "b1", 300), pagination(3))).await;
        mount_page(
            &server,
            3,
            format!(
                "{}{}{}{}",
                catalog_card(&base, "c1", 400),
                catalog_card(&base, "c2", 500),
                catalog_card(&base, "c3", 600),
                pagination(3)
            ),
        )
        .await;

        let records = fetch_catalog(&client_for(&server), "tok").await.unwrap();
        let ids: Vec<_> = records.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, ["a1", "a2", "b1", "c1", "c2", "c3"]);
        assert_eq!(records[3].height, 400);
    }

    #[tokio::test]
    async fn missing_pagination_means_single_page() {
        let server = MockServer::start().await;
        let base = server.uri();
        Mock::given(method("POST"))
            .and(path("/wp-admin/admin-ajax.php"))
            .and(body_string_contains("current_page=1"))
            .respond_with(
                ResponseTemplate::new(200).set_body_string(catalog_card(&base, "only", 900)),
            )
            // Once for pagination discovery, once as part of the page set.
            .expect(2)
            .mount(&server)
            .await;

        let records = fetch_catalog(&client_for(&server), "tok").await.unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].id, "only");
    }

    #[tokio::test]
    async fn empty_catalog_yields_no_records() {
        let server = MockServer::start().await;
        mount_page(&server, 1, "<p>Cap resultat</p>".into()).await;

        let records = fetch_catalog(&client_for(&server), "tok").await.unwrap();
        assert!(records.is_empty());
    }

    #[tokio::test]
    async fn failing_page_aborts_catalog() {
        let server = MockServer::start().await;
        let base = server.uri();
        mount_page(&server, 1, format!("{}{}", catalog_card(&base, "a", 1), pagination(2))).await;
        Mock::given(method("POST"))
            .and(body_string_contains("current_page=2"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let err = fetch_catalog(&client_for(&server), "tok").await.unwrap_err();
        assert!(matches!(err, CimsError::Network(_)));
    }

    #[tokio::test]
    async fn unparseable_height_aborts_catalog() {
        let server = MockServer::start().await;
        mount_page(
            &server,
            1,
            r#"<a class="item-100cims" href="/c/x/"><h3>X</h3><h5>? m</h5><h5>R</h5></a>"#.into(),
        )
        .await;

        let err = fetch_catalog(&client_for(&server), "tok").await.unwrap_err();
        assert!(matches!(err, CimsError::Parse { .. }));
    }
}
