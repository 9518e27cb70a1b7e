//! Nonce acquisition from the bootstrap page.

use tracing::{info, instrument};

use cims_extract::extract_nonce;
use cims_shared::Result;

use crate::client::SiteClient;

/// Fetch the bootstrap page once and extract the catalog nonce.
///
/// No retry: a missing nonce fails the run with `TokenNotFound`.
#[instrument(skip_all, fields(url = %client.site().bootstrap_url))]
pub async fn acquire_token(client: &SiteClient) -> Result<String> {
    let body = client.get_text(&client.site().bootstrap_url).await?;
    let token = extract_nonce(&body)?;

    info!(token_len = token.len(), "nonce acquired");
    Ok(token)
}
