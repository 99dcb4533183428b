use crate::error::CatalogError;
use movie_browser_models::{ApiEnvelope, MovieDetail, MovieSummary, PagedResult};
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use tracing::debug;

const NEW_RELEASES_PATH: &str = "/danh-sach/phim-moi-cap-nhat";
const SEARCH_PATH: &str = "/tim-kiem";

pub(crate) fn new_releases_url(base: &str) -> String {
    format!("{}{}", base, NEW_RELEASES_PATH)
}

pub(crate) fn detail_url(base: &str, slug: &str) -> String {
    format!("{}/phim/{}", base, urlencoding::encode(slug))
}

pub(crate) fn search_url(base: &str) -> String {
    format!("{}{}", base, SEARCH_PATH)
}

pub(crate) fn category_url(base: &str, category_slug: &str) -> String {
    format!("{}/danh-sach/{}", base, urlencoding::encode(category_slug))
}

fn map_request_error(err: reqwest::Error) -> CatalogError {
    if err.is_timeout() {
        CatalogError::Timeout
    } else {
        CatalogError::Http(err)
    }
}

async fn get_envelope<T: DeserializeOwned>(
    client: &Client,
    url: &str,
    query: &[(&str, String)],
) -> Result<(StatusCode, Option<ApiEnvelope<T>>), CatalogError> {
    debug!("GET {} {:?}", url, query);
    let response = client
        .get(url)
        .query(query)
        .send()
        .await
        .map_err(map_request_error)?;

    let status = response.status();
    if status == StatusCode::NOT_FOUND {
        return Ok((status, None));
    }
    if !status.is_success() {
        return Err(CatalogError::Status {
            status: status.as_u16(),
            url: url.to_string(),
        });
    }

    let body = response.bytes().await.map_err(map_request_error)?;
    let envelope = decode_envelope(&body)?;
    Ok((status, Some(envelope)))
}

pub(crate) fn decode_envelope<T: DeserializeOwned>(
    body: &[u8],
) -> Result<ApiEnvelope<T>, CatalogError> {
    Ok(serde_json::from_slice(body)?)
}

async fn get_page(
    client: &Client,
    url: &str,
    query: &[(&str, String)],
) -> Result<PagedResult<MovieSummary>, CatalogError> {
    match get_envelope::<MovieSummary>(client, url, query).await? {
        (_, Some(envelope)) => Ok(envelope.into_page()),
        (status, None) => Err(CatalogError::Status {
            status: status.as_u16(),
            url: url.to_string(),
        }),
    }
}

pub async fn list_new(
    client: &Client,
    base: &str,
    page: u32,
) -> Result<PagedResult<MovieSummary>, CatalogError> {
    get_page(client, &new_releases_url(base), &[("page", page.to_string())]).await
}

pub async fn get_detail(
    client: &Client,
    base: &str,
    slug: &str,
) -> Result<MovieDetail, CatalogError> {
    let url = detail_url(base, slug);
    match get_envelope::<MovieDetail>(client, &url, &[]).await? {
        (_, Some(envelope)) => envelope
            .into_item()
            .ok_or_else(|| CatalogError::NotFound(slug.to_string())),
        (_, None) => Err(CatalogError::NotFound(slug.to_string())),
    }
}

pub async fn search(
    client: &Client,
    base: &str,
    keyword: &str,
    page: u32,
) -> Result<PagedResult<MovieSummary>, CatalogError> {
    let query = [("keyword", keyword.to_string()), ("page", page.to_string())];
    get_page(client, &search_url(base), &query).await
}

pub async fn list_by_category(
    client: &Client,
    base: &str,
    category_slug: &str,
    page: u32,
) -> Result<PagedResult<MovieSummary>, CatalogError> {
    get_page(client, &category_url(base, category_slug), &[("page", page.to_string())]).await
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: &str = "https://ophim1.com/v1/api";

    #[test]
    fn test_endpoint_urls() {
        assert_eq!(new_releases_url(BASE), "https://ophim1.com/v1/api/danh-sach/phim-moi-cap-nhat");
        assert_eq!(search_url(BASE), "https://ophim1.com/v1/api/tim-kiem");
        assert_eq!(detail_url(BASE, "nguoi-doi"), "https://ophim1.com/v1/api/phim/nguoi-doi");
        assert_eq!(category_url(BASE, "phim-bo"), "https://ophim1.com/v1/api/danh-sach/phim-bo");
    }

    #[test]
    fn test_path_segments_are_encoded() {
        assert_eq!(detail_url(BASE, "a/b c"), "https://ophim1.com/v1/api/phim/a%2Fb%20c");
    }

    #[test]
    fn test_decode_search_body() {
        let body = br#"{"status":"success","data":{"items":[{"_id":"1","name":"Bat"}],"params":{"pagination":{"totalItems":1,"totalItemsPerPage":24,"currentPage":1}}}}"#;
        let envelope: ApiEnvelope<MovieSummary> = decode_envelope(body).unwrap();
        let page = envelope.into_page();
        assert_eq!(page.items[0].name, "Bat");
        assert_eq!(page.total_pages(), 1);
    }

    #[test]
    fn test_decode_garbage_is_decode_error() {
        let result = decode_envelope::<MovieSummary>(b"<html>bad gateway</html>");
        assert!(matches!(result, Err(CatalogError::Decode(_))));
    }
}
