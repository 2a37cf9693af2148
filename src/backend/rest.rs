//! Hosted table reached through a PostgREST endpoint (the API shape
//! Supabase exposes under `/rest/v1`).

use reqwest::blocking::{Client, RequestBuilder, Response};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};

use super::{Backend, SelectQuery};
use crate::error::{FuelError, Result};
use crate::models::{NewRecord, Record, RecordId, RecordPatch};

pub struct RestBackend {
    client: Client,
    endpoint: String,
}

pub(crate) fn endpoint(base_url: &str, table: &str) -> String {
    format!("{}/rest/v1/{table}", base_url.trim_end_matches('/'))
}

pub(crate) fn select_params(query: &SelectQuery) -> Vec<(&'static str, String)> {
    let dir = if query.descending { "desc" } else { "asc" };
    vec![
        ("select", query.columns.join(",")),
        ("order", format!("{}.{dir}", query.order_by)),
        ("limit", query.limit.to_string()),
    ]
}

pub(crate) fn id_filter(id: &RecordId) -> (&'static str, String) {
    ("id", format!("eq.{id}"))
}

/// Pull the human-readable message out of an error body, falling back to
/// the raw text.
pub(crate) fn error_message(status: u16, body: &str) -> String {
    let detail = serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v.get("message").and_then(|m| m.as_str()).map(str::to_string))
        .unwrap_or_else(|| body.trim().to_string());
    if detail.is_empty() {
        format!("HTTP {status}")
    } else {
        format!("HTTP {status}: {detail}")
    }
}

fn check(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        Ok(response)
    } else {
        let body = response.text().unwrap_or_default();
        Err(FuelError::Backend(error_message(status.as_u16(), &body)))
    }
}

impl RestBackend {
    pub fn new(base_url: &str, table: &str, key: &str) -> Result<Self> {
        let mut headers = HeaderMap::new();
        let api_key = HeaderValue::from_str(key)
            .map_err(|_| FuelError::Settings("rest_key contains invalid characters".into()))?;
        let bearer = HeaderValue::from_str(&format!("Bearer {key}"))
            .map_err(|_| FuelError::Settings("rest_key contains invalid characters".into()))?;
        headers.insert("apikey", api_key);
        headers.insert(AUTHORIZATION, bearer);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert("Prefer", HeaderValue::from_static("return=minimal"));

        let client = Client::builder().default_headers(headers).build()?;
        Ok(Self {
            client,
            endpoint: endpoint(base_url, table),
        })
    }

    fn send(&self, request: RequestBuilder) -> Result<Response> {
        check(request.send()?)
    }
}

impl Backend for RestBackend {
    fn select(&self, query: &SelectQuery) -> Result<Vec<Record>> {
        query.check_columns()?;
        let response = self.send(self.client.get(&self.endpoint).query(&select_params(query)))?;
        Ok(response.json()?)
    }

    fn insert(&self, record: &NewRecord) -> Result<()> {
        self.send(self.client.post(&self.endpoint).json(&[record]))?;
        Ok(())
    }

    fn update(&self, id: &RecordId, patch: &RecordPatch) -> Result<()> {
        if patch.is_empty() {
            return Ok(());
        }
        self.send(
            self.client
                .patch(&self.endpoint)
                .query(&[id_filter(id)])
                .json(patch),
        )?;
        Ok(())
    }

    fn delete(&self, id: &RecordId) -> Result<()> {
        self.send(self.client.delete(&self.endpoint).query(&[id_filter(id)]))?;
        Ok(())
    }

    fn describe(&self) -> String {
        format!("rest {}", self.endpoint)
    }
}

#[cfg(test)]
mod tests {
    use mockito::Matcher;

    use super::*;

    #[test]
    fn test_endpoint_trims_trailing_slash() {
        assert_eq!(
            endpoint("https://abc.supabase.co/", "cargas"),
            "https://abc.supabase.co/rest/v1/cargas"
        );
    }

    #[test]
    fn test_select_params() {
        let params = select_params(&SelectQuery::latest(50));
        assert_eq!(params[0], ("select", "id,created_at,task_date,task_name,litros,precio".to_string()));
        assert_eq!(params[1], ("order", "created_at.desc".to_string()));
        assert_eq!(params[2], ("limit", "50".to_string()));
    }

    #[test]
    fn test_id_filter() {
        assert_eq!(id_filter(&RecordId::from(9)), ("id", "eq.9".to_string()));
    }

    #[test]
    fn test_error_message_prefers_json_message() {
        let body = r#"{"code":"42501","message":"permission denied for table cargas"}"#;
        assert_eq!(error_message(401, body), "HTTP 401: permission denied for table cargas");
        assert_eq!(error_message(502, "Bad Gateway"), "HTTP 502: Bad Gateway");
        assert_eq!(error_message(500, ""), "HTTP 500");
    }

    #[test]
    fn test_new_rejects_bad_key() {
        assert!(RestBackend::new("https://x.example", "cargas", "bad\nkey").is_err());
    }

    fn table_path() -> Matcher {
        Matcher::Regex("^/rest/v1/cargas".to_string())
    }

    fn backend_for(server: &mockito::ServerGuard) -> RestBackend {
        RestBackend::new(&server.url(), "cargas", "secret").unwrap()
    }

    #[test]
    fn test_select_sends_query_and_decodes_rows() {
        let mut server = mockito::Server::new();
        let mock = server
            .mock("GET", table_path())
            .match_header("apikey", "secret")
            .match_header("authorization", "Bearer secret")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded(
                    "select".into(),
                    "id,created_at,task_date,task_name,litros,precio".into(),
                ),
                Matcher::UrlEncoded("order".into(), "created_at.desc".into()),
                Matcher::UrlEncoded("limit".into(), "50".into()),
            ]))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"[{"id":7,"created_at":"2024-02-01T10:00:00","task_date":"2024-02-01",
                     "task_name":12345,"litros":"40.123","precio":1.556},
                    {"id":6,"created_at":null,"task_date":null,"task_name":null,
                     "litros":null,"precio":null}]"#,
            )
            .create();

        let rows = backend_for(&server).select(&SelectQuery::latest(50)).unwrap();
        mock.assert();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].id, RecordId::from(7));
        assert_eq!(rows[0].task_name, Some(12345));
        assert_eq!(rows[0].litros, Some(40.123));
        assert_eq!(rows[0].precio, Some(1.556));
        assert_eq!(rows[1].task_date, None);
        assert_eq!(rows[1].litros, None);
    }

    #[test]
    fn test_insert_posts_json_array() {
        let mut server = mockito::Server::new();
        let mock = server
            .mock("POST", table_path())
            .match_header("content-type", "application/json")
            .match_header("prefer", "return=minimal")
            .match_body(Matcher::Json(serde_json::json!([{
                "task_date": "2024-01-01",
                "task_name": 12345,
                "litros": 40.123,
                "precio": 1.556
            }])))
            .with_status(201)
            .create();

        let record = NewRecord {
            task_date: "2024-01-01".to_string(),
            task_name: 12345,
            litros: 40.123,
            precio: 1.556,
        };
        backend_for(&server).insert(&record).unwrap();
        mock.assert();
    }

    #[test]
    fn test_update_patches_by_id_with_present_fields_only() {
        let mut server = mockito::Server::new();
        let mock = server
            .mock("PATCH", table_path())
            .match_query(Matcher::UrlEncoded("id".into(), "eq.9".into()))
            .match_body(Matcher::Json(serde_json::json!({ "litros": 30.0 })))
            .with_status(204)
            .create();

        let patch = RecordPatch {
            litros: Some(30.0),
            ..Default::default()
        };
        backend_for(&server).update(&RecordId::from(9), &patch).unwrap();
        mock.assert();
    }

    #[test]
    fn test_empty_update_sends_nothing() {
        let mut server = mockito::Server::new();
        let mock = server.mock("PATCH", table_path()).expect(0).create();
        backend_for(&server)
            .update(&RecordId::from(9), &RecordPatch::default())
            .unwrap();
        mock.assert();
    }

    #[test]
    fn test_delete_by_id() {
        let mut server = mockito::Server::new();
        let mock = server
            .mock("DELETE", table_path())
            .match_query(Matcher::UrlEncoded("id".into(), "eq.9".into()))
            .with_status(204)
            .create();

        backend_for(&server).delete(&RecordId::from(9)).unwrap();
        mock.assert();
    }

    #[test]
    fn test_error_status_becomes_backend_error() {
        let mut server = mockito::Server::new();
        let _mock = server
            .mock("DELETE", table_path())
            .with_status(403)
            .with_header("content-type", "application/json")
            .with_body(r#"{"code":"42501","message":"permission denied for table cargas"}"#)
            .create();

        match backend_for(&server).delete(&RecordId::from(9)) {
            Err(FuelError::Backend(msg)) => {
                assert_eq!(msg, "HTTP 403: permission denied for table cargas")
            }
            other => panic!("expected backend error, got {other:?}"),
        }
    }

    #[test]
    fn test_select_error_status_keeps_plain_body() {
        let mut server = mockito::Server::new();
        let _mock = server
            .mock("GET", table_path())
            .with_status(502)
            .with_body("Bad Gateway")
            .create();

        let err = backend_for(&server).select(&SelectQuery::latest(5)).unwrap_err();
        assert!(matches!(err, FuelError::Backend(ref m) if m == "HTTP 502: Bad Gateway"));
    }
}
