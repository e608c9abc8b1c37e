//! Employee API client.
//!
//! `EmployeeClient` only knows the base URL. Each operation is split into a
//! `build_*` method producing an [`HttpRequest`] and the shared [`EmployeeClient::decode`]
//! consuming the [`HttpResponse`]; the round trip itself belongs to a
//! [`transport::Transport`].
//!
pub mod http;
pub mod transport;

use reqwest::Url;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::error::ApiError;
pub use http::{HttpMethod, HttpRequest, HttpResponse};

/// One employee record as exchanged with the API.
///
/// `salary` stays a string end to end; the form only checks that it looks
/// numeric.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Employee {
    #[serde(default, deserialize_with = "lenient_string")]
    pub employeeid: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub department: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub salary: String,
}

/// PUT body: the identifier travels in the path only.
#[derive(Debug, Serialize)]
struct EmployeeChanges<'a> {
    name: &'a str,
    department: &'a str,
    salary: &'a str,
}

fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => s,
        Value::Null => String::new(),
        other => other.to_string(),
    })
}

/// A successful response body, tagged by how the server declared it.
#[derive(Debug, Clone, PartialEq)]
pub enum ApiPayload {
    /// `content-type` mentioned `application/json`.
    Structured(Value),
    /// Anything else, kept verbatim.
    Text(String),
}

impl ApiPayload {
    /// Employee records carried by a list response.
    ///
    /// Only a JSON array yields rows; non-object elements are skipped. Every
    /// other payload (object, null, plain text) means "no rows".
    pub fn records(&self) -> Vec<Employee> {
        match self {
            ApiPayload::Structured(Value::Array(items)) => items
                .iter()
                .filter(|item| item.is_object())
                .filter_map(|item| serde_json::from_value(item.clone()).ok())
                .collect(),
            _ => Vec::new(),
        }
    }
}

const JSON: &str = "application/json";

#[derive(Debug, Clone)]
pub struct EmployeeClient {
    base: Url,
}

impl EmployeeClient {
    /// Parse the base URL once. A trailing `/` is ignored.
    pub fn new(base_url: &str) -> Result<Self, ApiError> {
        let trimmed = base_url.trim().trim_end_matches('/');
        let base = Url::parse(trimmed)
            .map_err(|e| ApiError::Encode(format!("invalid base url {trimmed:?}: {e}")))?;
        if base.cannot_be_a_base() {
            return Err(ApiError::Encode(format!("invalid base url {trimmed:?}")));
        }
        Ok(Self { base })
    }

    pub fn base_url(&self) -> &str {
        self.base.as_str().trim_end_matches('/')
    }

    /// `GET /employees`, or `GET /employees?search=<term>` for a non-empty term.
    ///
    /// Spaces in the term are sent as `%20`, not `+`.
    pub fn build_list(&self, search: &str) -> HttpRequest {
        let mut url = self.endpoint(None);
        if !search.is_empty() {
            url.query_pairs_mut().append_pair("search", search);
            // a literal '+' was already escaped as %2B, so every '+' left is a space
            let query = url.query().map(|q| q.replace('+', "%20"));
            url.set_query(query.as_deref());
        }
        request(HttpMethod::Get, url, None)
    }

    pub fn build_get(&self, employeeid: &str) -> HttpRequest {
        request(HttpMethod::Get, self.endpoint(Some(employeeid)), None)
    }

    pub fn build_create(&self, employee: &Employee) -> Result<HttpRequest, ApiError> {
        let body = serde_json::to_string(employee).map_err(|e| ApiError::Encode(e.to_string()))?;
        Ok(request(HttpMethod::Post, self.endpoint(None), Some(body)))
    }

    pub fn build_update(&self, employee: &Employee) -> Result<HttpRequest, ApiError> {
        let changes = EmployeeChanges {
            name: &employee.name,
            department: &employee.department,
            salary: &employee.salary,
        };
        let body = serde_json::to_string(&changes).map_err(|e| ApiError::Encode(e.to_string()))?;
        Ok(request(HttpMethod::Put, self.endpoint(Some(&employee.employeeid)), Some(body)))
    }

    pub fn build_delete(&self, employeeid: &str) -> HttpRequest {
        request(HttpMethod::Delete, self.endpoint(Some(employeeid)), None)
    }

    /// Interpret a response: non-2xx fails with the raw text, JSON bodies are
    /// parsed, anything else is returned as text.
    pub fn decode(&self, response: HttpResponse) -> Result<ApiPayload, ApiError> {
        if !response.is_success() {
            return Err(ApiError::Http { status: response.status, body: response.body });
        }
        let is_json = response
            .header("content-type")
            .map(|ct| ct.to_ascii_lowercase().contains(JSON))
            .unwrap_or(false);
        if is_json {
            serde_json::from_str(&response.body)
                .map(ApiPayload::Structured)
                .map_err(|e| ApiError::Decode(e.to_string()))
        } else {
            Ok(ApiPayload::Text(response.body))
        }
    }

    fn endpoint(&self, employeeid: Option<&str>) -> Url {
        let mut url = self.base.clone();
        // cannot_be_a_base was rejected in `new`
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push("employees");
            if let Some(id) = employeeid {
                segments.push(id);
            }
        }
        url
    }
}

fn request(method: HttpMethod, url: Url, body: Option<String>) -> HttpRequest {
    HttpRequest {
        method,
        url: url.into(),
        headers: vec![("Content-Type".to_string(), JSON.to_string())],
        body,
    }
}
