//! Sheets v4 REST client implementing [`TabularStore`].

use async_trait::async_trait;
use reqwest::{Method, Url};
use serde::Deserialize;
use serde_json::{json, Value};
use tasklog_core::{CellValue, ColumnIndex, Row, RowPosition};

use super::auth::{map_reqwest_error, ServiceAccountAuth};
use super::config::{SheetsConfig, SpreadsheetRef};
use crate::a1::{column_range, quote_table, row_range};
use crate::error::{StoreError, StoreResult};
use crate::store::TabularStore;

/// Numbers stay numbers, formulas and dates are parsed as if typed.
const VALUE_INPUT_OPTION: &str = "USER_ENTERED";

const SPREADSHEET_MIME_TYPE: &str = "application/vnd.google-apps.spreadsheet";

/// Google Sheets backed store. One instance per process.
pub struct SheetsStore {
    http: reqwest::Client,
    auth: ServiceAccountAuth,
    spreadsheet_id: String,
    sheets_base_url: String,
}

#[derive(Debug, Deserialize)]
struct ValueRange {
    #[serde(default)]
    values: Option<Vec<Vec<Value>>>,
}

#[derive(Debug, Deserialize)]
struct DriveFileList {
    #[serde(default)]
    files: Vec<DriveFile>,
}

#[derive(Debug, Deserialize)]
struct DriveFile {
    id: String,
}

#[derive(Debug, Deserialize)]
struct GoogleErrorBody {
    error: GoogleError,
}

#[derive(Debug, Deserialize)]
struct GoogleError {
    #[serde(default)]
    message: String,
}

impl SheetsStore {
    /// Build the HTTP session and resolve the spreadsheet id.
    pub async fn connect(config: SheetsConfig) -> StoreResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| StoreError::transport(format!("failed to build HTTP client: {}", e)))?;
        let auth = ServiceAccountAuth::new(config.credentials, http.clone());

        let spreadsheet_id = match config.spreadsheet {
            SpreadsheetRef::Id(id) => id,
            SpreadsheetRef::Name(name) => {
                resolve_by_name(&http, &auth, &config.drive_base_url, &name).await?
            }
        };

        tracing::info!(
            spreadsheet_id = %spreadsheet_id,
            client_email = %auth.client_email(),
            "Connected to Google Sheets store"
        );

        Ok(Self {
            http,
            auth,
            spreadsheet_id,
            sheets_base_url: config.sheets_base_url,
        })
    }

    pub fn spreadsheet_id(&self) -> &str {
        &self.spreadsheet_id
    }

    /// `{base}/spreadsheets/{id}/values/{segment}` with the segment escaped.
    fn values_url(&self, segment: &str) -> StoreResult<Url> {
        let mut url = Url::parse(&self.sheets_base_url)
            .map_err(|e| StoreError::InvalidRange {
                reason: format!("bad Sheets base URL: {}", e),
            })?;
        url.path_segments_mut()
            .map_err(|_| StoreError::InvalidRange {
                reason: "Sheets base URL cannot hold a path".to_string(),
            })?
            .pop_if_empty()
            .extend(["spreadsheets", self.spreadsheet_id.as_str(), "values", segment]);
        Ok(url)
    }

    async fn send(
        &self,
        operation: &str,
        method: Method,
        url: Url,
        query: &[(&str, &str)],
        body: Option<Value>,
    ) -> StoreResult<String> {
        let token = self.auth.access_token().await?;
        let mut request = self
            .http
            .request(method, url)
            .bearer_auth(token)
            .query(query);
        if let Some(body) = body {
            request = request.json(&body);
        }
        let response = request
            .send()
            .await
            .map_err(|e| map_reqwest_error(operation, e))?;
        read_response(operation, response).await
    }
}

async fn read_response(operation: &str, response: reqwest::Response) -> StoreResult<String> {
    let status = response.status();
    let body = response
        .text()
        .await
        .map_err(|e| map_reqwest_error(operation, e))?;
    if status.is_success() {
        Ok(body)
    } else {
        let message = google_error_message(&body);
        tracing::warn!(operation, status = status.as_u16(), %message, "Store call failed");
        Err(StoreError::from_status(status.as_u16(), message))
    }
}

async fn resolve_by_name(
    http: &reqwest::Client,
    auth: &ServiceAccountAuth,
    drive_base_url: &str,
    name: &str,
) -> StoreResult<String> {
    let query = format!(
        "name = '{}' and mimeType = '{}' and trashed = false",
        name.replace('\\', "\\\\").replace('\'', "\\'"),
        SPREADSHEET_MIME_TYPE
    );
    let url = format!("{}/files", drive_base_url.trim_end_matches('/'));
    let token = auth.access_token().await?;
    let response = http
        .get(url)
        .bearer_auth(token)
        .query(&[("q", query.as_str()), ("fields", "files(id,name)")])
        .send()
        .await
        .map_err(|e| map_reqwest_error("resolve spreadsheet", e))?;
    let body = read_response("resolve spreadsheet", response).await?;
    let list: DriveFileList = serde_json::from_str(&body)
        .map_err(|e| StoreError::malformed(format!("drive file list: {}", e)))?;
    list.files
        .into_iter()
        .next()
        .map(|f| f.id)
        .ok_or_else(|| StoreError::not_found(format!("spreadsheet named {}", name)))
}

/// Human-readable message from a Google API error body, or the raw body.
fn google_error_message(body: &str) -> String {
    match serde_json::from_str::<GoogleErrorBody>(body) {
        Ok(parsed) if !parsed.error.message.is_empty() => parsed.error.message,
        _ if body.trim().is_empty() => "empty error response".to_string(),
        _ => body.trim().to_string(),
    }
}

/// Cells of the single column in a `majorDimension=COLUMNS` value range.
fn parse_column(body: &str) -> StoreResult<Vec<CellValue>> {
    let range: ValueRange = serde_json::from_str(body)
        .map_err(|e| StoreError::malformed(format!("value range: {}", e)))?;
    Ok(range
        .values
        .and_then(|columns| columns.into_iter().next())
        .unwrap_or_default()
        .iter()
        .map(CellValue::from_json)
        .collect())
}

fn rows_body(range: &str, rows: &[Row]) -> Value {
    json!({
        "range": range,
        "majorDimension": "ROWS",
        "values": rows,
    })
}

#[async_trait]
impl TabularStore for SheetsStore {
    async fn append_rows(&self, table: &str, rows: &[Row]) -> StoreResult<()> {
        let range = quote_table(table);
        let url = self.values_url(&format!("{}:append", range))?;
        self.send(
            "append",
            Method::POST,
            url,
            &[
                ("valueInputOption", VALUE_INPUT_OPTION),
                ("insertDataOption", "INSERT_ROWS"),
            ],
            Some(rows_body(&range, rows)),
        )
        .await?;
        Ok(())
    }

    async fn write_row(&self, table: &str, position: RowPosition, row: &Row) -> StoreResult<()> {
        let range = row_range(table, position, row.len())?;
        let url = self.values_url(&range)?;
        self.send(
            "overwrite",
            Method::PUT,
            url,
            &[("valueInputOption", VALUE_INPUT_OPTION)],
            Some(rows_body(&range, std::slice::from_ref(row))),
        )
        .await?;
        Ok(())
    }

    async fn read_column(&self, table: &str, column: ColumnIndex) -> StoreResult<Vec<CellValue>> {
        let range = column_range(table, column)?;
        let url = self.values_url(&range)?;
        let body = self
            .send(
                "read column",
                Method::GET,
                url,
                &[
                    ("majorDimension", "COLUMNS"),
                    ("valueRenderOption", "UNFORMATTED_VALUE"),
                ],
                None,
            )
            .await?;
        parse_column(&body)
    }

    fn backend_name(&self) -> &'static str {
        "sheets"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_column() -> StoreResult<()> {
        let body = r#"{
            "range": "'TaskData'!A1:A3",
            "majorDimension": "COLUMNS",
            "values": [["sub_id", "S1", 1017]]
        }"#;
        assert_eq!(
            parse_column(body)?,
            vec![
                CellValue::from("sub_id"),
                CellValue::from("S1"),
                CellValue::from(1017i64)
            ]
        );
        Ok(())
    }

    #[test]
    fn test_parse_empty_column() -> StoreResult<()> {
        let body = r#"{"range": "'TaskData'!A1:A1000", "majorDimension": "COLUMNS"}"#;
        assert!(parse_column(body)?.is_empty());
        Ok(())
    }

    #[test]
    fn test_parse_garbage_is_malformed() {
        assert!(matches!(
            parse_column("<html>"),
            Err(StoreError::MalformedResponse { .. })
        ));
    }

    #[test]
    fn test_google_error_message() {
        let body = r#"{"error": {"code": 400, "message": "Unable to parse range: Nope", "status": "INVALID_ARGUMENT"}}"#;
        assert_eq!(google_error_message(body), "Unable to parse range: Nope");
        assert_eq!(google_error_message("  Bad Gateway "), "Bad Gateway");
        assert_eq!(google_error_message(""), "empty error response");
    }

    #[test]
    fn test_rows_body_keeps_numbers() {
        let rows = vec![vec![CellValue::from("S1"), CellValue::from(3i64), CellValue::Empty]];
        let body = rows_body("'TrialData'", &rows);
        assert_eq!(body["values"], json!([["S1", 3, ""]]));
        assert_eq!(body["majorDimension"], "ROWS");
    }
}
