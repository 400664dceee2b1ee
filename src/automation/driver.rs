//! WebDriver JSON client for WinAppDriver.
//!
//! Speaks the JSON wire protocol WinAppDriver accepts, and tolerates W3C
//! style payloads (element key, `value.error`) from compatible drivers.
//!
//! CHANGELOG:
//! - 10/16/2026 - Initial implementation

use super::{By, DriverError, ElementId, UiSession};
use crate::locator::AppTarget;
use reqwest::blocking::Client;
use serde_json::{json, Value};
use std::time::Duration;
use tracing::{debug, warn};

/// W3C element reference key.
const W3C_ELEMENT_KEY: &str = "element-6066-11e4-a6c6-3d6f24ad3ab8";

/// Per-request HTTP timeout. Launching the app can take a while.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// Check whether a driver answers `GET /status`.
pub fn is_reachable(base_url: &str) -> bool {
    let client = match Client::builder().timeout(Duration::from_secs(2)).build() {
        Ok(client) => client,
        Err(_) => return false,
    };
    client
        .get(format!("{}/status", base_url.trim_end_matches('/')))
        .send()
        .map(|resp| resp.status().is_success())
        .unwrap_or(false)
}

/// An open automation session against one application.
pub struct DriverSession {
    client: Client,
    base_url: String,
    session_id: String,
}

impl DriverSession {
    /// Start a session that launches `target`.
    pub fn create(base_url: &str, target: &AppTarget) -> Result<Self, DriverError> {
        let client = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        let base_url = base_url.trim_end_matches('/').to_string();

        let body = json!({
            "desiredCapabilities": {
                "app": target.capability(),
                "deviceName": "WindowsPC",
            }
        });
        let resp: Value = client
            .post(format!("{}/session", base_url))
            .json(&body)
            .send()?
            .json()?;

        let session_id = session_id_from(&resp)?;
        debug!(session_id = %session_id, "driver session created");

        Ok(Self {
            client,
            base_url,
            session_id,
        })
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    fn url(&self, path: &str) -> String {
        format!("{}/session/{}{}", self.base_url, self.session_id, path)
    }

    fn post(&self, path: &str, body: Value) -> Result<Value, DriverError> {
        let resp: Value = self.client.post(self.url(path)).json(&body).send()?.json()?;
        unwrap_value(resp)
    }

    fn locate(&self, path: &str, by: By) -> Result<Value, DriverError> {
        let body = json!({ "using": by.strategy(), "value": by.value() });
        match self.post(path, body) {
            Err(DriverError::NoSuchElement(_)) => Err(DriverError::NoSuchElement(by.to_string())),
            other => other,
        }
    }
}

impl UiSession for DriverSession {
    fn find(&mut self, by: By) -> Result<ElementId, DriverError> {
        let value = self.locate("/element", by)?;
        element_id_from(&value)
    }

    fn find_all(&mut self, by: By) -> Result<Vec<ElementId>, DriverError> {
        let value = match self.locate("/elements", by) {
            Err(DriverError::NoSuchElement(_)) => return Ok(Vec::new()),
            other => other?,
        };
        match value {
            Value::Array(items) => items.iter().map(element_id_from).collect(),
            other => Err(DriverError::Protocol(format!("expected element list, got {}", other))),
        }
    }

    fn click(&mut self, element: &ElementId) -> Result<(), DriverError> {
        self.post(&format!("/element/{}/click", element.0), json!({}))?;
        Ok(())
    }

    fn send_keys(&mut self, element: &ElementId, text: &str) -> Result<(), DriverError> {
        self.post(
            &format!("/element/{}/value", element.0),
            json!({ "value": [text], "text": text }),
        )?;
        Ok(())
    }
}

impl Drop for DriverSession {
    fn drop(&mut self) {
        if let Err(e) = self.client.delete(self.url("")).send() {
            warn!(error = %e, "failed to close driver session");
        }
    }
}

/// Map a driver response to its `value`, turning error payloads into errors.
fn unwrap_value(resp: Value) -> Result<Value, DriverError> {
    let status = resp.get("status").and_then(Value::as_i64).unwrap_or(0);
    let value = resp.get("value").cloned().unwrap_or(Value::Null);

    let w3c_error = value.get("error").and_then(Value::as_str).map(str::to_string);
    if w3c_error.is_none() && status == 0 {
        return Ok(value);
    }

    let message = value
        .get("message")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();
    let code = w3c_error.unwrap_or_else(|| status.to_string());

    // JSONWP status 7 is NoSuchElement
    if code == "no such element" || code == "7" {
        Err(DriverError::NoSuchElement(message))
    } else {
        Err(DriverError::Remote { code, message })
    }
}

fn session_id_from(resp: &Value) -> Result<String, DriverError> {
    let id = resp
        .get("sessionId")
        .and_then(Value::as_str)
        .or_else(|| resp.pointer("/value/sessionId").and_then(Value::as_str));
    match id {
        Some(id) => Ok(id.to_string()),
        None => {
            unwrap_value(resp.clone())?;
            Err(DriverError::Protocol("response has no sessionId".to_string()))
        }
    }
}

fn element_id_from(value: &Value) -> Result<ElementId, DriverError> {
    value
        .get("ELEMENT")
        .or_else(|| value.get(W3C_ELEMENT_KEY))
        .and_then(Value::as_str)
        .map(|id| ElementId(id.to_string()))
        .ok_or_else(|| DriverError::Protocol(format!("no element id in {}", value)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_jsonwp_element() {
        let resp = json!({"sessionId": "s", "status": 0, "value": {"ELEMENT": "42.1"}});
        let value = unwrap_value(resp).unwrap();
        assert_eq!(element_id_from(&value).unwrap(), ElementId("42.1".into()));
    }

    #[test]
    fn test_w3c_element() {
        let mut element = serde_json::Map::new();
        element.insert(W3C_ELEMENT_KEY.to_string(), json!("abc"));
        let value = unwrap_value(json!({ "value": element })).unwrap();
        assert_eq!(element_id_from(&value).unwrap(), ElementId("abc".into()));
    }

    #[test]
    fn test_no_such_element_status() {
        let err = unwrap_value(json!({"status": 7, "value": {"message": "not found"}}))
            .unwrap_err();
        assert!(matches!(err, DriverError::NoSuchElement(_)));

        let err = unwrap_value(json!({"value": {"error": "no such element", "message": "x"}}))
            .unwrap_err();
        assert!(matches!(err, DriverError::NoSuchElement(_)));
    }

    #[test]
    fn test_remote_error() {
        let err = unwrap_value(json!({"status": 13, "value": {"message": "boom"}})).unwrap_err();
        match err {
            DriverError::Remote { code, message } => {
                assert_eq!(code, "13");
                assert_eq!(message, "boom");
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_session_id_locations() {
        assert_eq!(session_id_from(&json!({"sessionId": "A", "status": 0})).unwrap(), "A");
        assert_eq!(session_id_from(&json!({"value": {"sessionId": "B"}})).unwrap(), "B");
        assert!(matches!(
            session_id_from(&json!({
                "value": {"error": "session not created", "message": "no app"}
            })),
            Err(DriverError::Remote { .. })
        ));
        assert!(matches!(
            session_id_from(&json!({"value": {}})),
            Err(DriverError::Protocol(_))
        ));
    }

    #[test]
    fn test_unreachable_driver() {
        // nothing listens on port 9 locally
        assert!(!is_reachable("http://127.0.0.1:9"));
    }
}
