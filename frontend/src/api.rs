//! Browser-side client for the KPI backend.
//!
//! One `ApiClient` is created by `App` and handed to components through a yew
//! context. Reads that must stay live are opened with [`ApiClient::subscribe`],
//! which returns a [`Subscription`]; dropping it closes the `EventSource`.

use common::model::config::Config;
use common::model::submission::Submission;
use common::requests::{SaveSubmissionRequest, SaveSubmissionResponse, UpdateConfigRequest};
use gloo_net::http::{Request, Response};
use serde::de::DeserializeOwned;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys::{EventSource, MessageEvent};
use yew::Callback;

/// localStorage key holding the last location picked in the team form.
const LOCATION_KEY: &str = "selectedLocation";

#[derive(Clone, Debug, Default, PartialEq)]
pub struct ApiClient {
    base: String,
}

/// A file fetched from an export endpoint.
pub struct Download {
    pub filename: String,
    pub mime: String,
    pub bytes: Vec<u8>,
}

impl ApiClient {
    /// `base` is prepended to every path; empty means same origin.
    pub fn new(base: impl Into<String>) -> Self {
        Self { base: base.into() }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base, path)
    }

    async fn read<T: DeserializeOwned>(resp: Response) -> Result<T, String> {
        if resp.ok() {
            resp.json::<T>().await.map_err(|e| e.to_string())
        } else {
            Err(error_text(resp).await)
        }
    }

    pub async fn save_submission(
        &self,
        request: &SaveSubmissionRequest,
    ) -> Result<SaveSubmissionResponse, String> {
        let resp = Request::post(&self.url("/api/submissions"))
            .json(request)
            .map_err(|e| e.to_string())?
            .send()
            .await
            .map_err(|e| e.to_string())?;
        Self::read(resp).await
    }

    pub async fn update_config(&self, config: &Config) -> Result<Config, String> {
        let body = UpdateConfigRequest {
            config: config.clone(),
        };
        let resp = Request::put(&self.url("/api/config"))
            .json(&body)
            .map_err(|e| e.to_string())?
            .send()
            .await
            .map_err(|e| e.to_string())?;
        Self::read(resp).await
    }

    pub async fn location_history(
        &self,
        location_code: &str,
        limit: usize,
    ) -> Result<Vec<Submission>, String> {
        let path = format!(
            "/api/submissions/location/{}/history?limit={}",
            location_code, limit
        );
        let resp = Request::get(&self.url(&path))
            .send()
            .await
            .map_err(|e| e.to_string())?;
        Self::read(resp).await
    }

    /// Fetches a whole export before anything is offered to the user.
    pub async fn download(&self, path: &str, fallback_name: &str) -> Result<Download, String> {
        let resp = Request::get(&self.url(path))
            .send()
            .await
            .map_err(|e| e.to_string())?;
        if !resp.ok() {
            return Err(error_text(resp).await);
        }
        let headers = resp.headers();
        let filename = headers
            .get("content-disposition")
            .and_then(|h| attachment_filename(&h))
            .unwrap_or_else(|| fallback_name.to_string());
        let mime = headers
            .get("content-type")
            .unwrap_or_else(|| "application/octet-stream".to_string());
        let bytes = resp.binary().await.map_err(|e| e.to_string())?;
        Ok(Download {
            filename,
            mime,
            bytes,
        })
    }

    /// Opens a Server-Sent Events stream and emits every decoded frame.
    pub fn subscribe<T>(&self, path: &str, on_value: Callback<T>) -> Result<Subscription, String>
    where
        T: DeserializeOwned + 'static,
    {
        let source = EventSource::new(&self.url(path)).map_err(|e| format!("{:?}", e))?;

        let label = path.to_string();
        let on_message = Closure::<dyn FnMut(MessageEvent)>::new(move |event: MessageEvent| {
            let Some(data) = event.data().as_string() else {
                return;
            };
            match serde_json::from_str::<T>(&data) {
                Ok(value) => on_value.emit(value),
                Err(e) => gloo_console::error!(format!("bad frame from {}: {}", label, e)),
            }
        });
        source.set_onmessage(Some(on_message.as_ref().unchecked_ref()));

        let label = path.to_string();
        let on_error = Closure::<dyn FnMut(web_sys::Event)>::new(move |_: web_sys::Event| {
            gloo_console::warn!(format!("subscription {} interrupted, reconnecting", label));
        });
        source.set_onerror(Some(on_error.as_ref().unchecked_ref()));

        Ok(Subscription {
            source,
            _on_message: on_message,
            _on_error: on_error,
        })
    }

    pub fn remembered_location(&self) -> Option<String> {
        let storage = web_sys::window()?.local_storage().ok()??;
        storage.get_item(LOCATION_KEY).ok()?
    }

    pub fn remember_location(&self, code: &str) {
        let storage = web_sys::window().and_then(|w| w.local_storage().ok().flatten());
        if let Some(storage) = storage {
            let _ = storage.set_item(LOCATION_KEY, code);
        }
    }
}

/// Live read handle. Dropping it unsubscribes.
pub struct Subscription {
    source: EventSource,
    _on_message: Closure<dyn FnMut(MessageEvent)>,
    _on_error: Closure<dyn FnMut(web_sys::Event)>,
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.source.set_onmessage(None);
        self.source.set_onerror(None);
        self.source.close();
    }
}

async fn error_text(resp: Response) -> String {
    let status = resp.status();
    match resp.text().await {
        Ok(text) if !text.trim().is_empty() => text,
        _ => format!("request failed with status {}", status),
    }
}

/// Extracts `filename` from a `Content-Disposition: attachment` header.
fn attachment_filename(header: &str) -> Option<String> {
    header
        .split(';')
        .map(str::trim)
        .find_map(|part| part.strip_prefix("filename="))
        .map(|name| name.trim_matches('"').to_string())
        .filter(|name| !name.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filename_from_disposition() {
        assert_eq!(
            attachment_filename("attachment; filename=\"KPI_Report_2025-01-10.pdf\"").as_deref(),
            Some("KPI_Report_2025-01-10.pdf")
        );
        assert_eq!(attachment_filename("inline"), None);
    }
}
