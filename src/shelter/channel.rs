//! Async shelter data loading.
//!
//! Uses channel-based communication to bridge the async fetch (or file
//! read on native) with egui's synchronous update loop.

use super::loader::{parse_shelters, ParsedShelters, ShelterLoadError};
use super::set::ShelterSet;
use eframe::egui;
use std::sync::mpsc::{channel, Receiver, Sender};

/// Outcome of a shelter load.
pub enum ShelterLoadResult {
    Success { shelters: ShelterSet, skipped: usize },
    Error(ShelterLoadError),
}

/// Channel-based loader for the shelter data set.
pub struct ShelterLoadChannel {
    sender: Sender<ShelterLoadResult>,
    receiver: Receiver<ShelterLoadResult>,
    loading: bool,
}

impl Default for ShelterLoadChannel {
    fn default() -> Self {
        Self::new()
    }
}

impl ShelterLoadChannel {
    pub fn new() -> Self {
        let (sender, receiver) = channel();
        Self {
            sender,
            receiver,
            loading: false,
        }
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Starts loading shelters from `location`.
    ///
    /// On WASM `location` is a URL fetched relative to the page.
    /// On native it is a path on the local file system.
    pub fn load(&mut self, ctx: egui::Context, location: String) {
        let sender = self.sender.clone();
        self.loading = true;
        log::info!("Loading shelter data from {}", location);

        #[cfg(target_arch = "wasm32")]
        {
            wasm_bindgen_futures::spawn_local(async move {
                let result = fetch_text(&location).await.and_then(|text| parse_shelters(&text));
                let _ = sender.send(into_result(result));
                ctx.request_repaint();
            });
        }

        #[cfg(not(target_arch = "wasm32"))]
        {
            std::thread::spawn(move || {
                let result = std::fs::read_to_string(&location)
                    .map_err(|source| ShelterLoadError::Io {
                        path: location.clone(),
                        source,
                    })
                    .and_then(|text| parse_shelters(&text));
                let _ = sender.send(into_result(result));
                ctx.request_repaint();
            });
        }
    }

    /// Non-blocking check for a completed load.
    pub fn try_recv(&mut self) -> Option<ShelterLoadResult> {
        let result = self.receiver.try_recv().ok();
        if result.is_some() {
            self.loading = false;
        }
        result
    }
}

fn into_result(result: Result<ParsedShelters, ShelterLoadError>) -> ShelterLoadResult {
    match result {
        Ok(parsed) => ShelterLoadResult::Success {
            shelters: ShelterSet::new(parsed.shelters),
            skipped: parsed.skipped,
        },
        Err(e) => ShelterLoadResult::Error(e),
    }
}

#[cfg(target_arch = "wasm32")]
async fn fetch_text(url: &str) -> Result<String, ShelterLoadError> {
    use wasm_bindgen::JsCast;
    use wasm_bindgen_futures::JsFuture;

    let fetch_error = |message: String| ShelterLoadError::Fetch {
        url: url.to_string(),
        message,
    };

    let opts = web_sys::RequestInit::new();
    opts.set_method("GET");
    opts.set_mode(web_sys::RequestMode::SameOrigin);

    let request = web_sys::Request::new_with_str_and_init(url, &opts)
        .map_err(|e| fetch_error(format!("{:?}", e)))?;
    let window = web_sys::window().ok_or_else(|| fetch_error("no window".to_string()))?;

    let response = JsFuture::from(window.fetch_with_request(&request))
        .await
        .map_err(|e| fetch_error(format!("{:?}", e)))?;
    let response: web_sys::Response = response
        .dyn_into()
        .map_err(|e| fetch_error(format!("{:?}", e)))?;

    if !response.ok() {
        return Err(fetch_error(format!("HTTP {}", response.status())));
    }

    let text = response.text().map_err(|e| fetch_error(format!("{:?}", e)))?;
    let text = JsFuture::from(text)
        .await
        .map_err(|e| fetch_error(format!("{:?}", e)))?;
    text.as_string()
        .ok_or_else(|| fetch_error("response body is not text".to_string()))
}
