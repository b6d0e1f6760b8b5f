//! Device geolocation.
//!
//! Bridges the browser's `watchPosition` callbacks into egui's synchronous
//! update loop over a channel, the same way shelter loading does. Native
//! builds have no location sensor and report that as an error on start.

use eframe::egui;
use geo_types::Point;
use std::sync::mpsc::{channel, Receiver, Sender};

/// A single position fix from the sensor.
#[derive(Debug, Clone, PartialEq)]
pub struct LocationFix {
    /// (longitude, latitude) in degrees
    pub position: Point<f64>,
    /// Accuracy radius in metres, when reported
    pub accuracy_m: Option<f64>,
    /// Milliseconds since the Unix epoch
    pub timestamp_ms: f64,
}

/// Why the sensor could not deliver a fix.
///
/// The first three mirror the `GeolocationPositionError` codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocationErrorKind {
    PermissionDenied,
    PositionUnavailable,
    Timeout,
    /// No location sensor on this platform
    Unsupported,
}

impl LocationErrorKind {
    #[cfg(any(target_arch = "wasm32", test))]
    pub fn from_code(code: u16) -> Self {
        match code {
            1 => Self::PermissionDenied,
            3 => Self::Timeout,
            _ => Self::PositionUnavailable,
        }
    }

    /// True if the watch cannot recover and tracking has to stop.
    ///
    /// Unavailable positions and timeouts are transient: the browser keeps
    /// the watch alive and may deliver further fixes.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::PermissionDenied | Self::Unsupported)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LocationError {
    pub kind: LocationErrorKind,
    pub message: String,
}

impl std::fmt::Display for LocationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}

/// Messages delivered by the location sensor.
#[derive(Debug, Clone, PartialEq)]
pub enum GeolocationEvent {
    Fix(LocationFix),
    Error(LocationError),
}

/// Channel-based watcher for the device position.
pub struct GeolocationChannel {
    sender: Sender<GeolocationEvent>,
    receiver: Receiver<GeolocationEvent>,
    #[cfg(target_arch = "wasm32")]
    watch: Option<web::Watch>,
    watching: bool,
}

impl Default for GeolocationChannel {
    fn default() -> Self {
        Self::new()
    }
}

impl GeolocationChannel {
    pub fn new() -> Self {
        let (sender, receiver) = channel();
        Self {
            sender,
            receiver,
            #[cfg(target_arch = "wasm32")]
            watch: None,
            watching: false,
        }
    }

    /// True while a watch is registered with the sensor.
    pub fn is_watching(&self) -> bool {
        self.watching
    }

    /// Starts watching the device position with high accuracy.
    pub fn start(&mut self, ctx: egui::Context) {
        if self.watching {
            return;
        }
        self.watching = true;
        log::info!("Starting location watch");

        #[cfg(target_arch = "wasm32")]
        {
            match web::Watch::start(self.sender.clone(), ctx) {
                Ok(watch) => self.watch = Some(watch),
                Err(message) => {
                    self.watching = false;
                    let _ = self.sender.send(GeolocationEvent::Error(LocationError {
                        kind: LocationErrorKind::Unsupported,
                        message,
                    }));
                }
            }
        }

        #[cfg(not(target_arch = "wasm32"))]
        {
            self.watching = false;
            let _ = self.sender.send(GeolocationEvent::Error(LocationError {
                kind: LocationErrorKind::Unsupported,
                message: "geolocation is not available on this platform".to_string(),
            }));
            ctx.request_repaint();
        }
    }

    /// Stops watching. Events already queued are discarded.
    pub fn stop(&mut self) {
        if !self.watching {
            return;
        }
        log::info!("Stopping location watch");
        self.watching = false;

        #[cfg(target_arch = "wasm32")]
        {
            self.watch = None;
        }

        while self.receiver.try_recv().is_ok() {}
    }

    /// Non-blocking check for the next sensor event.
    pub fn try_recv(&mut self) -> Option<GeolocationEvent> {
        self.receiver.try_recv().ok()
    }
}

#[cfg(target_arch = "wasm32")]
mod web {
    use super::{GeolocationEvent, LocationError, LocationErrorKind, LocationFix};
    use eframe::egui;
    use geo_types::Point;
    use std::sync::mpsc::Sender;
    use wasm_bindgen::closure::Closure;
    use wasm_bindgen::{JsCast, JsValue};

    /// An active `watchPosition` registration. Dropping it clears the watch.
    pub(super) struct Watch {
        geolocation: web_sys::Geolocation,
        id: i32,
        _on_fix: Closure<dyn FnMut(JsValue)>,
        _on_error: Closure<dyn FnMut(JsValue)>,
    }

    impl Watch {
        pub(super) fn start(
            sender: Sender<GeolocationEvent>,
            ctx: egui::Context,
        ) -> Result<Self, String> {
            let window = web_sys::window().ok_or("no window")?;
            let geolocation = window
                .navigator()
                .geolocation()
                .map_err(|e| format!("geolocation unavailable: {:?}", e))?;

            let fix_sender = sender.clone();
            let fix_ctx = ctx.clone();
            let on_fix = Closure::<dyn FnMut(JsValue)>::new(move |value: JsValue| {
                let position: web_sys::Position = value.unchecked_into();
                let coords = position.coords();
                let fix = LocationFix {
                    position: Point::new(coords.longitude(), coords.latitude()),
                    accuracy_m: Some(coords.accuracy()).filter(|a| a.is_finite()),
                    timestamp_ms: position.timestamp(),
                };
                let _ = fix_sender.send(GeolocationEvent::Fix(fix));
                fix_ctx.request_repaint();
            });

            let on_error = Closure::<dyn FnMut(JsValue)>::new(move |value: JsValue| {
                let error: web_sys::PositionError = value.unchecked_into();
                let _ = sender.send(GeolocationEvent::Error(LocationError {
                    kind: LocationErrorKind::from_code(error.code()),
                    message: format!("{} (code {})", error.message(), error.code()),
                }));
                ctx.request_repaint();
            });

            let options = web_sys::PositionOptions::new();
            options.set_enable_high_accuracy(true);

            let id = geolocation
                .watch_position_with_error_callback_and_options(
                    on_fix.as_ref().unchecked_ref(),
                    Some(on_error.as_ref().unchecked_ref()),
                    &options,
                )
                .map_err(|e| format!("watchPosition failed: {:?}", e))?;

            Ok(Self {
                geolocation,
                id,
                _on_fix: on_fix,
                _on_error: on_error,
            })
        }
    }

    impl Drop for Watch {
        fn drop(&mut self) {
            self.geolocation.clear_watch(self.id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_native_start_reports_unavailable() {
        let mut channel = GeolocationChannel::new();
        channel.start(egui::Context::default());
        assert!(!channel.is_watching());
        match channel.try_recv() {
            Some(GeolocationEvent::Error(error)) => {
                assert_eq!(error.kind, LocationErrorKind::Unsupported);
                assert!(error.kind.is_fatal());
            }
            other => panic!("expected an error event, got {:?}", other),
        }
        assert_eq!(channel.try_recv(), None);
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(LocationErrorKind::from_code(1), LocationErrorKind::PermissionDenied);
        assert_eq!(LocationErrorKind::from_code(2), LocationErrorKind::PositionUnavailable);
        assert_eq!(LocationErrorKind::from_code(3), LocationErrorKind::Timeout);
        assert!(LocationErrorKind::PermissionDenied.is_fatal());
        assert!(!LocationErrorKind::PositionUnavailable.is_fatal());
        assert!(!LocationErrorKind::Timeout.is_fatal());
    }
}
