// Accelink - Tempo Poller Task
//
// Polls the collector's `/tempo` endpoint and publishes the latest value for
// sibling subsystems (LED pulse rate). The last good value is kept when a
// poll fails.

use std::sync::atomic::{AtomicBool, AtomicI32, Ordering};
use std::thread;
use std::time::Duration;

use crate::uplink::{TelemetryUploader, Transport};

/// Fetch the tempo once and store it. Returns `true` on a fresh value.
pub fn poll_once<T: Transport>(uploader: &mut TelemetryUploader<T>, path: &str, tempo: &AtomicI32) -> bool {
    match uploader.fetch_scalar(path) {
        Ok(value) => {
            let previous = tempo.swap(value, Ordering::Relaxed);
            if previous != value {
                log::info!("Tempo changed: {} -> {}", previous, value);
            }
            true
        }
        Err(e) => {
            log::warn!("Tempo poll failed: {}", e);
            false
        }
    }
}

pub fn tempo_task<T: Transport>(
    mut uploader: TelemetryUploader<T>,
    path: String,
    period: Duration,
    tempo: &AtomicI32,
    stop: &AtomicBool,
) {
    log::info!("Tempo task started");

    while !stop.load(Ordering::Relaxed) {
        poll_once(&mut uploader, &path, tempo);
        thread::sleep(period);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::NetworkError;
    use crate::uplink::Response;

    struct Scripted(Vec<Result<Response, NetworkError>>);

    impl Transport for Scripted {
        fn post(&mut self, _url: &str, _headers: &[(&str, &str)], _body: &[u8]) -> Result<u16, NetworkError> {
            Err(NetworkError::Other(-1))
        }

        fn get(&mut self, _url: &str) -> Result<Response, NetworkError> {
            self.0.remove(0)
        }
    }

    fn ok(body: &str) -> Result<Response, NetworkError> {
        Ok(Response { status: 200, body: body.as_bytes().to_vec() })
    }

    #[test]
    fn keeps_last_good_value_on_failure() {
        let transport = Scripted(vec![ok("70"), Err(NetworkError::Timeout), ok("abc"), ok("96")]);
        let mut uploader = TelemetryUploader::new(transport, "http://c", "/acc_data");
        let tempo = AtomicI32::new(0);

        assert!(poll_once(&mut uploader, "/tempo", &tempo));
        assert_eq!(tempo.load(Ordering::Relaxed), 70);

        assert!(!poll_once(&mut uploader, "/tempo", &tempo));
        assert!(!poll_once(&mut uploader, "/tempo", &tempo));
        assert_eq!(tempo.load(Ordering::Relaxed), 70);

        assert!(poll_once(&mut uploader, "/tempo", &tempo));
        assert_eq!(tempo.load(Ordering::Relaxed), 96);
    }

    #[test]
    fn task_returns_once_stopped() {
        let uploader = TelemetryUploader::new(Scripted(Vec::new()), "http://c", "/acc_data");
        let tempo = AtomicI32::new(5);
        let stop = AtomicBool::new(true);

        tempo_task(uploader, "/tempo".into(), Duration::ZERO, &tempo, &stop);
        assert_eq!(tempo.load(Ordering::Relaxed), 5);
    }
}
