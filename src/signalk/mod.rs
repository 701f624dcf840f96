// src/signalk/mod.rs
//! Signal K server access: the delta stream and the REST data model.

mod api;
mod stream;

pub use api::fetch_vessel_name;
pub use stream::{run_stream, stream_url, subscription_message, StreamSettings};

/// Base URL with a websocket scheme in place of http(s)
fn websocket_base(server_url: &str) -> String {
    let base = server_url.trim_end_matches('/');
    if let Some(rest) = base.strip_prefix("https://") {
        format!("wss://{}", rest)
    } else if let Some(rest) = base.strip_prefix("http://") {
        format!("ws://{}", rest)
    } else if base.starts_with("ws://") || base.starts_with("wss://") {
        base.to_string()
    } else {
        format!("ws://{}", base)
    }
}

/// Base URL with an http scheme in place of ws(s)
fn http_base(server_url: &str) -> String {
    let base = server_url.trim_end_matches('/');
    if let Some(rest) = base.strip_prefix("wss://") {
        format!("https://{}", rest)
    } else if let Some(rest) = base.strip_prefix("ws://") {
        format!("http://{}", rest)
    } else if base.starts_with("http://") || base.starts_with("https://") {
        base.to_string()
    } else {
        format!("http://{}", base)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn converts_between_http_and_ws_schemes() {
        assert_eq!(websocket_base("http://localhost:3000"), "ws://localhost:3000");
        assert_eq!(websocket_base("https://boat.local/"), "wss://boat.local");
        assert_eq!(websocket_base("boat.local:3000"), "ws://boat.local:3000");
        assert_eq!(http_base("ws://localhost:3000"), "http://localhost:3000");
        assert_eq!(http_base("wss://boat.local"), "https://boat.local");
        assert_eq!(http_base("http://localhost:3000/"), "http://localhost:3000");
    }
}
