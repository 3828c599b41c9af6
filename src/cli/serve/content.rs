//! Hot reload client injection.

/// Path the injected script tag loads the client from.
pub const HOTRELOAD_PATH: &str = "/__kiln/hotreload.js";

/// Inject the client when the response is HTML and the ws server is up.
pub fn maybe_inject_hotreload(body: Vec<u8>, content_type: &str, ws_port: Option<u16>) -> Vec<u8> {
    match (content_type.starts_with("text/html"), ws_port) {
        (true, Some(_)) => inject_hotreload_script(&body),
        _ => body,
    }
}

/// Insert the script tag before the last `</body>`, or append it.
fn inject_hotreload_script(content: &[u8]) -> Vec<u8> {
    let script = format!(r#"<script src="{HOTRELOAD_PATH}"></script>"#);
    let script_bytes = script.as_bytes();

    const PATTERN: &[u8] = b"</body>";

    let pos = content
        .windows(PATTERN.len())
        .rposition(|w| w.eq_ignore_ascii_case(PATTERN))
        .unwrap_or(content.len());

    let mut result = Vec::with_capacity(content.len() + script_bytes.len());
    result.extend_from_slice(&content[..pos]);
    result.extend_from_slice(script_bytes);
    result.extend_from_slice(&content[pos..]);
    result
}
