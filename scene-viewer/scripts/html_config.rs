use std::env;
use std::fs;
use std::io;
use std::path::PathBuf;

const BUNDLE_NAME: &str = "scene-viewer";

// Trunk emits absolute asset urls; the viewer is served from a sub path
// inside the host page's iframe, so rewrite them relative.
fn main() -> io::Result<()> {
    let staging_dir = env::var("TRUNK_STAGING_DIR")
        .map_err(|e| io::Error::new(io::ErrorKind::NotFound, e))?;
    let staged_html_path = PathBuf::from(staging_dir).join("index.html");

    let html = fs::read_to_string(&staged_html_path)?;
    let html = [".js", "_bg.wasm"].iter().fold(html, |html, suffix| {
        html.replace(
            &format!("/{BUNDLE_NAME}{suffix}"),
            &format!("./{BUNDLE_NAME}{suffix}"),
        )
    });

    fs::write(staged_html_path, html)
}
