//! Open a URL in the desktop browser

use std::process::{Command, Stdio};

type Launcher = (&'static str, &'static [&'static str]);

/// Launcher program and leading arguments for this platform
fn launcher() -> Option<Launcher> {
    const OPEN: Launcher = ("open", &[]);
    const RUNDLL: Launcher = ("rundll32", &["url.dll,FileProtocolHandler"]);
    const XDG_OPEN: Launcher = ("xdg-open", &[]);

    if cfg!(target_os = "macos") {
        Some(OPEN)
    } else if cfg!(target_os = "windows") {
        Some(RUNDLL)
    } else if cfg!(unix) {
        Some(XDG_OPEN)
    } else {
        None
    }
}

/// Spawn the platform launcher for `url` without waiting for it
pub fn open_url(url: &str) -> Result<(), String> {
    let (program, args) = launcher().ok_or_else(|| "Unsupported operating system".to_string())?;

    Command::new(program)
        .args(args)
        .arg(url)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .map(|_| ())
        .map_err(|e| e.to_string())
}

/// `http://localhost:<port>`
pub fn local_url(port: u16) -> String {
    format!("http://localhost:{}", port)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_local_url() {
        assert_eq!(local_url(8080), "http://localhost:8080");
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn test_linux_uses_xdg_open() {
        assert_eq!(launcher().map(|(p, _)| p), Some("xdg-open"));
    }
}
