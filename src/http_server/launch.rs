//! Startup conveniences: LAN address discovery and opening a browser.

use std::net::{IpAddr, Ipv4Addr, UdpSocket};
use std::time::Duration;

use tokio::process::Command;

use crate::observability::Logger;

/// Delay before the browser is opened, so the listener is up first
const BROWSER_DELAY: Duration = Duration::from_secs(1);

/// Best guess at this machine's LAN address.
///
/// Connecting a UDP socket sends nothing; it only makes the OS pick the
/// outbound interface. Falls back to loopback.
pub fn local_ip() -> IpAddr {
    let discover = || -> std::io::Result<IpAddr> {
        let socket = UdpSocket::bind("0.0.0.0:0")?;
        socket.connect("8.8.8.8:80")?;
        Ok(socket.local_addr()?.ip())
    };
    discover().unwrap_or(IpAddr::V4(Ipv4Addr::LOCALHOST))
}

fn browser_command(url: &str) -> Command {
    #[cfg(target_os = "macos")]
    let command = {
        let mut c = Command::new("open");
        c.arg(url);
        c
    };
    #[cfg(target_os = "windows")]
    let command = {
        let mut c = Command::new("cmd");
        c.args(["/C", "start", "", url]);
        c
    };
    #[cfg(not(any(target_os = "macos", target_os = "windows")))]
    let command = {
        let mut c = Command::new("xdg-open");
        c.arg(url);
        c
    };
    command
}

/// Open `url` in the default browser after a short delay.
///
/// Must be called inside a tokio runtime. Failure is logged, never fatal.
pub fn open_browser_later(url: String) {
    tokio::spawn(async move {
        tokio::time::sleep(BROWSER_DELAY).await;
        if let Err(e) = browser_command(&url).spawn() {
            Logger::warn(
                "BROWSER_OPEN_FAILED",
                &[("reason", &e.to_string()), ("url", &url)],
            );
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_local_ip_never_unspecified() {
        assert!(!local_ip().is_unspecified());
    }
}
