//! Command-line configuration.
use argh::FromArgs;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};

/// Announce this host on every network interface with gratuitous ARP, then
/// report what was announced to the first HTTP client that asks.
#[derive(FromArgs, Debug, PartialEq, Eq)]
pub struct Args {
    /// port of the one-shot notification server
    #[argh(option, default = "8081")]
    pub port: u16,

    /// address the notification server listens on
    #[argh(option, default = "IpAddr::V4(Ipv4Addr::UNSPECIFIED)")]
    pub listen: IpAddr,

    /// exit right after announcing, without serving a notification
    #[argh(switch)]
    pub no_notify: bool,
}

impl Args {
    #[must_use]
    pub fn notify_addr(&self) -> SocketAddr {
        SocketAddr::new(self.listen, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::Args;
    use argh::FromArgs;
    use std::net::SocketAddr;

    fn parse(args: &[&str]) -> Result<Args, argh::EarlyExit> {
        Args::from_args(&["garp"], args)
    }

    #[test]
    fn defaults_listen_everywhere_on_8081() -> Result<(), Box<dyn std::error::Error>> {
        let args = parse(&[]).map_err(|exit| exit.output)?;
        assert!(!args.no_notify);
        assert_eq!(args.notify_addr(), "0.0.0.0:8081".parse::<SocketAddr>()?);
        Ok(())
    }

    #[test]
    fn flags_override_defaults() -> Result<(), Box<dyn std::error::Error>> {
        let args = parse(&["--port", "9000", "--listen", "127.0.0.1", "--no-notify"])
            .map_err(|exit| exit.output)?;
        assert!(args.no_notify);
        assert_eq!(args.notify_addr(), "127.0.0.1:9000".parse::<SocketAddr>()?);
        Ok(())
    }

    #[test]
    fn rejects_invalid_port() {
        assert!(parse(&["--port", "70000"]).is_err());
    }
}
