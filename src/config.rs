use std::path::PathBuf;

/// Which transport the process serves on. Resolved once at startup from
/// `MCP_TRANSPORT`; stdio is the default.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transport {
    Stdio,
    Http,
}

impl Transport {
    /// Case-insensitive, whitespace-tolerant parse. `http` and
    /// `streamable-http` select HTTP; everything else (including unset)
    /// selects stdio.
    pub fn parse(value: Option<&str>) -> Self {
        match value.map(|v| v.trim().to_ascii_lowercase()).as_deref() {
            Some("http") | Some("streamable-http") => Transport::Http,
            _ => Transport::Stdio,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Transport::Stdio => "stdio",
            Transport::Http => "http",
        }
    }
}

/// Runtime settings, all sourced from the environment.
#[derive(Debug, Clone)]
pub struct Settings {
    pub transport: Transport,
    pub host: String,
    pub port: u16,
    pub notes_path: PathBuf,
}

impl Settings {
    pub fn from_env() -> Self {
        let transport = Transport::parse(std::env::var("MCP_TRANSPORT").ok().as_deref());
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port = parse_port(std::env::var("PORT").ok().as_deref());
        let notes_path = std::env::var("NOTES_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("./notes.json"));
        Settings {
            transport,
            host,
            port,
            notes_path,
        }
    }

    /// `host:port` string for the HTTP listener.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_port(value: Option<&str>) -> u16 {
    match value {
        None => 3000,
        Some(raw) => match raw.trim().parse::<u16>() {
            Ok(p) => p,
            Err(_) => {
                tracing::warn!("PORT={:?} is not a valid port; using 3000", raw);
                3000
            }
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transport_defaults_to_stdio() {
        assert_eq!(Transport::parse(None), Transport::Stdio);
        assert_eq!(Transport::parse(Some("")), Transport::Stdio);
        assert_eq!(Transport::parse(Some("sse")), Transport::Stdio);
    }

    #[test]
    fn transport_accepts_http_spellings() {
        assert_eq!(Transport::parse(Some("http")), Transport::Http);
        assert_eq!(Transport::parse(Some(" HTTP ")), Transport::Http);
        assert_eq!(Transport::parse(Some("streamable-http")), Transport::Http);
    }

    #[test]
    fn port_falls_back_on_garbage() {
        assert_eq!(parse_port(None), 3000);
        assert_eq!(parse_port(Some("8080")), 8080);
        assert_eq!(parse_port(Some("not-a-port")), 3000);
        assert_eq!(parse_port(Some("70000")), 3000);
    }
}
