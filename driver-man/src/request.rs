//! Outbound request configuration.
//!
//! A request either goes through a plain proxy or through a [`TlsAgent`],
//! never both. When an https URL is fetched via a proxy, the proxy moves onto
//! the agent so the tunnel and the certificate settings live in one place.

use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use reqwest::{Certificate, Client, Method, Proxy};
use tracing::{info, warn};
use url::Url;

use crate::error::{Error, Result};
use crate::settings::Settings;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProxyDescriptor {
    pub host: String,
    pub port: u16,
    pub protocol: String,
    /// Credentials from the userinfo part, sent as `Proxy-Authorization`.
    pub username: Option<String>,
    pub password: Option<String>,
}

impl ProxyDescriptor {
    pub fn parse(raw: &str) -> Result<ProxyDescriptor> {
        let invalid = |reason: &str| Error::InvalidUrl {
            url: raw.to_string(),
            reason: reason.to_string(),
        };
        let url = Url::parse(raw).map_err(|e| invalid(&e.to_string()))?;
        let host = url.host_str().ok_or_else(|| invalid("proxy has no host"))?;
        // Url drops a port equal to the scheme default, so look at what was written
        let port = if has_explicit_port(raw) {
            url.port_or_known_default().unwrap_or(80)
        } else {
            80
        };
        let username = Some(url.username())
            .filter(|user| !user.is_empty())
            .map(str::to_string);
        Ok(ProxyDescriptor {
            host: host.to_string(),
            port,
            protocol: url.scheme().to_string(),
            username,
            password: url.password().map(str::to_string),
        })
    }

    /// Proxy address without credentials.
    pub fn url(&self) -> String {
        format!("{}://{}:{}", self.protocol, self.host, self.port)
    }

    fn to_proxy<F>(&self, make: F) -> Result<Proxy>
    where
        F: FnOnce(String) -> reqwest::Result<Proxy>,
    {
        let url = self.url();
        let proxy = make(url.clone()).map_err(|e| Error::InvalidUrl {
            url,
            reason: e.to_string(),
        })?;
        Ok(match &self.username {
            Some(user) => proxy.basic_auth(user, self.password.as_deref().unwrap_or("")),
            None => proxy,
        })
    }
}

/// True when the authority of `raw` carries a `:port` after the host.
fn has_explicit_port(raw: &str) -> bool {
    let rest = raw.split_once("://").map_or(raw, |(_, rest)| rest);
    let authority = rest.split(['/', '?', '#']).next().unwrap_or("");
    let host_port = authority.rsplit_once('@').map_or(authority, |(_, hp)| hp);
    let after_host = match host_port.rfind(']') {
        Some(end) => &host_port[end + 1..],
        None => host_port,
    };
    after_host
        .split_once(':')
        .is_some_and(|(_, port)| !port.is_empty())
}

/// TLS transport for https requests, optionally tunnelled through a proxy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TlsAgent {
    /// PEM trust material added on top of the built-in roots.
    pub ca: Option<String>,
    pub reject_unauthorized: bool,
    pub proxy: Option<ProxyDescriptor>,
}

#[derive(Debug, Clone)]
pub struct RequestConfig {
    pub url: Url,
    pub method: Method,
    pub proxy: Option<ProxyDescriptor>,
    pub agent: Option<TlsAgent>,
    pub headers: HeaderMap,
}

impl RequestConfig {
    pub fn build(target_url: &str, settings: &Settings) -> Result<RequestConfig> {
        let url = Url::parse(target_url).map_err(|e| Error::InvalidUrl {
            url: target_url.to_string(),
            reason: e.to_string(),
        })?;
        let is_https = url.scheme() == "https";

        let proxy_url = if is_https {
            settings.https_proxy.as_deref()
        } else {
            settings.proxy.as_deref().or(settings.http_proxy.as_deref())
        };
        let mut proxy = proxy_url.map(ProxyDescriptor::parse).transpose()?;

        let mut agent = None;
        if is_https {
            let ca = trust_material(settings);
            let tunnel = proxy.take();
            if tunnel.is_some() {
                info!("Using workaround for https-url combined with a proxy.");
            }
            agent = Some(TlsAgent {
                ca,
                reject_unauthorized: settings.strict_ssl,
                proxy: tunnel,
            });
        }

        let mut headers = HeaderMap::new();
        if let Some(agent_string) = &settings.user_agent {
            match HeaderValue::from_str(agent_string) {
                Ok(value) => {
                    headers.insert(USER_AGENT, value);
                }
                Err(e) => warn!("ignoring invalid user agent {:?}: {}", agent_string, e),
            }
        }

        Ok(RequestConfig {
            url,
            method: Method::GET,
            proxy,
            agent,
            headers,
        })
    }

    /// Builds a client that applies this configuration and nothing from the
    /// ambient proxy environment.
    pub fn client(&self) -> Result<Client> {
        let mut builder = Client::builder()
            .no_proxy()
            .default_headers(self.headers.clone());

        if let Some(proxy) = &self.proxy {
            builder = builder.proxy(proxy.to_proxy(Proxy::all)?);
        }
        if let Some(agent) = &self.agent {
            if let Some(tunnel) = &agent.proxy {
                builder = builder.proxy(tunnel.to_proxy(Proxy::https)?);
            }
            if let Some(ca) = &agent.ca {
                let certs = Certificate::from_pem_bundle(ca.as_bytes())
                    .map_err(|e| Error::Tls(e.to_string()))?;
                for cert in certs {
                    builder = builder.add_root_certificate(cert);
                }
            }
            builder = builder.danger_accept_invalid_certs(!agent.reject_unauthorized);
        }

        builder
            .build()
            .map_err(|e| Error::http(self.url.as_str(), e))
    }

    pub(crate) fn request(&self, client: &Client) -> reqwest::RequestBuilder {
        client.request(self.method.clone(), self.url.clone())
    }
}

/// Inline CA wins over the cafile. An unreadable cafile falls back to the
/// default trust store.
fn trust_material(settings: &Settings) -> Option<String> {
    if let Some(ca) = &settings.ca {
        info!("Using npmconf ca.");
        return Some(ca.clone());
    }
    let cafile = settings.cafile.as_ref()?;
    match std::fs::read_to_string(cafile) {
        Ok(ca) => {
            info!("Using npmconf cafile.");
            Some(ca)
        }
        Err(e) => {
            warn!("Could not read cafile {}: {}", cafile.display(), e);
            None
        }
    }
}
