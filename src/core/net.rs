// src/core/net.rs

// Blocking GET with per-request headers. The API client skips certificate
// verification; the profile-page client verifies.

use std::time::Duration;

use reqwest::blocking::Client;

use crate::error::FetchError;

/// Status + body of one GET, whatever the status.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Page {
    pub status: u16,
    pub body: String,
}

impl Page {
    pub fn is_ok(&self) -> bool {
        self.status == 200
    }

    /// First `n` characters of the body, for log lines.
    pub fn preview(&self, n: usize) -> String {
        self.body.chars().take(n).collect()
    }
}

/// How a client treats the server certificate chain.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CertPolicy {
    Verify,
    AcceptInvalid,
}

pub fn build_client(timeout: Duration, certs: CertPolicy) -> Result<Client, reqwest::Error> {
    Client::builder()
        .timeout(timeout)
        .danger_accept_invalid_certs(certs == CertPolicy::AcceptInvalid)
        .build()
}

pub fn http_get(client: &Client, url: &str, headers: &[(&str, String)]) -> Result<Page, FetchError> {
    let mut req = client.get(url);
    for (name, value) in headers {
        req = req.header(*name, value.as_str());
    }
    let resp = req.send()?;
    let status = resp.status().as_u16();
    let body = resp.text()?;
    Ok(Page { status, body })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preview_counts_chars_not_bytes() {
        let p = Page { status: 200, body: s!("粉丝数123") };
        assert_eq!(p.preview(2), "粉丝");
        assert!(p.is_ok());
        assert!(!Page { status: 412, body: s!() }.is_ok());
    }

    #[test]
    fn both_cert_policies_build() {
        for certs in [CertPolicy::Verify, CertPolicy::AcceptInvalid] {
            assert!(build_client(Duration::from_secs(1), certs).is_ok());
        }
    }
}
