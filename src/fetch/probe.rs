// src/fetch/probe.rs
use reqwest::blocking::Client;

use crate::config::consts::{BODY_PREVIEW_CHARS, HOME_REFERER, USER_AGENT};
use crate::core::extract::{count_from_json, count_from_page};
use crate::core::net::{CertPolicy, http_get};
use crate::error::FetchError;

/// Structured endpoints, relative to the API base. `{uid}` is substituted.
pub const API_PATHS: [&str; 3] = [
    "/x/relation/stat?vmid={uid}",
    "/x/space/acc/info?mid={uid}&jsonp=jsonp",
    "/x/space/upstat?mid={uid}&jsonp=jsonp",
];

const ACCEPT_JSON: &str = "application/json, text/plain, */*";
const ACCEPT_HTML: &str = "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8";

/// One attempt at a follower count for `uid`.
pub trait Probe {
    /// Short human label for log lines.
    fn label(&self) -> String;

    /// Whether the fetcher should pause before running this probe.
    fn paced(&self) -> bool {
        false
    }

    fn probe(&self, uid: u64) -> Result<u64, FetchError>;
}

/// Request header sets rotated across the API endpoints.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HeaderProfile {
    /// Browser UA, JSON accept, referer = the account's profile page
    JsonWithProfileReferer,
    /// Browser UA, HTML accept, referer = site home
    HtmlWithHomeReferer,
    /// Browser UA only
    Bare,
}

impl HeaderProfile {
    pub const ALL: [HeaderProfile; 3] = [
        HeaderProfile::JsonWithProfileReferer,
        HeaderProfile::HtmlWithHomeReferer,
        HeaderProfile::Bare,
    ];

    pub fn headers(&self, uid: u64, space_base: &str) -> Vec<(&'static str, String)> {
        let mut h = vec![("User-Agent", s!(USER_AGENT))];
        match self {
            HeaderProfile::JsonWithProfileReferer => {
                h.push(("Accept", s!(ACCEPT_JSON)));
                h.push(("Referer", format!("{space_base}/{uid}")));
            }
            HeaderProfile::HtmlWithHomeReferer => {
                h.push(("Accept", s!(ACCEPT_HTML)));
                h.push(("Referer", s!(HOME_REFERER)));
            }
            HeaderProfile::Bare => {}
        }
        h
    }
}

/// GET one structured endpoint with one header profile and read the JSON.
pub struct ApiProbe {
    client: Client,
    api_base: String,
    space_base: String,
    endpoint: usize,
    profile: HeaderProfile,
    profile_no: usize,
}

impl ApiProbe {
    pub const CERTS: CertPolicy = CertPolicy::AcceptInvalid;

    pub fn new(
        client: Client,
        api_base: &str,
        space_base: &str,
        endpoint: usize,
        profile_no: usize,
    ) -> Self {
        Self {
            client,
            api_base: s!(api_base.trim_end_matches('/')),
            space_base: s!(space_base.trim_end_matches('/')),
            endpoint: endpoint.min(API_PATHS.len() - 1),
            profile: HeaderProfile::ALL[profile_no.min(HeaderProfile::ALL.len() - 1)],
            profile_no,
        }
    }

    pub fn url(&self, uid: u64) -> String {
        join!(self.api_base, API_PATHS[self.endpoint].replace("{uid}", &uid.to_string()))
    }
}

impl Probe for ApiProbe {
    fn label(&self) -> String {
        format!("endpoint {} / profile {}", self.endpoint + 1, self.profile_no + 1)
    }

    fn paced(&self) -> bool {
        true
    }

    fn probe(&self, uid: u64) -> Result<u64, FetchError> {
        let headers = self.profile.headers(uid, &self.space_base);
        let page = http_get(&self.client, &self.url(uid), &headers)?;
        logf!(uid = uid; "{}: status {}", self.label(), page.status);

        match page.status {
            200 => {}
            412 => {
                logw!(uid = uid; "{}: rejected with 412, trying the next combination", self.label());
                return Err(FetchError::Status(412));
            }
            other => return Err(FetchError::Status(other)),
        }

        match count_from_json(&page.body) {
            Ok((n, hit)) => {
                logf!(uid = uid; "{}: follower count {} ({:?})", self.label(), n, hit);
                Ok(n)
            }
            Err(FetchError::NotJson) => {
                logw!(uid = uid; "{}: body is not JSON, starts with: {}", self.label(), page.preview(BODY_PREVIEW_CHARS));
                Err(FetchError::NotJson)
            }
            Err(e) => Err(e),
        }
    }
}

/// Fallback: scrape the public profile page.
pub struct PageProbe {
    client: Client,
    space_base: String,
}

impl PageProbe {
    pub const CERTS: CertPolicy = CertPolicy::Verify;

    pub fn new(client: Client, space_base: &str) -> Self {
        Self { client, space_base: s!(space_base.trim_end_matches('/')) }
    }

    pub fn url(&self, uid: u64) -> String {
        format!("{}/{}", self.space_base, uid)
    }
}

impl Probe for PageProbe {
    fn label(&self) -> String {
        s!("profile page")
    }

    fn probe(&self, uid: u64) -> Result<u64, FetchError> {
        logf!(uid = uid; "falling back to the profile page");
        let page = http_get(&self.client, &self.url(uid), &[("User-Agent", s!(USER_AGENT))])?;
        if !page.is_ok() {
            return Err(FetchError::Status(page.status));
        }
        match count_from_page(&page.body) {
            Some((pattern, n)) => {
                logf!(uid = uid; "profile page: pattern {} matched, follower count {}", pattern + 1, n);
                Ok(n)
            }
            None => Err(FetchError::NoCount),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> Client {
        Client::new()
    }

    #[test]
    fn api_urls_substitute_uid() {
        let p = ApiProbe::new(client(), "https://api.example/", "https://space.example", 1, 0);
        assert_eq!(p.url(42), "https://api.example/x/space/acc/info?mid=42&jsonp=jsonp");
        assert_eq!(p.label(), "endpoint 2 / profile 1");
        assert!(p.paced());
    }

    #[test]
    fn page_url_and_pacing() {
        let p = PageProbe::new(client(), "https://space.example/");
        assert_eq!(p.url(7), "https://space.example/7");
        assert!(!p.paced());
    }

    #[test]
    fn only_the_api_skips_certificate_checks() {
        assert_eq!(ApiProbe::CERTS, CertPolicy::AcceptInvalid);
        assert_eq!(PageProbe::CERTS, CertPolicy::Verify);
    }

    #[test]
    fn profile_headers() {
        let h = HeaderProfile::JsonWithProfileReferer.headers(5, "https://space.example");
        assert!(h.contains(&("Referer", s!("https://space.example/5"))));
        assert!(h.iter().any(|(k, v)| *k == "Accept" && v.starts_with("application/json")));
        assert_eq!(HeaderProfile::Bare.headers(5, "x").len(), 1);
    }
}
