// tests/fetch_fallback.rs
mod common;

use common::{MockServer, follower_json, is_api};
use fan_tracker::error::FetchError;
use fan_tracker::fetch::Fetcher;

#[test]
fn all_412_then_page_miss_names_the_uid() {
    let server = MockServer::start(|path| {
        if is_api(path) { (412, String::new()) } else { (200, String::from("<html>nothing here</html>")) }
    });
    let fetcher = Fetcher::new(&server.fetch_options()).unwrap();

    let err = fetcher.fetch(4242).unwrap_err();
    assert!(matches!(err, FetchError::Exhausted { uid: 4242, attempts: 10 }));
    assert!(err.to_string().contains("4242"));

    let hits = server.hits();
    assert_eq!(hits.iter().filter(|p| is_api(p)).count(), 9);
    assert_eq!(hits.last().map(String::as_str), Some("/4242"));
}

#[test]
fn api_attempts_are_endpoint_major() {
    let server = MockServer::start(|_| (412, String::new()));
    let fetcher = Fetcher::new(&server.fetch_options()).unwrap();
    assert!(fetcher.fetch(5).is_err());

    let hits = server.hits();
    assert!(hits[0..3].iter().all(|p| p.starts_with("/x/relation/stat?vmid=5")));
    assert!(hits[3..6].iter().all(|p| p.starts_with("/x/space/acc/info?mid=5")));
    assert!(hits[6..9].iter().all(|p| p.starts_with("/x/space/upstat?mid=5")));
}

#[test]
fn page_scrape_rescues_a_blocked_api() {
    let server = MockServer::start(|path| {
        if is_api(path) { (412, String::new()) } else { (200, String::from("<div>粉丝 1234</div>")) }
    });
    let fetcher = Fetcher::new(&server.fetch_options()).unwrap();
    assert_eq!(fetcher.fetch(8).unwrap(), 1234);
    assert_eq!(server.hits().len(), 10);
}

#[test]
fn first_good_endpoint_stops_the_chain() {
    let server = MockServer::start(|path| {
        if path.starts_with("/x/relation/stat") {
            (412, String::new())
        } else {
            (200, follower_json(77))
        }
    });
    let fetcher = Fetcher::new(&server.fetch_options()).unwrap();
    assert_eq!(fetcher.fetch(9).unwrap(), 77);
    assert_eq!(server.hits().len(), 4);
}

#[test]
fn non_json_success_moves_on() {
    let server = MockServer::start(|path| {
        if path.starts_with("/x/space/upstat") {
            (200, String::from(r#"{"code":0,"data":{"card":{"follower":55}}}"#))
        } else if is_api(path) {
            (200, String::from("<html>captcha</html>"))
        } else {
            (500, String::new())
        }
    });
    let fetcher = Fetcher::new(&server.fetch_options()).unwrap();
    assert_eq!(fetcher.fetch(3).unwrap(), 55);
    assert_eq!(server.hits().len(), 7);
}
