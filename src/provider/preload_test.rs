use super::*;

#[test]
fn remote_sources_are_http() {
    assert!(is_remote("https://images.test/a.jpg"));
    assert!(is_remote("http://localhost/a.jpg"));
    assert!(!is_remote("assets/img1.png"));
    assert!(!is_remote("file:///tmp/a.jpg"));
}

#[tokio::test]
async fn local_assets_are_ready_immediately() {
    let preloader = HttpPreloader::new(ProviderTimeouts { request_secs: 1, connect_secs: 1 }).unwrap();
    assert_eq!(preloader.preload("assets/img3.jpeg").await.unwrap(), 0);
}
