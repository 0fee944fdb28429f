use std::fs;

use subrefine_core::extract;

use crate::util::Workspace;

#[test]
fn hosts_from_mixed_sources_are_unique_and_sorted() {
    let ws = Workspace::new();
    ws.source(
        "assets.csv",
        "\u{feff}Domain,IP,Url\n\
         admin.example.com,1.1.1.1,https://admin.example.com:443/login\n\
         www.example.com,1.1.1.2,http://www.example.com:8080/\n",
    );
    ws.source("subs.txt", "子域名\nhttps://api.example.com:443/v1\nwww.example.com\n\n");

    let hosts = extract::extract(&ws.layout.domain_dir, true).unwrap();
    let hosts: Vec<&str> = hosts.iter().collect();
    assert_eq!(
        hosts,
        vec!["admin.example.com", "api.example.com", "www.example.com", "www.example.com:8080"]
    );
}

#[test]
fn port_443_kept_when_not_stripping() {
    let ws = Workspace::new();
    ws.source("subs.txt", "https://a.example.com:443/\n");

    let hosts = extract::extract(&ws.layout.domain_dir, false).unwrap();
    assert!(hosts.contains("a.example.com:443"));
}

#[test]
fn ip_and_port_columns_are_a_fallback() {
    let ws = Workspace::new();
    ws.source("scan.csv", "ip,端口,banner\n10.0.0.1,8443,nginx\n10.0.0.2,80,apache\n");

    let hosts = extract::extract(&ws.layout.domain_dir, true).unwrap();
    let hosts: Vec<&str> = hosts.iter().collect();
    assert_eq!(hosts, vec!["10.0.0.1:8443", "10.0.0.2:80"]);
}

#[test]
fn invalid_utf8_does_not_stop_extraction() {
    let ws = Workspace::new();
    ws.source("broken.txt", b"good.example.com\nbad\xff.example.com\n".as_slice());

    let hosts = extract::extract(&ws.layout.domain_dir, true).unwrap();
    assert!(hosts.contains("good.example.com"));
    assert_eq!(hosts.len(), 2);
}

#[test]
fn host_file_has_one_host_per_line() {
    let ws = Workspace::new();
    ws.source("subs.txt", "b.example.com\na.example.com\nb.example.com\n");

    let hosts = extract::extract(&ws.layout.domain_dir, true).unwrap();
    extract::write_hosts(&hosts, &ws.layout.host_file).unwrap();
    assert_eq!(
        fs::read_to_string(&ws.layout.host_file).unwrap(),
        "a.example.com\nb.example.com\n"
    );
}

#[test]
fn missing_source_directory_is_reported() {
    let ws = Workspace::new();
    fs::remove_dir_all(&ws.layout.domain_dir).unwrap();

    let err = extract::extract(&ws.layout.domain_dir, true).unwrap_err();
    assert!(!err.is_fatal());
}
