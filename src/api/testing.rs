use std::path::PathBuf;
use std::time::Duration;

use actix_web::{test, web};

use crate::config::Config;
use crate::utils::presence_loader::{StoreCache, store_cache};
use crate::utils::user_directory::UserDirectoryCache;

fn fixture(name: &str) -> String {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("runtime/data")
        .join(name)
        .display()
        .to_string()
}

pub(crate) fn test_state() -> (
    Config,
    web::Data<StoreCache>,
    web::Data<UserDirectoryCache>,
) {
    let config = Config {
        data_csv: fixture("presence.csv"),
        users_xml: fixture("users.xml"),
        ..Config::default()
    };
    let ttl = Duration::from_secs(config.cache_ttl);
    let store = web::Data::new(store_cache(&config.data_csv, ttl));
    let users = web::Data::new(UserDirectoryCache::new(&config.users_xml, ttl));
    (config, store, users)
}

/// GET request with a peer address, which the rate limiter keys on.
pub(crate) fn get(uri: &str) -> test::TestRequest {
    test::TestRequest::get()
        .uri(uri)
        .peer_addr("127.0.0.1:40000".parse().unwrap())
}
