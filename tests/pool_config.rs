#![cfg(feature = "serde")]

use std::{collections::HashMap, env, time::Duration};

use serde::Deserialize;

use resourcepool::pool::{PoolConfig, DEFAULT_ACQUIRE_TIMEOUT};

struct Env {
    backup: HashMap<String, Option<String>>,
}

impl Env {
    pub fn new() -> Self {
        Self {
            backup: HashMap::new(),
        }
    }
    pub fn set(&mut self, name: &str, value: &str) {
        let _ = self.backup.insert(name.to_string(), env::var(name).ok());
        env::set_var(name, value);
    }
}

impl Drop for Env {
    fn drop(&mut self) {
        for (name, value) in self.backup.iter() {
            match value {
                Some(value) => env::set_var(name.as_str(), value),
                None => env::remove_var(name.as_str()),
            }
        }
    }
}

#[derive(Debug, Deserialize)]
struct TestConfig {
    pool: PoolConfig,
}

fn load(prefix: &str) -> TestConfig {
    ::config::Config::builder()
        .add_source(
            ::config::Environment::with_prefix(prefix)
                .separator("__")
                .try_parsing(true),
        )
        .build()
        .unwrap()
        .try_deserialize()
        .unwrap()
}

#[test]
fn from_env() {
    let mut env = Env::new();
    env.set("FULL__POOL__CAPACITY", "42");
    env.set("FULL__POOL__ACQUIRE_TIMEOUT__SECS", "1");
    env.set("FULL__POOL__ACQUIRE_TIMEOUT__NANOS", "500000000");

    let cfg = load("FULL");
    assert_eq!(cfg.pool.capacity, 42);
    assert_eq!(cfg.pool.acquire_timeout, Duration::from_millis(1500));
}

#[test]
fn from_env_default_timeout() {
    let mut env = Env::new();
    env.set("SHORT__POOL__CAPACITY", "7");

    let cfg = load("SHORT");
    assert_eq!(cfg.pool.capacity, 7);
    assert_eq!(cfg.pool.acquire_timeout, DEFAULT_ACQUIRE_TIMEOUT);
}

#[test]
fn from_json() {
    let json = r#"{ "pool": { "capacity": 3, "acquire_timeout": { "secs": 0, "nanos": 250000000 } } }"#;
    let cfg: TestConfig = ::config::Config::builder()
        .add_source(::config::File::from_str(json, ::config::FileFormat::Json))
        .build()
        .unwrap()
        .try_deserialize()
        .unwrap();
    assert_eq!(cfg.pool.capacity, 3);
    assert_eq!(cfg.pool.acquire_timeout, Duration::from_millis(250));
}
