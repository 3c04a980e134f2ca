//! # Geo Module
//!
//! IP-to-country resolution against the free MaxMind GeoLite2 country
//! database, downloading it once from a fixed URL when the file is absent.

use anyhow::{Context, Result};
use std::fs::File;
use std::net::IpAddr;
use std::path::Path;
use std::time::Duration;

pub const GEO_DB_URL: &str =
    "https://github.com/P3TERX/GeoLite.mmdb/releases/download/2025.05.28/GeoLite2-Country.mmdb";
pub const DEFAULT_GEO_DB: &str = "GeoLite2-Country.mmdb";

const UNKNOWN_COUNTRY: &str = "Unknown";
const DOWNLOAD_TIMEOUT_SECS: u64 = 120;

/// External collaborator seam for the aggregator; lets tests stub the
/// database away.
pub trait CountryLookup {
    /// ISO country code for an IP, or `"Unknown"`.
    fn country(&self, ip: &str) -> String;
}

/// Download the GeoLite2 database if it is not already on disk.
pub fn ensure_geodb(path: &Path) -> Result<()> {
    if path.is_file() {
        return Ok(());
    }

    log::info!("downloading GeoLite2 DB to {} ...", path.display());
    let agent = ureq::AgentBuilder::new()
        .timeout(Duration::from_secs(DOWNLOAD_TIMEOUT_SECS))
        .build();
    let response = match agent.get(GEO_DB_URL).call() {
        Ok(r) => r,
        Err(e) => {
            log::error!("failed to download GeoLite2 DB: {e}");
            return Err(e).context("download GeoLite2 DB");
        }
    };

    let mut out = File::create(path)
        .with_context(|| format!("create {}", path.display()))?;
    if let Err(e) = std::io::copy(&mut response.into_reader(), &mut out) {
        log::error!("failed to write GeoLite2 DB to {}: {e}", path.display());
        return Err(e).with_context(|| format!("write {}", path.display()));
    }
    log::info!("GeoLite2 DB downloaded successfully");
    Ok(())
}

/// Country resolver backed by an on-disk GeoLite2 database.
pub struct CountryResolver {
    reader: maxminddb::Reader<Vec<u8>>,
}

impl CountryResolver {
    pub fn open(path: &Path) -> Result<Self> {
        let reader = maxminddb::Reader::open_readfile(path)
            .with_context(|| format!("open GeoLite2 DB {}", path.display()))?;
        Ok(Self { reader })
    }
}

impl CountryLookup for CountryResolver {
    fn country(&self, ip: &str) -> String {
        let addr: IpAddr = match ip.parse() {
            Ok(a) => a,
            Err(_) => return UNKNOWN_COUNTRY.to_string(),
        };
        match self.reader.lookup::<maxminddb::geoip2::Country>(addr) {
            Ok(rec) => rec
                .country
                .and_then(|c| c.iso_code)
                .map(str::to_string)
                .unwrap_or_else(|| UNKNOWN_COUNTRY.to_string()),
            Err(_) => UNKNOWN_COUNTRY.to_string(),
        }
    }
}
