//! Process-wide local zone state.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};
use std::{env, fs, str};

use once_cell::sync::Lazy;

use crate::datetime::CivilTime;
use crate::timezone::ZoneInfo;
use crate::Error;

/// Largest zoneinfo file the trailing-line reader accepts
const MAX_ZONEINFO_SIZE: u64 = 0x2000;

/// External source of zone rules, consulted when the configured zone string is not itself a rule
/// description.
///
/// All methods report absence with `None`; a zone that cannot be found is not an error, it only
/// means the next source in the fallback chain is tried.
pub trait ZoneDatabase {
    /// Trailing POSIX rule line of the database entry for a zone name, if such an entry exists
    fn posix_fallback(&self, name: &str) -> Option<String>;

    /// Rule line of the host's default zone, used when no zone string is configured at all
    fn system_default(&self) -> Option<String>;

    /// Structured zone description from a platform interface, for hosts without any textual
    /// zone configuration
    fn host_zone(&self) -> Option<ZoneInfo> {
        None
    }
}

/// Zone database backed by the on-disk zoneinfo directory.
///
/// Only the trailing POSIX rule line of an entry is read; the binary payload in front of it is
/// never interpreted.
#[derive(Debug, Clone)]
pub struct SystemZoneDatabase {
    /// Directory searched for named zone entries
    directory: PathBuf,
}

impl SystemZoneDatabase {
    /// Zone database reading from the provided zoneinfo directory
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self { directory: directory.into() }
    }
}

impl Default for SystemZoneDatabase {
    /// Zone database reading from `/usr/share/zoneinfo`
    fn default() -> Self {
        Self::new("/usr/share/zoneinfo")
    }
}

impl ZoneDatabase for SystemZoneDatabase {
    fn posix_fallback(&self, name: &str) -> Option<String> {
        let path = if name.starts_with('/') || name.starts_with('.') {
            PathBuf::from(name)
        } else {
            self.directory.join(name)
        };

        trailing_rule_line(&path)
    }

    fn system_default(&self) -> Option<String> {
        trailing_rule_line(Path::new("/etc/localtime"))
    }
}

/// Last complete line of a zoneinfo file.
///
/// Zoneinfo entries of version 2 and later end with a POSIX rule line enclosed in newlines;
/// files without two newlines, non-regular files and files above [`MAX_ZONEINFO_SIZE`] yield
/// nothing.
fn trailing_rule_line(path: &Path) -> Option<String> {
    let metadata = fs::metadata(path).ok()?;
    if !metadata.is_file() || metadata.len() > MAX_ZONEINFO_SIZE {
        return None;
    }

    let data = fs::read(path).ok()?;
    let end = data.iter().rposition(|&b| b == b'\n')?;
    let start = data[..end].iter().rposition(|&b| b == b'\n')? + 1;
    if start == end {
        return None;
    }

    str::from_utf8(&data[start..end]).ok().map(str::to_owned)
}

/// Cached zone rules and the zone string they were resolved from
#[derive(Debug)]
struct CacheState {
    /// Zone string of the last refresh
    last_spec: Option<String>,
    /// Resolved rules; empty until the first refresh
    zone: Option<Arc<ZoneInfo>>,
}

/// Cache of the active zone rules.
///
/// The cache hands out immutable snapshots behind an [`Arc`]: readers clone the pointer under a
/// short-lived lock and convert on the snapshot without holding it, and a refresh replaces the
/// snapshot without disturbing readers of the previous one.
#[derive(Debug)]
pub struct ZoneCache {
    /// Snapshot guarded by a mutex; only [`ZoneCache::refresh`] replaces it
    state: Mutex<CacheState>,
}

impl ZoneCache {
    /// An empty cache; the first refresh populates it
    pub fn new() -> Self {
        Self { state: Mutex::new(CacheState { last_spec: None, zone: None }) }
    }

    /// Zone rules for the provided zone string, reparsing only when the string changed since the
    /// last refresh.
    ///
    /// Resolution order: a non-empty string that is not a rule description is looked up in the
    /// database by name; an absent or empty string falls back to the database's system default;
    /// then the host zone description; and finally UTC. A string with a leading `:` skips the
    /// database lookup.
    pub fn refresh(&self, zone_spec: Option<&str>, database: &dyn ZoneDatabase) -> Arc<ZoneInfo> {
        // a poisoned lock only means a refresh panicked before replacing the snapshot
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);

        if let Some(zone) = &state.zone {
            if state.last_spec.as_deref() == zone_spec {
                return zone.clone();
            }
        }

        let zone = Arc::new(resolve_zone(zone_spec, database));
        state.last_spec = zone_spec.map(str::to_owned);
        state.zone = Some(zone.clone());
        zone
    }

    /// Zone rules for the current value of the `TZ` environment variable
    pub fn from_env(&self, database: &dyn ZoneDatabase) -> Arc<ZoneInfo> {
        let zone_spec = env::var("TZ").ok();
        self.refresh(zone_spec.as_deref(), database)
    }
}

impl Default for ZoneCache {
    fn default() -> Self {
        Self::new()
    }
}

/// Resolve a zone string to zone rules, falling back to UTC when every source fails
fn resolve_zone(zone_spec: Option<&str>, database: &dyn ZoneDatabase) -> ZoneInfo {
    match zone_spec {
        Some(spec) if !spec.is_empty() => {
            if !spec.starts_with(':') {
                match ZoneInfo::from_posix_tz(spec) {
                    Ok(zone) => return zone,
                    Err(_) => {
                        debug!("zone string {:?} is not a rule description, trying the zone database", spec);
                    }
                }

                if let Some(line) = database.posix_fallback(spec) {
                    if let Ok(zone) = ZoneInfo::from_posix_tz(&line) {
                        trace!("resolved zone {:?} from the database rule line {:?}", spec, line);
                        return zone;
                    }
                }
            }
        }
        _ => {
            if let Some(line) = database.system_default() {
                if let Ok(zone) = ZoneInfo::from_posix_tz(&line) {
                    return zone;
                }
            }
        }
    }

    if let Some(zone) = database.host_zone() {
        return zone;
    }

    warn!("no usable zone rules for {:?}, falling back to UTC", zone_spec);
    ZoneInfo::utc()
}

/// Zone cache shared by the zone-implicit entry points
static LOCAL_CACHE: Lazy<ZoneCache> = Lazy::new(ZoneCache::new);

/// Zone rules of the process-wide local zone, refreshed from the `TZ` environment variable.
///
/// The returned snapshot stays valid when the configuration changes later; it simply no longer
/// reflects the current environment.
pub fn local_zone() -> Arc<ZoneInfo> {
    LOCAL_CACHE.from_env(&SystemZoneDatabase::default())
}

/// Unix time of a civil time record interpreted in the process-wide local zone
pub fn local_unix_time(civil: &CivilTime) -> Result<i64, Error> {
    local_zone().unix_time(civil)
}

/// Civil time of a Unix time instant in the process-wide local zone
pub fn local_civil_time(unix_time: i64) -> Result<CivilTime, Error> {
    local_zone().civil_time(unix_time)
}
