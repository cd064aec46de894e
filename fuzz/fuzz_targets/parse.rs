#![no_main]
use libfuzzer_sys::fuzz_target;

use civiltime::ZoneInfo;

fuzz_target!(|data: &str| {
    let _ = ZoneInfo::from_posix_tz(data);
});
