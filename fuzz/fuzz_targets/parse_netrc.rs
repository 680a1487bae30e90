// SPDX-License-Identifier: Apache-2.0

#![no_main]

use bugsnag_core::netrc::Netrc;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data)
        && let Ok(netrc) = Netrc::parse(s)
    {
        for entry in netrc.entries() {
            assert!(!entry.machine.is_empty());
            let _ = netrc.find(&entry.machine, &entry.login);
        }
    }
});
