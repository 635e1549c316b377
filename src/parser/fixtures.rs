//! Captured btrfs-progs output used across the parser and check tests.

pub const FS_USAGE: &str = "
Overall:
    Device size:\t\t       10737418240
    Device allocated:                   2172649472
    Device unallocated:                 8564768768
    Device missing:                              0
    Used:                                   524288
    Free (estimated):                   8572895232\t(min: 4290510848)
    Data ratio:                               1.00
    Metadata ratio:                           2.00
    Global reserve:                       16777216\t(used: 0)

Data,single: Size:8388608, Used:262144
   /dev/sdb\t   8388608

Metadata,DUP: Size:1073741824, Used:114688
   /dev/sdb\t2147483648

System,DUP: Size:8388608, Used:16384
   /dev/sdb\t  16777216

Unallocated:
   /dev/sdb\t8564768768
";

/// Newer btrfs-progs: percentage annotations and a `Device slack:` line.
pub const FS_USAGE_RAID1: &str = "
Overall:
    Device size:                     4000797868032
    Device allocated:                 942829207552
    Device unallocated:              3057968660480
    Device missing:                              0
    Device slack:                                0
    Used:                             934821470208
    Free (estimated):                1531379535872      (min: 1531379535872)
    Free (statfs, df):               1531378462720
    Data ratio:                               2.00
    Metadata ratio:                           2.00
    Global reserve:                      485900288      (used: 0)
    Multiple profiles:                          no

Data,RAID1: Size:469225177088, Used:466829971456 (99.49%)
   /dev/sda     469225177088
   /dev/sdb     469225177088

Metadata,RAID1: Size:2147483648, Used:580681728 (27.04%)
   /dev/sda     2147483648
   /dev/sdb     2147483648

System,RAID1: Size:41943040, Used:81920 (0.20%)
   /dev/sda       41943040
   /dev/sdb       41943040

Unallocated:
   /dev/sda     1528984330240
   /dev/sdb     1528984330240
";

pub const DEVICES: &str = "
Label: none  uuid: fdbb50c2-f155-4ef5-9ae8-c3ec57e2bcfd
\tTotal devices 2 FS bytes used 128.00KiB
\tdevid    1 size 1022.00MiB used 220.00MiB path /dev/nbd0p1
\tdevid    2 size 1022.00MiB used 208.00MiB path /dev/nbd1p1

";

pub const DEVICES_MISSING: &str = "
Label: none  uuid: fdbb50c2-f155-4ef5-9ae8-c3ec57e2bcfd
\tTotal devices 2 FS bytes used 128.00KiB
\tdevid    1 size 1022.00MiB used 220.00MiB path /dev/nbd0p1
\t*** Some devices missing

";

pub const SCRUB_OK: &str = "
UUID:             deb3ff35-a424-4edb-9673-e0514cef2cb0
Scrub started:    Tue Jan 10 09:58:05 2023
Status:           finished
Duration:         2:16:04
Total to scrub:   1.62TiB
Rate:             208.45MiB/s
Error summary:    no errors found

";

/// Old btrfs-progs scrub format without an `Error summary:` line.
pub const SCRUB_LEGACY_ERRORS: &str = "
scrub status for <UUID>
    scrub started at Thu Dec 25 15:19:22 2014 and was aborted after 89882 seconds
    total bytes scrubbed: 1.87TiB with 4 errors
    error details: csum=4
    corrected errors: 0, uncorrectable errors: 4, unverified errors: 0

";

pub fn lines(text: &str) -> Vec<String> {
    text.lines().map(str::to_string).collect()
}
