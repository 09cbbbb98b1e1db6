//! Human-readable byte counts.

const UNITS: [&str; 5] = ["Bytes", "KB", "MB", "GB", "TB"];
const STEP: u64 = 1024;

/// Renders `bytes` with 1024-based units and two decimals.
///
/// Values below one kilobyte are printed as whole bytes; terabytes is the
/// largest unit.
pub fn format_bytes(bytes: u64) -> String {
    match bytes {
        0 => "0 Bytes".to_owned(),
        1 => "1 Byte".to_owned(),
        b if b < STEP => format!("{b} Bytes"),
        b => {
            let mut unit = 0;
            let mut rest = b;
            while rest >= STEP && unit < UNITS.len() - 1 {
                rest /= STEP;
                unit += 1;
            }

            let scaled = b as f64 / (STEP as f64).powi(unit as i32);
            format!("{scaled:.2} {}", UNITS[unit])
        }
    }
}
