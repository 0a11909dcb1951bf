//! Length-driven font sizing for the standard badge layout.
//!
//! The standard layout has a fixed canvas and no wrapping, so long guest
//! names must shrink instead of overflowing. Each guest field gets a
//! monotonic step function from resolved string length to font size,
//! clamped to a floor that stays legible at print size. Custom templates
//! bypass all of this and honor the element's explicit `fontSize`.

/// Smallest size the name field will ever render at.
pub const MIN_NAME_SIZE: f32 = 16.0;
/// Smallest size the company field will ever render at.
pub const MIN_COMPANY_SIZE: f32 = 13.0;
/// Smallest size the job-title field will ever render at.
pub const MIN_JOB_TITLE_SIZE: f32 = 12.0;

/// Font size for the guest name. Non-increasing in `len`.
pub fn name_size(len: usize) -> f32 {
    match len {
        0..=12 => 32.0,
        13..=18 => 26.0,
        19..=26 => 22.0,
        27..=34 => 18.0,
        _ => MIN_NAME_SIZE,
    }
}

/// Font size for the company line. Non-increasing in `len`.
pub fn company_size(len: usize) -> f32 {
    match len {
        0..=20 => 18.0,
        21..=30 => 15.0,
        _ => MIN_COMPANY_SIZE,
    }
}

/// Font size for the job-title line. Non-increasing in `len`.
pub fn job_title_size(len: usize) -> f32 {
    match len {
        0..=24 => 16.0,
        25..=32 => 14.0,
        _ => MIN_JOB_TITLE_SIZE,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_monotonic(f: fn(usize) -> f32, min: f32) {
        let mut prev = f(0);
        for len in 1..200 {
            let size = f(len);
            assert!(size <= prev, "size grew at len {}", len);
            assert!(size >= min, "size below floor at len {}", len);
            prev = size;
        }
    }

    #[test]
    fn test_name_size_monotonic() {
        assert_monotonic(name_size, MIN_NAME_SIZE);
    }

    #[test]
    fn test_company_size_monotonic() {
        assert_monotonic(company_size, MIN_COMPANY_SIZE);
    }

    #[test]
    fn test_job_title_size_monotonic() {
        assert_monotonic(job_title_size, MIN_JOB_TITLE_SIZE);
    }

    #[test]
    fn test_long_name_not_larger_than_short() {
        assert!(name_size(40) <= name_size(10));
        assert_eq!(name_size(40), MIN_NAME_SIZE);
    }
}
