//! Western (Gregorian) Easter Sunday.

use crate::date::Date;
use tc_core::errors::Result;

/// Return the date of Western Easter Sunday in `year`.
///
/// Uses Oudin's algorithm, valid for every Gregorian year.
pub fn easter_sunday(year: u16) -> Result<Date> {
    let y = year as i32;
    let g = y % 19;
    let c = y / 100;
    let h = (c - c / 4 - (8 * c + 13) / 25 + 19 * g + 15) % 30;
    let i = h - (h / 28) * (1 - (h / 28) * (29 / (h + 1)) * ((21 - g) / 11));
    let j = (y + y / 4 + i + 2 - c + c / 4) % 7;
    let p = i - j;
    let day = 1 + (p + 27 + (p + 6) / 40) % 31;
    let month = 3 + (p + 26) / 30;
    Date::from_ymd(year, month as u8, day as u8)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: u16, m: u8, d: u8) -> Date {
        Date::from_ymd(y, m, d).unwrap()
    }

    #[test]
    fn known_easters() {
        assert_eq!(easter_sunday(2023).unwrap(), date(2023, 4, 9));
        assert_eq!(easter_sunday(2024).unwrap(), date(2024, 3, 31));
        assert_eq!(easter_sunday(2019).unwrap(), date(2019, 4, 21));
        assert_eq!(easter_sunday(2000).unwrap(), date(2000, 4, 23));
        assert_eq!(easter_sunday(1818).unwrap(), date(1818, 3, 22));
        assert_eq!(easter_sunday(2038).unwrap(), date(2038, 4, 25));
    }

    #[test]
    fn always_a_sunday_in_spring() {
        for y in 1900..=2100 {
            let e = easter_sunday(y).unwrap();
            assert_eq!(e.weekday(), crate::Weekday::Sunday, "{y}");
            assert!(e >= date(y, 3, 22) && e <= date(y, 4, 25), "{y}");
        }
    }
}
