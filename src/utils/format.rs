//! Locale-aware number and date formatting for chart labels and tooltips

use std::str::FromStr;

use chrono::{DateTime, Locale, NaiveDate, Utc};

use super::dates::midnight_utc;

/// Display locales the chart can be rendered in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DisplayLocale {
    /// Spanish (Argentina): `1.015,00`, `3 ene 2025`
    #[default]
    EsAr,
    /// English (United States): `1,015.00`, `Jan 3, 2025`
    EnUs,
}

impl FromStr for DisplayLocale {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().replace('_', "-").to_lowercase().as_str() {
            "es-ar" => Ok(DisplayLocale::EsAr),
            "en-us" => Ok(DisplayLocale::EnUs),
            other => Err(format!("unsupported locale '{}'. Supported: es-AR, en-US", other)),
        }
    }
}

impl DisplayLocale {
    fn chrono_locale(self) -> Locale {
        match self {
            DisplayLocale::EsAr => Locale::es_AR,
            DisplayLocale::EnUs => Locale::en_US,
        }
    }

    /// (group separator, decimal separator)
    fn separators(self) -> (char, char) {
        match self {
            DisplayLocale::EsAr => ('.', ','),
            DisplayLocale::EnUs => (',', '.'),
        }
    }

    /// Format with a fixed number of decimals and thousands grouping
    pub fn format_number(self, value: f64, decimals: usize) -> String {
        let (group, decimal) = self.separators();
        let formatted = format!("{:.*}", decimals, value.abs());
        let (integer_part, fraction) = match formatted.split_once('.') {
            Some((int, frac)) => (int, Some(frac)),
            None => (formatted.as_str(), None),
        };

        let digits: Vec<char> = integer_part.chars().collect();
        let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
        for (i, digit) in digits.iter().enumerate() {
            if i > 0 && (digits.len() - i) % 3 == 0 {
                grouped.push(group);
            }
            grouped.push(*digit);
        }

        // "-0,00" reads as noise
        let is_zero = formatted.chars().all(|c| c == '0' || c == '.');
        let mut out = String::new();
        if value.is_sign_negative() && !is_zero {
            out.push('-');
        }
        out.push_str(&grouped);
        if let Some(frac) = fraction {
            out.push(decimal);
            out.push_str(frac);
        }
        out
    }

    /// Two decimals followed by the currency code, e.g. `1.015,00 ARS`
    pub fn format_currency(self, value: f64, currency: &str) -> String {
        format!("{} {}", self.format_number(value, 2), currency)
    }

    /// Short date for axis labels and tooltip headers
    pub fn format_short_date(self, date: NaiveDate) -> String {
        let format = match self {
            DisplayLocale::EsAr => "%-d %b %Y",
            DisplayLocale::EnUs => "%b %-d, %Y",
        };
        midnight_utc(date)
            .format_localized(format, self.chrono_locale())
            .to_string()
    }

    /// Long date in UTC, used for the forecast generation date
    pub fn format_long_date(self, timestamp: DateTime<Utc>) -> String {
        let format = match self {
            DisplayLocale::EsAr => "%-d de %B de %Y",
            DisplayLocale::EnUs => "%B %-d, %Y",
        };
        timestamp
            .format_localized(format, self.chrono_locale())
            .to_string()
    }
}
