// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Locale-aware number display and parsing.
//!
//! A small subset of what `Intl.NumberFormat` does for the locales Trellis
//! ships with: grouping and decimal separators, currency symbols and their
//! position, and percent scaling (`0.25` is `25%`).
//!
//! With the `localization` feature, digits are grouped and separated by
//! [`icu::decimal::DecimalFormatter`] from the locale's CLDR data. Without
//! it, or if the data cannot be loaded, built-in tables produce the same
//! separators for the supported locales.

use std::borrow::Cow;

const NBSP: char = '\u{a0}';
const NNBSP: char = '\u{202f}';

/// A supported formatting locale.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum Locale {
    /// `en-US`.
    #[default]
    EnUs,
    /// `en-GB`.
    EnGb,
    /// `de-DE`.
    DeDe,
    /// `fr-FR`.
    FrFr,
    /// `ja-JP`.
    JaJp,
}

impl Locale {
    /// Resolve a BCP 47 tag. Unknown tags fall back to `en-US` with a warning.
    pub fn from_tag(tag: &str) -> Self {
        match tag.trim().replace('_', "-").to_ascii_lowercase().as_str() {
            "en" | "en-us" => Self::EnUs,
            "en-gb" => Self::EnGb,
            "de" | "de-de" => Self::DeDe,
            "fr" | "fr-fr" => Self::FrFr,
            "ja" | "ja-jp" => Self::JaJp,
            _ => {
                tracing::warn!(tag, "unknown locale, falling back to en-US");
                Self::EnUs
            }
        }
    }

    /// The canonical tag.
    pub fn tag(self) -> &'static str {
        match self {
            Self::EnUs => "en-US",
            Self::EnGb => "en-GB",
            Self::DeDe => "de-DE",
            Self::FrFr => "fr-FR",
            Self::JaJp => "ja-JP",
        }
    }

    fn decimal_separator(self) -> char {
        match self {
            Self::DeDe | Self::FrFr => ',',
            _ => '.',
        }
    }

    fn group_separator(self) -> char {
        match self {
            Self::DeDe => '.',
            Self::FrFr => NNBSP,
            _ => ',',
        }
    }

    fn currency_after(self) -> bool {
        matches!(self, Self::DeDe | Self::FrFr)
    }
}

/// How a number input renders its value.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum NumberFormat {
    /// Plain grouped decimal.
    #[default]
    Decimal,
    /// Currency with an ISO 4217 code, for example `"USD"`.
    Currency(String),
    /// Percent; the value is a fraction.
    Percent,
}

impl NumberFormat {
    /// Render `value` with `precision` fractional digits (two fewer for percent).
    ///
    /// ```rust
    /// use trellis_behaviors::{Locale, NumberFormat};
    ///
    /// let eur = NumberFormat::Currency("EUR".into());
    /// assert_eq!(eur.format(1234.5, 2, Locale::DeDe), "1.234,50\u{a0}€");
    /// assert_eq!(NumberFormat::Percent.format(0.25, 2, Locale::EnUs), "25%");
    /// ```
    pub fn format(&self, value: f64, precision: u32, locale: Locale) -> String {
        let (magnitude, digits) = match self {
            Self::Percent => (value * 100.0, precision.saturating_sub(2)),
            _ => (value, precision),
        };
        let body = group_digits(magnitude.abs(), digits, locale);
        let negative = magnitude < 0.0 && body.bytes().any(|b| (b'1'..=b'9').contains(&b));
        let sign = if negative { "-" } else { "" };
        match self {
            Self::Decimal => format!("{sign}{body}"),
            Self::Percent => match locale {
                Locale::DeDe => format!("{sign}{body}{NBSP}%"),
                Locale::FrFr => format!("{sign}{body}{NNBSP}%"),
                _ => format!("{sign}{body}%"),
            },
            Self::Currency(code) => {
                let symbol = currency_symbol(code, locale);
                if locale.currency_after() {
                    format!("{sign}{body}{NBSP}{symbol}")
                } else if symbol.chars().all(|c| c.is_ascii_alphabetic()) {
                    format!("{sign}{symbol}{NBSP}{body}")
                } else {
                    format!("{sign}{symbol}{body}")
                }
            }
        }
    }

    /// Parse user text back into a value. Returns `None` for anything that is
    /// not a finite number in this format.
    ///
    /// Group separators, whitespace, and (for currency) symbols and letters are
    /// ignored; the locale's decimal separator is honored. Percent text is
    /// scaled back to a fraction.
    pub fn parse(&self, text: &str, locale: Locale) -> Option<f64> {
        let mut cleaned = String::with_capacity(text.len());
        let mut negative = false;
        let mut percent = false;
        for c in text.trim().chars() {
            match c {
                '0'..='9' => cleaned.push(c),
                c if c == locale.decimal_separator() => cleaned.push('.'),
                c if c == locale.group_separator() => {}
                '-' | '\u{2212}' if cleaned.is_empty() && !negative => negative = true,
                '+' if cleaned.is_empty() => {}
                '%' if *self == Self::Percent && !percent => percent = true,
                c if c.is_whitespace() => {}
                c if matches!(self, Self::Currency(_))
                    && (c.is_alphabetic() || "$€£¥￥".contains(c)) => {}
                _ => return None,
            }
        }
        if !cleaned.bytes().any(|b| b.is_ascii_digit()) {
            return None;
        }
        let magnitude: f64 = cleaned.parse().ok().filter(|v: &f64| v.is_finite())?;
        let value = if negative { -magnitude } else { magnitude };
        Some(if *self == Self::Percent { value / 100.0 } else { value })
    }
}

fn currency_symbol(code: &str, locale: Locale) -> Cow<'static, str> {
    let upper = code.to_ascii_uppercase();
    let symbol = match (upper.as_str(), locale) {
        ("USD", Locale::EnGb) => "US$",
        ("USD", _) => "$",
        ("EUR", _) => "€",
        ("GBP", _) => "£",
        ("JPY", Locale::JaJp) => "￥",
        ("JPY", _) => "¥",
        _ => return Cow::Owned(upper),
    };
    Cow::Borrowed(symbol)
}

/// `magnitude` (non-negative) with `digits` fractional digits and locale grouping.
fn group_digits(magnitude: f64, digits: u32, locale: Locale) -> String {
    let fixed = format!("{magnitude:.prec$}", prec = digits as usize);
    #[cfg(feature = "localization")]
    if let Some(body) = icu_digits(&fixed, locale) {
        return body;
    }
    table_digits(&fixed, locale)
}

#[cfg(feature = "localization")]
fn icu_digits(fixed: &str, locale: Locale) -> Option<String> {
    use icu::decimal::DecimalFormatter;
    use icu::decimal::input::Decimal;
    use icu::decimal::options::DecimalFormatterOptions;

    let tag: icu::locale::Locale = locale.tag().parse().ok()?;
    let options = DecimalFormatterOptions::default();
    let formatter = match DecimalFormatter::try_new(tag.into(), options) {
        Ok(formatter) => formatter,
        Err(error) => {
            tracing::warn!(
                ?error,
                locale = locale.tag(),
                "no decimal data, using built-in separators"
            );
            return None;
        }
    };
    // Parsing the fixed-point text keeps trailing zeros.
    let decimal: Decimal = fixed.parse().ok()?;
    Some(formatter.format(&decimal).to_string())
}

fn table_digits(fixed: &str, locale: Locale) -> String {
    let (int, frac) = fixed.split_once('.').unwrap_or((fixed, ""));
    let mut out = String::with_capacity(fixed.len() + int.len() / 3);
    let len = int.chars().count();
    for (i, c) in int.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(locale.group_separator());
        }
        out.push(c);
    }
    if !frac.is_empty() {
        out.push(locale.decimal_separator());
        out.push_str(frac);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decimal_grouping_per_locale() {
        let d = NumberFormat::Decimal;
        assert_eq!(d.format(1234567.891, 2, Locale::EnUs), "1,234,567.89");
        assert_eq!(d.format(1234567.891, 2, Locale::DeDe), "1.234.567,89");
        assert_eq!(d.format(1234.5, 1, Locale::FrFr), "1\u{202f}234,5");
        assert_eq!(d.format(-12.0, 0, Locale::JaJp), "-12");
        assert_eq!(d.format(-0.001, 2, Locale::EnUs), "0.00");
        assert_eq!(d.format(999.0, 0, Locale::EnGb), "999");
    }

    #[test]
    fn currency_symbols_and_placement() {
        let usd = NumberFormat::Currency("USD".into());
        assert_eq!(usd.format(-1234.5, 2, Locale::EnUs), "-$1,234.50");
        assert_eq!(usd.format(3.0, 2, Locale::EnGb), "US$3.00");
        assert_eq!(
            NumberFormat::Currency("jpy".into()).format(1500.0, 0, Locale::JaJp),
            "￥1,500"
        );
        assert_eq!(
            NumberFormat::Currency("EUR".into()).format(2.5, 2, Locale::FrFr),
            "2,50\u{a0}€"
        );
        assert_eq!(
            NumberFormat::Currency("CHF".into()).format(12.0, 2, Locale::EnUs),
            "CHF\u{a0}12.00"
        );
    }

    #[test]
    fn percent_scales_the_fraction() {
        let p = NumberFormat::Percent;
        assert_eq!(p.format(0.25, 2, Locale::EnUs), "25%");
        assert_eq!(p.format(0.255, 3, Locale::EnUs), "25.5%");
        assert_eq!(p.format(0.5, 2, Locale::DeDe), "50\u{a0}%");
        assert_eq!(p.parse("25%", Locale::EnUs), Some(0.25));
        assert_eq!(p.parse("7", Locale::EnUs), Some(0.07));
    }

    #[test]
    fn parse_round_trips_formatted_text() {
        let cases = [
            (NumberFormat::Decimal, Locale::DeDe, 1234.5),
            (NumberFormat::Currency("EUR".into()), Locale::FrFr, -98765.25),
            (NumberFormat::Currency("USD".into()), Locale::EnGb, 0.5),
        ];
        for (format, locale, value) in cases {
            let text = format.format(value, 2, locale);
            assert_eq!(format.parse(&text, locale), Some(value), "{text}");
        }
    }

    #[test]
    fn parse_rejects_garbage() {
        let d = NumberFormat::Decimal;
        assert_eq!(d.parse("", Locale::EnUs), None);
        assert_eq!(d.parse("-", Locale::EnUs), None);
        assert_eq!(d.parse("12abc", Locale::EnUs), None);
        assert_eq!(d.parse("1.2.3", Locale::EnUs), None);
        assert_eq!(d.parse("5%", Locale::EnUs), None);
        assert_eq!(d.parse(" +42 ", Locale::EnUs), Some(42.0));
        assert_eq!(d.parse("1-2", Locale::EnUs), None);
    }

    #[test]
    fn unknown_locale_falls_back() {
        assert_eq!(Locale::from_tag("de_DE"), Locale::DeDe);
        assert_eq!(Locale::from_tag("tlh-QO"), Locale::EnUs);
        assert_eq!(Locale::JaJp.tag(), "ja-JP");
    }

    #[test]
    fn builtin_tables_keep_trailing_zeros() {
        assert_eq!(table_digits("1234.50", Locale::FrFr), "1\u{202f}234,50");
        assert_eq!(table_digits("1000000", Locale::DeDe), "1.000.000");
        assert_eq!(table_digits("12", Locale::EnGb), "12");
    }

    #[cfg(feature = "localization")]
    #[test]
    fn icu_agrees_with_builtin_tables() {
        let locales = [Locale::EnUs, Locale::EnGb, Locale::DeDe, Locale::FrFr, Locale::JaJp];
        for locale in locales {
            for fixed in ["0.05", "999", "1234.50", "1234567.891"] {
                assert_eq!(
                    icu_digits(fixed, locale).as_deref(),
                    Some(table_digits(fixed, locale).as_str()),
                    "{fixed} in {}",
                    locale.tag()
                );
            }
        }
    }
}
