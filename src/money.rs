// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Fixed-point money in integer minor units (cents).
//!
//! Every supported currency has two minor digits, so a `Money` is just a
//! signed count of cents. Parsing goes through `rust_decimal` and rounds half
//! away from zero; arithmetic never touches floating point.

use std::cmp::Ordering;
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, Neg, Sub};
use std::str::FromStr;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::errors::{LedgerError, Result};

const MINOR_DIGITS: u32 = 2;
const MINOR_PER_MAJOR: i64 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Money(i64);

impl Money {
    pub const ZERO: Money = Money(0);

    pub const fn from_minor_units(minor: i64) -> Self {
        Money(minor)
    }

    pub const fn minor_units(self) -> i64 {
        self.0
    }

    /// Parses a non-negative decimal amount such as `"250"`, `"250.5"`,
    /// `"250,50"`, `"1.234,56"` or `"1,234.56"`.
    ///
    /// When both `.` and `,` appear, the last one is the decimal separator
    /// and the other groups thousands. A separator repeated on its own only
    /// groups thousands. A single separator followed by exactly three digits
    /// (`"1.234"`) could be either, so it is rejected.
    pub fn from_decimal_str(s: &str) -> Result<Self> {
        let raw = s.trim();
        if raw.is_empty() {
            return Err(LedgerError::InvalidAmount(format!("'{}' is empty", s)));
        }
        let normalized = normalize_amount(raw)?;
        let d = Decimal::from_str(&normalized)
            .map_err(|_| LedgerError::InvalidAmount(format!("'{}' is not a number", raw)))?;
        Self::from_decimal(d)
            .ok_or_else(|| LedgerError::InvalidAmount(format!("'{}' is out of range", raw)))
    }

    /// Like [`Money::from_decimal_str`] but also rejects amounts that are zero
    /// once rounded to cents.
    pub fn parse_positive(s: &str) -> Result<Self> {
        let m = Self::from_decimal_str(s)?;
        if !m.is_positive() {
            return Err(LedgerError::InvalidAmount(format!(
                "'{}' must be greater than zero",
                s.trim()
            )));
        }
        Ok(m)
    }

    pub fn from_decimal(d: Decimal) -> Option<Self> {
        let mut rounded = d.round_dp_with_strategy(MINOR_DIGITS, RoundingStrategy::MidpointAwayFromZero);
        rounded.rescale(MINOR_DIGITS);
        i64::try_from(rounded.mantissa()).ok().map(Money)
    }

    pub fn to_decimal(self) -> Decimal {
        Decimal::new(self.0, MINOR_DIGITS)
    }

    pub fn is_zero(self) -> bool {
        self.0 == 0
    }

    pub fn is_positive(self) -> bool {
        self.0 > 0
    }

    pub fn is_negative(self) -> bool {
        self.0 < 0
    }

    pub fn checked_add(self, other: Money) -> Option<Money> {
        self.0.checked_add(other.0).map(Money)
    }

    pub fn checked_sub(self, other: Money) -> Option<Money> {
        self.0.checked_sub(other.0).map(Money)
    }

    /// Sums `amounts`, or `None` if the total does not fit.
    pub fn checked_sum<I: IntoIterator<Item = Money>>(amounts: I) -> Option<Money> {
        amounts
            .into_iter()
            .try_fold(Money::ZERO, |acc, m| acc.checked_add(m))
    }

    pub fn to_display_string(self, locale: Locale, currency: &Currency) -> String {
        let sign = if self.is_negative() { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        let major = abs / MINOR_PER_MAJOR as u64;
        let minor = abs % MINOR_PER_MAJOR as u64;
        match locale {
            Locale::PtBr => format!(
                "{}{} {},{:02}",
                sign,
                currency.symbol,
                group_thousands(major, '.'),
                minor
            ),
            Locale::EnUs => format!(
                "{}{}{}.{:02}",
                sign,
                currency.symbol,
                group_thousands(major, ','),
                minor
            ),
            Locale::Plain => format!("{}{} {}.{:02}", sign, currency.code, major, minor),
        }
    }
}

/// Rewrites a user-typed amount as `digits[.digits]` for `Decimal::from_str`.
fn normalize_amount(raw: &str) -> Result<String> {
    let invalid = |why: &str| LedgerError::InvalidAmount(format!("'{}' {}", raw, why));
    let body = raw.strip_prefix('+').unwrap_or(raw);
    if body.starts_with('-') {
        return Err(invalid("is negative"));
    }
    if body.is_empty() || !body.chars().all(|c| c.is_ascii_digit() || c == '.' || c == ',') {
        return Err(invalid("is not a number"));
    }

    let dots = body.matches('.').count();
    let commas = body.matches(',').count();
    let (decimal_sep, group_sep) = match (dots, commas) {
        (0, 0) => (None, None),
        (_, 0) if dots > 1 => (None, Some('.')),
        (0, _) if commas > 1 => (None, Some(',')),
        (1, 0) => (Some('.'), None),
        (0, 1) => (Some(','), None),
        _ if body.rfind('.') > body.rfind(',') => (Some('.'), Some(',')),
        _ => (Some(','), Some('.')),
    };

    let (int_part, frac_part) = match decimal_sep {
        Some(sep) => match body.rsplit_once(sep) {
            Some((int_part, frac)) => (int_part, Some(frac)),
            None => (body, None),
        },
        None => (body, None),
    };
    if let Some(sep) = decimal_sep {
        if int_part.contains(sep) {
            return Err(invalid("has more than one decimal separator"));
        }
    }
    if let Some(frac) = frac_part {
        if frac.is_empty() || frac.contains(['.', ',']) {
            return Err(invalid("has a malformed fraction"));
        }
    }

    let int_digits = match group_sep {
        Some(sep) => {
            let groups: Vec<&str> = int_part.split(sep).collect();
            let well_formed = (1..=3).contains(&groups[0].len())
                && !groups[0].starts_with('0')
                && groups[1..].iter().all(|g| g.len() == 3);
            if !well_formed {
                return Err(invalid("has misplaced thousands separators"));
            }
            groups.concat()
        }
        None => int_part.to_string(),
    };

    // "1.234" or "1,234": thousands in one locale, a fraction in the other
    if group_sep.is_none()
        && frac_part.is_some_and(|f| f.len() == 3)
        && (1..=3).contains(&int_digits.len())
        && !int_digits.starts_with('0')
    {
        return Err(invalid("is ambiguous; write it with two decimals"));
    }

    let int_digits = if int_digits.is_empty() { "0".to_string() } else { int_digits };
    Ok(match frac_part {
        Some(frac) => format!("{}.{}", int_digits, frac),
        None => int_digits,
    })
}

fn group_thousands(mut n: u64, sep: char) -> String {
    if n == 0 {
        return "0".into();
    }
    let mut groups = Vec::new();
    while n > 0 {
        groups.push(n % 1000);
        n /= 1000;
    }
    let mut out = String::new();
    for (i, g) in groups.iter().rev().enumerate() {
        if i == 0 {
            out.push_str(&g.to_string());
        } else {
            out.push(sep);
            out.push_str(&format!("{:03}", g));
        }
    }
    out
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.is_negative() { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        write!(
            f,
            "{}{}.{:02}",
            sign,
            abs / MINOR_PER_MAJOR as u64,
            abs % MINOR_PER_MAJOR as u64
        )
    }
}

impl PartialOrd for Money {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Money {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.cmp(&other.0)
    }
}

impl Add for Money {
    type Output = Money;

    fn add(self, rhs: Money) -> Money {
        self.checked_add(rhs).expect("overflow when adding amounts")
    }
}

impl Sub for Money {
    type Output = Money;

    fn sub(self, rhs: Money) -> Money {
        self.checked_sub(rhs).expect("overflow when subtracting amounts")
    }
}

impl Neg for Money {
    type Output = Money;

    fn neg(self) -> Money {
        Money(-self.0)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Money {
        iter.fold(Money::ZERO, |acc, m| acc + m)
    }
}

// Serialized as a decimal string ("250.00") so JSON consumers never see floats.
impl Serialize for Money {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Money {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        let d = Decimal::from_str(s.trim()).map_err(serde::de::Error::custom)?;
        Money::from_decimal(d).ok_or_else(|| serde::de::Error::custom("amount out of range"))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Currency {
    pub code: &'static str,
    pub symbol: &'static str,
}

const CURRENCIES: &[Currency] = &[
    Currency { code: "BRL", symbol: "R$" },
    Currency { code: "USD", symbol: "$" },
    Currency { code: "EUR", symbol: "€" },
    Currency { code: "GBP", symbol: "£" },
];

impl Currency {
    pub fn from_code(code: &str) -> Result<Currency> {
        let code = code.trim().to_uppercase();
        CURRENCIES
            .iter()
            .find(|c| c.code == code)
            .cloned()
            .ok_or_else(|| {
                LedgerError::InvalidSetting(format!(
                    "unsupported currency '{}' (expected one of BRL, USD, EUR, GBP)",
                    code
                ))
            })
    }

    pub fn brl() -> Currency {
        CURRENCIES[0].clone()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Locale {
    #[default]
    PtBr,
    EnUs,
    Plain,
}

impl Locale {
    pub fn parse(s: &str) -> Result<Locale> {
        match s.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "pt-br" => Ok(Locale::PtBr),
            "en-us" => Ok(Locale::EnUs),
            "plain" | "c" => Ok(Locale::Plain),
            other => Err(LedgerError::InvalidSetting(format!(
                "unsupported locale '{}' (expected pt-BR, en-US or plain)",
                other
            ))),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Locale::PtBr => "pt-BR",
            Locale::EnUs => "en-US",
            Locale::Plain => "plain",
        }
    }
}
