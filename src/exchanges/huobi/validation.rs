//! Local parameter checks, run before any request is sent.

use crate::core::errors::ExchangeError;
use rust_decimal::Decimal;
use std::fmt::Display;
use std::ops::RangeInclusive;

pub fn ensure_not_empty(name: &str, value: &str) -> Result<(), ExchangeError> {
    if value.trim().is_empty() {
        return Err(ExchangeError::validation(format!("{} can not be empty", name)));
    }
    Ok(())
}

pub fn ensure_symbol(symbol: &str) -> Result<(), ExchangeError> {
    ensure_not_empty("symbol", symbol)
}

pub fn ensure_range<T>(name: &str, value: T, range: RangeInclusive<T>) -> Result<(), ExchangeError>
where
    T: PartialOrd + Display + Copy,
{
    if !range.contains(&value) {
        return Err(ExchangeError::validation(format!(
            "Wrong {} value \"{}\", expected {}..={}",
            name,
            value,
            range.start(),
            range.end()
        )));
    }
    Ok(())
}

pub fn ensure_positive(name: &str, value: Decimal) -> Result<(), ExchangeError> {
    if value <= Decimal::ZERO {
        return Err(ExchangeError::validation(format!(
            "{} must be positive, got {}",
            name, value
        )));
    }
    Ok(())
}

pub fn ensure_non_empty_list<T>(name: &str, values: &[T]) -> Result<(), ExchangeError> {
    if values.is_empty() {
        return Err(ExchangeError::validation(format!("{} can not be empty", name)));
    }
    Ok(())
}
