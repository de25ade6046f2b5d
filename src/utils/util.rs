use crate::error::SortxResult;
use log;
use std::{
    fmt::{Binary, Display},
    sync::Once,
};

pub type Result<T> = SortxResult<T>;

#[allow(unused)]
static INIT_LOG: Once = Once::new();

#[allow(unused)]
pub fn init_logger() {
    INIT_LOG.call_once(|| {
        env_logger::builder()
            .filter_level(log::LevelFilter::Trace)
            .is_test(true)
            .init();
    });
}

pub fn handle_error_and_exit(err: impl Display) -> ! {
    log::error!("{err}");
    std::process::exit(1);
}

pub fn format_number_with_commas<T>(n: T) -> String
where
    T: Display + Binary,
{
    let s = n.to_string();
    let (sign, digits) = s.strip_prefix('-').map_or(("", s.as_str()), |d| ("-", d));

    if let 0..=3 = digits.len() {
        return s;
    }

    let mut result = String::with_capacity(digits.len() + (digits.len() - 1) / 3 + sign.len());
    for (digit_count, c) in digits.chars().rev().enumerate() {
        if digit_count > 0 && digit_count % 3 == 0 {
            result.push(',');
        }
        result.push(c);
    }

    result = result.chars().rev().collect();
    if !sign.is_empty() {
        result.insert_str(0, sign);
    }

    result
}
