//! Extension filters and functions available to every template, on top of
//! minijinja's builtins (`upper`, `lower`, `title`, `trim`, `default`, ...).

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime};
use cruet::Inflector;
use minijinja::{Environment, Error, ErrorKind, Value};
use std::fmt::Write;

/// Names callable as global functions. They are never treated as placeholders.
pub const GLOBAL_FUNCTIONS: &[&str] = &["now", "env", "range", "dict", "debug", "namespace"];

const DEFAULT_DATE_FORMAT: &str = "%Y-%m-%d";

/// Registers the extension library on `env`.
pub fn register(env: &mut Environment<'static>) {
    env.add_filter("snake_case", snake_case);
    env.add_filter("camel_case", camel_case);
    env.add_filter("pascal_case", pascal_case);
    env.add_filter("kebab_case", kebab_case);
    env.add_filter("screaming_snake_case", screaming_snake_case);
    env.add_filter("title_case", title_case);
    env.add_filter("repeat", repeat);
    env.add_filter("trim_prefix", trim_prefix);
    env.add_filter("trim_suffix", trim_suffix);
    env.add_filter("quote", quote);
    env.add_filter("squote", squote);
    env.add_filter("nospace", nospace);
    env.add_filter("date", date);
    env.add_filter("add", add);
    env.add_filter("sub", sub);
    env.add_filter("mul", mul);
    env.add_filter("div", div);
    env.add_filter("mod", modulo);

    env.add_function("now", now);
    env.add_function("env", env_var);
}

fn snake_case(value: &str) -> String {
    value.to_snake_case()
}

fn camel_case(value: &str) -> String {
    value.to_camel_case()
}

fn pascal_case(value: &str) -> String {
    value.to_pascal_case()
}

fn kebab_case(value: &str) -> String {
    value.to_kebab_case()
}

fn screaming_snake_case(value: &str) -> String {
    value.to_screaming_snake_case()
}

fn title_case(value: &str) -> String {
    value.to_title_case()
}

fn repeat(value: &str, count: usize) -> String {
    value.repeat(count)
}

fn trim_prefix(value: &str, prefix: &str) -> String {
    value.strip_prefix(prefix).unwrap_or(value).to_string()
}

fn trim_suffix(value: &str, suffix: &str) -> String {
    value.strip_suffix(suffix).unwrap_or(value).to_string()
}

fn quote(value: &Value) -> String {
    format!("\"{value}\"")
}

fn squote(value: &Value) -> String {
    format!("'{value}'")
}

fn nospace(value: &Value) -> String {
    value.to_string().chars().filter(|c| !c.is_whitespace()).collect()
}

/// Reformats an RFC 3339 timestamp, `YYYY-MM-DD HH:MM:SS` or `YYYY-MM-DD` string.
fn date(value: &str, format: Option<&str>) -> Result<String, Error> {
    let format = format.unwrap_or(DEFAULT_DATE_FORMAT);
    let mut out = String::new();
    let written = if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        write!(out, "{}", dt.format(format))
    } else if let Ok(dt) = NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S") {
        write!(out, "{}", dt.format(format))
    } else if let Ok(d) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        write!(out, "{}", d.format(format))
    } else {
        return Err(Error::new(
            ErrorKind::InvalidOperation,
            format!("cannot parse '{value}' as a date"),
        ));
    };
    written.map_err(|_| invalid_format(format))?;
    Ok(out)
}

fn now(format: Option<&str>) -> Result<String, Error> {
    let format = format.unwrap_or(DEFAULT_DATE_FORMAT);
    let mut out = String::new();
    write!(out, "{}", Local::now().format(format)).map_err(|_| invalid_format(format))?;
    Ok(out)
}

fn env_var(name: &str, default: Option<&str>) -> String {
    std::env::var(name).unwrap_or_else(|_| default.unwrap_or_default().to_string())
}

fn invalid_format(format: &str) -> Error {
    Error::new(
        ErrorKind::InvalidOperation,
        format!("invalid date format '{format}'"),
    )
}

// Parameters are stored as strings, so arithmetic accepts numeric strings too.
fn to_int(value: &Value) -> Result<i64, Error> {
    if let Some(s) = value.as_str() {
        return s.trim().parse().map_err(|_| not_a_number(value));
    }
    i64::try_from(value.clone()).map_err(|_| not_a_number(value))
}

fn not_a_number(value: &Value) -> Error {
    Error::new(
        ErrorKind::InvalidOperation,
        format!("cannot use '{value}' as a number"),
    )
}

fn add(value: &Value, other: &Value) -> Result<i64, Error> {
    Ok(to_int(value)? + to_int(other)?)
}

fn sub(value: &Value, other: &Value) -> Result<i64, Error> {
    Ok(to_int(value)? - to_int(other)?)
}

fn mul(value: &Value, other: &Value) -> Result<i64, Error> {
    Ok(to_int(value)? * to_int(other)?)
}

fn div(value: &Value, other: &Value) -> Result<i64, Error> {
    let divisor = to_int(other)?;
    if divisor == 0 {
        return Err(Error::new(ErrorKind::InvalidOperation, "division by zero"));
    }
    Ok(to_int(value)? / divisor)
}

fn modulo(value: &Value, other: &Value) -> Result<i64, Error> {
    let divisor = to_int(other)?;
    if divisor == 0 {
        return Err(Error::new(ErrorKind::InvalidOperation, "division by zero"));
    }
    Ok(to_int(value)? % divisor)
}
