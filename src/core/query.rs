//! Translation of client-supplied query parameters into store filters
//! and pagination windows.
//!
//! Reserved keys `page` and `limit` are stripped before filter
//! translation. Remaining keys become equality conditions, or a
//! comparison condition when written as `field[op]` with `op` one of
//! `gt`, `gte`, `lt`, `lte`, `in`.

use std::collections::HashMap;

use libris_http::{PageRef, Pagination};
use libris_store::{Condition, Filter, Predicate, Window};
use serde_json::{json, Value};

use crate::core::error::CoreError;

pub const DEFAULT_PAGE: u64 = 1;
pub const DEFAULT_LIMIT: u64 = 10;

const RESERVED_KEYS: &[&str] = &["page", "limit"];

/// Sanitized pagination parameters. Non-parseable or non-positive
/// client values fall back to the defaults; a zero or negative window
/// can never reach the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageParams {
    pub page: u64,
    pub limit: u64,
}

impl Default for PageParams {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            limit: DEFAULT_LIMIT,
        }
    }
}

impl PageParams {
    pub fn from_params(params: &HashMap<String, String>) -> Self {
        Self {
            page: parse_positive(params.get("page"), DEFAULT_PAGE),
            limit: parse_positive(params.get("limit"), DEFAULT_LIMIT),
        }
    }

    pub fn window(&self) -> Window {
        Window {
            offset: (self.page - 1) * self.limit,
            limit: self.limit,
        }
    }

    /// Compute adjacent-page links against the un-windowed total.
    pub fn links(&self, total: u64) -> Pagination {
        let start = (self.page - 1) * self.limit;
        let end = self.page * self.limit;

        Pagination {
            next: (end < total).then(|| PageRef {
                page: self.page + 1,
                limit: self.limit,
            }),
            prev: (start > 0).then(|| PageRef {
                page: self.page - 1,
                limit: self.limit,
            }),
        }
    }
}

fn parse_positive(raw: Option<&String>, default: u64) -> u64 {
    raw.and_then(|s| s.trim().parse::<i64>().ok())
        .filter(|n| *n > 0)
        .map(|n| n as u64)
        .unwrap_or(default)
}

/// A parsed list query: store filter plus pagination.
#[derive(Debug, Clone)]
pub struct ListQuery {
    pub filter: Filter,
    pub page: PageParams,
}

impl ListQuery {
    pub fn from_params(params: &HashMap<String, String>) -> Result<Self, CoreError> {
        let mut conditions = Vec::new();

        for (key, raw) in params {
            if RESERVED_KEYS.contains(&key.as_str()) {
                continue;
            }

            let (field, op) = split_operator(key);
            let predicate = match op {
                None => Predicate::Eq(coerce(raw)),
                Some("gt") => Predicate::Gt(coerce(raw)),
                Some("gte") => Predicate::Gte(coerce(raw)),
                Some("lt") => Predicate::Lt(coerce(raw)),
                Some("lte") => Predicate::Lte(coerce(raw)),
                Some("in") => Predicate::In(raw.split(',').map(|v| coerce(v.trim())).collect()),
                Some(other) => {
                    return Err(CoreError::BadRequest(format!(
                        "unsupported filter operator '{other}'"
                    )));
                }
            };
            conditions.push(Condition::new(field, predicate));
        }

        // HashMap iteration order is arbitrary; sort for determinism.
        conditions.sort_by(|a, b| a.field.cmp(&b.field));

        Ok(Self {
            filter: Filter::all(conditions),
            page: PageParams::from_params(params),
        })
    }
}

/// Split `publicationYear[gte]` into `("publicationYear", Some("gte"))`.
/// A key without a bracket suffix is a plain equality field.
fn split_operator(key: &str) -> (&str, Option<&str>) {
    if let Some(rest) = key.strip_suffix(']') {
        if let Some((field, op)) = rest.split_once('[') {
            if !field.is_empty() && !op.is_empty() {
                return (field, Some(op));
            }
        }
    }
    (key, None)
}

/// Coerce a raw query value into the JSON type it will be compared
/// against: integer, float, boolean, or string, in that order.
fn coerce(raw: &str) -> Value {
    if let Ok(n) = raw.parse::<i64>() {
        return json!(n);
    }
    if let Ok(f) = raw.parse::<f64>() {
        return json!(f);
    }
    match raw {
        "true" => json!(true),
        "false" => json!(false),
        _ => json!(raw),
    }
}
