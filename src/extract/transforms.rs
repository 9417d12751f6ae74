//! Built-in transforms for column path programs
//!
//! Every constructor returns a ready-to-use [`PathStep`]. Transforms treat an
//! absent input (`Value::Null`) as absent output unless noted otherwise.

use super::{extract, path, PathStep, Transform};
use chrono::{DateTime, Utc};
use serde_json::Value;

const MINUTE: u64 = 60;
const HOUR: u64 = 60 * MINUTE;
const DAY: u64 = 24 * HOUR;

/// Clock units below a day, largest first
const CLOCK_UNITS: [u64; 3] = [HOUR, MINUTE, 1];

/// Format a number of seconds as a compact clock.
///
/// `SS` below a minute, `MM:SS` below an hour, `HH:MM:SS` below a day and
/// `<days> HH:MM:SS` from there on. Every field is zero-padded to two digits
/// except the leading day count.
pub fn human_duration(total_seconds: u64) -> String {
    if total_seconds >= DAY {
        return format!(
            "{} {}",
            total_seconds / DAY,
            clock(total_seconds % DAY, CLOCK_UNITS.len())
        );
    }

    let fields = CLOCK_UNITS
        .iter()
        .position(|unit| total_seconds >= *unit)
        .map(|largest| CLOCK_UNITS.len() - largest)
        .unwrap_or(1);
    clock(total_seconds, fields)
}

fn clock(mut seconds: u64, fields: usize) -> String {
    let mut parts = Vec::with_capacity(fields);
    for unit in &CLOCK_UNITS[CLOCK_UNITS.len() - fields..] {
        parts.push(format!("{:02}", seconds / unit));
        seconds %= unit;
    }
    parts.join(":")
}

/// Elapsed time since an RFC 3339 timestamp, measured when the cell is rendered
pub fn age() -> PathStep {
    Transform::new("age", |value| age_from(value, Utc::now())).into()
}

/// Elapsed time since an RFC 3339 timestamp, measured against a fixed instant
pub fn age_at(now: DateTime<Utc>) -> PathStep {
    Transform::new("age", move |value| age_from(value, now)).into()
}

fn age_from(value: &Value, now: DateTime<Utc>) -> Result<Value, String> {
    let Some(raw) = value.as_str() else {
        return match value {
            Value::Null => Ok(Value::Null),
            other => Err(format!("expected a timestamp string, got {}", other)),
        };
    };
    let timestamp = DateTime::parse_from_rfc3339(raw)
        .map_err(|e| format!("invalid timestamp {:?}: {}", raw, e))?;
    // Clock skew can put creation slightly in the future
    let elapsed = now
        .signed_duration_since(timestamp.with_timezone(&Utc))
        .num_seconds()
        .max(0) as u64;
    Ok(Value::String(human_duration(elapsed)))
}

/// First `address` whose `type` matches, from an array of `{type, address}` records
pub fn address_of_type(address_type: &'static str) -> PathStep {
    Transform::new("address_of_type", move |value| {
        let Some(addresses) = as_array_or_absent(value)? else {
            return Ok(Value::Null);
        };
        Ok(addresses
            .iter()
            .find(|entry| entry.get("type").and_then(Value::as_str) == Some(address_type))
            .and_then(|entry| entry.get("address"))
            .cloned()
            .unwrap_or(Value::Null))
    })
    .into()
}

/// Sum of `restartCount` over an array of container statuses, as a decimal string
pub fn restart_count() -> PathStep {
    Transform::new("restart_count", |value| {
        let Some(statuses) = as_array_or_absent(value)? else {
            return Ok(Value::Null);
        };
        let total: u64 = statuses
            .iter()
            .map(|status| {
                status
                    .get("restartCount")
                    .and_then(Value::as_u64)
                    .unwrap_or(0)
            })
            .sum();
        Ok(Value::String(total.to_string()))
    })
    .into()
}

/// `ready/total` over an array of container statuses
pub fn ready_containers() -> PathStep {
    Transform::new("ready_containers", |value| {
        let Some(statuses) = as_array_or_absent(value)? else {
            return Ok(Value::Null);
        };
        let ready = statuses
            .iter()
            .filter(|status| status.get("ready").and_then(Value::as_bool) == Some(true))
            .count();
        Ok(Value::String(format!("{}/{}", ready, statuses.len())))
    })
    .into()
}

/// Service ports rendered like kubectl: `port[:nodePort]/protocol`, comma-joined
pub fn port_summary() -> PathStep {
    Transform::new("port_summary", |value| {
        let Some(ports) = as_array_or_absent(value)? else {
            return Ok(Value::Null);
        };
        let rendered: Vec<String> = ports
            .iter()
            .filter_map(|port| {
                let number = port.get("port")?.as_u64()?;
                let protocol = port
                    .get("protocol")
                    .and_then(Value::as_str)
                    .unwrap_or("TCP");
                Some(match port.get("nodePort").and_then(Value::as_u64) {
                    Some(node_port) => format!("{}:{}/{}", number, node_port, protocol),
                    None => format!("{}/{}", number, protocol),
                })
            })
            .collect();
        Ok(Value::String(rendered.join(",")))
    })
    .into()
}

/// Endpoint subsets rendered as `ip:port` pairs, comma-joined
pub fn endpoint_summary() -> PathStep {
    Transform::new("endpoint_summary", |value| {
        let Some(subsets) = as_array_or_absent(value)? else {
            return Ok(Value::Null);
        };
        let mut endpoints = Vec::new();
        for subset in subsets {
            let ips: Vec<&str> = subset
                .get("addresses")
                .and_then(Value::as_array)
                .map(|addrs| {
                    addrs
                        .iter()
                        .filter_map(|a| a.get("ip").and_then(Value::as_str))
                        .collect()
                })
                .unwrap_or_default();
            let ports: Vec<u64> = subset
                .get("ports")
                .and_then(Value::as_array)
                .map(|ports| {
                    ports
                        .iter()
                        .filter_map(|p| p.get("port").and_then(Value::as_u64))
                        .collect()
                })
                .unwrap_or_default();
            for ip in &ips {
                if ports.is_empty() {
                    endpoints.push(ip.to_string());
                }
                for port in &ports {
                    endpoints.push(format!("{}:{}", ip, port));
                }
            }
        }
        Ok(Value::String(endpoints.join(",")))
    })
    .into()
}

/// Number of elements in an array or entries in a map
pub fn count() -> PathStep {
    Transform::new("count", |value| match value {
        Value::Null => Ok(Value::from(0)),
        Value::Array(items) => Ok(Value::from(items.len())),
        Value::Object(map) => Ok(Value::from(map.len())),
        other => Err(format!("cannot count {}", other)),
    })
    .into()
}

/// Map every element of an array to one of its fields, dropping elements without it
pub fn pluck(key: &'static str) -> PathStep {
    Transform::new("pluck", move |value| {
        let Some(items) = as_array_or_absent(value)? else {
            return Ok(Value::Null);
        };
        Ok(Value::Array(
            items
                .iter()
                .filter_map(|item| item.get(key))
                .filter(|v| !v.is_null())
                .cloned()
                .collect(),
        ))
    })
    .into()
}

/// Join the text of every array element with a separator
pub fn join(separator: &'static str) -> PathStep {
    Transform::new("join", move |value| {
        let Some(items) = as_array_or_absent(value)? else {
            return Ok(Value::Null);
        };
        let parts: Vec<String> = items
            .iter()
            .map(|item| super::render_value(item, super::FormatHint::Text))
            .filter(|s| !s.is_empty())
            .collect();
        Ok(Value::String(parts.join(separator)))
    })
    .into()
}

/// `status` of the condition with the given `type`
pub fn condition_status(condition_type: &'static str) -> PathStep {
    Transform::new("condition_status", move |value| {
        let Some(conditions) = as_array_or_absent(value)? else {
            return Ok(Value::Null);
        };
        Ok(conditions
            .iter()
            .find(|c| c.get("type").and_then(Value::as_str) == Some(condition_type))
            .and_then(|c| c.get("status"))
            .cloned()
            .unwrap_or(Value::Null))
    })
    .into()
}

/// `a/b` of two numeric fields addressed by dotted paths relative to the current value.
/// Missing numbers count as zero.
pub fn ratio(numerator: &'static str, denominator: &'static str) -> PathStep {
    let numerator_path = path(numerator);
    let denominator_path = path(denominator);
    Transform::new("ratio", move |value| {
        if value.is_null() {
            return Ok(Value::Null);
        }
        let read = |steps: &[PathStep]| -> Result<u64, String> {
            let v = extract(steps, value).map_err(|e| e.to_string())?;
            Ok(v.as_u64().unwrap_or(0))
        };
        Ok(Value::String(format!(
            "{}/{}",
            read(numerator_path.as_slice())?,
            read(denominator_path.as_slice())?
        )))
    })
    .into()
}

/// Object reference `{kind, name}` rendered as `kind/name`
pub fn object_ref() -> PathStep {
    Transform::new("object_ref", |value| {
        if value.is_null() {
            return Ok(Value::Null);
        }
        let kind = value.get("kind").and_then(Value::as_str).unwrap_or_default();
        let name = value.get("name").and_then(Value::as_str).unwrap_or_default();
        if kind.is_empty() {
            return Ok(Value::String(name.to_string()));
        }
        Ok(Value::String(format!("{}/{}", kind.to_lowercase(), name)))
    })
    .into()
}

fn as_array_or_absent(value: &Value) -> Result<Option<&Vec<Value>>, String> {
    match value {
        Value::Null => Ok(None),
        Value::Array(items) => Ok(Some(items)),
        other => Err(format!("expected an array, got {}", other)),
    }
}
