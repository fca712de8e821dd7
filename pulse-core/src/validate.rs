//! Structural validation of snapshots
//!
//! Validation runs over `serde_json::Value` so that snapshots loaded from
//! storage can be checked without first trusting their shape. Typed
//! snapshots go through the same path via [`validate_snapshot`].
//! Unknown fields are always accepted.

use chrono::NaiveDate;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::{
    Label, OurStatus, ProtocolStatus, Severity, SignalSeverity, SignalType, Snapshot, Status,
    Trust, MAX_ALERT_ID_LEN,
};

/// Outcome of a validation pass
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    pub valid: bool,
    pub errors: Vec<String>,
}

impl ValidationReport {
    fn from_errors(errors: Vec<String>) -> Self {
        Self {
            valid: errors.is_empty(),
            errors,
        }
    }
}

/// Validate a typed snapshot
pub fn validate_snapshot(snapshot: &Snapshot) -> ValidationReport {
    match serde_json::to_value(snapshot) {
        Ok(value) => validate_value(&value),
        Err(e) => ValidationReport::from_errors(vec![format!("snapshot: not serializable: {}", e)]),
    }
}

/// Validate an arbitrary JSON snapshot
pub fn validate_value(value: &Value) -> ValidationReport {
    let mut errors = Vec::new();
    let Some(obj) = value.as_object() else {
        return ValidationReport::from_errors(vec!["snapshot: expected an object".to_string()]);
    };

    let mut check = Checker::new(obj, "snapshot", &mut errors);
    check.nullable_uint("crawl");
    check.nullable_date("date");

    for (key, validate) in [
        ("spaces", check_space as EntityCheck),
        ("protocols", check_protocol),
        ("security", check_alert),
        ("signals", check_signal),
    ] {
        match obj.get(key) {
            Some(Value::Array(items)) => {
                for (i, item) in items.iter().enumerate() {
                    errors.extend(validate_entity(item, &format!("{}[{}]", key, i), validate));
                }
            }
            Some(_) => errors.push(format!("snapshot.{}: expected an array", key)),
            None => errors.push(format!("snapshot.{}: missing", key)),
        }
    }

    match obj.get("vitals") {
        Some(vitals) => errors.extend(validate_entity(vitals, "vitals", check_vitals)),
        None => errors.push("snapshot.vitals: missing".to_string()),
    }

    ValidationReport::from_errors(errors)
}

/// Validate a single space object
pub fn validate_space(value: &Value) -> ValidationReport {
    ValidationReport::from_errors(validate_entity(value, "space", check_space))
}

/// Validate a single protocol object
pub fn validate_protocol(value: &Value) -> ValidationReport {
    ValidationReport::from_errors(validate_entity(value, "protocol", check_protocol))
}

/// Validate a single security alert object
pub fn validate_alert(value: &Value) -> ValidationReport {
    ValidationReport::from_errors(validate_entity(value, "security", check_alert))
}

/// Validate a single signal object
pub fn validate_signal(value: &Value) -> ValidationReport {
    ValidationReport::from_errors(validate_entity(value, "signal", check_signal))
}

type EntityCheck = fn(&mut Checker<'_>);

fn validate_entity(value: &Value, path: &str, validate: EntityCheck) -> Vec<String> {
    let mut errors = Vec::new();
    match value.as_object() {
        Some(obj) => validate(&mut Checker::new(obj, path, &mut errors)),
        None => errors.push(format!("{}: expected an object", path)),
    }
    errors
}

fn check_space(c: &mut Checker<'_>) {
    c.non_empty_str("id");
    c.string("name");
    c.string("url");
    c.label::<Status>("status");
    c.label::<Trust>("trust");
    c.nullable_uint("agents");
    c.string("description");
    c.boolean("isNew");
    c.nullable_string("securityNotes");
    if let Some(metrics) = c.obj.get("metrics") {
        if !metrics.is_object() && !metrics.is_null() {
            c.error("metrics", "expected an object");
        }
    }
}

fn check_protocol(c: &mut Checker<'_>) {
    c.non_empty_str("id");
    c.string("name");
    c.string("description");
    c.label::<ProtocolStatus>("status");
    c.nullable_uint("stars");
    c.nullable_uint("partners");
}

fn check_alert(c: &mut Checker<'_>) {
    if let Some(id) = c.non_empty_str("id") {
        if id.chars().count() > MAX_ALERT_ID_LEN {
            c.error("id", &format!("longer than {} characters", MAX_ALERT_ID_LEN));
        }
    }
    c.label::<Severity>("severity");
    c.string("title");
    c.string("summary");
    c.string("detail");
    c.boolean("affectsUs");
    c.nullable_label::<OurStatus>("ourStatus");
    c.nullable_date("firstSeen");
}

fn check_signal(c: &mut Checker<'_>) {
    c.label::<SignalType>("type");
    c.nullable_string("space");
    c.string("summary");
    c.label::<SignalSeverity>("severity");
}

fn check_vitals(c: &mut Checker<'_>) {
    for key in [
        "totalSpaces",
        "activeSpaces",
        "warningSpaces",
        "downSpaces",
        "totalAgentsClaimed",
        "totalAgentsVerified",
        "newSpacesSinceLastCrawl",
    ] {
        c.uint(key);
    }
    match c.obj.get("securityAlerts") {
        Some(Value::Object(counts)) => {
            let path = format!("{}.securityAlerts", c.path);
            let mut inner = Checker::new(counts, &path, c.errors);
            for key in ["critical", "high", "medium", "low"] {
                inner.uint(key);
            }
        }
        Some(_) => c.error("securityAlerts", "expected an object"),
        None => c.error("securityAlerts", "missing"),
    }
}

/// Field-level checks over one JSON object, appending to a shared error list
struct Checker<'a> {
    obj: &'a Map<String, Value>,
    path: &'a str,
    errors: &'a mut Vec<String>,
}

impl<'a> Checker<'a> {
    fn new(obj: &'a Map<String, Value>, path: &'a str, errors: &'a mut Vec<String>) -> Self {
        Self { obj, path, errors }
    }

    fn error(&mut self, field: &str, message: &str) {
        self.errors.push(format!("{}.{}: {}", self.path, field, message));
    }

    fn present(&mut self, field: &str) -> Option<&'a Value> {
        let value = self.obj.get(field);
        if value.is_none() {
            self.error(field, "missing");
        }
        value
    }

    fn string(&mut self, field: &str) -> Option<&'a str> {
        let value = self.present(field)?;
        let s = value.as_str();
        if s.is_none() {
            self.error(field, "expected a string");
        }
        s
    }

    fn non_empty_str(&mut self, field: &str) -> Option<&'a str> {
        let s = self.string(field)?;
        if s.trim().is_empty() {
            self.error(field, "must not be empty");
            return None;
        }
        Some(s)
    }

    fn nullable_string(&mut self, field: &str) {
        if let Some(value) = self.present(field) {
            if !value.is_null() && !value.is_string() {
                self.error(field, "expected a string or null");
            }
        }
    }

    fn boolean(&mut self, field: &str) {
        if let Some(value) = self.present(field) {
            if !value.is_boolean() {
                self.error(field, "expected a boolean");
            }
        }
    }

    fn uint(&mut self, field: &str) {
        if let Some(value) = self.present(field) {
            if value.as_u64().is_none() {
                self.error(field, "expected a non-negative integer");
            }
        }
    }

    fn nullable_uint(&mut self, field: &str) {
        if let Some(value) = self.present(field) {
            if !value.is_null() && value.as_u64().is_none() {
                self.error(field, "expected a non-negative integer or null");
            }
        }
    }

    fn nullable_date(&mut self, field: &str) {
        match self.present(field) {
            Some(Value::Null) | None => {}
            Some(Value::String(s)) if NaiveDate::parse_from_str(s, "%Y-%m-%d").is_ok() => {}
            Some(_) => self.error(field, "expected an ISO date (YYYY-MM-DD) or null"),
        }
    }

    fn label<L: Label>(&mut self, field: &str) {
        if let Some(value) = self.present(field) {
            self.check_label::<L>(field, value);
        }
    }

    fn nullable_label<L: Label>(&mut self, field: &str) {
        if let Some(value) = self.present(field) {
            if !value.is_null() {
                self.check_label::<L>(field, value);
            }
        }
    }

    fn check_label<L: Label>(&mut self, field: &str, value: &Value) {
        let known = value
            .as_str()
            .is_some_and(|s| L::ALL.iter().any(|l| l.as_str() == s));
        if !known {
            let message = format!("expected one of [{}], got {}", L::labels().join(", "), value);
            self.error(field, &message);
        }
    }
}
