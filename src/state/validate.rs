use std::collections::HashSet;
use std::fmt;

use serde_json::{Map, Value};

use crate::foundation::error::PinmentError;
use crate::state::model::{Category, DeviceClass, Env, LegacyPin, LegacyState, Pin, Reply, State};
use crate::state::version::{SchemaVersion, VersionedState};

/// One step of a JSON path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchemaPathElem {
    /// Object member.
    Field(&'static str),
    /// Array element.
    Index(usize),
}

/// A single schema violation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaError {
    /// Where the violation is, from the root.
    pub path: Vec<SchemaPathElem>,
    /// What is wrong.
    pub message: String,
}

impl SchemaError {
    fn at(path: &[SchemaPathElem], message: impl Into<String>) -> Self {
        Self {
            path: path.to_vec(),
            message: message.into(),
        }
    }

    /// The path as `$.pins[0].ox`.
    pub fn path_string(&self) -> String {
        format_path(&self.path)
    }
}

impl fmt::Display for SchemaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.path.is_empty() {
            return write!(f, "{}", self.message);
        }
        write!(f, "{}: {}", format_path(&self.path), self.message)
    }
}

fn format_path(path: &[SchemaPathElem]) -> String {
    let mut s = String::from("$");
    for p in path {
        match *p {
            SchemaPathElem::Field(name) => {
                s.push('.');
                s.push_str(name);
            }
            SchemaPathElem::Index(i) => {
                s.push('[');
                s.push_str(&i.to_string());
                s.push(']');
            }
        }
    }
    s
}

/// Every violation found in one input, in document order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaErrors {
    /// Individual violations; never empty.
    pub errors: Vec<SchemaError>,
}

impl fmt::Display for SchemaErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, e) in self.errors.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{e}")?;
        }
        Ok(())
    }
}

impl std::error::Error for SchemaErrors {}

impl From<SchemaErrors> for PinmentError {
    fn from(e: SchemaErrors) -> Self {
        PinmentError::validation(e.to_string())
    }
}

/// Validate `raw` against the schema version it declares, without migrating.
pub fn parse_versioned(raw: &Value) -> Result<VersionedState, SchemaErrors> {
    let mut ck = Checker::default();
    let Some(root) = raw.as_object() else {
        ck.error("state must be an object");
        return Err(ck.finish_err());
    };

    let parsed = match root.get("v").and_then(SchemaVersion::from_value) {
        Some(SchemaVersion::V1) => VersionedState::Legacy(check_v1(&mut ck, root)),
        Some(SchemaVersion::V2) => VersionedState::Current(check_v2(&mut ck, root)),
        None => {
            ck.field("v", |ck| ck.error("unsupported schema version"));
            return Err(ck.finish_err());
        }
    };

    if ck.errors.is_empty() {
        Ok(parsed)
    } else {
        Err(ck.finish_err())
    }
}

/// Validate and migrate, reporting every violation.
pub fn validate_detailed(raw: &Value) -> Result<State, SchemaErrors> {
    parse_versioned(raw).map(VersionedState::into_current)
}

/// Validate and migrate `raw`; `None` when anything is wrong.
///
/// Validation is all-or-nothing: one bad pin rejects the whole state.
#[tracing::instrument(level = "debug", skip_all)]
pub fn validate(raw: &Value) -> Option<State> {
    match validate_detailed(raw) {
        Ok(state) => Some(state),
        Err(e) => {
            tracing::debug!(violations = e.errors.len(), error = %e, "state rejected");
            None
        }
    }
}

fn check_v1(ck: &mut Checker, root: &Map<String, Value>) -> LegacyState {
    let url = ck.required_string(root, "url");
    let viewport = ck.required_u32(root, "viewport");
    let pins = ck.array(root, "pins", |ck, pin| LegacyPin {
        id: ck.pin_id(pin),
        x: ck.required_ratio(pin, "x"),
        y: ck.required_number(pin, "y"),
        text: ck.required_string(pin, "text"),
        author: ck.optional_string(pin, "author"),
    });
    ck.unique_ids(pins.iter().map(|(i, p)| (*i, p.id)));
    LegacyState {
        url,
        viewport,
        pins: pins.into_iter().map(|(_, p)| p).collect(),
    }
}

fn check_v2(ck: &mut Checker, root: &Map<String, Value>) -> State {
    let url = ck.required_string(root, "url");
    let viewport = ck.required_u32(root, "viewport");
    let env = ck.field("env", |ck| match root.get("env") {
        None | Some(Value::Null) => None,
        Some(Value::Object(env)) => Some(check_env(ck, env)),
        Some(_) => {
            ck.error("must be an object or null");
            None
        }
    });
    let pins = ck.array(root, "pins", check_pin);
    ck.unique_ids(pins.iter().map(|(i, p)| (*i, p.id)));
    State {
        v: SchemaVersion::V2.number(),
        url,
        viewport,
        env,
        pins: pins.into_iter().map(|(_, p)| p).collect(),
    }
}

fn check_pin(ck: &mut Checker, pin: &Map<String, Value>) -> Pin {
    Pin {
        id: ck.pin_id(pin),
        s: ck.nullable_string(pin, "s"),
        ox: ck.nullable_ratio(pin, "ox"),
        oy: ck.nullable_ratio(pin, "oy"),
        fx: ck.required_number(pin, "fx"),
        fy: ck.required_number(pin, "fy"),
        author: ck.optional_string(pin, "author"),
        text: ck.required_string(pin, "text"),
        c: ck.optional(pin, "c", |ck, v| {
            let c = v.as_str().and_then(Category::from_wire);
            if c.is_none() {
                ck.error("must be one of text, layout, missing, question");
            }
            c
        }),
        resolved: ck.optional(pin, "resolved", |ck, v| {
            let b = v.as_bool();
            if b.is_none() {
                ck.error("must be a boolean");
            }
            b
        }),
        replies: ck.optional(pin, "replies", |ck, v| {
            let Some(items) = v.as_array() else {
                ck.error("must be an array");
                return None;
            };
            Some(ck.elements(items, |ck, reply| Reply {
                author: ck.optional_string(reply, "author"),
                text: ck.required_string(reply, "text"),
            }))
        }),
    }
}

fn check_env(ck: &mut Checker, env: &Map<String, Value>) -> Env {
    let ua = ck.required_string(env, "ua");
    let vp = ck.field("vp", |ck| {
        let pair = env.get("vp").and_then(Value::as_array).and_then(|items| {
            match items.as_slice() {
                [w, h] => Some([as_whole::<u32>(w)?, as_whole::<u32>(h)?]),
                _ => None,
            }
        });
        pair.unwrap_or_else(|| {
            ck.error("must be a [width, height] pair of non-negative integers");
            [0, 0]
        })
    });
    let dt = ck.field("dt", |ck| {
        env.get("dt")
            .and_then(Value::as_str)
            .and_then(DeviceClass::from_code)
            .unwrap_or_else(|| {
                ck.error("must be one of d, t, m");
                DeviceClass::Desktop
            })
    });
    Env { ua, vp, dt }
}

/// Whole JSON number that fits `T`. `3.0` counts as whole.
fn as_whole<T: TryFrom<u64>>(v: &Value) -> Option<T> {
    let n = match v.as_u64() {
        Some(n) => n,
        None => {
            let f = v.as_f64()?;
            if f.fract() != 0.0 || f < 0.0 || f > u64::MAX as f64 {
                return None;
            }
            f as u64
        }
    };
    T::try_from(n).ok()
}

/// Collects violations while walking a raw state.
///
/// Accessors always return a value so the walk can continue past the first problem; whatever
/// they return after recording an error is discarded.
#[derive(Default)]
struct Checker {
    path: Vec<SchemaPathElem>,
    errors: Vec<SchemaError>,
}

impl Checker {
    fn error(&mut self, message: impl Into<String>) {
        self.errors.push(SchemaError::at(&self.path, message));
    }

    fn finish_err(self) -> SchemaErrors {
        SchemaErrors {
            errors: self.errors,
        }
    }

    fn scoped<T>(&mut self, elem: SchemaPathElem, f: impl FnOnce(&mut Self) -> T) -> T {
        self.path.push(elem);
        let out = f(self);
        self.path.pop();
        out
    }

    fn field<T>(&mut self, name: &'static str, f: impl FnOnce(&mut Self) -> T) -> T {
        self.scoped(SchemaPathElem::Field(name), f)
    }

    /// Absent is fine; present (including `null`) must pass `f`.
    fn optional<T>(
        &mut self,
        obj: &Map<String, Value>,
        name: &'static str,
        f: impl FnOnce(&mut Self, &Value) -> Option<T>,
    ) -> Option<T> {
        let v = obj.get(name)?;
        self.field(name, |ck| f(ck, v))
    }

    fn required<T: Default>(
        &mut self,
        obj: &Map<String, Value>,
        name: &'static str,
        expected: &str,
        f: impl FnOnce(&Value) -> Option<T>,
    ) -> T {
        self.field(name, |ck| match obj.get(name) {
            None => {
                ck.error("is required");
                T::default()
            }
            Some(v) => f(v).unwrap_or_else(|| {
                ck.error(format!("must be {expected}"));
                T::default()
            }),
        })
    }

    fn required_string(&mut self, obj: &Map<String, Value>, name: &'static str) -> String {
        self.required(obj, name, "a string", |v| v.as_str().map(str::to_owned))
    }

    fn required_number(&mut self, obj: &Map<String, Value>, name: &'static str) -> f64 {
        self.required(obj, name, "a number", Value::as_f64)
    }

    fn required_ratio(&mut self, obj: &Map<String, Value>, name: &'static str) -> f64 {
        self.required(obj, name, "a number in [0, 1]", as_ratio)
    }

    fn required_u32(&mut self, obj: &Map<String, Value>, name: &'static str) -> u32 {
        self.required(obj, name, "a non-negative integer", as_whole::<u32>)
    }

    fn pin_id(&mut self, obj: &Map<String, Value>) -> u64 {
        self.required(obj, "id", "a positive integer", |v| {
            as_whole::<u64>(v).filter(|&id| id >= 1)
        })
    }

    fn optional_string(&mut self, obj: &Map<String, Value>, name: &'static str) -> Option<String> {
        self.optional(obj, name, |ck, v| {
            let s = v.as_str().map(str::to_owned);
            if s.is_none() {
                ck.error("must be a string");
            }
            s
        })
    }

    /// Absent and `null` both mean `None`.
    fn nullable<T>(
        &mut self,
        obj: &Map<String, Value>,
        name: &'static str,
        expected: &str,
        f: impl FnOnce(&Value) -> Option<T>,
    ) -> Option<T> {
        match obj.get(name) {
            None | Some(Value::Null) => None,
            Some(v) => self.field(name, |ck| {
                let out = f(v);
                if out.is_none() {
                    ck.error(format!("must be {expected} or null"));
                }
                out
            }),
        }
    }

    fn nullable_string(&mut self, obj: &Map<String, Value>, name: &'static str) -> Option<String> {
        self.nullable(obj, name, "a string", |v| v.as_str().map(str::to_owned))
    }

    fn nullable_ratio(&mut self, obj: &Map<String, Value>, name: &'static str) -> Option<f64> {
        self.nullable(obj, name, "a number in [0, 1]", as_ratio)
    }

    /// Required array of objects. Each checked element keeps its source index.
    fn array<T>(
        &mut self,
        obj: &Map<String, Value>,
        name: &'static str,
        each: impl FnMut(&mut Self, &Map<String, Value>) -> T,
    ) -> Vec<(usize, T)> {
        self.field(name, |ck| match obj.get(name) {
            Some(Value::Array(items)) => ck.indexed_elements(items, each),
            Some(_) => {
                ck.error("must be an array");
                Vec::new()
            }
            None => {
                ck.error("is required");
                Vec::new()
            }
        })
    }

    fn elements<T>(
        &mut self,
        items: &[Value],
        each: impl FnMut(&mut Self, &Map<String, Value>) -> T,
    ) -> Vec<T> {
        self.indexed_elements(items, each)
            .into_iter()
            .map(|(_, t)| t)
            .collect()
    }

    fn indexed_elements<T>(
        &mut self,
        items: &[Value],
        mut each: impl FnMut(&mut Self, &Map<String, Value>) -> T,
    ) -> Vec<(usize, T)> {
        let mut out = Vec::with_capacity(items.len());
        for (i, item) in items.iter().enumerate() {
            self.scoped(SchemaPathElem::Index(i), |ck| match item.as_object() {
                Some(obj) => out.push((i, each(ck, obj))),
                None => ck.error("must be an object"),
            });
        }
        out
    }

    /// Pin ids must be unique within a state. Reported at the later duplicate.
    fn unique_ids(&mut self, ids: impl Iterator<Item = (usize, u64)>) {
        let mut seen = HashSet::new();
        for (i, id) in ids {
            // id 0 is the placeholder for an already-reported bad id
            if id != 0 && !seen.insert(id) {
                self.field("pins", |ck| {
                    ck.scoped(SchemaPathElem::Index(i), |ck| {
                        ck.field("id", |ck| ck.error(format!("duplicate pin id {id}")))
                    })
                });
            }
        }
    }
}

fn as_ratio(v: &Value) -> Option<f64> {
    v.as_f64().filter(|r| (0.0..=1.0).contains(r))
}

#[cfg(test)]
#[path = "../../tests/unit/state/validate.rs"]
mod tests;
