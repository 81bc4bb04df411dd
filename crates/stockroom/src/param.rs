//! Bound statement arguments.

use rust_decimal::Decimal;
use serde_json::Value;
use std::str::FromStr;
use std::sync::Arc;
use tokio_postgres::types::{ToSql, Type};

/// A clone-friendly bound value.
///
/// One user input tested against several columns is bound once per marker;
/// cloning a `Param` shares the value instead of copying it.
#[derive(Clone)]
pub struct Param(Arc<dyn ToSql + Send + Sync>);

impl Param {
    /// Create a new parameter from any ToSql value.
    pub fn new<T: ToSql + Send + Sync + 'static>(value: T) -> Self {
        Param(Arc::new(value))
    }

    /// Convert a decoded JSON value into a parameter the column of type `ty`
    /// accepts.
    ///
    /// Returns `None` when the value does not fit the column (a string for an
    /// `int4`, a fraction for an integer, an out-of-range number) or when `ty`
    /// is not a supported column type. `null` binds as a typed NULL.
    pub fn from_json_as(value: &Value, ty: &Type) -> Option<Self> {
        if value.is_null() {
            return Self::typed_null(ty);
        }
        let param = match ty.name() {
            "bool" => Param::new(value.as_bool()?),
            "int2" => Param::new(i16::try_from(value.as_i64()?).ok()?),
            "int4" => Param::new(i32::try_from(value.as_i64()?).ok()?),
            "int8" => Param::new(value.as_i64()?),
            "float4" => Param::new(value.as_f64()? as f32),
            "float8" => Param::new(value.as_f64()?),
            "numeric" => Param::new(json_decimal(value)?),
            "text" | "varchar" | "bpchar" => Param::new(value.as_str()?.to_string()),
            "json" | "jsonb" => Param::new(value.clone()),
            _ => return None,
        };
        Some(param)
    }

    fn typed_null(ty: &Type) -> Option<Self> {
        let param = match ty.name() {
            "bool" => Param::new(None::<bool>),
            "int2" => Param::new(None::<i16>),
            "int4" => Param::new(None::<i32>),
            "int8" => Param::new(None::<i64>),
            "float4" => Param::new(None::<f32>),
            "float8" => Param::new(None::<f64>),
            "numeric" => Param::new(None::<Decimal>),
            "text" | "varchar" | "bpchar" => Param::new(None::<String>),
            "json" | "jsonb" => Param::new(None::<Value>),
            _ => return None,
        };
        Some(param)
    }

    /// Get a reference to the inner value as a ToSql trait object.
    pub fn as_ref(&self) -> &(dyn ToSql + Sync) {
        &*self.0 as &(dyn ToSql + Sync)
    }
}

impl std::fmt::Debug for Param {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Debug::fmt(&*self.0, f)
    }
}

/// Arguments in bind order; index `i` backs placeholder `$i+1`.
#[derive(Clone, Debug, Default)]
pub struct ParamList {
    params: Vec<Param>,
}

impl ParamList {
    /// Create a new empty parameter list.
    pub fn new() -> Self {
        Self { params: Vec::new() }
    }

    /// Add a parameter and return its 1-based index.
    pub fn push<T: ToSql + Send + Sync + 'static>(&mut self, value: T) -> usize {
        self.push_param(Param::new(value))
    }

    /// Add a pre-wrapped Param and return its 1-based index.
    pub fn push_param(&mut self, param: Param) -> usize {
        self.params.push(param);
        self.params.len()
    }

    /// Get the current parameter count.
    pub fn len(&self) -> usize {
        self.params.len()
    }

    /// Check if the list is empty.
    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Param> {
        self.params.iter()
    }

    /// Get all parameters as references for tokio-postgres.
    pub fn as_refs(&self) -> Vec<&(dyn ToSql + Sync)> {
        self.params.iter().map(|p| p.as_ref()).collect()
    }

    /// Debug renderings of every argument, in bind order.
    pub fn debug_values(&self) -> Vec<String> {
        self.params.iter().map(|p| format!("{p:?}")).collect()
    }
}

/// Numbers keep their decimal text (`9.5` stays exactly `9.5`); strings such
/// as `"0.25"` are accepted too.
fn json_decimal(value: &Value) -> Option<Decimal> {
    let text = match value {
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.trim().to_string(),
        _ => return None,
    };
    Decimal::from_str(&text)
        .or_else(|_| Decimal::from_scientific(&text))
        .ok()
}
