use anyhow::{Context, Result, anyhow, bail};
use schemars::Schema;
use serde_json::{Map, Value};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    String,
    Integer,
    Number,
    Boolean,
}

/// One parameter of a registry kind, as described by its JSON schema.
#[derive(Debug, Clone)]
pub struct FieldSpec {
    pub name: String,
    pub title: String,
    pub description: Option<String>,
    pub required: bool,
    /// `None` for fields whose schema is a union of shapes.
    pub kind: Option<FieldKind>,
    pub nullable: bool,
    pub allowed: Option<Vec<Value>>,
    pub default: Option<Value>,
    pub min: Option<f64>,
    pub max: Option<f64>,
}

impl FieldSpec {
    /// Why `value` cannot be used for this field, if it cannot.
    pub fn reject_reason(&self, value: &Value) -> Option<String> {
        if value.is_null() {
            return (!self.nullable && self.kind.is_some())
                .then(|| format!("'{}' cannot be null", self.name));
        }
        if let Some(kind) = self.kind {
            let ok = match kind {
                FieldKind::String => value.is_string(),
                FieldKind::Integer => value.is_u64() || value.is_i64(),
                FieldKind::Number => value.is_number(),
                FieldKind::Boolean => value.is_boolean(),
            };
            if !ok {
                return Some(format!("'{}' expects {kind:?}, got {value}", self.name));
            }
        }
        if let Some(allowed) = &self.allowed {
            if !allowed.contains(value) {
                return Some(format!("'{}' must be one of {allowed:?}, got {value}", self.name));
            }
        }
        if let Some(x) = value.as_f64() {
            if self.min.is_some_and(|m| x < m) || self.max.is_some_and(|m| x > m) {
                return Some(format!(
                    "'{}' = {value} is outside [{:?}, {:?}]",
                    self.name, self.min, self.max
                ));
            }
        }
        None
    }
}

/// Field specs of the `params` object of the branch tagged `kind_key`.
pub fn specs_for_kind(root: &Schema, kind_key: &str) -> Result<Vec<FieldSpec>> {
    let root_obj = root.as_object().context("root schema is not an object")?;

    let alts = root_obj
        .get("oneOf")
        .or_else(|| root_obj.get("anyOf"))
        .and_then(|v| v.as_array())
        .context("missing oneOf/anyOf")?;

    for branch in alts {
        let bobj = branch.as_object().context("branch is not object")?;
        let props = match bobj.get("properties").and_then(|v| v.as_object()) {
            Some(p) => p,
            None => continue,
        };

        if !discriminant_matches(props, kind_key) {
            continue;
        }

        let Some(params_obj) = props
            .get("params")
            .and_then(|v| v.as_object())
            .and_then(|o| resolve_ref_obj(root_obj, o))
        else {
            return Ok(vec![]);
        };

        let Some(params_props) = params_obj.get("properties").and_then(|v| v.as_object()) else {
            return Ok(vec![]);
        };

        let required: Vec<&str> = params_obj
            .get("required")
            .and_then(|v| v.as_array())
            .map(|a| a.iter().filter_map(|v| v.as_str()).collect())
            .unwrap_or_default();

        let mut out = Vec::new();
        for (name, field_schema) in params_props {
            let outer = field_schema
                .as_object()
                .context("field schema not object")?;
            let fs_obj = resolve_ref_obj(root_obj, outer)
                .ok_or_else(|| anyhow!("failed to resolve field $ref for '{name}'"))?;

            // annotations live next to the $ref, the shape behind it
            let title = outer
                .get("title")
                .or_else(|| fs_obj.get("title"))
                .and_then(|v| v.as_str())
                .unwrap_or(name)
                .to_string();
            let description = outer
                .get("description")
                .or_else(|| fs_obj.get("description"))
                .and_then(|v| v.as_str())
                .map(str::to_string);
            let default = outer.get("default").or_else(|| fs_obj.get("default")).cloned();

            let ty = fs_obj.get("type");
            out.push(FieldSpec {
                name: name.clone(),
                title,
                description,
                required: required.contains(&name.as_str()),
                kind: detect_field_kind(ty),
                nullable: is_nullable(ty),
                allowed: fs_obj.get("enum").and_then(|v| v.as_array()).cloned(),
                default,
                min: fs_obj
                    .get("minimum")
                    .or_else(|| fs_obj.get("exclusiveMinimum"))
                    .and_then(|v| v.as_f64()),
                max: fs_obj
                    .get("maximum")
                    .or_else(|| fs_obj.get("exclusiveMaximum"))
                    .and_then(|v| v.as_f64()),
            });
        }

        return Ok(out);
    }

    bail!("no branch found for type={kind_key}");
}

/// Checks every key of `params` against the fields of `kind_key`.
pub fn check_params(root: &Schema, kind_key: &str, params: &Map<String, Value>) -> Result<()> {
    let specs = specs_for_kind(root, kind_key)?;
    for (key, value) in params {
        let spec = specs.iter().find(|s| &s.name == key).ok_or_else(|| {
            let known: Vec<&str> = specs.iter().map(|s| s.name.as_str()).collect();
            anyhow!("unknown parameter '{key}' for {kind_key} (known: {known:?})")
        })?;
        if let Some(reason) = spec.reject_reason(value) {
            bail!("{kind_key}: {reason}");
        }
    }
    Ok(())
}

fn discriminant_matches(props: &Map<String, Value>, kind_key: &str) -> bool {
    let Some(tobj) = props.get("type").and_then(|v| v.as_object()) else {
        return false;
    };

    if tobj.get("const").and_then(|v| v.as_str()) == Some(kind_key) {
        return true;
    }
    matches!(
        tobj.get("enum").and_then(|v| v.as_array()),
        Some(arr) if arr.len() == 1 && arr[0].as_str() == Some(kind_key)
    )
}

/// Resolve a local $ref like "#/$defs/KNeighborsParams" against the root object.
/// Returns the referenced object map, or None if it can't be resolved.
fn resolve_ref_obj<'a>(
    root_obj: &'a Map<String, Value>,
    obj: &'a Map<String, Value>,
) -> Option<&'a Map<String, Value>> {
    match obj.get("$ref") {
        Some(Value::String(r)) => {
            let path = r.strip_prefix("#/")?;
            let mut cur: &Map<String, Value> = root_obj;
            for raw_seg in path.split('/') {
                // JSON Pointer unescape (~1 => /, ~0 => ~)
                let seg = raw_seg.replace("~1", "/").replace("~0", "~");
                cur = cur.get(&seg)?.as_object()?;
            }
            Some(cur)
        }
        _ => Some(obj),
    }
}

fn kind_of_name(s: &str) -> Option<FieldKind> {
    match s {
        "string" => Some(FieldKind::String),
        "integer" => Some(FieldKind::Integer),
        "number" => Some(FieldKind::Number),
        "boolean" => Some(FieldKind::Boolean),
        _ => None,
    }
}

fn detect_field_kind(ty: Option<&Value>) -> Option<FieldKind> {
    match ty {
        Some(Value::String(s)) => kind_of_name(s),
        // unions like ["integer","null"] for Option<T>
        Some(Value::Array(arr)) => arr.iter().filter_map(|v| v.as_str()).find_map(kind_of_name),
        _ => None,
    }
}

fn is_nullable(ty: Option<&Value>) -> bool {
    match ty {
        Some(Value::String(s)) => s == "null",
        Some(Value::Array(arr)) => arr.iter().any(|v| v.as_str() == Some("null")),
        _ => true,
    }
}
