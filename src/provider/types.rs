//! Schema, diagnostics and per-operation request/response types

use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::{Result, TfeError};

/// Value kind of a schema attribute
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AttributeKind {
    String,
    Bool,
    Number,
    List,
    Map,
}

impl AttributeKind {
    pub fn as_str(self) -> &'static str {
        match self {
            AttributeKind::String => "string",
            AttributeKind::Bool => "bool",
            AttributeKind::Number => "number",
            AttributeKind::List => "list",
            AttributeKind::Map => "map",
        }
    }

    fn accepts(self, value: &Value) -> bool {
        match self {
            AttributeKind::String => value.is_string(),
            AttributeKind::Bool => value.is_boolean(),
            AttributeKind::Number => value.is_number(),
            AttributeKind::List => value.is_array(),
            AttributeKind::Map => value.is_object(),
        }
    }
}

/// Who sets an attribute: the user, the provider, or either
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AttributeMode {
    Required,
    Optional,
    Computed,
    OptionalComputed,
}

impl AttributeMode {
    fn is_computed(self) -> bool {
        matches!(self, AttributeMode::Computed | AttributeMode::OptionalComputed)
    }
}

/// One schema attribute
#[derive(Debug, Clone, Serialize)]
pub struct Attribute {
    pub name: &'static str,
    pub kind: AttributeKind,
    pub mode: AttributeMode,
    pub force_new: bool,
    pub sensitive: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
    pub description: &'static str,
}

impl Attribute {
    fn new(name: &'static str, kind: AttributeKind, mode: AttributeMode) -> Self {
        Self {
            name,
            kind,
            mode,
            force_new: false,
            sensitive: false,
            default: None,
            description: "",
        }
    }

    pub fn required(name: &'static str, kind: AttributeKind) -> Self {
        Self::new(name, kind, AttributeMode::Required)
    }

    pub fn optional(name: &'static str, kind: AttributeKind) -> Self {
        Self::new(name, kind, AttributeMode::Optional)
    }

    pub fn computed(name: &'static str, kind: AttributeKind) -> Self {
        Self::new(name, kind, AttributeMode::Computed)
    }

    pub fn optional_computed(name: &'static str, kind: AttributeKind) -> Self {
        Self::new(name, kind, AttributeMode::OptionalComputed)
    }

    /// Changing this attribute replaces the resource
    pub fn force_new(mut self) -> Self {
        self.force_new = true;
        self
    }

    pub fn sensitive(mut self) -> Self {
        self.sensitive = true;
        self
    }

    /// Value planned when the configuration leaves the attribute unset
    pub fn with_default(mut self, default: Value) -> Self {
        self.default = Some(default);
        self
    }

    pub fn describe(mut self, description: &'static str) -> Self {
        self.description = description;
        self
    }
}

/// Versioned attribute schema for one resource or data source type
#[derive(Debug, Clone, Serialize)]
pub struct Schema {
    pub version: i64,
    pub attributes: Vec<Attribute>,
}

impl Schema {
    pub fn new(version: i64) -> Self {
        Self {
            version,
            attributes: Vec::new(),
        }
    }

    pub fn attr(mut self, attribute: Attribute) -> Self {
        self.attributes.push(attribute);
        self
    }

    pub fn get(&self, name: &str) -> Option<&Attribute> {
        self.attributes.iter().find(|a| a.name == name)
    }

    /// Check a configuration object against the schema
    pub fn validate(&self, config: &Value) -> Vec<Diagnostic> {
        let mut diags = Vec::new();

        let empty = Map::new();
        let object = match config {
            Value::Object(map) => map,
            Value::Null => &empty,
            _ => {
                diags.push(Diagnostic::error(
                    "Invalid configuration",
                    "configuration must be an object",
                ));
                return diags;
            }
        };

        for key in object.keys() {
            if self.get(key).is_none() {
                diags.push(
                    Diagnostic::error(
                        "Unsupported argument",
                        &format!("An argument named \"{}\" is not expected here.", key),
                    )
                    .at(key),
                );
            }
        }

        for attr in &self.attributes {
            match object.get(attr.name).filter(|v| !v.is_null()) {
                None if attr.mode == AttributeMode::Required => diags.push(
                    Diagnostic::error(
                        "Missing required argument",
                        &format!("The argument \"{}\" is required.", attr.name),
                    )
                    .at(attr.name),
                ),
                None => {}
                Some(_) if attr.mode == AttributeMode::Computed => diags.push(
                    Diagnostic::error(
                        "Value for unconfigurable attribute",
                        &format!("Can't configure a value for \"{}\".", attr.name),
                    )
                    .at(attr.name),
                ),
                Some(value) if !attr.kind.accepts(value) => diags.push(
                    Diagnostic::error(
                        "Incorrect attribute value type",
                        &format!(
                            "Inappropriate value for attribute \"{}\": {} required.",
                            attr.name,
                            attr.kind.as_str()
                        ),
                    )
                    .at(attr.name),
                ),
                Some(_) => {}
            }
        }

        diags
    }

    /// Fill declared defaults into unset attributes of an object
    pub fn apply_defaults(&self, state: &mut Value) {
        let Some(object) = state.as_object_mut() else {
            return;
        };
        for attr in &self.attributes {
            if let Some(ref default) = attr.default {
                let unset = object.get(attr.name).map_or(true, Value::is_null);
                if unset {
                    object.insert(attr.name.to_string(), default.clone());
                }
            }
        }
    }
}

/// Diagnostic severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
}

/// A user-facing validation finding
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub severity: Severity,
    pub summary: String,
    pub detail: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attribute: Option<String>,
}

impl Diagnostic {
    pub fn error(summary: &str, detail: &str) -> Self {
        Self {
            severity: Severity::Error,
            summary: summary.to_string(),
            detail: detail.to_string(),
            attribute: None,
        }
    }

    pub fn warning(summary: &str, detail: &str) -> Self {
        Self {
            severity: Severity::Warning,
            ..Self::error(summary, detail)
        }
    }

    /// Attach the attribute path this diagnostic refers to
    pub fn at(mut self, attribute: &str) -> Self {
        self.attribute = Some(attribute.to_string());
        self
    }
}

/// True if any diagnostic is an error
pub fn has_errors(diags: &[Diagnostic]) -> bool {
    diags.iter().any(|d| d.severity == Severity::Error)
}

/// Stored state written by an older (or newer) schema version
#[derive(Debug, Clone)]
pub struct UpgradeStateRequest {
    pub version: i64,
    pub raw_state: Value,
}

#[derive(Debug, Clone)]
pub struct ReadRequest {
    pub current_state: Value,
}

/// `proposed_state` of `None` means destroy; `prior_state` of `None` means create
#[derive(Debug, Clone)]
pub struct PlanRequest {
    pub prior_state: Option<Value>,
    pub proposed_state: Option<Value>,
    pub config: Value,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlanResponse {
    pub planned_state: Option<Value>,
    pub requires_replace: Vec<String>,
}

/// `planned_state` of `None` means delete
#[derive(Debug, Clone)]
pub struct ApplyRequest {
    pub prior_state: Option<Value>,
    pub planned_state: Option<Value>,
}

#[derive(Debug, Clone)]
pub struct ImportRequest {
    pub id: String,
}

/// Pass-through upgrade: current version unchanged, newer versions rejected
pub fn upgrade_state_default(schema: &Schema, request: UpgradeStateRequest) -> Result<Value> {
    if request.version > schema.version {
        return Err(TfeError::Validation(format!(
            "state was written by a newer provider (schema version {} > {})",
            request.version, schema.version
        )));
    }
    Ok(request.raw_state)
}

/// Plan derived from the schema alone
///
/// Create fills defaults; update carries computed attributes forward from
/// prior state and lists changed `force_new` attributes.
pub fn plan_from_schema(schema: &Schema, request: PlanRequest) -> Result<PlanResponse> {
    let Some(mut planned) = request.proposed_state else {
        return Ok(PlanResponse {
            planned_state: None,
            requires_replace: Vec::new(),
        });
    };

    if !planned.is_object() {
        return Err(TfeError::Validation(
            "proposed state must be an object".to_string(),
        ));
    }
    schema.apply_defaults(&mut planned);

    let Some(prior) = request.prior_state else {
        return Ok(PlanResponse {
            planned_state: Some(planned),
            requires_replace: Vec::new(),
        });
    };

    let requires_replace: Vec<String> = schema
        .attributes
        .iter()
        .filter(|a| a.force_new)
        .filter(|a| {
            let before = prior.get(a.name).unwrap_or(&Value::Null);
            let after = planned.get(a.name).unwrap_or(&Value::Null);
            before != after
        })
        .map(|a| a.name.to_string())
        .collect();

    if let Some(object) = planned.as_object_mut() {
        for attr in schema.attributes.iter().filter(|a| a.mode.is_computed()) {
            let unset = object.get(attr.name).map_or(true, Value::is_null);
            if !unset {
                continue;
            }
            // A replacement gets fresh computed-only values
            if !requires_replace.is_empty() && attr.mode == AttributeMode::Computed {
                object.insert(attr.name.to_string(), Value::Null);
                continue;
            }
            if let Some(previous) = prior.get(attr.name) {
                object.insert(attr.name.to_string(), previous.clone());
            }
        }
    }

    Ok(PlanResponse {
        planned_state: Some(planned),
        requires_replace,
    })
}
