//! Saved tree records: the plain-data form a tree is materialized from.
//!
//! ```yaml
//! root:
//!   kind: selector
//!   children:
//!     - kind: sequence
//!       title: attack
//!       breakpoint: on_enter
//!       children:
//!         - kind: has_key
//!           params: { key: target }
//!         - kind: wait
//!           params: { seconds: 0.5 }
//!     - kind: log
//!       params: { message: idle }
//! ```

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::node::Breakpoint;
use crate::MaterializeError;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TreeRecord {
    /// The root's single child. A record without one still materializes; the
    /// tree then fails every drive.
    #[serde(default)]
    pub root: Option<NodeRecord>,
}

impl TreeRecord {
    pub fn from_yaml_str(source: &str) -> Result<Self, MaterializeError> {
        Ok(serde_yaml::from_str(source)?)
    }

    pub fn from_json_str(source: &str) -> Result<Self, MaterializeError> {
        Ok(serde_json::from_str(source)?)
    }

    /// Number of node records, not counting the implicit root.
    pub fn node_count(&self) -> usize {
        self.root.as_ref().map_or(0, NodeRecord::subtree_len)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeRecord {
    pub kind: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(default, skip_serializing_if = "is_default_breakpoint")]
    pub breakpoint: Breakpoint,

    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub params: Value,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<NodeRecord>,
}

fn is_default_breakpoint(breakpoint: &Breakpoint) -> bool {
    *breakpoint == Breakpoint::None
}

impl NodeRecord {
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            title: None,
            breakpoint: Breakpoint::None,
            params: Value::Null,
            children: Vec::new(),
        }
    }

    pub fn with_param(mut self, name: &str, value: impl Into<Value>) -> Self {
        if !self.params.is_object() {
            self.params = Value::Object(Default::default());
        }
        if let Value::Object(map) = &mut self.params {
            map.insert(name.to_string(), value.into());
        }
        self
    }

    pub fn with_child(mut self, child: NodeRecord) -> Self {
        self.children.push(child);
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_breakpoint(mut self, breakpoint: Breakpoint) -> Self {
        self.breakpoint = breakpoint;
        self
    }

    pub fn subtree_len(&self) -> usize {
        1 + self.children.iter().map(Self::subtree_len).sum::<usize>()
    }

    pub fn param(&self, name: &str) -> Option<&Value> {
        self.params.get(name)
    }

    pub fn require(&self, name: &str) -> Result<&Value, MaterializeError> {
        self.param(name).ok_or_else(|| MaterializeError::MissingParam {
            kind: self.kind.clone(),
            param: name.to_string(),
        })
    }

    pub fn require_str(&self, name: &str) -> Result<&str, MaterializeError> {
        self.require(name)?
            .as_str()
            .ok_or_else(|| self.invalid(name, "expected a string"))
    }

    pub fn require_f64(&self, name: &str) -> Result<f64, MaterializeError> {
        let value = self
            .require(name)?
            .as_f64()
            .ok_or_else(|| self.invalid(name, "expected a number"))?;
        if !value.is_finite() || value < 0.0 {
            return Err(self.invalid(name, "expected a finite, non-negative number"));
        }
        Ok(value)
    }

    pub fn require_u32(&self, name: &str) -> Result<u32, MaterializeError> {
        let value = self
            .require(name)?
            .as_u64()
            .ok_or_else(|| self.invalid(name, "expected a non-negative integer"))?;
        u32::try_from(value).map_err(|_| self.invalid(name, "integer out of range"))
    }

    pub fn invalid(&self, name: &str, reason: impl Into<String>) -> MaterializeError {
        MaterializeError::InvalidParam {
            kind: self.kind.clone(),
            param: name.to_string(),
            reason: reason.into(),
        }
    }
}
