//! Dashboard variables and the resolution of the list evaluated for a render

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// Name of the synthetic variable carrying the active cluster
pub const CLUSTER_VARIABLE: &str = "__cluster";
/// Name of the synthetic variable carrying the active namespace
pub const NAMESPACE_VARIABLE: &str = "__namespace";
/// Plugin providing the values of synthetic and placeholder variables
pub const CORE_PLUGIN: &str = "core";

/// A named input control of a dashboard
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Variable {
    pub name: String,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub hide: bool,
    pub plugin: VariablePlugin,
}

/// The plugin which provides the values of a variable
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariablePlugin {
    pub name: String,
    /// Plugin specific options, interpreted by the plugin when the variable is evaluated
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Value>,
}

/// Options understood by the core variable plugin
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum CoreVariableOptions {
    /// A fixed list of values
    Static { items: Vec<String> },
}

impl Variable {
    /// A hidden core variable with exactly one static value
    pub fn hidden_static(name: &str, value: &str) -> Self {
        Self {
            name: name.to_string(),
            label: name.to_string(),
            hide: true,
            plugin: VariablePlugin {
                name: CORE_PLUGIN.to_string(),
                options: Some(json!({ "type": "static", "items": [value] })),
            },
        }
    }

    /// The typed options of a core variable, `None` for other plugins or
    /// options the core plugin does not understand
    pub fn core_options(&self) -> Option<CoreVariableOptions> {
        if self.plugin.name != CORE_PLUGIN {
            return None;
        }

        self.plugin
            .options
            .clone()
            .and_then(|options| serde_json::from_value(options).ok())
    }
}

/// Build the ordered variable list of a dashboard render.
///
/// The result starts with `__cluster` and `__namespace` (each only when the
/// value is non-empty), followed by one hidden variable per placeholder in key
/// order, followed by the declared variables. A name is emitted at most once:
/// whichever entry comes first in that order wins, so placeholders fill in
/// declared variables of the same name instead of duplicating them.
pub fn get_variables(
    declared: &[Variable],
    cluster: &str,
    namespace: &str,
    placeholders: &HashMap<String, String>,
) -> Vec<Variable> {
    let mut variables = Vec::with_capacity(2 + placeholders.len() + declared.len());
    let mut names = HashSet::new();

    let mut push = |variable: Variable| {
        if names.insert(variable.name.clone()) {
            variables.push(variable);
        }
    };

    if !cluster.is_empty() {
        push(Variable::hidden_static(CLUSTER_VARIABLE, cluster));
    }

    if !namespace.is_empty() {
        push(Variable::hidden_static(NAMESPACE_VARIABLE, namespace));
    }

    let mut keys: Vec<&String> = placeholders.keys().collect();
    keys.sort();
    for key in keys {
        push(Variable::hidden_static(key, &placeholders[key]));
    }

    for variable in declared {
        push(variable.clone());
    }

    variables
}
