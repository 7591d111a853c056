//! Dashboards: variable resolution for dashboard renders

pub mod router;
pub mod variables;

pub use router::{configure, VariablesRequest};
pub use variables::{
    get_variables, CoreVariableOptions, Variable, VariablePlugin, CLUSTER_VARIABLE, CORE_PLUGIN,
    NAMESPACE_VARIABLE,
};
