//! Catalog-driven tool dispatch.
//!
//! Every invocation resolves its catalog entry and runs one of four behaviors against the
//! scenario passed in by the caller. The dispatcher itself holds no mutable state.

use sandbox_types::{FixtureListSpec, FixtureLookupSpec, ToolBehavior, WriteActionSpec};
use sandbox_util::{compact_timestamp, value_to_text};
use serde_json::{Map, Value};

use crate::catalog::ToolCatalog;
use crate::error::{CatalogError, DispatchError};
use crate::field_aliases::resolve_alias;
use crate::fixtures::FixtureStore;
use crate::handlers::{HandlerContext, HandlerRegistry};
use crate::templates::{has_placeholders, render_template};
use crate::transforms::apply_transform;

/// Argument name tried after an entry's `param_field` for lookups.
const LOOKUP_FALLBACK_PARAM: &str = "id";

/// Interprets catalog entries against scenario fixtures.
#[derive(Debug, Clone)]
pub struct ToolDispatcher {
    catalog: ToolCatalog,
    handlers: HandlerRegistry,
    fixtures: FixtureStore,
}

impl ToolDispatcher {
    /// Build a dispatcher, validating the catalog against the handler registry.
    pub fn new(catalog: ToolCatalog, handlers: HandlerRegistry, fixtures: FixtureStore) -> Result<Self, CatalogError> {
        catalog.validate(&handlers)?;
        Ok(Self {
            catalog,
            handlers,
            fixtures,
        })
    }

    pub fn catalog(&self) -> &ToolCatalog {
        &self.catalog
    }

    /// Execute `tool` for `scenario` with the given arguments.
    pub fn dispatch(&self, scenario: &str, tool: &str, args: &Map<String, Value>) -> Result<Value, DispatchError> {
        let behavior = self
            .catalog
            .get(tool)
            .ok_or_else(|| DispatchError::unknown_tool(tool, self.catalog.sorted_names()))?;

        match behavior {
            ToolBehavior::FixtureList(spec) => self.fixture_list(scenario, spec),
            ToolBehavior::FixtureLookup(spec) => self.fixture_lookup(scenario, spec, args),
            ToolBehavior::WriteAction(spec) => Ok(write_action(spec, args)),
            ToolBehavior::Custom(spec) => {
                let handler = self
                    .handlers
                    .get(&spec.handler)
                    .ok_or_else(|| DispatchError::missing_handler(tool, &spec.handler))?;
                let context = HandlerContext {
                    scenario,
                    fixtures: &self.fixtures,
                };
                Ok(handler(&context, args))
            }
        }
    }

    fn fixture_list(&self, scenario: &str, spec: &FixtureListSpec) -> Result<Value, DispatchError> {
        let data = match self.fixtures.load(scenario, &spec.fixture)? {
            None => Value::Array(Vec::new()),
            Some(Value::Array(records)) => match spec.transform {
                Some(transform) => Value::Array(apply_transform(transform, records)),
                None => Value::Array(records),
            },
            // Non-sequence fixtures pass through untouched.
            Some(other) => other,
        };
        Ok(wrap(&spec.response_key, data))
    }

    fn fixture_lookup(&self, scenario: &str, spec: &FixtureLookupSpec, args: &Map<String, Value>) -> Result<Value, DispatchError> {
        let Some(fixture) = self.fixtures.load(scenario, &spec.fixture)? else {
            return Ok(lookup_result(&spec.response_key, None));
        };

        let wanted = resolve_alias(args, &[spec.param_field.as_str(), LOOKUP_FALLBACK_PARAM])
            .map(value_to_text)
            .unwrap_or_default();
        let records = fixture.as_array().map(Vec::as_slice).unwrap_or_default();
        let found = records
            .iter()
            .find(|record| match record.get(&spec.lookup_field) {
                None | Some(Value::Null) => false,
                Some(value) => value_to_text(value) == wanted,
            })
            .cloned();
        Ok(lookup_result(&spec.response_key, found))
    }
}

/// Render the response template, then echo requested input fields over it.
fn write_action(spec: &WriteActionSpec, args: &Map<String, Value>) -> Value {
    let timestamp = compact_timestamp();
    let mut response = spec.default_response.clone();
    for value in response.values_mut() {
        if let Value::String(template) = value
            && has_placeholders(template)
        {
            *template = render_template(template, &timestamp, args);
        }
    }
    for field in &spec.echo_fields {
        if let Some(echoed) = args.get(field) {
            response.insert(field.clone(), echoed.clone());
        }
    }
    Value::Object(response)
}

fn wrap(key: &str, data: Value) -> Value {
    let mut wrapped = Map::new();
    wrapped.insert(key.to_string(), data);
    Value::Object(wrapped)
}

fn lookup_result(key: &str, record: Option<Value>) -> Value {
    let mut result = Map::new();
    let found = record.is_some();
    result.insert(key.to_string(), record.unwrap_or(Value::Null));
    result.insert("found".to_string(), Value::Bool(found));
    Value::Object(result)
}
