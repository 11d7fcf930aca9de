use debugbar_providers::{flatten_dump, parse_controller, parse_status};
use debugbar_types::{
    BUILTIN_SECTIONS, ExceptionSummary, ModelSummary, QuerySummary, ReportMeta, RouteSection,
    ViewSummary,
};
use serde::Serialize;
use serde_json::{Map, Value};

/// Condensed, agent-oriented view of one snapshot.
///
/// Each optional section is `None` when its backing key is absent from the
/// snapshot, and is then left out of the selected output.
#[derive(Debug, Clone)]
pub struct Report<'a> {
    pub meta: ReportMeta,
    pub route: Option<RouteSection>,
    pub models: Option<Vec<ModelSummary>>,
    pub views: Option<Vec<ViewSummary>>,
    pub queries: Option<Vec<QuerySummary>>,
    pub exceptions: Option<Vec<ExceptionSummary>>,
    pub messages: Option<Value>,
    pub gate: Option<Value>,
    pub session: Option<Value>,
    raw: &'a Value,
}

/// Summarize a decoded snapshot.
pub fn build_report(data: &Value) -> Report<'_> {
    Report {
        meta: build_meta(data),
        route: build_route(data),
        models: build_models(data),
        views: build_views(data),
        queries: build_queries(data),
        exceptions: build_exceptions(data),
        messages: data
            .pointer("/messages/data")
            .or_else(|| data.pointer("/messages/messages"))
            .map(flatten_dump),
        gate: data.pointer("/gate/messages").map(flatten_dump),
        session: data.get("session").map(flatten_dump),
        raw: data,
    }
}

impl Report<'_> {
    /// `meta` followed by the requested sections in request order.
    ///
    /// Names outside the builtin set are copied from the snapshot's top-level
    /// keys with dump markup flattened. Missing sections and repeated names
    /// are skipped.
    pub fn select<S: AsRef<str>>(&self, sections: &[S]) -> Map<String, Value> {
        let mut out = Map::new();
        out.insert("meta".to_string(), to_json(&self.meta));

        for name in sections {
            let name = name.as_ref();
            if out.contains_key(name) {
                continue;
            }

            let value = if BUILTIN_SECTIONS.contains(&name) {
                self.builtin_section(name)
            } else {
                self.raw.get(name).map(flatten_dump)
            };

            if let Some(value) = value {
                out.insert(name.to_string(), value);
            }
        }

        out
    }

    fn builtin_section(&self, name: &str) -> Option<Value> {
        match name {
            "meta" => Some(to_json(&self.meta)),
            "route" => self.route.as_ref().map(to_json),
            "models" => self.models.as_ref().map(to_json),
            "views" => self.views.as_ref().map(to_json),
            "queries" => self.queries.as_ref().map(to_json),
            "exceptions" => self.exceptions.as_ref().map(to_json),
            "messages" => self.messages.clone(),
            "gate" => self.gate.clone(),
            "session" => self.session.clone(),
            _ => None,
        }
    }
}

fn to_json<T: Serialize>(value: &T) -> Value {
    serde_json::to_value(value).unwrap_or(Value::Null)
}

fn str_at(data: &Value, pointer: &str) -> Option<String> {
    data.pointer(pointer)
        .and_then(Value::as_str)
        .map(str::to_string)
}

fn build_meta(data: &Value) -> ReportMeta {
    ReportMeta {
        id: str_at(data, "/__meta/id"),
        url: str_at(data, "/request/data/full_url").or_else(|| str_at(data, "/__meta/uri")),
        method: str_at(data, "/__meta/method"),
        status: parse_status(data.pointer("/request/data/status")),
        datetime: str_at(data, "/__meta/datetime"),
    }
}

fn build_route(data: &Value) -> Option<RouteSection> {
    let descriptor = data.pointer("/route/controller")?.as_str()?;
    let controller = parse_controller(descriptor)?;

    Some(RouteSection {
        class: controller.class,
        uri: str_at(data, "/route/uri"),
        action: controller.action,
    })
}

fn build_models(data: &Value) -> Option<Vec<ModelSummary>> {
    let models = data.pointer("/models/data")?.as_object()?;

    Some(
        models
            .iter()
            .map(|(class, counts)| {
                let count = |key: &str| counts.get(key).and_then(Value::as_i64).unwrap_or(0);
                // Older collectors record a bare retrieved count per class.
                let retrieved = counts.as_i64().unwrap_or_else(|| count("retrieved"));

                ModelSummary {
                    class: class.clone(),
                    retrieved,
                    created: count("created"),
                    updated: count("updated"),
                    deleted: count("deleted"),
                }
            })
            .collect(),
    )
}

fn build_views(data: &Value) -> Option<Vec<ViewSummary>> {
    let templates = data.pointer("/views/templates")?.as_array()?;

    Some(
        templates
            .iter()
            .filter_map(|template| {
                let name = template
                    .get("name_original")
                    .and_then(Value::as_str)
                    .or_else(|| template.get("name").and_then(Value::as_str))?;

                Some(ViewSummary {
                    name: name.to_string(),
                    render_count: template
                        .get("render_count")
                        .and_then(Value::as_i64)
                        .unwrap_or(1),
                })
            })
            .collect(),
    )
}

fn build_queries(data: &Value) -> Option<Vec<QuerySummary>> {
    let statements = data.pointer("/queries/statements")?.as_array()?;

    Some(
        statements
            .iter()
            .map(|statement| QuerySummary {
                sql: statement.get("sql").cloned().unwrap_or(Value::Null),
                duration: statement
                    .get("duration")
                    .cloned()
                    .unwrap_or_else(|| Value::from(0)),
                source: statement.get("source").and_then(query_source),
            })
            .collect(),
    )
}

// Debugbar emits either a single frame object or a list of frames.
fn query_source(source: &Value) -> Option<String> {
    let frame = match source {
        Value::Array(frames) => frames.first()?,
        other => other,
    };
    frame.get("name").and_then(Value::as_str).map(str::to_string)
}

fn build_exceptions(data: &Value) -> Option<Vec<ExceptionSummary>> {
    let exceptions = data.pointer("/exceptions/exceptions")?.as_array()?;
    let field = |e: &Value, key: &str| e.get(key).cloned().unwrap_or(Value::Null);

    Some(
        exceptions
            .iter()
            .map(|e| ExceptionSummary {
                message: field(e, "message"),
                file: field(e, "file"),
                line: field(e, "line"),
            })
            .collect(),
    )
}
