use std::sync::LazyLock;

use debugbar_types::ControllerRef;
use regex::Regex;

static CONTROLLER_CLASS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([\\A-Za-z0-9]+Controller)").unwrap());
static CONTROLLER_ACTION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"::(\w+)|@(\w+)").unwrap());

/// Parse a route controller descriptor (`Foo\BarController@index`,
/// `Foo\BarController::index`, or a bare invokable class).
///
/// Returns `None` unless a `...Controller` class name is present.
pub fn parse_controller(descriptor: &str) -> Option<ControllerRef> {
    let class = CONTROLLER_CLASS.captures(descriptor)?.get(1)?.as_str();

    let action = CONTROLLER_ACTION.captures(descriptor).and_then(|caps| {
        caps.get(1)
            .or_else(|| caps.get(2))
            .map(|m| m.as_str().to_string())
    });

    Some(ControllerRef {
        class: class.to_string(),
        action,
    })
}
