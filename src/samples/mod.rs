//! Built-in sample datasets.
//!
//! Small, hand-built profiles used by the CLI `--demo` flag and the tests.

use crate::parser::schema::SampleNode;
use crate::parser::ParsedInput;
use crate::aggregator::stack_folder::fold_stacks;

/// Eight raw samples of a request handler, root first
pub fn request_stacks() -> Vec<Vec<&'static str>> {
    vec![
        vec!["main", "handleRequest", "processData", "parseJSON"],
        vec!["main", "handleRequest", "processData", "parseJSON"],
        vec!["main", "handleRequest", "processData", "validate"],
        vec!["main", "handleRequest", "processData", "validate"],
        vec!["main", "handleRequest", "processData", "parseJSON"],
        vec!["main", "handleRequest", "log"],
        vec!["main", "handleRequest", "processData", "transform"],
        vec!["main", "handleRequest", "processData", "parseJSON"],
    ]
}

/// A web server profile with 1000 samples
///
/// `formatLog` shows up under seven different callers.
pub fn realistic_profile() -> SampleNode {
    use SampleNode as N;

    N::branch(
        "main",
        0,
        vec![
            N::branch(
                "startup",
                5,
                vec![
                    N::branch("loadConfig", 12, vec![N::leaf("formatLog", 8)]),
                    N::branch("initLogger", 5, vec![N::leaf("formatLog", 10)]),
                ],
            ),
            N::branch(
                "handleRequest",
                20,
                vec![
                    N::branch(
                        "authenticate",
                        30,
                        vec![N::leaf("hashPassword", 75), N::leaf("formatLog", 15)],
                    ),
                    N::branch(
                        "queryDatabase",
                        40,
                        vec![
                            N::branch("buildQuery", 50, vec![N::leaf("formatLog", 10)]),
                            N::leaf("executeQuery", 250),
                            N::leaf("parseRows", 30),
                        ],
                    ),
                    N::branch(
                        "renderTemplate",
                        60,
                        vec![
                            N::leaf("escapeHtml", 90),
                            N::leaf("formatLog", 25),
                            N::leaf("serializeJSON", 65),
                        ],
                    ),
                    N::branch(
                        "writeResponse",
                        20,
                        vec![N::leaf("compress", 25), N::leaf("formatLog", 15)],
                    ),
                ],
            ),
            N::leaf("gcCollect", 100),
            N::branch("logger", 8, vec![N::leaf("formatLog", 32)]),
        ],
    )
}

/// Look up a dataset by its `--demo` name
pub fn by_name(name: &str) -> Option<ParsedInput> {
    match name {
        "request" => Some(ParsedInput::Folded(fold_stacks(&request_stacks()))),
        "realistic" => Some(ParsedInput::Tree(realistic_profile())),
        _ => None,
    }
}
