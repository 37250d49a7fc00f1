//! Bundled walkthrough: a small people list and the questions the rule
//! compiler knows how to answer (and a few it does not).

use std::fmt::Write;

use crate::{error::NljqError, pipeline::Pipeline};

pub const SAMPLE_DOCUMENT: &str = r#"[
  {
    "name": "Alice",
    "age": 30,
    "address": {
      "city": "New York",
      "country": "USA"
    }
  },
  {
    "name": "Bob",
    "age": 25,
    "address": {
      "city": "London",
      "country": "UK"
    }
  }
]"#;

pub const SAMPLE_QUERIES: &[&str] = &[
    "name",
    "age",
    "city",
    "country",
    "first",
    "last",
    "all",
    "filter where age > 28",
    "the second element",
    "name of address",
    "average age",
    "sum of age",
];

/// Runs every sample question and returns the transcript.
///
/// Each block names the query, the expression it compiled to, and either the
/// pretty-printed result or the error text.
pub fn run_demo(pipeline: &Pipeline) -> String {
    let mut out = String::new();
    for query in SAMPLE_QUERIES {
        let _ = writeln!(out, "Query: {query}");
        match pipeline.compile(query, SAMPLE_DOCUMENT) {
            Ok(expression) => {
                let _ = writeln!(out, "JQ Expression: {expression}");
                let result = match crate::pipeline::evaluate(&expression, SAMPLE_DOCUMENT) {
                    Ok(value) => crate::pipeline::render_json(&value),
                    Err(e) => e.to_string(),
                };
                let _ = writeln!(out, "Result:\n{result}\n");
            }
            Err(NljqError::TranslationFailure) => {
                let _ = writeln!(out, "JQ Expression:\nTranslation failed.\n");
            }
            Err(e) => {
                let _ = writeln!(out, "{e}\n");
            }
        }
    }
    out
}

#[cfg(all(test, feature = "jq"))]
mod tests {
    use super::*;

    #[test]
    fn test_demo_transcript() {
        let pipeline = Pipeline::with_rules().unwrap();
        let transcript = run_demo(&pipeline);

        assert_eq!(transcript.matches("Query: ").count(), SAMPLE_QUERIES.len());
        assert!(transcript.contains("Query: average age\nJQ Expression: map(.age) | add / length\nResult:\n27.5\n"));
        assert!(transcript.contains("Query: the second element\nJQ Expression: .[] | .[1]\n"));
        assert!(transcript.contains("Query: sum of age\nJQ Expression: .sum.age\nResult:\nError applying jq:"));
    }
}
