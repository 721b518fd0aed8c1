//! Strict parsing of structured chat replies.
//!
//! The generation service is asked to follow [`response_schema`], but its
//! output is never trusted: [`parse_structured`] re-checks presence and
//! type of every field and reports the first category of violation.
//!
//! | Check | Error |
//! |-------|-------|
//! | JSON object at top level | [`ValidationError::NotAnObject`] |
//! | all required keys present | [`ValidationError::MissingFields`] (every missing key) |
//! | field types | [`ValidationError::WrongType`] (first offending field) |

use serde_json::{json, Map, Value};

use crate::error::ValidationError;
use crate::models::StructuredResult;

/// Keys every reply must carry, in schema order.
pub const REQUIRED_FIELDS: [&str; 6] = [
    "reply",
    "follow_up_questions",
    "is_medical",
    "is_legal",
    "is_financial",
    "is_not_appropriate",
];

const FLAG_FIELDS: [&str; 4] = ["is_medical", "is_legal", "is_financial", "is_not_appropriate"];

/// JSON schema hint passed to the generation service.
pub fn response_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "reply": {"type": "string"},
            "follow_up_questions": {"type": "array", "items": {"type": "string"}},
            "is_medical": {"type": "boolean"},
            "is_legal": {"type": "boolean"},
            "is_financial": {"type": "boolean"},
            "is_not_appropriate": {"type": "boolean"},
            "safety_note": {"type": ["string", "null"]},
        },
        "required": REQUIRED_FIELDS,
    })
}

/// Validate `raw` and build a [`StructuredResult`] from it.
pub fn parse_structured(raw: &str) -> Result<StructuredResult, ValidationError> {
    let value: Value = serde_json::from_str(raw).map_err(|_| ValidationError::NotAnObject)?;
    let obj = value.as_object().ok_or(ValidationError::NotAnObject)?;

    let missing: Vec<String> = REQUIRED_FIELDS
        .iter()
        .filter(|key| !obj.contains_key(**key))
        .map(|key| key.to_string())
        .collect();
    if !missing.is_empty() {
        return Err(ValidationError::MissingFields(missing));
    }

    let reply = obj["reply"]
        .as_str()
        .ok_or(ValidationError::WrongType {
            field: "reply",
            expected: "a string",
        })?
        .to_string();

    let follow_up_questions = string_list(&obj["follow_up_questions"]).ok_or(
        ValidationError::WrongType {
            field: "follow_up_questions",
            expected: "a list of strings",
        },
    )?;

    let mut flags = [false; 4];
    for (slot, field) in flags.iter_mut().zip(FLAG_FIELDS) {
        *slot = obj[field].as_bool().ok_or(ValidationError::WrongType {
            field,
            expected: "a boolean",
        })?;
    }
    let [is_medical, is_legal, is_financial, is_not_appropriate] = flags;

    Ok(StructuredResult {
        reply,
        follow_up_questions,
        is_medical,
        is_legal,
        is_financial,
        is_not_appropriate,
        safety_note: safety_note(obj)?,
    })
}

fn string_list(value: &Value) -> Option<Vec<String>> {
    value
        .as_array()?
        .iter()
        .map(|item| item.as_str().map(str::to_string))
        .collect()
}

fn safety_note(obj: &Map<String, Value>) -> Result<Option<String>, ValidationError> {
    match obj.get("safety_note") {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(note)) => Ok(Some(note.clone())),
        Some(_) => Err(ValidationError::WrongType {
            field: "safety_note",
            expected: "a string or null",
        }),
    }
}

impl StructuredResult {
    /// Parse and validate a raw model reply.
    pub fn from_json(raw: &str) -> Result<Self, ValidationError> {
        parse_structured(raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid() -> Value {
        json!({
            "reply": "Try building a paper boat together.",
            "follow_up_questions": ["How old is your child?", "Do you have paper?"],
            "is_medical": false,
            "is_legal": false,
            "is_financial": false,
            "is_not_appropriate": false,
        })
    }

    fn parse_value(v: &Value) -> Result<StructuredResult, ValidationError> {
        parse_structured(&v.to_string())
    }

    #[test]
    fn test_valid_reply_parses() {
        let result = parse_value(&valid()).unwrap();
        assert_eq!(result.reply, "Try building a paper boat together.");
        assert_eq!(result.follow_up_questions.len(), 2);
        assert_eq!(result.safety_note, None);
    }

    #[test]
    fn test_round_trip_through_serialization() {
        let original = StructuredResult {
            reply: "Here is an idea.".into(),
            follow_up_questions: vec!["Anything else?".into()],
            is_medical: true,
            is_legal: false,
            is_financial: true,
            is_not_appropriate: false,
            safety_note: Some("Consult a professional.".into()),
        };
        let raw = serde_json::to_string(&original).unwrap();
        assert_eq!(parse_structured(&raw).unwrap(), original);

        let no_note = StructuredResult {
            safety_note: None,
            ..original
        };
        let raw = serde_json::to_string(&no_note).unwrap();
        assert_eq!(parse_structured(&raw).unwrap(), no_note);
    }

    #[test]
    fn test_not_json() {
        assert_eq!(
            parse_structured("Sure! Here's my answer."),
            Err(ValidationError::NotAnObject)
        );
        assert_eq!(parse_structured(""), Err(ValidationError::NotAnObject));
    }

    #[test]
    fn test_non_object_top_level() {
        assert_eq!(parse_structured("[1, 2]"), Err(ValidationError::NotAnObject));
        assert_eq!(parse_structured("\"reply\""), Err(ValidationError::NotAnObject));
    }

    #[test]
    fn test_missing_reply() {
        let mut v = valid();
        v.as_object_mut().unwrap().remove("reply");
        assert_eq!(
            parse_value(&v),
            Err(ValidationError::MissingFields(vec!["reply".into()]))
        );
    }

    #[test]
    fn test_missing_fields_all_named() {
        let v = json!({"reply": "hi", "is_legal": false});
        assert_eq!(
            parse_value(&v),
            Err(ValidationError::MissingFields(vec![
                "follow_up_questions".into(),
                "is_medical".into(),
                "is_financial".into(),
                "is_not_appropriate".into(),
            ]))
        );
    }

    #[test]
    fn test_reply_must_be_string() {
        let mut v = valid();
        v["reply"] = json!(42);
        assert_eq!(
            parse_value(&v),
            Err(ValidationError::WrongType {
                field: "reply",
                expected: "a string"
            })
        );
    }

    #[test]
    fn test_follow_up_non_string_element() {
        let mut v = valid();
        v["follow_up_questions"] = json!(["ok", 3]);
        assert!(matches!(
            parse_value(&v),
            Err(ValidationError::WrongType {
                field: "follow_up_questions",
                ..
            })
        ));

        v["follow_up_questions"] = json!("not a list");
        assert!(matches!(
            parse_value(&v),
            Err(ValidationError::WrongType {
                field: "follow_up_questions",
                ..
            })
        ));
    }

    #[test]
    fn test_flag_integer_rejected() {
        let mut v = valid();
        v["is_medical"] = json!(1);
        assert_eq!(
            parse_value(&v),
            Err(ValidationError::WrongType {
                field: "is_medical",
                expected: "a boolean"
            })
        );
    }

    #[test]
    fn test_flag_string_true_rejected() {
        let mut v = valid();
        v["is_not_appropriate"] = json!("true");
        assert!(matches!(
            parse_value(&v),
            Err(ValidationError::WrongType {
                field: "is_not_appropriate",
                ..
            })
        ));
    }

    #[test]
    fn test_safety_note_integer_rejected() {
        let mut v = valid();
        v["safety_note"] = json!(5);
        assert_eq!(
            parse_value(&v),
            Err(ValidationError::WrongType {
                field: "safety_note",
                expected: "a string or null"
            })
        );
    }

    #[test]
    fn test_safety_note_null_or_string() {
        let mut v = valid();
        v["safety_note"] = Value::Null;
        assert_eq!(parse_value(&v).unwrap().safety_note, None);
        v["safety_note"] = json!("Ask a doctor.");
        assert_eq!(
            parse_value(&v).unwrap().safety_note.as_deref(),
            Some("Ask a doctor.")
        );
    }

    #[test]
    fn test_extra_fields_ignored() {
        let mut v = valid();
        v["confidence"] = json!(0.9);
        assert!(parse_value(&v).is_ok());
    }

    #[test]
    fn test_schema_lists_required_fields() {
        let schema = response_schema();
        let required: Vec<&str> = schema["required"]
            .as_array()
            .unwrap()
            .iter()
            .map(|v| v.as_str().unwrap())
            .collect();
        assert_eq!(required, REQUIRED_FIELDS);
        assert_eq!(schema["properties"]["safety_note"]["type"], json!(["string", "null"]));
    }
}
