use serde_json::Value;
use std::str::FromStr;

use super::{codec::encode_words, EncodedEntry, EncodingKind};
use crate::protocol::error::DecodeError;

/// One decoded `{ "type", "number", "regAddr" }` record.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ValueDescriptor {
    pub kind: EncodingKind,
    /// JSON has no integer type, so coil values arrive as floats too.
    pub number: f64,
    pub reg_addr: f64,
}

impl ValueDescriptor {
    /// Build a descriptor from a raw JSON record.
    ///
    /// The `type` field picks the encoding kind; `number` and `regAddr` must be
    /// present and numeric. Any other field is ignored.
    pub fn from_record(record: &Value) -> Result<Self, DecodeError> {
        let object = record
            .as_object()
            .ok_or_else(|| DecodeError::malformed("record", "is not a JSON object"))?;

        let kind = match object.get("type") {
            Some(Value::String(name)) => EncodingKind::from_str(name)
                .map_err(|_| DecodeError::UnknownEncodingKind { kind: name.clone() })?,
            Some(other) => {
                return Err(DecodeError::malformed(
                    "type",
                    format!("must be a string, got {other}"),
                ))
            }
            None => return Err(DecodeError::malformed("type", "is missing")),
        };

        let number = numeric_field(object, "number")?;
        let reg_addr = numeric_field(object, "regAddr")?;
        if !reg_addr.is_finite() {
            return Err(DecodeError::malformed("regAddr", "must be a finite number"));
        }

        Ok(Self {
            kind,
            number,
            reg_addr,
        })
    }

    /// Register address, truncated toward zero.
    pub fn address(&self) -> i64 {
        self.reg_addr.trunc() as i64
    }

    pub fn encode(&self) -> EncodedEntry {
        EncodedEntry {
            kind: self.kind,
            words: encode_words(self.kind, self.number),
            address: self.address(),
        }
    }
}

fn numeric_field(
    object: &serde_json::Map<String, Value>,
    field: &'static str,
) -> Result<f64, DecodeError> {
    match object.get(field) {
        Some(value) => value
            .as_f64()
            .ok_or_else(|| DecodeError::malformed(field, format!("must be a number, got {value}"))),
        None => Err(DecodeError::malformed(field, "is missing")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::encoding::EncodedWords;
    use serde_json::json;

    #[test]
    fn test_from_record() {
        let record = json!({"type": "float32BigWordBigEndian", "number": 3.1415, "regAddr": 103});
        let descriptor = ValueDescriptor::from_record(&record).unwrap();
        assert_eq!(descriptor.kind, EncodingKind::Float32BigWordBigEndian);
        assert_eq!(descriptor.number, 3.1415);
        assert_eq!(descriptor.address(), 103);

        let entry = descriptor.encode();
        assert_eq!(entry.address, 103);
        assert_eq!(entry.words, EncodedWords::Pair([0x4049, 0x0E56]));
    }

    #[test]
    fn test_extra_fields_are_ignored() {
        let record = json!({
            "type": "wordInt16BigEndian",
            "number": 1,
            "regAddr": 0,
            "comment": "pump running"
        });
        let entry = ValueDescriptor::from_record(&record).unwrap().encode();
        assert_eq!(entry.words, EncodedWords::Single(0x0101));
        assert_eq!(entry.address, 0);
    }

    #[test]
    fn test_address_truncates_toward_zero() {
        let record = json!({"type": "wordInt16LittleEndian", "number": 1, "regAddr": 12.9});
        assert_eq!(ValueDescriptor::from_record(&record).unwrap().address(), 12);

        let record = json!({"type": "wordInt16LittleEndian", "number": 1, "regAddr": -0.7});
        assert_eq!(ValueDescriptor::from_record(&record).unwrap().address(), 0);

        let record = json!({"type": "wordInt16LittleEndian", "number": 1, "regAddr": -3.2});
        assert_eq!(ValueDescriptor::from_record(&record).unwrap().address(), -3);
    }

    #[test]
    fn test_unknown_kind() {
        let record = json!({"type": "float64", "number": 1, "regAddr": 1});
        assert_eq!(
            ValueDescriptor::from_record(&record),
            Err(DecodeError::UnknownEncodingKind {
                kind: "float64".to_string()
            })
        );
    }

    #[test]
    fn test_malformed_records() {
        let cases = [
            (json!([1, 2, 3]), "record"),
            (json!({"number": 1, "regAddr": 1}), "type"),
            (json!({"type": 5, "number": 1, "regAddr": 1}), "type"),
            (json!({"type": "wordInt16BigEndian", "regAddr": 1}), "number"),
            (json!({"type": "wordInt16BigEndian", "number": "1", "regAddr": 1}), "number"),
            (json!({"type": "wordInt16BigEndian", "number": 1}), "regAddr"),
            (json!({"type": "wordInt16BigEndian", "number": 1, "regAddr": null}), "regAddr"),
        ];
        for (record, expected) in cases {
            match ValueDescriptor::from_record(&record) {
                Err(DecodeError::MalformedDescriptor { field, .. }) => {
                    assert_eq!(field, expected, "{record}")
                }
                other => panic!("expected malformed `{expected}` for {record}, got {other:?}"),
            }
        }
    }
}
