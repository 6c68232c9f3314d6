//! Signature digest and the JSON encoding the gateway expects for bundled fields
use std::io;

use md5::{Digest, Md5};
use serde::{Serialize, Serializer as _};
use serde_json::ser::{Formatter, Serializer};

use crate::error::ParamError;
use crate::value::FieldValue;

/// Character-reversed copy of a text value. Numbers and lists are rejected.
pub fn reverse(value: &FieldValue) -> Result<String, ParamError> {
    match value {
        FieldValue::Text(text) => Ok(text.chars().rev().collect()),
        other => Err(ParamError::NotAString(other.kind())),
    }
}

/// Hex md5 of the upper-cased concatenation of `fields`.
///
/// Lists are flattened one level, so `[1, "a", [2, "b"]]` hashes `1A2B`.
pub fn generate_signature(fields: &[FieldValue]) -> String {
    let joined: String = fields
        .iter()
        .flat_map(|field| match field {
            FieldValue::List(items) => items.iter().collect::<Vec<_>>(),
            scalar => vec![scalar],
        })
        .map(ToString::to_string)
        .collect();

    hex::encode(Md5::digest(joined.to_uppercase().as_bytes()))
}

/// JSON layout used by the gateway: `", "` and `": "` separators, non printable-ASCII
/// characters written as `\uXXXX` escapes.
struct GatewayFormatter;

impl Formatter for GatewayFormatter {
    fn begin_array_value<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        if first {
            Ok(())
        } else {
            writer.write_all(b", ")
        }
    }

    fn begin_object_key<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        if first {
            Ok(())
        } else {
            writer.write_all(b", ")
        }
    }

    fn begin_object_value<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        writer.write_all(b": ")
    }

    fn write_string_fragment<W>(&mut self, writer: &mut W, fragment: &str) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        let mut units = [0u16; 2];
        for ch in fragment.chars() {
            if ch.is_ascii() && !ch.is_ascii_control() {
                writer.write_all(&[ch as u8])?;
            } else {
                for unit in ch.encode_utf16(&mut units).iter() {
                    write!(writer, "\\u{unit:04x}")?;
                }
            }
        }
        Ok(())
    }
}

/// Encode ordered `(name, value)` pairs as the JSON value of the bundled `field`,
/// in the gateway layout.
pub fn to_gateway_json<'a, K, I>(field: &str, pairs: I) -> Result<String, ParamError>
where
    K: Serialize + 'a,
    I: IntoIterator<Item = (K, &'a FieldValue)>,
{
    let encoding = |reason: String| ParamError::Encoding(field.to_string(), reason);

    let mut buf = Vec::new();
    let mut serializer = Serializer::with_formatter(&mut buf, GatewayFormatter);
    (&mut serializer)
        .collect_map(pairs)
        .map_err(|e| encoding(e.to_string()))?;

    let json = String::from_utf8(buf).map_err(|e| encoding(e.to_string()))?;
    if !json.is_ascii() {
        return Err(encoding("non-ASCII output".to_string()));
    }
    Ok(json)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signature_of_mixed_values() {
        let fields = vec![
            FieldValue::from(1),
            FieldValue::from("<test>"),
            FieldValue::from(vec![FieldValue::from(1), "val\"".into(), 2.2.into()]),
        ];
        assert_eq!(generate_signature(&fields), "58e87bbb04ee6c629bcdde18cd62fac5");

        let fields = vec![
            FieldValue::from(1),
            FieldValue::from("<testtest>"),
            FieldValue::from(vec![FieldValue::from(1), "val\"".into(), 2.2.into()]),
        ];
        assert_eq!(generate_signature(&fields), "cf3dfd3155a58873e335fff98d4959a6");
    }

    #[test]
    fn signature_is_order_sensitive() {
        let ab = FieldValue::from("ab");
        let cd = FieldValue::from("cd");
        let a = generate_signature(&[ab.clone(), cd.clone()]);
        let b = generate_signature(&[cd.clone(), ab.clone()]);
        assert_ne!(a, b);
        assert_eq!(a, generate_signature(&[ab, cd]));
    }

    #[test]
    fn signature_ignores_case() {
        assert_eq!(
            generate_signature(&[FieldValue::from("abc")]),
            generate_signature(&[FieldValue::from("ABC")])
        );
    }

    #[test]
    fn reverse_text() {
        assert_eq!(reverse(&FieldValue::from("123")).unwrap(), "321");
        assert_eq!(reverse(&FieldValue::from("")).unwrap(), "");
        assert_eq!(reverse(&FieldValue::from("абв")).unwrap(), "вба");
    }

    #[test]
    fn reverse_rejects_non_text() {
        assert_eq!(reverse(&FieldValue::from(123)), Err(ParamError::NotAString("number")));
        assert_eq!(
            reverse(&FieldValue::List(vec![])),
            Err(ParamError::NotAString("list"))
        );
    }

    #[test]
    fn gateway_json_layout() {
        let amount = FieldValue::from("12.00");
        let currency = FieldValue::from("UAH");
        let description = FieldValue::from("Test Order");
        let json = to_gateway_json("data", [
            ("amount", &amount),
            ("currency", &currency),
            ("description", &description),
        ])
        .unwrap();
        assert_eq!(
            json,
            r#"{"amount": "12.00", "currency": "UAH", "description": "Test Order"}"#
        );
    }

    #[test]
    fn gateway_json_escapes_non_ascii() {
        let description = FieldValue::from("Оплата");
        let json = to_gateway_json("data", [("description", &description)]).unwrap();
        assert!(json.is_ascii());
        assert_eq!(
            json,
            r#"{"description": "\u041e\u043f\u043b\u0430\u0442\u0430"}"#
        );

        let emoji = FieldValue::from("a😀\u{7f}\n\"");
        let json = to_gateway_json("data", [("d", &emoji)]).unwrap();
        assert_eq!(json, r#"{"d": "a\ud83d\ude00\u007f\n\""}"#);
    }

    #[test]
    fn gateway_json_numbers_and_lists() {
        let amount = FieldValue::from(12.0);
        let list = FieldValue::from(vec!["a", "b"]);
        let json = to_gateway_json("data", [("amount", &amount), ("list", &list)]).unwrap();
        assert_eq!(json, r#"{"amount": 12.0, "list": ["a", "b"]}"#);
    }
}
