//! Identity interning.
//!
//! Node identities and link endpoints arrive as arbitrary JSON values (or whatever a custom
//! accessor returns). They are reduced to a primitive [`Key`] so they can be used as map keys
//! and compared by equality when links are resolved to node indices.

use std::fmt;

/// A primitive, hashable node identity.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Key {
	/// Text identity.
	Text(String),
	/// Integral identity, from integers or integral floats.
	Integer(i64),
	/// Bit pattern of a finite, non-integral float. `-0.0` is normalized to `0.0`.
	Float(u64),
	/// Boolean identity.
	Bool(bool),
}

impl Key {
	/// Builds a float key, collapsing integral values to [`Key::Integer`] so `1.0` and `1`
	/// intern to the same identity. Non-finite values have no identity.
	pub fn from_f64(value: f64) -> Option<Self> {
		if !value.is_finite() {
			return None;
		}
		if value.fract() == 0.0 && value.abs() < i64::MAX as f64 {
			return Some(Key::Integer(value as i64));
		}
		Some(Key::Float(value.to_bits()))
	}
}

impl fmt::Display for Key {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Key::Text(s) => f.write_str(s),
			Key::Integer(i) => write!(f, "{i}"),
			Key::Float(bits) => write!(f, "{}", f64::from_bits(*bits)),
			Key::Bool(b) => write!(f, "{b}"),
		}
	}
}

impl From<&str> for Key {
	fn from(value: &str) -> Self {
		Key::Text(value.to_string())
	}
}

impl From<String> for Key {
	fn from(value: String) -> Self {
		Key::Text(value)
	}
}

impl From<i64> for Key {
	fn from(value: i64) -> Self {
		Key::Integer(value)
	}
}

/// Reduction of a value to its primitive identity.
///
/// Returns `None` when the value has no usable identity (null, NaN); such nodes cannot be
/// addressed by links and such link endpoints never resolve.
pub trait Intern {
	/// The primitive identity, if any.
	fn intern(&self) -> Option<Key>;
}

impl Intern for Key {
	fn intern(&self) -> Option<Key> {
		Some(self.clone())
	}
}

impl Intern for str {
	fn intern(&self) -> Option<Key> {
		Some(Key::Text(self.to_string()))
	}
}

impl Intern for String {
	fn intern(&self) -> Option<Key> {
		self.as_str().intern()
	}
}

impl Intern for i64 {
	fn intern(&self) -> Option<Key> {
		Some(Key::Integer(*self))
	}
}

impl Intern for u32 {
	fn intern(&self) -> Option<Key> {
		Some(Key::Integer(i64::from(*self)))
	}
}

impl Intern for f64 {
	fn intern(&self) -> Option<Key> {
		Key::from_f64(*self)
	}
}

impl Intern for bool {
	fn intern(&self) -> Option<Key> {
		Some(Key::Bool(*self))
	}
}

impl<T: Intern + ?Sized> Intern for &T {
	fn intern(&self) -> Option<Key> {
		(**self).intern()
	}
}

impl<T: Intern> Intern for Option<T> {
	fn intern(&self) -> Option<Key> {
		self.as_ref().and_then(Intern::intern)
	}
}

impl Intern for serde_json::Value {
	fn intern(&self) -> Option<Key> {
		use serde_json::Value;
		match self {
			Value::Null => None,
			Value::Bool(b) => Some(Key::Bool(*b)),
			Value::String(s) => Some(Key::Text(s.clone())),
			Value::Number(n) => match n.as_i64() {
				Some(i) => Some(Key::Integer(i)),
				None => n.as_f64().and_then(Key::from_f64),
			},
			// Structured values reduce to their canonical JSON text.
			Value::Array(_) | Value::Object(_) => Some(Key::Text(self.to_string())),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use serde_json::json;

	#[test]
	fn strings_pass_through() {
		assert_eq!(json!("A").intern(), Some(Key::Text("A".into())));
		assert_eq!("A".intern(), Some(Key::from("A")));
	}

	#[test]
	fn integral_numbers_share_a_key() {
		assert_eq!(json!(3).intern(), json!(3.0).intern());
		assert_eq!(3.0_f64.intern(), Some(Key::Integer(3)));
		assert_eq!(json!(2.5).intern().map(|k| k.to_string()), Some("2.5".into()));
	}

	#[test]
	fn null_and_nan_have_no_identity() {
		assert_eq!(serde_json::Value::Null.intern(), None);
		assert_eq!(f64::NAN.intern(), None);
		assert_eq!(None::<String>.intern(), None);
	}

	#[test]
	fn structured_values_reduce_to_json_text() {
		let key = json!({"name": "x"}).intern();
		assert_eq!(key, Some(Key::Text(r#"{"name":"x"}"#.into())));
	}
}
